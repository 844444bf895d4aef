//! Viewport-driven lazy loading for project cards.
//!
//! Cards are watched with a trigger margin beyond the physical viewport —
//! wider on narrow screens — so their images begin fetching just before the
//! user scrolls them into view. Each card loads at most once; a failed load
//! keeps its error tint and is never retried. Runtimes without visibility
//! watching get every card loaded eagerly instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::LazyLoadConfig;
use crate::loader::{background_image_url, FetchPriority, ImageFetcher, LoadPhase};
use crate::page::{NodeId, Page, WatchOptions};

const LOADING_TINT: &str = "#f0f0f0";
pub(crate) const ERROR_TINT: &str = "#e0e0e0";

/// Lazy loader over the page's project cards.
pub struct LazyLoader {
    page: Arc<dyn Page>,
    fetcher: Arc<dyn ImageFetcher>,
    phases: Mutex<HashMap<NodeId, LoadPhase>>,
}

impl LazyLoader {
    /// Register visibility watches over every project card, or load them all
    /// immediately when watching is unavailable.
    pub fn mount(
        page: Arc<dyn Page>,
        fetcher: Arc<dyn ImageFetcher>,
        cfg: &LazyLoadConfig,
        breakpoint: u32,
    ) -> Arc<Self> {
        let loader = Arc::new(Self {
            page: Arc::clone(&page),
            fetcher,
            phases: Mutex::new(HashMap::new()),
        });

        let cards = page.by_class("project-card");
        if cards.is_empty() {
            return loader;
        }

        let margin = if page.viewport().width < breakpoint {
            cfg.margin_mobile_px
        } else {
            cfg.margin_desktop_px
        };
        let opts = WatchOptions {
            margin_px: margin,
            threshold: cfg.threshold,
        };

        match page.watch_visibility(&cards, opts) {
            Some(mut watch) => {
                let loader = Arc::clone(&loader);
                tokio::spawn(async move {
                    while let Some(card) = watch.entered().await {
                        loader.load_card(card);
                    }
                });
            }
            None => {
                for card in cards {
                    loader.load_card(card);
                }
            }
        }
        loader
    }

    /// Current load phase of a card's image slot.
    pub fn phase(&self, image: NodeId) -> LoadPhase {
        self.phases
            .lock()
            .unwrap()
            .get(&image)
            .copied()
            .unwrap_or(LoadPhase::Unstarted)
    }

    /// Begin loading the image slot of `card`. Only the first call per card
    /// does anything; later intersections are ignored.
    fn load_card(self: &Arc<Self>, card: NodeId) {
        let Some(image) = self
            .page
            .scoped_by_class(card, "project-image")
            .into_iter()
            .next()
        else {
            return;
        };

        {
            let mut phases = self.phases.lock().unwrap();
            let phase = phases.entry(image).or_insert(LoadPhase::Unstarted);
            if *phase != LoadPhase::Unstarted {
                return;
            }
            *phase = LoadPhase::Loading;
        }
        self.page.add_class(image, "loading");

        let url = self
            .page
            .style(image, "background-image")
            .and_then(|s| background_image_url(&s));
        let Some(url) = url else {
            // Nothing to fetch behind the placeholder; settle as failed.
            self.settle(image, Err(()));
            return;
        };

        self.page.set_style(image, "background-color", LOADING_TINT);

        let loader = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = loader.fetcher.fetch(&url, FetchPriority::Auto).await;
            match outcome {
                Ok(()) => loader.settle(image, Ok(())),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "project image failed to load");
                    loader.settle(image, Err(()));
                }
            }
        });
    }

    fn settle(&self, image: NodeId, outcome: Result<(), ()>) {
        match outcome {
            Ok(()) => {
                self.page.set_style(image, "background-color", "");
                self.page.add_class(image, "loaded");
                self.page.remove_class(image, "loading");
                self.phases.lock().unwrap().insert(image, LoadPhase::Loaded);
            }
            Err(()) => {
                self.page.set_style(image, "background-color", ERROR_TINT);
                self.page.remove_class(image, "loading");
                self.phases.lock().unwrap().insert(image, LoadPhase::Failed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixture::{self, FixtureSpec};
    use crate::sim::{SimFetcher, SimPage};
    use std::time::Duration;

    fn cards(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("projects/card-{i:02}.webp")).collect()
    }

    fn mounted(
        spec: FixtureSpec,
        fetcher: Arc<SimFetcher>,
    ) -> (Arc<SimPage>, Arc<LazyLoader>) {
        let page = fixture::standard_page(&spec);
        let loader = LazyLoader::mount(
            page.clone(),
            fetcher,
            &LazyLoadConfig::default(),
            768,
        );
        (page, loader)
    }

    fn image_of(page: &SimPage, card_index: usize) -> NodeId {
        let card = page.by_class("project-card")[card_index];
        page.scoped_by_class(card, "project-image")[0]
    }

    #[tokio::test(start_paused = true)]
    async fn only_visible_cards_start_loading() {
        let fetcher = Arc::new(SimFetcher::new(Duration::from_millis(20)));
        // Cards are laid out down the page; only the first sits near the fold.
        let (page, loader) = mounted(
            FixtureSpec {
                cards: cards(4),
                viewport: (1280, 800),
                ..FixtureSpec::default()
            },
            fetcher.clone(),
        );
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(fetcher.started().len(), 1);
        assert_eq!(loader.phase(image_of(&page, 3)), LoadPhase::Unstarted);
    }

    #[tokio::test(start_paused = true)]
    async fn scrolling_into_range_triggers_the_load_once() {
        let fetcher = Arc::new(SimFetcher::new(Duration::from_millis(20)));
        let (page, loader) = mounted(
            FixtureSpec {
                cards: cards(3),
                viewport: (1280, 800),
                ..FixtureSpec::default()
            },
            fetcher.clone(),
        );
        page.set_scroll(1200.0);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let image = image_of(&page, 2);
        assert_eq!(loader.phase(image), LoadPhase::Loaded);
        assert!(page.has_class(image, "loaded"));
        assert!(!page.has_class(image, "loading"));
        // Placeholder tint cleared on success.
        assert_eq!(page.style(image, "background-color"), None);
        assert_eq!(fetcher.started().len(), 3);

        // Scrolling around again never re-fetches.
        page.set_scroll(0.0);
        page.set_scroll(1200.0);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fetcher.started().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_keeps_error_tint_and_never_retries() {
        let fetcher = Arc::new(SimFetcher::new(Duration::from_millis(10)));
        fetcher.fail("projects/card-00.webp");
        let (page, loader) = mounted(
            FixtureSpec {
                cards: cards(1),
                viewport: (1280, 800),
                ..FixtureSpec::default()
            },
            fetcher.clone(),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
        let image = image_of(&page, 0);
        assert_eq!(loader.phase(image), LoadPhase::Failed);
        assert_eq!(page.style(image, "background-color").as_deref(), Some(ERROR_TINT));
        assert!(!page.has_class(image, "loading"));
        assert_eq!(fetcher.started().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn without_visibility_watching_everything_loads_eagerly() {
        let fetcher = Arc::new(SimFetcher::new(Duration::from_millis(10)));
        let (_, loader) = mounted(
            FixtureSpec {
                cards: cards(5),
                viewport: (1280, 800),
                visibility_watching: false,
                ..FixtureSpec::default()
            },
            fetcher.clone(),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fetcher.started().len(), 5);
        let _ = loader;
    }

    #[tokio::test(start_paused = true)]
    async fn narrow_viewports_use_the_wider_trigger_margin() {
        // One card 150px below the fold: inside the mobile margin (200px),
        // outside the desktop one (100px).
        let spec = |width| FixtureSpec {
            cards: cards(1),
            viewport: (width, 800),
            card_top: 950.0,
            ..FixtureSpec::default()
        };

        let mobile = Arc::new(SimFetcher::new(Duration::from_millis(10)));
        let _ = mounted(spec(375), mobile.clone());
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(mobile.started().len(), 1);

        let desktop = Arc::new(SimFetcher::new(Duration::from_millis(10)));
        let _ = mounted(spec(1280), desktop.clone());
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(desktop.started().is_empty());
    }
}
