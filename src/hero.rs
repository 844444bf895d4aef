//! Hero image preload scheduling.
//!
//! Assigns a shuffled subset of the catalog to the hero slide slots and
//! decides how aggressively to fetch: every slot eagerly on fast clients,
//! only the first two on slow ones, with the rest deferred to a background
//! pass after a short grace delay. The hero stays dimmed until the first
//! fetch settles — success or failure both count, so one broken image cannot
//! hold the page hostage — and a fallback timer forces the reveal if nothing
//! settles at all. Whichever of the two fires first starts the rotation,
//! exactly once.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::ImageCatalog;
use crate::config::SlideshowConfig;
use crate::connection;
use crate::loader::{FetchPriority, ImageFetcher};
use crate::page::{NodeId, Page};
use crate::slideshow::Slideshow;

struct RaceState {
    settled: usize,
    revealed: bool,
}

struct HeroRace {
    page: Arc<dyn Page>,
    fetcher: Arc<dyn ImageFetcher>,
    slideshow: Arc<Slideshow>,
    hero_content: Option<NodeId>,
    grace: Duration,
    deferred: Mutex<Vec<(NodeId, String)>>,
    state: Mutex<RaceState>,
}

/// Assign catalog images to the hero slots and begin loading.
///
/// No-op when the page has no slide slots. Slots beyond the catalog size
/// stay unassigned.
pub fn mount(
    page: &Arc<dyn Page>,
    fetcher: &Arc<dyn ImageFetcher>,
    slideshow: &Arc<Slideshow>,
    catalog: &ImageCatalog,
    cfg: &SlideshowConfig,
    breakpoint: u32,
) {
    let slides = slideshow.slide_nodes().to_vec();
    if slides.is_empty() {
        return;
    }

    let hero_content = page.by_class("hero-content").into_iter().next();
    if let Some(content) = hero_content {
        page.set_style(content, "opacity", "0.7");
    }

    let assigned = catalog.assign(slides.len(), &mut rand::rng());
    let slow = connection::is_slow(page.as_ref(), breakpoint);
    let eager_count = if slow {
        cfg.eager_on_slow.min(slides.len())
    } else {
        slides.len()
    };

    let mut eager = Vec::new();
    let mut deferred = Vec::new();
    for (i, slide) in slides.iter().enumerate() {
        let Some(url) = assigned.get(i) else { break };
        if i < eager_count {
            eager.push((*slide, url.clone()));
        } else {
            deferred.push((*slide, url.clone()));
        }
    }

    let race = Arc::new(HeroRace {
        page: Arc::clone(page),
        fetcher: Arc::clone(fetcher),
        slideshow: Arc::clone(slideshow),
        hero_content,
        grace: cfg.grace(),
        deferred: Mutex::new(deferred),
        state: Mutex::new(RaceState {
            settled: 0,
            revealed: false,
        }),
    });

    for (i, (slide, url)) in eager.into_iter().enumerate() {
        race.page.push_preload_hint(&url, i == 0);
        let priority = if i == 0 {
            FetchPriority::High
        } else {
            FetchPriority::Auto
        };
        let race = Arc::clone(&race);
        tokio::spawn(async move {
            race.fetch_eager(slide, url, priority).await;
        });
    }

    let fallback = cfg.fallback();
    let race = Arc::clone(&race);
    tokio::spawn(async move {
        tokio::time::sleep(fallback).await;
        race.force_reveal();
    });
}

impl HeroRace {
    async fn fetch_eager(self: Arc<Self>, slide: NodeId, url: String, priority: FetchPriority) {
        match self.fetcher.fetch(&url, priority).await {
            Ok(()) => {
                self.page
                    .set_style(slide, "background-image", &format!("url('{url}')"));
                self.page.add_class(slide, "loaded");
            }
            Err(e) => tracing::warn!(url = %url, error = %e, "hero image failed to load"),
        }
        let first = {
            let mut state = self.state.lock().unwrap();
            state.settled += 1;
            let first = !state.revealed;
            state.revealed = true;
            first
        };
        if first {
            self.reveal(true);
        }
    }

    /// Fallback-timer path: reveal only if nothing settled in time. The
    /// deferred slots are not scheduled here; they belong to the settle path.
    fn force_reveal(self: &Arc<Self>) {
        let force = {
            let mut state = self.state.lock().unwrap();
            if state.settled == 0 && !state.revealed {
                state.revealed = true;
                true
            } else {
                false
            }
        };
        if force {
            tracing::info!("hero reveal forced by fallback timer");
            self.reveal(false);
        }
    }

    fn reveal(self: &Arc<Self>, schedule_deferred: bool) {
        if let Some(content) = self.hero_content {
            self.page.set_style(content, "opacity", "1");
        }
        self.slideshow.start();

        if !schedule_deferred {
            return;
        }
        let pending = std::mem::take(&mut *self.deferred.lock().unwrap());
        if pending.is_empty() {
            return;
        }
        let race = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(race.grace).await;
            for (slide, url) in pending {
                let race = Arc::clone(&race);
                tokio::spawn(async move {
                    match race.fetcher.fetch(&url, FetchPriority::Auto).await {
                        Ok(()) => {
                            race.page
                                .set_style(slide, "background-image", &format!("url('{url}')"));
                            race.page.add_class(slide, "loaded");
                        }
                        Err(e) => {
                            tracing::warn!(url = %url, error = %e, "deferred hero image failed")
                        }
                    }
                });
            }
        });
    }
}
