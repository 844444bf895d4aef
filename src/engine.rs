//! Page behavior assembly and event routing.
//!
//! [`Behaviors::mount`] is the page-load sequence: it wires every behavior
//! to the elements it finds, kicks off the hero preload, and schedules the
//! lazy-loader (slightly delayed on narrow viewports so the hero gets first
//! claim on the connection). [`Behaviors::dispatch`] is the single entry
//! point for input events from the host runtime.

use std::sync::{Arc, Mutex};

use crate::config::BehaviorConfig;
use crate::contact::{ContactFlow, Mailer};
use crate::lazyload::LazyLoader;
use crate::lightbox::Lightbox;
use crate::loader::ImageFetcher;
use crate::nav::Nav;
use crate::page::{Key, NodeId, Page, PageEvent};
use crate::reveal::Parallax;
use crate::slideshow::Slideshow;
use crate::{catalog, connection, headline, hero, media, reveal};

/// The mounted behavior layer for one page session.
pub struct Behaviors {
    page: Arc<dyn Page>,
    nav: Nav,
    slideshow: Arc<Slideshow>,
    lazy: Arc<Mutex<Option<Arc<LazyLoader>>>>,
    lightbox: Lightbox,
    contact: Option<Arc<ContactFlow>>,
    parallax: Option<Parallax>,
    prev_control: Option<NodeId>,
    next_control: Option<NodeId>,
}

impl Behaviors {
    /// Mount every behavior against the page. Must run inside a tokio
    /// runtime; timers and fetches are spawned as page-lifetime tasks.
    pub fn mount(
        page: Arc<dyn Page>,
        fetcher: Arc<dyn ImageFetcher>,
        mailer: Arc<dyn Mailer>,
        config: &BehaviorConfig,
    ) -> Self {
        let breakpoint = config.connection.mobile_breakpoint_px;
        let viewport = page.viewport();
        tracing::info!(
            class = ?connection::classify(page.as_ref(), breakpoint),
            network = ?page.network(),
            width = viewport.width,
            "mounting page behaviors"
        );

        headline::mount(&page, &config.headline);

        let cadence = config.slideshow.interval_for(viewport.width, breakpoint);
        let slideshow = Slideshow::discover(Arc::clone(&page), cadence);
        // Catalog entries were validated with the config; an invalid set
        // cannot reach this point.
        let images = catalog::ImageCatalog::new(config.catalog.images.clone())
            .expect("config validation admits only a loadable catalog");
        hero::mount(
            &page,
            &fetcher,
            &slideshow,
            &images,
            &config.slideshow,
            breakpoint,
        );

        // The lazy loader mounts after a beat on narrow viewports.
        let lazy = Arc::new(Mutex::new(None));
        {
            let delay = if viewport.width < breakpoint {
                config.lazyload.setup_delay_mobile()
            } else {
                std::time::Duration::ZERO
            };
            let lazy = Arc::clone(&lazy);
            let page = Arc::clone(&page);
            let fetcher = Arc::clone(&fetcher);
            let lazy_cfg = config.lazyload.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let loader = LazyLoader::mount(page, fetcher, &lazy_cfg, breakpoint);
                *lazy.lock().unwrap() = Some(loader);
            });
        }

        media::mount(&page, breakpoint);
        let contact = ContactFlow::mount(Arc::clone(&page), mailer, &config.contact);
        let parallax = reveal::mount(&page, breakpoint);
        let nav = Nav::mount(Arc::clone(&page));
        let lightbox = Lightbox::mount(Arc::clone(&page));

        let prev_control = page.by_class("slideshow-prev").into_iter().next();
        let next_control = page.by_class("slideshow-next").into_iter().next();

        Self {
            page,
            nav,
            slideshow,
            lazy,
            lightbox,
            contact,
            parallax,
            prev_control,
            next_control,
        }
    }

    /// The slideshow rotator, for harness introspection.
    pub fn slideshow(&self) -> &Arc<Slideshow> {
        &self.slideshow
    }

    /// The lazy loader, once its (possibly delayed) mount has run.
    pub fn lazy_loader(&self) -> Option<Arc<LazyLoader>> {
        self.lazy.lock().unwrap().clone()
    }

    /// Route one input event to the behavior that owns it.
    pub fn dispatch(&self, event: PageEvent) {
        match event {
            PageEvent::Click(node) => self.dispatch_click(node),
            PageEvent::Submit(node) => {
                if let Some(contact) = &self.contact {
                    if contact.form() == node {
                        contact.submit();
                    }
                }
            }
            PageEvent::Scroll => {
                self.nav.on_scroll();
                if let Some(parallax) = &self.parallax {
                    parallax.on_scroll();
                }
            }
            PageEvent::Key(Key::Escape) => self.lightbox.close(),
            PageEvent::Key(_) => {}
            PageEvent::Resize => {
                // Cadences and margins are fixed at mount; nothing re-reads
                // the viewport besides per-call heuristics.
            }
            PageEvent::MediaLoaded(node) => self.page.add_class(node, "loaded"),
        }
    }

    fn dispatch_click(&self, node: NodeId) {
        if self.nav.handle_click(node) {
            return;
        }
        if let Some(dot) = self.slideshow.dot_index(node) {
            self.slideshow.jump_to(dot + 1);
            return;
        }
        if self.prev_control == Some(node) {
            self.slideshow.advance(-1);
            return;
        }
        if self.next_control == Some(node) {
            self.slideshow.advance(1);
            return;
        }
        if self.lightbox.handle_click(node) {
            return;
        }
        if self.page.has_class(node, "project-image") {
            self.lightbox.open_from(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixture::FixtureSpec;
    use crate::test_helpers::{fill_contact_form, mount_standard};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn dots_and_arrows_drive_the_slideshow() {
        let session = mount_standard(FixtureSpec::default());
        let (page, behaviors) = (&session.page, &session.behaviors);
        let dots = page.by_class("dot");

        behaviors.dispatch(PageEvent::Click(dots[2]));
        assert_eq!(behaviors.slideshow().current(), 2);

        let next = page.by_class("slideshow-next")[0];
        behaviors.dispatch(PageEvent::Click(next));
        assert_eq!(behaviors.slideshow().current(), 0);

        let prev = page.by_class("slideshow-prev")[0];
        behaviors.dispatch(PageEvent::Click(prev));
        assert_eq!(behaviors.slideshow().current(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn escape_closes_the_lightbox_from_anywhere() {
        let session = mount_standard(FixtureSpec::default());
        let (page, behaviors) = (&session.page, &session.behaviors);
        let image = page.by_class("project-image")[0];

        behaviors.dispatch(PageEvent::Click(image));
        let overlay = page.by_id("lightbox").unwrap();
        assert!(page.has_class(overlay, "active"));

        behaviors.dispatch(PageEvent::Key(Key::Escape));
        assert!(!page.has_class(overlay, "active"));
    }

    #[tokio::test(start_paused = true)]
    async fn lazy_loader_mount_is_delayed_on_mobile() {
        let session = mount_standard(FixtureSpec {
            viewport: (375, 800),
            ..FixtureSpec::default()
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(session.behaviors.lazy_loader().is_none());
        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(session.behaviors.lazy_loader().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn submit_routes_to_the_contact_flow() {
        let session = mount_standard(FixtureSpec::default());
        let page = &session.page;
        fill_contact_form(page);
        let form = page.by_id("contactForm").unwrap();

        session.behaviors.dispatch(PageEvent::Submit(form));
        tokio::time::sleep(Duration::from_secs(1)).await;

        let area = page.by_id("formMessage").unwrap();
        assert!(page.has_class(area, "success"));
        assert_eq!(session.mailer.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn mount_starts_the_hero_fetches() {
        let session = mount_standard(FixtureSpec {
            cards: Vec::new(),
            ..FixtureSpec::default()
        });
        tokio::time::sleep(Duration::from_millis(1)).await;
        // Fast desktop client: one fetch per slide slot, nothing else.
        assert_eq!(session.fetcher.started().len(), 3);
    }
}
