//! Scroll-triggered entrance animations.
//!
//! Two visibility watches: a fade-in pass over news/excellence cards and
//! section titles, and a staggered pass over project cards. Runtimes without
//! visibility watching reveal everything immediately. The desktop-only
//! parallax over the "how we think" section also lives here, driven from the
//! scroll handler.

use std::sync::Arc;
use std::time::Duration;

use crate::page::{NodeId, Page, WatchOptions};

/// Fade-in watch: 10% visibility, trigger region pulled in 50px from the
/// bottom so elements animate once genuinely on screen.
const FADE_OPTS: WatchOptions = WatchOptions {
    margin_px: -50.0,
    threshold: 0.1,
};
/// Project-card watch is stricter: deeper margin, 15% visibility.
const CARD_OPTS: WatchOptions = WatchOptions {
    margin_px: -100.0,
    threshold: 0.15,
};
const STAGGER_MOBILE_MS: u64 = 50;
const STAGGER_DESKTOP_MS: u64 = 100;

/// Register the entrance animations. Returns the parallax handler when the
/// page carries the parallax section.
pub fn mount(page: &Arc<dyn Page>, breakpoint: u32) -> Option<Parallax> {
    mount_fade_ins(page);
    mount_card_stagger(page, breakpoint);

    let parallax = Parallax::locate(Arc::clone(page), breakpoint);
    if let Some(p) = &parallax {
        // Initial placement for a page that loads mid-document.
        p.on_scroll();
    }
    parallax
}

fn mount_fade_ins(page: &Arc<dyn Page>) {
    let mut targets: Vec<NodeId> = page.by_class("news-card");
    targets.extend(page.by_class("excellence-card"));
    for el in &targets {
        page.set_style(*el, "opacity", "0");
        page.set_style(*el, "transform", "translateY(30px)");
        page.set_style(*el, "transition", "opacity 0.8s ease, transform 0.8s ease");
    }
    targets.extend(page.by_class("section-title"));
    if targets.is_empty() {
        return;
    }

    match page.watch_visibility(&targets, FADE_OPTS) {
        Some(mut watch) => {
            let page = Arc::clone(page);
            tokio::spawn(async move {
                while let Some(el) = watch.entered().await {
                    reveal_one(&page, el);
                }
            });
        }
        None => {
            for el in targets {
                reveal_one(page, el);
            }
        }
    }
}

fn reveal_one(page: &Arc<dyn Page>, el: NodeId) {
    page.set_style(el, "opacity", "1");
    page.set_style(el, "transform", "translateY(0)");
    if page.has_class(el, "section-title") {
        page.add_class(el, "visible");
    }
}

fn mount_card_stagger(page: &Arc<dyn Page>, breakpoint: u32) {
    let cards = page.by_class("project-card");
    if cards.is_empty() {
        return;
    }
    let step = if page.viewport().width < breakpoint {
        STAGGER_MOBILE_MS
    } else {
        STAGGER_DESKTOP_MS
    };

    match page.watch_visibility(&cards, CARD_OPTS) {
        Some(mut watch) => {
            let page = Arc::clone(page);
            tokio::spawn(async move {
                let mut fired = 0u64;
                while let Some(card) = watch.entered().await {
                    let delay = Duration::from_millis(fired * step);
                    fired += 1;
                    let page = Arc::clone(&page);
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        page.add_class(card, "scroll-visible");
                    });
                }
            });
        }
        None => {
            for card in cards {
                page.add_class(card, "scroll-visible");
            }
        }
    }
}

/// Scroll-proportional drift of the "how we think" title and subtitle.
/// Desktop only; narrow viewports skip the effect entirely.
pub struct Parallax {
    page: Arc<dyn Page>,
    section: NodeId,
    title: NodeId,
    subtitle: NodeId,
    breakpoint: u32,
}

impl Parallax {
    fn locate(page: Arc<dyn Page>, breakpoint: u32) -> Option<Self> {
        let section = page.by_class("how-we-think").into_iter().next()?;
        let title = page.by_class("how-we-think-title").into_iter().next()?;
        let subtitle = page.by_class("how-we-think-subtitle").into_iter().next()?;
        Some(Self {
            page,
            section,
            title,
            subtitle,
            breakpoint,
        })
    }

    pub fn on_scroll(&self) {
        let viewport = self.page.viewport();
        if viewport.width < self.breakpoint {
            return;
        }

        let scroll_y = viewport.scroll_y;
        let window_height = viewport.height as f64;
        let section_top = self.page.offset_top(self.section);
        let section_height = self.page.height(self.section);

        // Only while the section intersects the viewport.
        let top_rel = section_top - scroll_y;
        if top_rel + section_height < 0.0 || top_rel > window_height {
            return;
        }

        let progress = ((scroll_y + window_height - section_top)
            / (section_height + window_height))
            .clamp(0.0, 1.0);
        let title_offset = (progress - 0.5) * 40.0;
        let subtitle_offset = (progress - 0.5) * 30.0;
        self.page
            .set_style(self.title, "transform", &format!("translateY({title_offset}px)"));
        self.page.set_style(
            self.subtitle,
            "transform",
            &format!("translateY({subtitle_offset}px)"),
        );
    }
}
