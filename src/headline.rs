//! The rotating hero headline.
//!
//! Cycles through the configured phrases on a fixed cadence, fading the
//! element out, swapping the text mid-fade, and fading back in. The element
//! is assumed to start with the first phrase already in place.

use std::sync::Arc;

use crate::config::HeadlineConfig;
use crate::page::Page;

/// Start the headline rotation. No-op when the element is missing or no
/// phrases are configured.
pub fn mount(page: &Arc<dyn Page>, cfg: &HeadlineConfig) {
    let Some(element) = page.by_id("rotatingText") else {
        return;
    };
    if cfg.phrases.is_empty() {
        return;
    }

    page.set_style(
        element,
        "transition",
        "opacity 0.5s ease, transform 0.5s ease",
    );

    let page = Arc::clone(page);
    let phrases = cfg.phrases.clone();
    let initial_delay = cfg.initial_delay();
    let interval = cfg.interval();
    let swap = cfg.swap();
    tokio::spawn(async move {
        tokio::time::sleep(initial_delay).await;
        let mut index = 0usize;
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // completes immediately
        loop {
            ticker.tick().await;
            page.set_style(element, "opacity", "0");
            page.set_style(element, "transform", "translateY(-20px)");
            tokio::time::sleep(swap).await;
            index = (index + 1) % phrases.len();
            page.set_text(element, &phrases[index]);
            page.set_style(element, "opacity", "1");
            page.set_style(element, "transform", "translateY(0)");
        }
    });
}
