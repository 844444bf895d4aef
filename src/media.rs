//! Ambient video tuning.
//!
//! Slow clients should not pay for an autoplaying background video: the
//! element is paused, its autoplay attribute dropped, and a flat placeholder
//! poster swapped in. Whatever the connection, the video is marked loaded
//! after a short grace period even if its data event never arrives, so the
//! section does not sit half-styled forever.

use std::sync::Arc;
use std::time::Duration;

use crate::connection;
use crate::page::Page;

const POSTER_PLACEHOLDER: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" \
     viewBox=\"0 0 1920 1080\"%3E%3Crect fill=\"%23333\" width=\"1920\" height=\"1080\"/%3E%3C/svg%3E";

const LOADED_FALLBACK: Duration = Duration::from_secs(2);

/// Tune the ambient video for the current connection. No-op without one.
pub fn mount(page: &Arc<dyn Page>, breakpoint: u32) {
    let Some(video) = page.by_class("how-we-think-video").into_iter().next() else {
        return;
    };

    if connection::is_slow(page.as_ref(), breakpoint) {
        page.remove_attr(video, "autoplay");
        page.pause_media(video);
        page.set_attr(video, "poster", POSTER_PLACEHOLDER);
    }

    let page = Arc::clone(page);
    tokio::spawn(async move {
        tokio::time::sleep(LOADED_FALLBACK).await;
        if !page.has_class(video, "loaded") {
            page.add_class(video, "loaded");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{EffectiveType, NetworkInfo};
    use crate::sim::fixture::{self, FixtureSpec};

    #[tokio::test(start_paused = true)]
    async fn slow_connection_demotes_the_video() {
        let page = fixture::standard_page(&FixtureSpec {
            network: Some(NetworkInfo {
                effective_type: EffectiveType::TwoG,
                save_data: false,
            }),
            ..FixtureSpec::default()
        });
        let page_dyn: Arc<dyn Page> = page.clone();
        mount(&page_dyn, 768);

        let video = page.by_class("how-we-think-video")[0];
        assert!(page.attr(video, "autoplay").is_none());
        assert!(page.media_paused(video));
        assert!(page.attr(video, "poster").unwrap().starts_with("data:image/svg+xml"));
    }

    #[tokio::test(start_paused = true)]
    async fn fast_connection_leaves_playback_alone() {
        let page = fixture::standard_page(&FixtureSpec {
            viewport: (1280, 800),
            ..FixtureSpec::default()
        });
        let page_dyn: Arc<dyn Page> = page.clone();
        mount(&page_dyn, 768);

        let video = page.by_class("how-we-think-video")[0];
        assert_eq!(page.attr(video, "autoplay").as_deref(), Some(""));
        assert!(!page.media_paused(video));
    }

    #[tokio::test(start_paused = true)]
    async fn loaded_mark_arrives_by_fallback_at_the_latest() {
        let page = fixture::standard_page(&FixtureSpec::default());
        let page_dyn: Arc<dyn Page> = page.clone();
        mount(&page_dyn, 768);

        let video = page.by_class("how-we-think-video")[0];
        assert!(!page.has_class(video, "loaded"));
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(page.has_class(video, "loaded"));
    }
}
