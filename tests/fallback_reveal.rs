//! The hero never hangs.
//!
//! With every image stalled past the fallback window, the hero still reaches
//! full visibility and the rotation still starts — once.

use std::sync::Arc;
use std::time::Duration;

use portico::config::BehaviorConfig;
use portico::contact::Mailer;
use portico::engine::Behaviors;
use portico::loader::ImageFetcher;
use portico::page::Page;
use portico::sim::fixture::{standard_page, FixtureSpec};
use portico::sim::{SimFetcher, SimMailer};

#[tokio::test(start_paused = true)]
async fn stalled_images_force_the_reveal_at_the_deadline() {
    let config = BehaviorConfig::default();
    let page = standard_page(&FixtureSpec {
        slides: 3,
        cards: Vec::new(),
        viewport: (1280, 800),
        ..FixtureSpec::default()
    });
    // Nothing settles inside the 3s window.
    let fetcher = Arc::new(SimFetcher::new(Duration::from_secs(10)));
    let mailer: Arc<dyn Mailer> = Arc::new(SimMailer::ready());
    let fetcher_dyn: Arc<dyn ImageFetcher> = fetcher.clone();
    let behaviors = Behaviors::mount(page.clone(), fetcher_dyn, mailer, &config);

    let content = page.by_class("hero-content")[0];

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert_eq!(page.style(content, "opacity").as_deref(), Some("0.7"));
    assert!(!behaviors.slideshow().started());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(page.style(content, "opacity").as_deref(), Some("1"));
    assert!(behaviors.slideshow().started());

    // One timer, desktop cadence: exactly one advance three seconds after
    // the forced start.
    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert_eq!(behaviors.slideshow().current(), 1);

    // The stalled fetches eventually settle and dress their slots without
    // restarting anything.
    tokio::time::sleep(Duration::from_secs(7)).await;
    for slide in behaviors.slideshow().slide_nodes() {
        assert!(page.has_class(*slide, "loaded"));
    }
    assert!(behaviors.slideshow().started());
}

#[tokio::test(start_paused = true)]
async fn settle_just_before_the_deadline_wins_the_race() {
    let config = BehaviorConfig::default();
    let page = standard_page(&FixtureSpec {
        slides: 3,
        cards: Vec::new(),
        ..FixtureSpec::default()
    });
    let fetcher = Arc::new(SimFetcher::new(Duration::from_millis(2900)));
    let mailer: Arc<dyn Mailer> = Arc::new(SimMailer::ready());
    let fetcher_dyn: Arc<dyn ImageFetcher> = fetcher.clone();
    let behaviors = Behaviors::mount(page.clone(), fetcher_dyn, mailer, &config);

    tokio::time::sleep(Duration::from_millis(2950)).await;
    assert!(behaviors.slideshow().started());

    // The fallback timer fires afterwards into a started slideshow; the
    // session keeps exactly one rotation timer (one advance per cadence).
    tokio::time::sleep(Duration::from_millis(3050)).await;
    assert_eq!(behaviors.slideshow().current(), 1);
}
