//! Slow-client loading policy, end to end.
//!
//! On a slow connection only the first two hero slots fetch eagerly; the
//! rest wait for the grace delay after the first settle. Everything still
//! ends up loaded.

use std::sync::Arc;
use std::time::Duration;

use portico::config::BehaviorConfig;
use portico::contact::Mailer;
use portico::engine::Behaviors;
use portico::loader::ImageFetcher;
use portico::page::{EffectiveType, NetworkInfo, Page};
use portico::sim::fixture::{standard_page, FixtureSpec};
use portico::sim::{SimFetcher, SimMailer};

fn slow_config() -> BehaviorConfig {
    let mut config = BehaviorConfig::default();
    config.catalog.images = vec![
        "projects/a.webp".into(),
        "projects/b.webp".into(),
        "projects/c.webp".into(),
        "projects/d.webp".into(),
        "projects/e.webp".into(),
    ];
    config
}

#[tokio::test(start_paused = true)]
async fn two_eager_fetches_then_the_deferred_slot_after_grace() {
    let config = slow_config();
    let page = standard_page(&FixtureSpec {
        slides: 3,
        cards: Vec::new(),
        network: Some(NetworkInfo {
            effective_type: EffectiveType::ThreeG,
            save_data: false,
        }),
        ..FixtureSpec::default()
    });
    let fetcher = Arc::new(SimFetcher::new(Duration::from_millis(30)));
    let mailer: Arc<dyn Mailer> = Arc::new(SimMailer::ready());
    let fetcher_dyn: Arc<dyn ImageFetcher> = fetcher.clone();
    let behaviors = Behaviors::mount(page.clone(), fetcher_dyn, mailer, &config);

    // Exactly two fetches issued at mount, the first at high priority.
    tokio::time::sleep(Duration::from_millis(1)).await;
    let records = fetcher.records();
    assert_eq!(records.len(), 2);
    assert!(matches!(
        records[0].priority,
        portico::loader::FetchPriority::High
    ));

    // Only the eager slots were hinted.
    let hints = page.preload_hints();
    assert_eq!(hints.len(), 2);
    assert!(hints[0].high_priority);

    // Still two in flight before the grace delay runs out. The first settle
    // happened at ~30ms, so the deferred fetch lands at ~1030ms.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(fetcher.records().len(), 2);

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(fetcher.records().len(), 3);

    // All three slots settle loaded, each with a distinct catalog image.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let slides = behaviors.slideshow().slide_nodes().to_vec();
    assert_eq!(slides.len(), 3);
    let mut urls = Vec::new();
    for slide in &slides {
        assert!(page.has_class(*slide, "loaded"));
        let url = page.style(*slide, "background-image").unwrap();
        urls.push(url);
    }
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 3, "assigned images must be distinct");

    // Rotation started with the first settle.
    assert!(behaviors.slideshow().started());
}

#[tokio::test(start_paused = true)]
async fn fast_clients_load_every_slot_up_front() {
    let config = slow_config();
    let page = standard_page(&FixtureSpec {
        slides: 3,
        cards: Vec::new(),
        network: Some(NetworkInfo {
            effective_type: EffectiveType::FourG,
            save_data: false,
        }),
        ..FixtureSpec::default()
    });
    let fetcher = Arc::new(SimFetcher::new(Duration::from_millis(30)));
    let mailer: Arc<dyn Mailer> = Arc::new(SimMailer::ready());
    let fetcher_dyn: Arc<dyn ImageFetcher> = fetcher.clone();
    let _behaviors = Behaviors::mount(page.clone(), fetcher_dyn, mailer, &config);

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(fetcher.records().len(), 3);
    assert_eq!(page.preload_hints().len(), 3);
}
