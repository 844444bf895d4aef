//! Full scripted sessions through the scenario harness.

use portico::config::BehaviorConfig;
use portico::scenario::{replay, Scenario};

#[tokio::test(start_paused = true)]
async fn mobile_slow_session_reports_the_whole_page() {
    let script = r#"
        [page]
        slides = 3
        viewport = [375, 812]
        network = { effective_type = "3g" }
        cards = [
            "projects/a.webp",
            "projects/b.webp",
            "projects/c.webp",
        ]

        [fetch]
        default_latency_ms = 40

        [[fetch.rules]]
        path = "projects/b.webp"
        fail = true

        [[steps]]
        action = "wait"
        ms = 2000

        [[steps]]
        action = "scroll"
        to = 1200.0

        [[steps]]
        action = "wait"
        ms = 500

        [[steps]]
        action = "click"
        target = "card-image:0"

        [[steps]]
        action = "key"
        key = "Escape"

        [[steps]]
        action = "submit"
        first_name = "Ada"
        last_name = "Lovelace"
        email = "ada@example.com"
        message = "Hello"

        [[steps]]
        action = "wait"
        ms = 3000
    "#;
    let scenario: Scenario = toml::from_str(script).unwrap();
    let config = BehaviorConfig::default();
    let report = replay(&scenario, &config).await.unwrap();

    assert_eq!(report.connection, "slow");
    assert_eq!(report.viewport, [375, 812]);

    // Slow path: two eager hero fetches at mount; the deferred third came
    // in after the grace delay (well within the 2s opening wait).
    assert_eq!(report.preload_hints.len(), 2);
    assert!(report.hero.revealed);
    assert!(report.hero.rotation_started);
    assert_eq!(report.hero.slides.len(), 3);
    assert!(report.hero.slides.iter().all(|s| s.loaded));

    // The failing card keeps its error phase; the others loaded. Card 0 sat
    // above the fold, card 2 entered on the scroll.
    assert_eq!(report.cards.len(), 3);
    assert_eq!(report.cards[0].phase, "loaded");
    assert_eq!(report.cards[1].phase, "failed");
    assert_eq!(report.cards[2].phase, "loaded");

    // Lightbox was opened and closed again.
    assert!(!report.lightbox_open);

    // The submit went through the ready mailer.
    let contact = report.contact.expect("fixture page has the form");
    assert_eq!(contact.kind, "success");
    assert!(contact.visible);

    // Headline rotated at least once during the ~6s session.
    assert_ne!(report.headline.as_deref(), Some("Building Tomorrow."));
}

#[tokio::test(start_paused = true)]
async fn unready_mailer_session_shows_the_fallback_address() {
    let script = r#"
        [mail]
        ready = false

        [[steps]]
        action = "submit"
        first_name = "Ada"
        last_name = "Lovelace"
        email = "ada@example.com"
        message = "Hello"

        [[steps]]
        action = "wait"
        ms = 3500
    "#;
    let scenario: Scenario = toml::from_str(script).unwrap();
    let config = BehaviorConfig::default();
    let report = replay(&scenario, &config).await.unwrap();

    let contact = report.contact.expect("fixture page has the form");
    assert_eq!(contact.kind, "error");
    assert!(contact.visible);
    assert_eq!(
        contact.message,
        format!(
            "Email service is not configured. Please contact us directly at {}",
            config.contact.fallback_address
        )
    );
}

#[tokio::test(start_paused = true)]
async fn runtime_without_visibility_watching_loads_cards_eagerly() {
    let script = r#"
        [page]
        visibility_watching = false
        cards = ["projects/a.webp", "projects/b.webp", "projects/c.webp"]

        [[steps]]
        action = "wait"
        ms = 1000
    "#;
    let scenario: Scenario = toml::from_str(script).unwrap();
    let config = BehaviorConfig::default();
    let report = replay(&scenario, &config).await.unwrap();

    assert!(report.cards.iter().all(|c| c.phase == "loaded"));
}
