//! Scripted page sessions.
//!
//! A scenario file describes a page (slide count, cards, viewport, network),
//! scripts the fetcher and mailer, and lists a timeline of user events. The
//! harness builds the simulated page, mounts the real behavior layer, walks
//! the timeline, and reports what the page looked like at the end.
//!
//! ```toml
//! [page]
//! slides = 3
//! viewport = [375, 812]
//! network = { effective_type = "3g" }
//!
//! [fetch]
//! default_latency_ms = 40
//!
//! [[fetch.rules]]
//! path = "projects/kitchen-studio/cam-01.webp"
//! fail = true
//!
//! [[steps]]
//! action = "wait"
//! ms = 1500
//!
//! [[steps]]
//! action = "scroll"
//! to = 1200.0
//!
//! [[steps]]
//! action = "click"
//! target = "dot:2"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BehaviorConfig;
use crate::connection;
use crate::contact::Mailer;
use crate::engine::Behaviors;
use crate::loader::ImageFetcher;
use crate::page::{Key, NetworkInfo, Page, PageEvent};
use crate::sim::fixture::{self, FixtureSpec};
use crate::sim::{SimFetcher, SimMailer, SimPage};
use std::sync::Arc;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown click target: {0}")]
    UnknownTarget(String),
    #[error("scenario submits a form the page does not have")]
    MissingForm,
}

/// A scripted session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub page: PageSpec,
    pub fetch: FetchSpec,
    pub mail: MailSpec,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Page shape for the session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageSpec {
    pub slides: usize,
    /// Project card image URLs. Empty means "one card per catalog entry".
    pub cards: Vec<String>,
    pub viewport: [u32; 2],
    pub network: Option<NetworkInfo>,
    pub visibility_watching: bool,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            slides: 3,
            cards: Vec::new(),
            viewport: [1280, 800],
            network: None,
            visibility_watching: true,
        }
    }
}

/// Image fetch scripting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSpec {
    pub default_latency_ms: u64,
    pub rules: Vec<FetchRule>,
}

impl Default for FetchSpec {
    fn default() -> Self {
        Self {
            default_latency_ms: 30,
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchRule {
    pub path: String,
    pub latency_ms: Option<u64>,
    pub fail: bool,
}

impl Default for FetchRule {
    fn default() -> Self {
        Self {
            path: String::new(),
            latency_ms: None,
            fail: false,
        }
    }
}

/// Mailer scripting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailSpec {
    /// `false` models a mailer that never initializes.
    pub ready: bool,
    pub ready_after_ms: u64,
    pub send_latency_ms: u64,
    /// Scripted failure reason; `None` sends succeed.
    pub fail: Option<String>,
}

impl Default for MailSpec {
    fn default() -> Self {
        Self {
            ready: true,
            ready_after_ms: 0,
            send_latency_ms: 50,
            fail: None,
        }
    }
}

/// One timeline entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Let time pass.
    Wait { ms: u64 },
    /// Scroll the viewport and fire the scroll handlers.
    Scroll { to: f64 },
    /// Resize the viewport.
    Resize { width: u32, height: u32 },
    /// Click an element (see [`fixture::resolve_target`] for target names).
    Click { target: String },
    /// Press a key.
    Key { key: String },
    /// Fill the contact form and submit it.
    Submit {
        #[serde(default)]
        first_name: String,
        #[serde(default)]
        last_name: String,
        #[serde(default)]
        email: String,
        #[serde(default)]
        message: String,
    },
    /// The ambient video's data arrived.
    MediaLoaded,
}

/// Final page state, for the report and `--json` output.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub connection: String,
    pub viewport: [u32; 2],
    pub hero: HeroReport,
    pub preload_hints: Vec<HintReport>,
    pub fetches: Vec<FetchReport>,
    pub cards: Vec<CardReport>,
    pub contact: Option<ContactReport>,
    pub headline: Option<String>,
    pub lightbox_open: bool,
}

#[derive(Debug, Serialize)]
pub struct HeroReport {
    pub slides: Vec<SlideReport>,
    pub revealed: bool,
    pub rotation_started: bool,
    pub current_index: usize,
}

#[derive(Debug, Serialize)]
pub struct SlideReport {
    pub url: Option<String>,
    pub loaded: bool,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct HintReport {
    pub href: String,
    pub high_priority: bool,
}

#[derive(Debug, Serialize)]
pub struct FetchReport {
    pub url: String,
    pub priority: String,
    pub at_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct CardReport {
    pub url: Option<String>,
    pub phase: String,
}

#[derive(Debug, Serialize)]
pub struct ContactReport {
    pub message: String,
    pub kind: String,
    pub visible: bool,
}

/// Run a scenario on a fresh current-thread runtime.
pub fn run(scenario: &Scenario, config: &BehaviorConfig) -> Result<SessionReport, ScenarioError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(replay(scenario, config))
}

/// Replay a scenario inside the current runtime.
pub async fn replay(
    scenario: &Scenario,
    config: &BehaviorConfig,
) -> Result<SessionReport, ScenarioError> {
    let started = tokio::time::Instant::now();

    let cards = if scenario.page.cards.is_empty() {
        config.catalog.images.clone()
    } else {
        scenario.page.cards.clone()
    };
    let page = fixture::standard_page(&FixtureSpec {
        slides: scenario.page.slides,
        cards: cards.clone(),
        viewport: (scenario.page.viewport[0], scenario.page.viewport[1]),
        network: scenario.page.network,
        visibility_watching: scenario.page.visibility_watching,
        ..FixtureSpec::default()
    });

    let fetcher = Arc::new(SimFetcher::new(Duration::from_millis(
        scenario.fetch.default_latency_ms,
    )));
    for rule in &scenario.fetch.rules {
        if rule.fail {
            fetcher.fail(&rule.path);
        }
        if let Some(latency) = rule.latency_ms {
            fetcher.set_latency(&rule.path, Duration::from_millis(latency));
        }
    }

    let mailer = if scenario.mail.ready {
        SimMailer::ready_after(Duration::from_millis(scenario.mail.ready_after_ms))
    } else {
        SimMailer::never_ready()
    };
    let mailer = match &scenario.mail.fail {
        Some(reason) => mailer.failing(reason),
        None => mailer,
    }
    .with_send_latency(Duration::from_millis(scenario.mail.send_latency_ms));
    let mailer = Arc::new(mailer);

    let fetcher_dyn: Arc<dyn ImageFetcher> = fetcher.clone();
    let mailer_dyn: Arc<dyn Mailer> = mailer;
    let page_dyn: Arc<dyn Page> = page.clone();
    let behaviors = Behaviors::mount(page_dyn, fetcher_dyn, mailer_dyn, config);

    for step in &scenario.steps {
        apply_step(step, &page, &behaviors)?;
        // Give spawned work a chance to observe the step.
        tokio::time::sleep(Duration::from_millis(1)).await;
        if let Step::Wait { ms } = step {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
    }
    // Let trailing fetches and timers settle.
    tokio::time::sleep(Duration::from_millis(5)).await;

    Ok(collect_report(
        config, &page, &behaviors, &fetcher, &cards, started,
    ))
}

fn apply_step(step: &Step, page: &Arc<SimPage>, behaviors: &Behaviors) -> Result<(), ScenarioError> {
    match step {
        Step::Wait { .. } => {}
        Step::Scroll { to } => {
            page.set_scroll(*to);
            behaviors.dispatch(PageEvent::Scroll);
        }
        Step::Resize { width, height } => {
            page.set_viewport(*width, *height);
            behaviors.dispatch(PageEvent::Resize);
        }
        Step::Click { target } => {
            let node = fixture::resolve_target(page, target)
                .ok_or_else(|| ScenarioError::UnknownTarget(target.clone()))?;
            behaviors.dispatch(PageEvent::Click(node));
        }
        Step::Key { key } => {
            let key = if key.eq_ignore_ascii_case("escape") {
                Key::Escape
            } else {
                Key::Other
            };
            behaviors.dispatch(PageEvent::Key(key));
        }
        Step::Submit {
            first_name,
            last_name,
            email,
            message,
        } => {
            let form = page.by_id("contactForm").ok_or(ScenarioError::MissingForm)?;
            for (id, value) in [
                ("firstName", first_name),
                ("lastName", last_name),
                ("email", email),
                ("message", message),
            ] {
                if let Some(field) = page.by_id(id) {
                    page.set_value(field, value);
                }
            }
            behaviors.dispatch(PageEvent::Submit(form));
        }
        Step::MediaLoaded => {
            if let Some(video) = page.by_class("how-we-think-video").first() {
                behaviors.dispatch(PageEvent::MediaLoaded(*video));
            }
        }
    }
    Ok(())
}

fn collect_report(
    config: &BehaviorConfig,
    page: &Arc<SimPage>,
    behaviors: &Behaviors,
    fetcher: &SimFetcher,
    cards: &[String],
    started: tokio::time::Instant,
) -> SessionReport {
    let breakpoint = config.connection.mobile_breakpoint_px;
    let connection = match connection::classify(page.as_ref(), breakpoint) {
        connection::ConnectionClass::Fast => "fast",
        connection::ConnectionClass::Slow => "slow",
    };
    let viewport = page.viewport();

    let slideshow = behaviors.slideshow();
    let slides = slideshow
        .slide_nodes()
        .iter()
        .map(|slide| SlideReport {
            url: page
                .style(*slide, "background-image")
                .and_then(|s| crate::loader::background_image_url(&s)),
            loaded: page.has_class(*slide, "loaded"),
            active: page.has_class(*slide, "active"),
        })
        .collect();
    let revealed = page
        .by_class("hero-content")
        .first()
        .map(|c| page.style(*c, "opacity").as_deref() == Some("1"))
        .unwrap_or(false);
    let hero = HeroReport {
        slides,
        revealed,
        rotation_started: slideshow.started(),
        current_index: slideshow.current(),
    };

    let preload_hints = page
        .preload_hints()
        .into_iter()
        .map(|h| HintReport {
            href: h.href,
            high_priority: h.high_priority,
        })
        .collect();

    let fetches = fetcher
        .records()
        .into_iter()
        .map(|r| FetchReport {
            url: r.url,
            priority: match r.priority {
                crate::loader::FetchPriority::High => "high".into(),
                crate::loader::FetchPriority::Auto => "auto".into(),
            },
            at_ms: r.at.duration_since(started).as_millis() as u64,
        })
        .collect();

    let card_nodes = page.by_class("project-card");
    let cards = card_nodes
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let image = page.scoped_by_class(*card, "project-image").into_iter().next();
            let phase = image.map_or("unstarted", |img| {
                if page.has_class(img, "loaded") {
                    "loaded"
                } else if page.has_class(img, "loading") {
                    "loading"
                } else if page.style(img, "background-color").as_deref()
                    == Some(crate::lazyload::ERROR_TINT)
                {
                    "failed"
                } else {
                    "unstarted"
                }
            });
            CardReport {
                url: cards.get(i).cloned(),
                phase: phase.to_string(),
            }
        })
        .collect();

    let contact = page.by_id("formMessage").map(|area| ContactReport {
        message: page.text(area),
        kind: if page.has_class(area, "success") {
            "success".into()
        } else if page.has_class(area, "error") {
            "error".into()
        } else {
            "none".into()
        },
        visible: page.style(area, "display").as_deref() == Some("block"),
    });

    let headline = page.by_id("rotatingText").map(|el| page.text(el));
    let lightbox_open = page
        .by_id("lightbox")
        .is_some_and(|overlay| page.has_class(overlay, "active"));

    SessionReport {
        connection: connection.to_string(),
        viewport: [viewport.width, viewport.height],
        hero,
        preload_hints,
        fetches,
        cards,
        contact,
        headline,
        lightbox_open,
    }
}

/// An example scenario with every step type, for `gen-scenario`.
pub fn stock_scenario_toml() -> &'static str {
    r#"# Portico session script.
# Build a page, script the network, then walk a user through it.

[page]
slides = 3
viewport = [1280, 800]
# network = { effective_type = "3g", save_data = false }
# visibility_watching = false

[fetch]
default_latency_ms = 30
# [[fetch.rules]]
# path = "projects/kitchen-studio/cam-01.webp"
# fail = true

[mail]
ready = true
send_latency_ms = 50

[[steps]]
action = "wait"
ms = 500

[[steps]]
action = "scroll"
to = 1200.0

[[steps]]
action = "click"
target = "dot:2"

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
message = "We would like to discuss a project."

[[steps]]
action = "wait"
ms = 500
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_scenario_parses() {
        let scenario: Scenario = toml::from_str(stock_scenario_toml()).unwrap();
        assert_eq!(scenario.page.slides, 3);
        assert_eq!(scenario.steps.len(), 7);
        assert!(matches!(scenario.steps[2], Step::Click { .. }));
    }

    #[test]
    fn unknown_step_actions_are_rejected() {
        let result: Result<Scenario, _> = toml::from_str(
            r#"
            [[steps]]
            action = "teleport"
            "#,
        );
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn replay_produces_a_settled_report() {
        let scenario: Scenario = toml::from_str(stock_scenario_toml()).unwrap();
        let config = BehaviorConfig::default();
        let report = replay(&scenario, &config).await.unwrap();

        assert_eq!(report.connection, "fast");
        assert_eq!(report.hero.slides.len(), 3);
        assert!(report.hero.revealed);
        assert!(report.hero.rotation_started);
        // The dot click moved the slideshow to the third slide; the session
        // is short enough that the 3s cadence has not advanced it since.
        assert_eq!(report.hero.current_index, 2);
        assert!(!report.lightbox_open);
        let contact = report.contact.unwrap();
        assert_eq!(contact.kind, "success");
        assert!(contact.visible);
    }

    #[test]
    fn unknown_click_target_is_an_error() {
        let scenario = Scenario {
            steps: vec![Step::Click {
                target: "nonsense".into(),
            }],
            ..Scenario::default()
        };
        let config = BehaviorConfig::default();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let result = runtime.block_on(replay(&scenario, &config));
        assert!(matches!(result, Err(ScenarioError::UnknownTarget(_))));
    }
}
