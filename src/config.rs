//! Behavior configuration.
//!
//! Handles loading and validating `portico.toml`. Every tuning knob the
//! behavior layer exposes lives here; the defaults reproduce the production
//! site exactly, so an absent or empty config file changes nothing.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [catalog]
//! images = [                        # Ordered hero/gallery image paths
//!   "projects/bayside-residence/render-01.webp",
//!   # ...
//! ]
//!
//! [connection]
//! mobile_breakpoint_px = 768        # Width proxy for "slow" clients
//!
//! [slideshow]
//! eager_on_slow = 2                 # Slots fetched eagerly on slow clients
//! grace_ms = 1000                   # Delay before deferred slot fetches
//! fallback_ms = 3000                # Forced hero reveal deadline
//! interval_desktop_ms = 3000        # Rotation cadence at/above breakpoint
//! interval_mobile_ms = 4000         # Rotation cadence below breakpoint
//!
//! [lazyload]
//! margin_desktop_px = 100.0         # Trigger margin beyond the viewport
//! margin_mobile_px = 200.0
//! threshold = 0.01                  # Visible fraction that counts as seen
//! setup_delay_mobile_ms = 500       # Lazy-loader mount delay on mobile
//!
//! [headline]
//! phrases = ["Building Tomorrow.", "..."]
//! initial_delay_ms = 2000
//! interval_ms = 3000
//! swap_ms = 300                     # Fade-out to text-swap gap
//!
//! [contact]
//! recipient = "studio@portico.example"
//! fallback_address = "studio@portico.example"
//! ready_timeout_ms = 3000           # Bound on waiting for the mailer
//! sending_label = "Sending..."
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Unknown
//! keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),
}

/// Behavior configuration loaded from `portico.toml`.
///
/// All fields have defaults matching the production site. User config files
/// need only specify the values they want to override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BehaviorConfig {
    pub catalog: CatalogConfig,
    pub connection: ConnectionConfig,
    pub slideshow: SlideshowConfig,
    pub lazyload: LazyLoadConfig,
    pub headline: HeadlineConfig,
    pub contact: ContactConfig,
}

impl BehaviorConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::catalog::ImageCatalog::new(self.catalog.images.clone())?;
        if self.connection.mobile_breakpoint_px == 0 {
            return Err(ConfigError::Validation(
                "connection.mobile_breakpoint_px must be non-zero".into(),
            ));
        }
        if self.slideshow.eager_on_slow == 0 {
            return Err(ConfigError::Validation(
                "slideshow.eager_on_slow must be at least 1".into(),
            ));
        }
        if self.slideshow.interval_desktop_ms == 0 || self.slideshow.interval_mobile_ms == 0 {
            return Err(ConfigError::Validation(
                "slideshow intervals must be non-zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.lazyload.threshold) {
            return Err(ConfigError::Validation(
                "lazyload.threshold must be between 0 and 1".into(),
            ));
        }
        if self.contact.recipient.trim().is_empty() {
            return Err(ConfigError::Validation(
                "contact.recipient must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// The ordered image catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Relative paths, in the order the studio maintains them.
    pub images: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            images: stock_catalog(),
        }
    }
}

/// Connection classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Viewport width below which a client counts as mobile/slow when no
    /// network information is available.
    pub mobile_breakpoint_px: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: 768,
        }
    }
}

/// Hero slideshow loading and rotation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Slots fetched eagerly on slow clients; the rest are deferred.
    pub eager_on_slow: usize,
    /// Delay before the deferred slots begin fetching.
    pub grace_ms: u64,
    /// Deadline after which the hero is revealed even with nothing settled.
    pub fallback_ms: u64,
    pub interval_desktop_ms: u64,
    pub interval_mobile_ms: u64,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            eager_on_slow: 2,
            grace_ms: 1000,
            fallback_ms: 3000,
            interval_desktop_ms: 3000,
            interval_mobile_ms: 4000,
        }
    }
}

impl SlideshowConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }

    pub fn fallback(&self) -> Duration {
        Duration::from_millis(self.fallback_ms)
    }

    /// Rotation cadence for the given viewport width. Fixed once rotation
    /// starts; later viewport changes do not re-pace a running slideshow.
    pub fn interval_for(&self, width: u32, breakpoint: u32) -> Duration {
        if width < breakpoint {
            Duration::from_millis(self.interval_mobile_ms)
        } else {
            Duration::from_millis(self.interval_desktop_ms)
        }
    }
}

/// Project-card lazy loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazyLoadConfig {
    pub margin_desktop_px: f64,
    pub margin_mobile_px: f64,
    /// Visible fraction of a card that triggers its load.
    pub threshold: f64,
    /// Lazy-loader mount delay on narrow viewports, letting the hero claim
    /// the connection first.
    pub setup_delay_mobile_ms: u64,
}

impl Default for LazyLoadConfig {
    fn default() -> Self {
        Self {
            margin_desktop_px: 100.0,
            margin_mobile_px: 200.0,
            threshold: 0.01,
            setup_delay_mobile_ms: 500,
        }
    }
}

impl LazyLoadConfig {
    pub fn setup_delay_mobile(&self) -> Duration {
        Duration::from_millis(self.setup_delay_mobile_ms)
    }
}

/// Rotating headline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadlineConfig {
    pub phrases: Vec<String>,
    pub initial_delay_ms: u64,
    pub interval_ms: u64,
    pub swap_ms: u64,
}

impl Default for HeadlineConfig {
    fn default() -> Self {
        Self {
            phrases: vec![
                "Building Tomorrow.".into(),
                "Innovating Solutions.".into(),
                "Creating Value.".into(),
                "Delivering Quality.".into(),
                "Shaping Futures.".into(),
            ],
            initial_delay_ms: 2000,
            interval_ms: 3000,
            swap_ms: 300,
        }
    }
}

impl HeadlineConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn swap(&self) -> Duration {
        Duration::from_millis(self.swap_ms)
    }
}

/// Contact form settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Where submissions are delivered.
    pub recipient: String,
    /// Address shown to visitors when delivery is impossible.
    pub fallback_address: String,
    /// Bound on waiting for the mailer to initialize.
    pub ready_timeout_ms: u64,
    /// Submit control label while a send is in flight.
    pub sending_label: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "studio@portico.example".into(),
            fallback_address: "studio@portico.example".into(),
            ready_timeout_ms: 3000,
            sending_label: "Sending...".into(),
        }
    }
}

impl ContactConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}

/// The production image catalog, in the order the studio maintains it.
fn stock_catalog() -> Vec<String> {
    [
        "projects/bayside-residence/render-01.webp",
        "projects/yakima-workshop/yakima-01.webp",
        "projects/heavy-truck-pit/exterior-01.webp",
        "projects/kitchen-studio/cam-01.webp",
        "projects/oncology-clinic/interior-01.webp",
        "projects/salon-interior/render-08.webp",
        "projects/aurora-residence/render-01.webp",
        "projects/bayside-residence/render-05.webp",
        "projects/yakima-workshop/yakima-03.webp",
        "projects/heavy-truck-pit/exterior-03.webp",
        "projects/kitchen-studio/cam-03.webp",
        "projects/oncology-clinic/interior-05.webp",
        "projects/aurora-residence/render-03.webp",
        "projects/bayside-residence/render-10.webp",
        "projects/yakima-workshop/yakima-05.webp",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// A stock `portico.toml` with every option documented, for `gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = BehaviorConfig::default();
    let images = defaults
        .catalog
        .images
        .iter()
        .map(|p| format!("  \"{p}\","))
        .collect::<Vec<_>>()
        .join("\n");
    let phrases = defaults
        .headline
        .phrases
        .iter()
        .map(|p| format!("  \"{p}\","))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"# Portico behavior configuration.
# Every option is optional; the values below are the defaults.

[catalog]
# Ordered hero/gallery image paths, relative to the assets root.
images = [
{images}
]

[connection]
# Width proxy for "slow" clients when no network information is exposed.
mobile_breakpoint_px = {breakpoint}

[slideshow]
# Slots fetched eagerly on slow clients; the rest wait for the grace delay.
eager_on_slow = {eager}
grace_ms = {grace}
# Forced hero reveal deadline when nothing settles.
fallback_ms = {fallback}
interval_desktop_ms = {int_desktop}
interval_mobile_ms = {int_mobile}

[lazyload]
# Trigger margin beyond the viewport, per device class.
margin_desktop_px = {margin_d:.1}
margin_mobile_px = {margin_m:.1}
# Visible fraction of a card that counts as seen.
threshold = {threshold}
setup_delay_mobile_ms = {setup_delay}

[headline]
phrases = [
{phrases}
]
initial_delay_ms = {hl_delay}
interval_ms = {hl_interval}
swap_ms = {hl_swap}

[contact]
recipient = "{recipient}"
fallback_address = "{fallback_addr}"
ready_timeout_ms = {ready_timeout}
sending_label = "{sending}"
"#,
        breakpoint = defaults.connection.mobile_breakpoint_px,
        eager = defaults.slideshow.eager_on_slow,
        grace = defaults.slideshow.grace_ms,
        fallback = defaults.slideshow.fallback_ms,
        int_desktop = defaults.slideshow.interval_desktop_ms,
        int_mobile = defaults.slideshow.interval_mobile_ms,
        margin_d = defaults.lazyload.margin_desktop_px,
        margin_m = defaults.lazyload.margin_mobile_px,
        threshold = defaults.lazyload.threshold,
        setup_delay = defaults.lazyload.setup_delay_mobile_ms,
        hl_delay = defaults.headline.initial_delay_ms,
        hl_interval = defaults.headline.interval_ms,
        hl_swap = defaults.headline.swap_ms,
        recipient = defaults.contact.recipient,
        fallback_addr = defaults.contact.fallback_address,
        ready_timeout = defaults.contact.ready_timeout_ms,
        sending = defaults.contact.sending_label,
    )
}
