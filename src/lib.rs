//! # Portico
//!
//! The behavior layer of the Portico studio portfolio site, as a testable
//! Rust engine: hero slideshow with connection-aware preloading, viewport
//! lazy-loading for the project gallery, navigation chrome, entrance
//! animations, a lightbox, and the contact form flow.
//!
//! # Architecture: Engine Over Capabilities
//!
//! The engine never touches a real page. Every behavior runs against three
//! injected capabilities:
//!
//! ```text
//! Page          element lookup, classes, styles, geometry, visibility
//! ImageFetcher  asynchronous image loading with priorities
//! Mailer        readiness + delivery for the contact form
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Testability**: the whole page session — preload races, fallback
//!   timers, lazy-load triggers — runs under the tokio paused clock, so
//!   every test is deterministic and instant.
//! - **Debuggability**: the `run` subcommand replays a scripted visitor
//!   session and prints exactly what the page did, which is how loading
//!   regressions get reproduced outside a browser.
//! - **Honest state**: slide index, load phases, and the running flag live
//!   in owned state objects instead of being scattered across the document.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | The capability trait and event types |
//! | [`engine`] | Mount order and input-event routing |
//! | [`connection`] | Slow-client classification |
//! | [`catalog`] | Image catalog, shuffle assignment, asset checking |
//! | [`hero`] | Preload scheduling and the reveal race |
//! | [`slideshow`] | Slide rotation state machine |
//! | [`lazyload`] | Viewport-driven card loading |
//! | [`loader`] | Shared fetch primitive and load phases |
//! | [`contact`] | Contact form submission flow |
//! | [`nav`], [`headline`], [`reveal`], [`lightbox`], [`media`] | Page chrome behaviors |
//! | [`sim`] | In-memory page, fetcher, and mailer |
//! | [`scenario`] | Scripted sessions and reports |
//! | [`config`] | `portico.toml` loading and validation |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## First Settle Wins
//!
//! The hero reveal races the first settled image (success *or* failure)
//! against a fixed fallback timer. Whichever fires first starts rotation,
//! exactly once; the loser becomes a no-op. A broken first image or a
//! stalled network can delay the hero by at most the fallback window.
//!
//! ## Load Phases Are Monotonic
//!
//! Every image slot moves `unstarted → loading → loaded | failed` at most
//! once. There are no retries: a failed card keeps its error tint for the
//! session, and a second visibility trigger on a settled card is ignored.
//!
//! ## Classification Is Never Cached
//!
//! [`connection::classify`] recomputes from the environment on every call.
//! Only values that must stay fixed for a session — rotation cadence, lazy
//! trigger margins — are sampled once, at mount.
//!
//! ## Bounded Mailer Readiness
//!
//! The contact flow waits for the mailer behind a timeout instead of
//! polling forever; a mailer that never initializes produces a visible
//! fallback-address message and leaves the form untouched.

pub mod catalog;
pub mod config;
pub mod connection;
pub mod contact;
pub mod engine;
pub mod headline;
pub mod hero;
pub mod lazyload;
pub mod lightbox;
pub mod loader;
pub mod media;
pub mod nav;
pub mod output;
pub mod page;
pub mod reveal;
pub mod scenario;
pub mod sim;
pub mod slideshow;

#[cfg(test)]
pub(crate) mod test_helpers;
