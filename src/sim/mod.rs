//! The simulated page.
//!
//! An in-memory implementation of every capability the behavior layer
//! consumes: the [`crate::page::Page`] element surface, an image fetcher
//! with scripted latencies and outcomes, and a mailer stub. The scenario
//! harness and the test suite both run the real behavior code against these
//! simulations — under the tokio paused clock, a whole page session is
//! deterministic.

mod fetch;
pub mod fixture;
mod mail;
mod page;

pub use fetch::{FetchRecord, SimFetcher};
pub use mail::SimMailer;
pub use page::{PreloadHint, SimElement, SimPage, SimPageBuilder};
