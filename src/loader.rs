//! The shared image loading primitive.
//!
//! Both the hero preloader and the card lazy-loader drive their fetches
//! through the [`ImageFetcher`] capability and track per-slot progress with
//! [`LoadPhase`]. Phases only ever move forward: a failed slot is never
//! retried.

use futures_util::future::BoxFuture;
use thiserror::Error;

/// Load state of one image slot. Transitions are monotonic:
/// `Unstarted → Loading → Loaded` or `Unstarted → Loading → Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    Unstarted,
    Loading,
    Loaded,
    Failed,
}

impl LoadPhase {
    /// Whether the fetch reached a terminal state.
    pub fn is_settled(self) -> bool {
        matches!(self, LoadPhase::Loaded | LoadPhase::Failed)
    }
}

/// Fetch priority forwarded to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchPriority {
    High,
    Auto,
}

#[derive(Error, Debug)]
#[error("image fetch failed: {0}")]
pub struct FetchError(pub String);

/// Capability to fetch an image asynchronously. The returned future resolves
/// when the fetch settles; callers decide what the outcome means for the
/// page.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str, priority: FetchPriority) -> BoxFuture<'static, Result<(), FetchError>>;
}

/// Extract the URL from a `background-image: url(...)` style value.
///
/// Accepts single-quoted, double-quoted, and bare forms. Returns `None` when
/// the value carries no `url(...)` function or the URL is empty.
pub fn background_image_url(style: &str) -> Option<String> {
    let start = style.find("url(")? + 4;
    let rest = &style[start..];
    let end = rest.find(')')?;
    let url = rest[..end].trim().trim_matches(|c| c == '\'' || c == '"');
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}
