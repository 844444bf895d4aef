//! The page capability interface.
//!
//! Every behavior in this crate manipulates the page exclusively through the
//! [`Page`] trait: element lookup, class and style mutation, form field
//! access, geometry reads, resource hints, and visibility watching. The trait
//! is the seam that keeps the behavior logic (shuffling, index arithmetic,
//! load-state transitions) independent of any real rendering environment —
//! the [`crate::sim`] module provides the in-memory implementation used by
//! the scenario harness and the test suite.
//!
//! Conventions baked into the trait:
//!
//! - Lookups return `Option`/empty `Vec` rather than failing. A behavior
//!   whose elements are absent silently does nothing.
//! - `set_style` with an empty value clears the inline property (the way
//!   assigning `''` to an element style does).
//! - Visibility watching is an optional capability: [`Page::watch_visibility`]
//!   returns `None` where the runtime cannot observe elements, and callers
//!   fall back to eager behavior.

use tokio::sync::mpsc;

/// Opaque handle to one element in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Current viewport geometry and scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical pixel width.
    pub width: u32,
    /// Logical pixel height.
    pub height: u32,
    /// Vertical scroll offset from the top of the document.
    pub scroll_y: f64,
}

/// Effective network type as reported by the client runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EffectiveType {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
}

/// Network information exposed by the runtime, when available.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkInfo {
    pub effective_type: EffectiveType,
    /// Data-saver preference set by the user.
    #[serde(default)]
    pub save_data: bool,
}

/// Options for a visibility watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Pixels added to the viewport on both vertical ends before testing
    /// intersection. Positive values trigger before an element scrolls into
    /// view; negative values shrink the trigger region.
    pub margin_px: f64,
    /// Minimum visible fraction of the element's height (0.0 to 1.0).
    pub threshold: f64,
}

/// Receiving end of a visibility watch. Each watched element is delivered at
/// most once, when it first satisfies the watch options.
pub struct VisibilityWatch {
    rx: mpsc::UnboundedReceiver<NodeId>,
}

impl VisibilityWatch {
    pub fn new(rx: mpsc::UnboundedReceiver<NodeId>) -> Self {
        Self { rx }
    }

    /// Wait for the next element to enter the trigger region. Returns `None`
    /// once the watch is dropped by the page.
    pub async fn entered(&mut self) -> Option<NodeId> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`Self::entered`].
    pub fn try_entered(&mut self) -> Option<NodeId> {
        self.rx.try_recv().ok()
    }
}

/// Keyboard keys the behavior layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// An input event delivered by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    Click(NodeId),
    Submit(NodeId),
    /// The viewport scrolled; current position is read back via
    /// [`Page::viewport`].
    Scroll,
    Key(Key),
    Resize,
    /// A media element finished loading enough data to play.
    MediaLoaded(NodeId),
}

/// Capability interface over the host page.
pub trait Page: Send + Sync {
    fn by_id(&self, id: &str) -> Option<NodeId>;
    /// All elements carrying `class`, in document order.
    fn by_class(&self, class: &str) -> Vec<NodeId>;
    /// All elements with tag name `tag`, in document order.
    fn by_tag(&self, tag: &str) -> Vec<NodeId>;
    /// Descendants of `parent` carrying `class`, in document order.
    fn scoped_by_class(&self, parent: NodeId, class: &str) -> Vec<NodeId>;
    /// Descendants of `parent` with tag name `tag`, in document order.
    fn scoped_by_tag(&self, parent: NodeId, tag: &str) -> Vec<NodeId>;

    fn add_class(&self, node: NodeId, class: &str);
    fn remove_class(&self, node: NodeId, class: &str);
    fn toggle_class(&self, node: NodeId, class: &str);
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Set an inline style property. An empty `value` clears the property.
    fn set_style(&self, node: NodeId, prop: &str, value: &str);
    fn style(&self, node: NodeId, prop: &str) -> Option<String>;

    fn set_text(&self, node: NodeId, text: &str);
    fn text(&self, node: NodeId) -> String;

    /// Current value of a form field.
    fn value(&self, node: NodeId) -> String;
    fn set_value(&self, node: NodeId, value: &str);
    fn set_disabled(&self, node: NodeId, disabled: bool);
    fn disabled(&self, node: NodeId) -> bool;

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&self, node: NodeId, name: &str, value: &str);
    fn remove_attr(&self, node: NodeId, name: &str);

    /// Distance from the document top to the element's top edge.
    fn offset_top(&self, node: NodeId) -> f64;
    fn height(&self, node: NodeId) -> f64;

    fn viewport(&self) -> Viewport;
    /// Request a (smooth) scroll to the given document offset.
    fn scroll_to(&self, y: f64);

    /// Network information, where the runtime exposes it.
    fn network(&self) -> Option<NetworkInfo>;

    /// Append a prioritized image preload hint to the document head.
    fn push_preload_hint(&self, href: &str, high_priority: bool);

    /// Watch elements for entry into the (margin-expanded) viewport.
    /// Returns `None` where the runtime has no visibility observation.
    fn watch_visibility(&self, nodes: &[NodeId], opts: WatchOptions) -> Option<VisibilityWatch>;

    /// Pause a media element's playback.
    fn pause_media(&self, node: NodeId);
}
