//! In-memory [`Page`] implementation.
//!
//! Elements are flat records with a parent pointer for descendant queries
//! and a vertical extent for visibility math. Geometry is one-dimensional:
//! the behaviors only ever reason about vertical position, so horizontal
//! layout is not modeled.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::page::{
    NetworkInfo, NodeId, Page, Viewport, VisibilityWatch, WatchOptions,
};

/// A preload hint pushed to the simulated document head.
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadHint {
    pub href: String,
    pub high_priority: bool,
}

/// Element description used to populate a [`SimPageBuilder`].
#[derive(Debug, Clone)]
pub struct SimElement {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub styles: Vec<(String, String)>,
    pub text: String,
    pub value: String,
    pub attrs: Vec<(String, String)>,
    pub top: f64,
    pub height: f64,
    pub parent: Option<NodeId>,
}

impl Default for SimElement {
    fn default() -> Self {
        Self {
            tag: "div".into(),
            id: None,
            classes: Vec::new(),
            styles: Vec::new(),
            text: String::new(),
            value: String::new(),
            attrs: Vec::new(),
            top: 0.0,
            height: 0.0,
            parent: None,
        }
    }
}

struct Node {
    tag: String,
    id: Option<String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    attrs: BTreeMap<String, String>,
    top: f64,
    height: f64,
    parent: Option<NodeId>,
    paused: bool,
}

struct Watch {
    nodes: Vec<NodeId>,
    opts: WatchOptions,
    tx: mpsc::UnboundedSender<NodeId>,
    delivered: HashSet<NodeId>,
}

struct State {
    nodes: Vec<Node>,
    viewport: Viewport,
    network: Option<NetworkInfo>,
    hints: Vec<PreloadHint>,
    scroll_requests: Vec<f64>,
    watches: Vec<Watch>,
}

/// Builder for a [`SimPage`].
pub struct SimPageBuilder {
    nodes: Vec<Node>,
    viewport: Viewport,
    network: Option<NetworkInfo>,
    visibility_supported: bool,
}

impl Default for SimPageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPageBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            viewport: Viewport {
                width: 1280,
                height: 800,
                scroll_y: 0.0,
            },
            network: None,
            visibility_supported: true,
        }
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport.width = width;
        self.viewport.height = height;
        self
    }

    pub fn network(mut self, network: Option<NetworkInfo>) -> Self {
        self.network = network;
        self
    }

    /// Model a runtime without visibility observation.
    pub fn without_visibility_watching(mut self) -> Self {
        self.visibility_supported = false;
        self
    }

    /// Append an element and return its handle.
    pub fn add(&mut self, element: SimElement) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            tag: element.tag,
            id: element.id,
            classes: element.classes.into_iter().collect(),
            styles: element.styles.into_iter().collect(),
            text: element.text,
            value: element.value,
            disabled: false,
            attrs: element.attrs.into_iter().collect(),
            top: element.top,
            height: element.height,
            parent: element.parent,
            paused: false,
        });
        id
    }

    pub fn build(self) -> Arc<SimPage> {
        Arc::new(SimPage {
            state: Mutex::new(State {
                nodes: self.nodes,
                viewport: self.viewport,
                network: self.network,
                hints: Vec::new(),
                scroll_requests: Vec::new(),
                watches: Vec::new(),
            }),
            visibility_supported: self.visibility_supported,
        })
    }
}

/// The simulated page.
pub struct SimPage {
    state: Mutex<State>,
    visibility_supported: bool,
}

impl SimPage {
    /// Move the viewport and re-evaluate visibility watches, the way a real
    /// scroll would.
    pub fn set_scroll(&self, y: f64) {
        let mut state = self.state.lock().unwrap();
        state.viewport.scroll_y = y;
        evaluate_watches(&mut state);
    }

    /// Resize the viewport and re-evaluate visibility watches.
    pub fn set_viewport(&self, width: u32, height: u32) {
        let mut state = self.state.lock().unwrap();
        state.viewport.width = width;
        state.viewport.height = height;
        evaluate_watches(&mut state);
    }

    /// Preload hints pushed so far, in order.
    pub fn preload_hints(&self) -> Vec<PreloadHint> {
        self.state.lock().unwrap().hints.clone()
    }

    /// Scroll positions requested via [`Page::scroll_to`], in order.
    pub fn scroll_requests(&self) -> Vec<f64> {
        self.state.lock().unwrap().scroll_requests.clone()
    }

    /// Whether a media element has been paused.
    pub fn media_paused(&self, node: NodeId) -> bool {
        self.state.lock().unwrap().nodes[node.0 as usize].paused
    }
}

fn is_descendant(nodes: &[Node], node: NodeId, ancestor: NodeId) -> bool {
    let mut current = nodes[node.0 as usize].parent;
    while let Some(parent) = current {
        if parent == ancestor {
            return true;
        }
        current = nodes[parent.0 as usize].parent;
    }
    false
}

/// Deliver every watched node that now satisfies its watch options. Each
/// node fires at most once per watch.
fn evaluate_watches(state: &mut State) {
    let viewport = state.viewport;
    // Split borrows: geometry reads only touch `nodes`.
    let State { nodes, watches, .. } = state;
    for watch in watches.iter_mut() {
        let region_top = viewport.scroll_y - watch.opts.margin_px;
        let region_bottom = viewport.scroll_y + viewport.height as f64 + watch.opts.margin_px;
        for node in &watch.nodes {
            if watch.delivered.contains(node) {
                continue;
            }
            let record = &nodes[node.0 as usize];
            let top = record.top;
            let bottom = top + record.height;
            let overlap = bottom.min(region_bottom) - top.max(region_top);
            let entered = if record.height <= 0.0 {
                top >= region_top && top <= region_bottom
            } else {
                overlap > 0.0 && overlap / record.height >= watch.opts.threshold
            };
            if entered {
                watch.delivered.insert(*node);
                // Receiver may be gone; delivery is best-effort.
                let _ = watch.tx.send(*node);
            }
        }
    }
}

impl Page for SimPage {
    fn by_id(&self, id: &str) -> Option<NodeId> {
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(id))
            .map(|i| NodeId(i as u32))
    }

    fn by_class(&self, class: &str) -> Vec<NodeId> {
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.classes.contains(class))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    fn by_tag(&self, tag: &str) -> Vec<NodeId> {
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.tag == tag)
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    fn scoped_by_class(&self, parent: NodeId, class: &str) -> Vec<NodeId> {
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .enumerate()
            .filter(|(i, n)| {
                n.classes.contains(class) && is_descendant(&state.nodes, NodeId(*i as u32), parent)
            })
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    fn scoped_by_tag(&self, parent: NodeId, tag: &str) -> Vec<NodeId> {
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .enumerate()
            .filter(|(i, n)| n.tag == tag && is_descendant(&state.nodes, NodeId(*i as u32), parent))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    fn add_class(&self, node: NodeId, class: &str) {
        let mut state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].classes.insert(class.to_string());
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        let mut state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].classes.remove(class);
    }

    fn toggle_class(&self, node: NodeId, class: &str) {
        let mut state = self.state.lock().unwrap();
        let classes = &mut state.nodes[node.0 as usize].classes;
        if !classes.remove(class) {
            classes.insert(class.to_string());
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].classes.contains(class)
    }

    fn set_style(&self, node: NodeId, prop: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        let styles = &mut state.nodes[node.0 as usize].styles;
        if value.is_empty() {
            styles.remove(prop);
        } else {
            styles.insert(prop.to_string(), value.to_string());
        }
    }

    fn style(&self, node: NodeId, prop: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].styles.get(prop).cloned()
    }

    fn set_text(&self, node: NodeId, text: &str) {
        let mut state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].text = text.to_string();
    }

    fn text(&self, node: NodeId) -> String {
        let state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].text.clone()
    }

    fn value(&self, node: NodeId) -> String {
        let state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].value.clone()
    }

    fn set_value(&self, node: NodeId, value: &str) {
        let mut state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].value = value.to_string();
    }

    fn set_disabled(&self, node: NodeId, disabled: bool) {
        let mut state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].disabled = disabled;
    }

    fn disabled(&self, node: NodeId) -> bool {
        let state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].disabled
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].attrs.get(name).cloned()
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        state.nodes[node.0 as usize]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attr(&self, node: NodeId, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].attrs.remove(name);
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        let state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].top
    }

    fn height(&self, node: NodeId) -> f64 {
        let state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].height
    }

    fn viewport(&self) -> Viewport {
        self.state.lock().unwrap().viewport
    }

    fn scroll_to(&self, y: f64) {
        let mut state = self.state.lock().unwrap();
        state.scroll_requests.push(y);
        state.viewport.scroll_y = y.max(0.0);
        evaluate_watches(&mut state);
    }

    fn network(&self) -> Option<NetworkInfo> {
        self.state.lock().unwrap().network
    }

    fn push_preload_hint(&self, href: &str, high_priority: bool) {
        let mut state = self.state.lock().unwrap();
        state.hints.push(PreloadHint {
            href: href.to_string(),
            high_priority,
        });
    }

    fn watch_visibility(&self, nodes: &[NodeId], opts: WatchOptions) -> Option<VisibilityWatch> {
        if !self.visibility_supported {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock().unwrap();
        state.watches.push(Watch {
            nodes: nodes.to_vec(),
            opts,
            tx,
            delivered: HashSet::new(),
        });
        // Elements already inside the region fire right away.
        evaluate_watches(&mut state);
        Some(VisibilityWatch::new(rx))
    }

    fn pause_media(&self, node: NodeId) {
        let mut state = self.state.lock().unwrap();
        state.nodes[node.0 as usize].paused = true;
    }
}
