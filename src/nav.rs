//! Navigation chrome: mobile menu, smooth-scroll anchors, navbar shadow,
//! and active-section highlighting.

use std::sync::Arc;

use crate::page::{NodeId, Page};

/// Anchor targets scroll to this far above the section top, clearing the
/// fixed navbar.
const ANCHOR_OFFSET: f64 = 70.0;
/// Scroll depth past which the navbar gets the heavier shadow.
const SHADOW_THRESHOLD: f64 = 100.0;
/// Slack above a section within which it counts as the current one.
const HIGHLIGHT_OFFSET: f64 = 100.0;

const SHADOW_RAISED: &str = "0 4px 20px rgba(0, 0, 0, 0.1)";
const SHADOW_RESTING: &str = "0 2px 10px rgba(0, 0, 0, 0.08)";

/// Navigation behaviors, bound at mount to whatever chrome the page has.
/// Missing pieces (no hamburger, no navbar, no sections) disable just the
/// behaviors that need them.
pub struct Nav {
    page: Arc<dyn Page>,
    hamburger: Option<NodeId>,
    menu: Option<NodeId>,
    menu_links: Vec<NodeId>,
    anchors: Vec<(NodeId, String)>,
    navbar: Option<NodeId>,
    sections: Vec<(NodeId, String)>,
}

impl Nav {
    pub fn mount(page: Arc<dyn Page>) -> Self {
        let hamburger = page.by_id("hamburger");
        let menu = page.by_id("navMenu");
        let menu_links = menu
            .map(|m| page.scoped_by_tag(m, "a"))
            .unwrap_or_default();
        let anchors = page
            .by_tag("a")
            .into_iter()
            .filter_map(|a| {
                let href = page.attr(a, "href")?;
                href.starts_with('#').then_some((a, href))
            })
            .collect();
        let navbar = page.by_class("navbar").into_iter().next();
        let sections = page
            .by_tag("section")
            .into_iter()
            .filter_map(|s| page.attr(s, "id").map(|id| (s, id)))
            .collect();
        Self {
            page,
            hamburger,
            menu,
            menu_links,
            anchors,
            navbar,
            sections,
        }
    }

    /// Handle a click. Returns `true` when the click belonged to the
    /// navigation chrome.
    pub fn handle_click(&self, node: NodeId) -> bool {
        let mut handled = false;

        if self.hamburger == Some(node) {
            if let (Some(hamburger), Some(menu)) = (self.hamburger, self.menu) {
                self.page.toggle_class(hamburger, "active");
                self.page.toggle_class(menu, "active");
            }
            return true;
        }

        if self.menu_links.contains(&node) {
            if let (Some(hamburger), Some(menu)) = (self.hamburger, self.menu) {
                self.page.remove_class(hamburger, "active");
                self.page.remove_class(menu, "active");
            }
            handled = true;
        }

        if let Some((_, href)) = self.anchors.iter().find(|(a, _)| *a == node) {
            if let Some(target) = self.page.by_id(&href[1..]) {
                self.page
                    .scroll_to(self.page.offset_top(target) - ANCHOR_OFFSET);
            }
            handled = true;
        }

        handled
    }

    /// Scroll handler: navbar shadow depth and active-section highlighting.
    pub fn on_scroll(&self) {
        let scroll_y = self.page.viewport().scroll_y;

        if let Some(navbar) = self.navbar {
            let shadow = if scroll_y > SHADOW_THRESHOLD {
                SHADOW_RAISED
            } else {
                SHADOW_RESTING
            };
            self.page.set_style(navbar, "box-shadow", shadow);
        }

        for (section, id) in &self.sections {
            let top = self.page.offset_top(*section) - HIGHLIGHT_OFFSET;
            let height = self.page.height(*section);
            if scroll_y > top && scroll_y <= top + height {
                let target = format!("#{id}");
                for link in &self.menu_links {
                    self.page.remove_class(*link, "active");
                    if self.page.attr(*link, "href").as_deref() == Some(&target) {
                        self.page.add_class(*link, "active");
                    }
                }
            }
        }
    }
}
