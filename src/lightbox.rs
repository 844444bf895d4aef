//! The gallery lightbox.
//!
//! Opens from a project image, mirroring its background URL into the
//! full-screen viewer, and locks body scrolling while open. Closes from the
//! overlay or the Escape key; clicks on the enlarged image itself are
//! swallowed so they do not fall through to the overlay.

use std::sync::Arc;

use crate::loader::background_image_url;
use crate::page::{NodeId, Page};

pub struct Lightbox {
    page: Arc<dyn Page>,
    overlay: Option<NodeId>,
    image: Option<NodeId>,
    body: Option<NodeId>,
}

impl Lightbox {
    pub fn mount(page: Arc<dyn Page>) -> Self {
        let overlay = page.by_id("lightbox");
        let image = page.by_id("lightbox-img");
        let body = page.by_tag("body").into_iter().next();
        Self {
            page,
            overlay,
            image,
            body,
        }
    }

    /// Open the lightbox showing the background image of `source`.
    pub fn open_from(&self, source: NodeId) {
        let (Some(overlay), Some(image)) = (self.overlay, self.image) else {
            return;
        };
        let Some(url) = self
            .page
            .style(source, "background-image")
            .and_then(|s| background_image_url(&s))
        else {
            return;
        };
        self.page.set_attr(image, "src", &url);
        self.page.add_class(overlay, "active");
        if let Some(body) = self.body {
            self.page.set_style(body, "overflow", "hidden");
        }
    }

    pub fn close(&self) {
        let Some(overlay) = self.overlay else { return };
        self.page.remove_class(overlay, "active");
        if let Some(body) = self.body {
            self.page.set_style(body, "overflow", "");
        }
    }

    pub fn is_open(&self) -> bool {
        self.overlay
            .is_some_and(|overlay| self.page.has_class(overlay, "active"))
    }

    /// Handle a click on the lightbox itself. The enlarged image swallows
    /// clicks; the overlay closes.
    pub fn handle_click(&self, node: NodeId) -> bool {
        if self.image == Some(node) {
            return true;
        }
        if self.overlay == Some(node) {
            self.close();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixture::{self, FixtureSpec};

    fn lightbox_page() -> (Arc<crate::sim::SimPage>, Lightbox) {
        let page = fixture::standard_page(&FixtureSpec::default());
        let lightbox = Lightbox::mount(page.clone());
        (page, lightbox)
    }

    #[test]
    fn opens_with_the_source_image_and_locks_scrolling() {
        let (page, lightbox) = lightbox_page();
        let card = page.by_class("project-card")[0];
        let image = page.scoped_by_class(card, "project-image")[0];

        lightbox.open_from(image);
        assert!(lightbox.is_open());

        let viewer = page.by_id("lightbox-img").unwrap();
        let expected = background_image_url(&page.style(image, "background-image").unwrap());
        assert_eq!(page.attr(viewer, "src"), expected);

        let body = page.by_tag("body")[0];
        assert_eq!(page.style(body, "overflow").as_deref(), Some("hidden"));
    }

    #[test]
    fn close_restores_body_scrolling() {
        let (page, lightbox) = lightbox_page();
        let card = page.by_class("project-card")[0];
        let image = page.scoped_by_class(card, "project-image")[0];
        lightbox.open_from(image);
        lightbox.close();

        assert!(!lightbox.is_open());
        let body = page.by_tag("body")[0];
        assert_eq!(page.style(body, "overflow"), None);
    }

    #[test]
    fn image_clicks_do_not_close_but_overlay_clicks_do() {
        let (page, lightbox) = lightbox_page();
        let card = page.by_class("project-card")[0];
        let image = page.scoped_by_class(card, "project-image")[0];
        lightbox.open_from(image);

        let viewer = page.by_id("lightbox-img").unwrap();
        assert!(lightbox.handle_click(viewer));
        assert!(lightbox.is_open());

        let overlay = page.by_id("lightbox").unwrap();
        assert!(lightbox.handle_click(overlay));
        assert!(!lightbox.is_open());
    }

    #[test]
    fn source_without_a_background_is_ignored() {
        let (page, lightbox) = lightbox_page();
        let stray = page.by_id("hamburger").unwrap();
        lightbox.open_from(stray);
        assert!(!lightbox.is_open());
    }
}
