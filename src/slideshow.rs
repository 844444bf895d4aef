//! The hero slideshow rotator.
//!
//! Owns the current slide index and the running flag. Rotation starts once —
//! triggered by the hero preloader's first settled image or its fallback
//! timer — and never stops for the rest of the session. Manual controls
//! (indicator dots, prev/next arrows) work whether or not the timer has
//! started.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::page::{NodeId, Page};

const ACTIVE: &str = "active";

struct Inner {
    index: usize,
    running: bool,
}

/// Rotator over the fixed set of hero slide slots and their indicator dots.
pub struct Slideshow {
    page: Arc<dyn Page>,
    slides: Vec<NodeId>,
    dots: Vec<NodeId>,
    cadence: Duration,
    inner: Mutex<Inner>,
}

impl Slideshow {
    /// Locate the slide slots and indicator dots in the page. Both lists may
    /// be empty; every operation on an empty slideshow is a no-op.
    pub fn discover(page: Arc<dyn Page>, cadence: Duration) -> Arc<Self> {
        let slides = page
            .by_class("hero-slideshow")
            .into_iter()
            .next()
            .map(|hero| page.scoped_by_class(hero, "slide"))
            .unwrap_or_default();
        let dots = page
            .by_class("slideshow-dots")
            .into_iter()
            .next()
            .map(|rail| page.scoped_by_class(rail, "dot"))
            .unwrap_or_default();
        Arc::new(Self {
            page,
            slides,
            dots,
            cadence,
            inner: Mutex::new(Inner {
                index: 0,
                running: false,
            }),
        })
    }

    /// The slide slot elements, in display order.
    pub fn slide_nodes(&self) -> &[NodeId] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Index of the currently active slide.
    pub fn current(&self) -> usize {
        self.inner.lock().unwrap().index
    }

    /// Whether the rotation timer has started.
    pub fn started(&self) -> bool {
        self.inner.lock().unwrap().running
    }

    /// Position of `node` among the indicator dots, if it is one.
    pub fn dot_index(&self, node: NodeId) -> Option<usize> {
        self.dots.iter().position(|d| *d == node)
    }

    /// Start the rotation timer. Idempotent; the first advance happens one
    /// full cadence after the start.
    pub fn start(self: &Arc<Self>) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.running || self.slides.is_empty() {
                return;
            }
            inner.running = true;
        }
        let rotator = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(rotator.cadence);
            ticker.tick().await; // completes immediately
            loop {
                ticker.tick().await;
                rotator.advance(1);
            }
        });
    }

    /// Move the active marker by `direction` slots (+1 forward, -1 back),
    /// wrapping at both ends.
    pub fn advance(&self, direction: i64) {
        if self.slides.is_empty() {
            return;
        }
        let mut inner = self.inner.lock().unwrap();
        self.clear_active(inner.index);
        let len = self.slides.len() as i64;
        inner.index = (inner.index as i64 + direction).rem_euclid(len) as usize;
        self.apply_active(inner.index);
    }

    /// Jump directly to the one-based slide `n`. Out-of-range values are
    /// ignored.
    pub fn jump_to(&self, n: usize) {
        if n == 0 || n > self.slides.len() {
            return;
        }
        let mut inner = self.inner.lock().unwrap();
        self.clear_active(inner.index);
        inner.index = n - 1;
        self.apply_active(inner.index);
    }

    fn clear_active(&self, index: usize) {
        if let Some(slide) = self.slides.get(index) {
            self.page.remove_class(*slide, ACTIVE);
        }
        if let Some(dot) = self.dots.get(index) {
            self.page.remove_class(*dot, ACTIVE);
        }
    }

    fn apply_active(&self, index: usize) {
        if let Some(slide) = self.slides.get(index) {
            self.page.add_class(*slide, ACTIVE);
        }
        if let Some(dot) = self.dots.get(index) {
            self.page.add_class(*dot, ACTIVE);
        }
    }
}
