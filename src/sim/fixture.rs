//! The standard simulated page.
//!
//! Builds the element structure the behavior layer expects — navigation
//! chrome, hero slideshow, project cards, ambient-video section, news and
//! excellence cards, contact form, lightbox — with a fixed vertical layout:
//!
//! ```text
//! 0     navbar (70 tall) / #home with the hero (0..900)
//! 900   #projects with the project cards
//! 2000  how-we-think section (parallax + video)
//! 2900  #about with the excellence cards
//! 3600  #news with the news cards
//! 4400  #contact with the form
//! ```
//!
//! Card geometry is adjustable through [`FixtureSpec`] so tests can place
//! cards exactly where a scenario needs them relative to the fold.

use std::sync::Arc;

use crate::page::{NetworkInfo, NodeId};

use super::{SimElement, SimPage, SimPageBuilder};

/// Knobs for [`standard_page`].
#[derive(Debug, Clone)]
pub struct FixtureSpec {
    /// Number of hero slide slots (and indicator dots).
    pub slides: usize,
    /// Project card image URLs, one card per entry.
    pub cards: Vec<String>,
    pub viewport: (u32, u32),
    pub network: Option<NetworkInfo>,
    /// Whether the runtime supports visibility watching.
    pub visibility_watching: bool,
    /// Whether the rotating headline element exists.
    pub rotating_text: bool,
    /// Whether the contact form exists.
    pub contact_form: bool,
    /// Top of the first project card.
    pub card_top: f64,
    /// Vertical distance between card tops.
    pub card_spacing: f64,
    pub card_height: f64,
}

impl Default for FixtureSpec {
    fn default() -> Self {
        Self {
            slides: 3,
            cards: (0..3).map(|i| format!("projects/gallery-{i:02}.webp")).collect(),
            viewport: (1280, 800),
            network: None,
            visibility_watching: true,
            rotating_text: true,
            contact_form: true,
            card_top: 700.0,
            card_spacing: 420.0,
            card_height: 400.0,
        }
    }
}

/// Section ids, in document order, matching the fixture's menu links.
pub const SECTION_IDS: [&str; 5] = ["home", "projects", "about", "news", "contact"];

/// Build the standard page.
pub fn standard_page(spec: &FixtureSpec) -> Arc<SimPage> {
    let mut b = SimPageBuilder::new().viewport(spec.viewport.0, spec.viewport.1);
    b = b.network(spec.network);
    if !spec.visibility_watching {
        b = b.without_visibility_watching();
    }

    let body = b.add(SimElement {
        tag: "body".into(),
        top: 0.0,
        height: 6000.0,
        ..SimElement::default()
    });

    // Navigation chrome.
    let navbar = b.add(SimElement {
        tag: "nav".into(),
        classes: vec!["navbar".into()],
        top: 0.0,
        height: 70.0,
        parent: Some(body),
        ..SimElement::default()
    });
    b.add(SimElement {
        tag: "button".into(),
        id: Some("hamburger".into()),
        parent: Some(navbar),
        ..SimElement::default()
    });
    let menu = b.add(SimElement {
        tag: "ul".into(),
        id: Some("navMenu".into()),
        classes: vec!["nav-menu".into()],
        parent: Some(navbar),
        ..SimElement::default()
    });
    for id in SECTION_IDS {
        b.add(SimElement {
            tag: "a".into(),
            attrs: vec![("href".into(), format!("#{id}"))],
            text: id.to_string(),
            parent: Some(menu),
            ..SimElement::default()
        });
    }

    // Sections with ids drive the scroll highlighting.
    let tops_heights = [
        (0.0, 900.0),
        (900.0, 1100.0),
        (2900.0, 500.0),
        (3600.0, 800.0),
        (4400.0, 1000.0),
    ];
    let mut sections = Vec::new();
    for (id, (top, height)) in SECTION_IDS.iter().zip(tops_heights) {
        sections.push(b.add(SimElement {
            tag: "section".into(),
            id: Some((*id).into()),
            attrs: vec![("id".into(), (*id).into())],
            top,
            height,
            parent: Some(body),
            ..SimElement::default()
        }));
    }
    let home = sections[0];
    let projects = sections[1];
    let about = sections[2];
    let news = sections[3];
    let contact = sections[4];

    // Hero slideshow.
    let hero = b.add(SimElement {
        classes: vec!["hero-slideshow".into()],
        top: 0.0,
        height: 900.0,
        parent: Some(home),
        ..SimElement::default()
    });
    for _ in 0..spec.slides {
        b.add(SimElement {
            classes: vec!["slide".into()],
            top: 0.0,
            height: 900.0,
            parent: Some(hero),
            ..SimElement::default()
        });
    }
    let rail = b.add(SimElement {
        classes: vec!["slideshow-dots".into()],
        top: 820.0,
        height: 20.0,
        parent: Some(hero),
        ..SimElement::default()
    });
    for _ in 0..spec.slides {
        b.add(SimElement {
            classes: vec!["dot".into()],
            parent: Some(rail),
            ..SimElement::default()
        });
    }
    b.add(SimElement {
        tag: "button".into(),
        classes: vec!["slideshow-prev".into()],
        parent: Some(hero),
        ..SimElement::default()
    });
    b.add(SimElement {
        tag: "button".into(),
        classes: vec!["slideshow-next".into()],
        parent: Some(hero),
        ..SimElement::default()
    });
    let hero_content = b.add(SimElement {
        classes: vec!["hero-content".into()],
        top: 200.0,
        height: 400.0,
        parent: Some(home),
        ..SimElement::default()
    });
    if spec.rotating_text {
        b.add(SimElement {
            tag: "span".into(),
            id: Some("rotatingText".into()),
            text: "Building Tomorrow.".into(),
            parent: Some(hero_content),
            ..SimElement::default()
        });
    }

    // Section titles for the fade-in pass.
    for (title_top, parent) in [(910.0, projects), (2910.0, about), (3610.0, news)] {
        b.add(SimElement {
            tag: "h2".into(),
            classes: vec!["section-title".into()],
            top: title_top,
            height: 60.0,
            parent: Some(parent),
            ..SimElement::default()
        });
    }

    // Project cards with a placeholder background pointing at the real image.
    for (i, url) in spec.cards.iter().enumerate() {
        let top = spec.card_top + i as f64 * spec.card_spacing;
        let card = b.add(SimElement {
            classes: vec!["project-card".into()],
            top,
            height: spec.card_height,
            parent: Some(projects),
            ..SimElement::default()
        });
        b.add(SimElement {
            classes: vec!["project-image".into()],
            styles: vec![("background-image".into(), format!("url('{url}')"))],
            top,
            height: spec.card_height,
            parent: Some(card),
            ..SimElement::default()
        });
    }

    // Parallax section with the ambient video.
    let think = b.add(SimElement {
        tag: "section".into(),
        classes: vec!["how-we-think".into()],
        top: 2000.0,
        height: 900.0,
        parent: Some(body),
        ..SimElement::default()
    });
    b.add(SimElement {
        tag: "h2".into(),
        classes: vec!["how-we-think-title".into()],
        top: 2100.0,
        height: 80.0,
        parent: Some(think),
        ..SimElement::default()
    });
    b.add(SimElement {
        tag: "p".into(),
        classes: vec!["how-we-think-subtitle".into()],
        top: 2200.0,
        height: 40.0,
        parent: Some(think),
        ..SimElement::default()
    });
    b.add(SimElement {
        tag: "video".into(),
        classes: vec!["how-we-think-video".into()],
        attrs: vec![("autoplay".into(), String::new())],
        top: 2300.0,
        height: 400.0,
        parent: Some(think),
        ..SimElement::default()
    });

    // Excellence and news cards for the fade-in pass.
    for top in [2950.0, 3170.0] {
        b.add(SimElement {
            classes: vec!["excellence-card".into()],
            top,
            height: 200.0,
            parent: Some(about),
            ..SimElement::default()
        });
    }
    for top in [3700.0, 4020.0] {
        b.add(SimElement {
            classes: vec!["news-card".into()],
            top,
            height: 300.0,
            parent: Some(news),
            ..SimElement::default()
        });
    }

    // Contact form.
    if spec.contact_form {
        let form = b.add(SimElement {
            tag: "form".into(),
            id: Some("contactForm".into()),
            top: 4500.0,
            height: 600.0,
            parent: Some(contact),
            ..SimElement::default()
        });
        for (field_id, tag) in [
            ("firstName", "input"),
            ("lastName", "input"),
            ("email", "input"),
            ("message", "textarea"),
        ] {
            b.add(SimElement {
                tag: tag.into(),
                id: Some(field_id.into()),
                top: 4520.0,
                height: 40.0,
                parent: Some(form),
                ..SimElement::default()
            });
        }
        b.add(SimElement {
            tag: "button".into(),
            attrs: vec![("type".into(), "submit".into())],
            text: "Send Message".into(),
            top: 4800.0,
            height: 50.0,
            parent: Some(form),
            ..SimElement::default()
        });
        b.add(SimElement {
            id: Some("formMessage".into()),
            classes: vec!["form-message".into()],
            top: 4860.0,
            height: 40.0,
            parent: Some(form),
            ..SimElement::default()
        });
    }

    // Lightbox overlay.
    let lightbox = b.add(SimElement {
        id: Some("lightbox".into()),
        top: 0.0,
        height: 900.0,
        parent: Some(body),
        ..SimElement::default()
    });
    b.add(SimElement {
        tag: "img".into(),
        id: Some("lightbox-img".into()),
        parent: Some(lightbox),
        ..SimElement::default()
    });

    b.build()
}

/// Resolve a scenario target name to an element.
///
/// Supported forms:
/// - `#someId` — element by id
/// - `.some-class` or `.some-class:N` — Nth element (0-based) by class
/// - shortcuts: `hamburger`, `lightbox`, `lightbox-img`, `dot:N`,
///   `card:N`, `card-image:N`, `menu-link:N`, `prev`, `next`
pub fn resolve_target(page: &SimPage, target: &str) -> Option<NodeId> {
    use crate::page::Page;

    let nth = |nodes: Vec<NodeId>, n: usize| nodes.get(n).copied();
    if let Some(id) = target.strip_prefix('#') {
        return page.by_id(id);
    }
    if let Some(rest) = target.strip_prefix('.') {
        let (class, index) = match rest.split_once(':') {
            Some((class, n)) => (class, n.parse().ok()?),
            None => (rest, 0),
        };
        return nth(page.by_class(class), index);
    }
    let (name, index) = match target.split_once(':') {
        Some((name, n)) => (name, n.parse().ok()?),
        None => (target, 0),
    };
    match name {
        "hamburger" => page.by_id("hamburger"),
        "lightbox" => page.by_id("lightbox"),
        "lightbox-img" => page.by_id("lightbox-img"),
        "dot" => nth(page.by_class("dot"), index),
        "card" => nth(page.by_class("project-card"), index),
        "card-image" => nth(page.by_class("project-image"), index),
        "menu-link" => {
            let menu = page.by_id("navMenu")?;
            nth(page.scoped_by_tag(menu, "a"), index)
        }
        "prev" => nth(page.by_class("slideshow-prev"), 0),
        "next" => nth(page.by_class("slideshow-next"), 0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    #[test]
    fn standard_page_carries_the_expected_chrome() {
        let page = standard_page(&FixtureSpec::default());
        assert!(page.by_id("hamburger").is_some());
        assert!(page.by_id("navMenu").is_some());
        assert_eq!(page.by_class("slide").len(), 3);
        assert_eq!(page.by_class("dot").len(), 3);
        assert_eq!(page.by_class("project-card").len(), 3);
        assert!(page.by_id("contactForm").is_some());
        assert!(page.by_id("lightbox").is_some());
        assert_eq!(page.by_class("section-title").len(), 3);
    }

    #[test]
    fn targets_resolve_to_fixture_elements() {
        let page = standard_page(&FixtureSpec::default());
        assert_eq!(resolve_target(&page, "hamburger"), page.by_id("hamburger"));
        assert_eq!(resolve_target(&page, "#lightbox"), page.by_id("lightbox"));
        assert_eq!(
            resolve_target(&page, "dot:2"),
            page.by_class("dot").get(2).copied()
        );
        assert_eq!(
            resolve_target(&page, ".project-card:1"),
            page.by_class("project-card").get(1).copied()
        );
        assert_eq!(resolve_target(&page, "bogus"), None);
        assert_eq!(resolve_target(&page, "dot:9"), None);
    }

    #[test]
    fn optional_pieces_can_be_omitted() {
        let page = standard_page(&FixtureSpec {
            slides: 0,
            cards: Vec::new(),
            rotating_text: false,
            contact_form: false,
            ..FixtureSpec::default()
        });
        assert!(page.by_class("slide").is_empty());
        assert!(page.by_class("project-card").is_empty());
        assert!(page.by_id("rotatingText").is_none());
        assert!(page.by_id("contactForm").is_none());
    }
}
