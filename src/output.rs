//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Reports are **state-centric, not event-centric**. The primary display for
//! every entity (slide, card, the contact form) is where it ended up — URL
//! and settled phase — with the event stream (fetch starts, preload hints)
//! shown as secondary context. This makes a session report readable as an
//! inventory of what the visitor saw, while still letting the operator trace
//! loading order and priorities.
//!
//! # Output Format
//!
//! ```text
//! Session
//!     Connection: fast (viewport 1280x800)
//!     Headline: "Building Tomorrow."
//!
//! Hero
//!     Revealed: yes    Rotation: running (slide 3/3)
//!     001 projects/aurora-residence/render-01.webp  loaded, active
//!     002 projects/kitchen-studio/cam-01.webp  loaded
//!
//! Cards
//!     001 projects/bayside-residence/render-01.webp  loaded
//!     002 projects/yakima-workshop/yakima-01.webp  unstarted
//!
//! Contact
//!     success: "Thank you! Your message has been sent successfully. ..."
//!
//! Fetches
//!     0ms  high  projects/aurora-residence/render-01.webp
//!     31ms auto  projects/kitchen-studio/cam-01.webp
//! ```

use crate::catalog::{CheckReport, EntryStatus};
use crate::scenario::SessionReport;

/// Render a session report.
pub fn print_session_report(report: &SessionReport) {
    println!("Session");
    println!(
        "    Connection: {} (viewport {}x{})",
        report.connection, report.viewport[0], report.viewport[1]
    );
    if let Some(headline) = &report.headline {
        println!("    Headline: \"{headline}\"");
    }
    if report.lightbox_open {
        println!("    Lightbox: open");
    }

    println!();
    println!("Hero");
    println!(
        "    Revealed: {}    Rotation: {} (slide {}/{})",
        yes_no(report.hero.revealed),
        if report.hero.rotation_started {
            "running"
        } else {
            "stopped"
        },
        report.hero.current_index + 1,
        report.hero.slides.len().max(1),
    );
    for (i, slide) in report.hero.slides.iter().enumerate() {
        let mut notes = Vec::new();
        if slide.loaded {
            notes.push("loaded");
        }
        if slide.active {
            notes.push("active");
        }
        let notes = if notes.is_empty() {
            "pending".to_string()
        } else {
            notes.join(", ")
        };
        println!(
            "    {:03} {}  {notes}",
            i + 1,
            slide.url.as_deref().unwrap_or("(unassigned)"),
        );
    }

    if !report.preload_hints.is_empty() {
        println!();
        println!("Preload hints");
        for hint in &report.preload_hints {
            let priority = if hint.high_priority { " (high)" } else { "" };
            println!("    {}{priority}", hint.href);
        }
    }

    if !report.cards.is_empty() {
        println!();
        println!("Cards");
        for (i, card) in report.cards.iter().enumerate() {
            println!(
                "    {:03} {}  {}",
                i + 1,
                card.url.as_deref().unwrap_or("(no image)"),
                card.phase
            );
        }
    }

    if let Some(contact) = &report.contact {
        println!();
        println!("Contact");
        if contact.visible {
            println!("    {}: \"{}\"", contact.kind, contact.message);
        } else {
            println!("    No status shown");
        }
    }

    if !report.fetches.is_empty() {
        println!();
        println!("Fetches");
        for fetch in &report.fetches {
            println!("    {}ms  {}  {}", fetch.at_ms, fetch.priority, fetch.url);
        }
    }
}

/// Render a catalog check report. Returns whether every entry was ok.
pub fn print_check_report(report: &CheckReport) -> bool {
    println!("Catalog");
    for (path, status) in &report.entries {
        let status = match status {
            EntryStatus::Ok => "ok".to_string(),
            EntryStatus::Missing => "MISSING".to_string(),
            EntryStatus::Undecodable(reason) => format!("UNDECODABLE ({reason})"),
        };
        println!("    {path}  {status}");
    }
    if !report.unreferenced.is_empty() {
        println!();
        println!("Unreferenced images");
        for path in &report.unreferenced {
            println!("    {path}");
        }
    }
    println!();
    let ok = report.all_ok();
    if ok {
        println!("Catalog is valid ({} entries)", report.entries.len());
    } else {
        let bad = report
            .entries
            .iter()
            .filter(|(_, s)| *s != EntryStatus::Ok)
            .count();
        println!("{bad} catalog entries need attention");
    }
    ok
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
