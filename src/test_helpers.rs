//! Shared test utilities for the portico test suite.
//!
//! Provides a fully-mounted engine over the standard fixture page and small
//! form-filling helpers, so behavior tests only spell out what they vary.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let session = mount_standard(FixtureSpec::default());
//! fill_contact_form(&session.page);
//! session.behaviors.dispatch(PageEvent::Submit(
//!     session.page.by_id("contactForm").unwrap(),
//! ));
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::config::BehaviorConfig;
use crate::engine::Behaviors;
use crate::page::Page;
use crate::sim::fixture::{self, FixtureSpec};
use crate::sim::{SimFetcher, SimMailer, SimPage};

/// A mounted engine plus handles to every simulated capability.
pub struct Session {
    pub page: Arc<SimPage>,
    pub fetcher: Arc<SimFetcher>,
    pub mailer: Arc<SimMailer>,
    pub behaviors: Behaviors,
}

/// Mount the full behavior layer over the standard fixture with default
/// config, a 30ms fetcher, and a ready mailer.
pub fn mount_standard(spec: FixtureSpec) -> Session {
    mount_with(spec, SimFetcher::new(Duration::from_millis(30)), SimMailer::ready())
}

/// Mount with explicit fetcher/mailer scripts.
pub fn mount_with(spec: FixtureSpec, fetcher: SimFetcher, mailer: SimMailer) -> Session {
    let page = fixture::standard_page(&spec);
    let fetcher = Arc::new(fetcher);
    let mailer = Arc::new(mailer);
    let behaviors = Behaviors::mount(
        page.clone(),
        fetcher.clone(),
        mailer.clone(),
        &BehaviorConfig::default(),
    );
    Session {
        page,
        fetcher,
        mailer,
        behaviors,
    }
}

/// Fill the contact form with a plausible visitor.
pub fn fill_contact_form(page: &SimPage) {
    page.set_value(page.by_id("firstName").unwrap(), "Ada");
    page.set_value(page.by_id("lastName").unwrap(), "Lovelace");
    page.set_value(page.by_id("email").unwrap(), "ada@example.com");
    page.set_value(page.by_id("message").unwrap(), "We would like to discuss a project.");
}
