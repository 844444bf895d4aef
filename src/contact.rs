//! The contact form submission flow.
//!
//! Mail delivery is delegated to an injected [`Mailer`] capability. The flow
//! waits for the mailer to report readiness, with a bounded timeout — a
//! mailer that never comes up produces an inline message pointing at the
//! fallback contact address, and the submit control is left untouched. A
//! ready mailer gets exactly one send per submission; there is no automatic
//! retry.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::config::ContactConfig;
use crate::page::{NodeId, Page};

/// The fixed payload handed to the mailer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OutboundMessage {
    pub from_name: String,
    pub first_name: String,
    pub last_name: String,
    pub from_email: String,
    pub message: String,
    pub to_email: String,
    pub reply_to: String,
}

#[derive(Error, Debug)]
#[error("mail delivery failed: {0}")]
pub struct SendError(pub String);

/// External mail-sending capability.
pub trait Mailer: Send + Sync {
    /// Resolves once the mailer is initialized and able to send. May never
    /// resolve; callers bound the wait.
    fn ready(&self) -> BoxFuture<'static, ()>;
    fn send(&self, message: OutboundMessage) -> BoxFuture<'static, Result<(), SendError>>;
}

struct Fields {
    first_name: NodeId,
    last_name: NodeId,
    email: NodeId,
    message: NodeId,
}

/// Submission flow bound to the page's contact form.
pub struct ContactFlow {
    page: Arc<dyn Page>,
    mailer: Arc<dyn Mailer>,
    form: NodeId,
    message_area: NodeId,
    submit: NodeId,
    fields: Fields,
    recipient: String,
    fallback_address: String,
    sending_label: String,
    ready_timeout: Duration,
}

impl ContactFlow {
    /// Bind to the contact form. Returns `None` when the form, the message
    /// area, any of the four fields, or the submit control is missing — the
    /// whole flow then simply does not exist on this page.
    pub fn mount(
        page: Arc<dyn Page>,
        mailer: Arc<dyn Mailer>,
        cfg: &ContactConfig,
    ) -> Option<Arc<Self>> {
        let form = page.by_id("contactForm")?;
        let message_area = page.by_id("formMessage")?;
        let fields = Fields {
            first_name: page.by_id("firstName")?,
            last_name: page.by_id("lastName")?,
            email: page.by_id("email")?,
            message: page.by_id("message")?,
        };
        let submit = page
            .scoped_by_tag(form, "button")
            .into_iter()
            .find(|b| page.attr(*b, "type").as_deref() == Some("submit"))?;
        Some(Arc::new(Self {
            page,
            mailer,
            form,
            message_area,
            submit,
            fields,
            recipient: cfg.recipient.clone(),
            fallback_address: cfg.fallback_address.clone(),
            sending_label: cfg.sending_label.clone(),
            ready_timeout: cfg.ready_timeout(),
        }))
    }

    /// The form element this flow is bound to.
    pub fn form(&self) -> NodeId {
        self.form
    }

    /// Handle a submit of the bound form. Runs asynchronously; the page is
    /// updated as the submission progresses.
    pub fn submit(self: &Arc<Self>) {
        let flow = Arc::clone(self);
        tokio::spawn(async move {
            flow.run_submission().await;
        });
    }

    async fn run_submission(&self) {
        let ready = tokio::time::timeout(self.ready_timeout, self.mailer.ready()).await;
        if ready.is_err() {
            self.show_message(
                &format!(
                    "Email service is not configured. Please contact us directly at {}",
                    self.fallback_address
                ),
                "error",
            );
            return;
        }

        let first_name = self.page.value(self.fields.first_name).trim().to_string();
        let last_name = self.page.value(self.fields.last_name).trim().to_string();
        let email = self.page.value(self.fields.email).trim().to_string();
        let message = self.page.value(self.fields.message).trim().to_string();

        self.page.set_style(self.message_area, "display", "none");
        self.page.remove_class(self.message_area, "success");
        self.page.remove_class(self.message_area, "error");

        let original_label = self.page.text(self.submit);
        self.page.set_disabled(self.submit, true);
        self.page.set_text(self.submit, &self.sending_label);

        let outbound = OutboundMessage {
            from_name: format!("{first_name} {last_name}"),
            first_name,
            last_name,
            from_email: email.clone(),
            message,
            to_email: self.recipient.clone(),
            reply_to: email,
        };
        let outcome = self.mailer.send(outbound).await;

        self.page.set_disabled(self.submit, false);
        self.page.set_text(self.submit, &original_label);

        match outcome {
            Ok(()) => {
                self.show_message(
                    "Thank you! Your message has been sent successfully. \
                     We will get back to you soon.",
                    "success",
                );
                self.reset_fields();
            }
            Err(e) => {
                tracing::error!(error = %e, "contact form send failed");
                self.show_message(
                    &format!(
                        "Sorry, there was an error sending your message. Please try again \
                         or contact us directly at {}",
                        self.fallback_address
                    ),
                    "error",
                );
            }
        }
    }

    fn show_message(&self, text: &str, kind: &str) {
        self.page.set_text(self.message_area, text);
        self.page.remove_class(self.message_area, "success");
        self.page.remove_class(self.message_area, "error");
        self.page.add_class(self.message_area, kind);
        self.page.set_style(self.message_area, "display", "block");

        // Bring the status line into view shortly after it renders.
        let page = Arc::clone(&self.page);
        let target = self.message_area;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            page.scroll_to(page.offset_top(target));
        });
    }

    fn reset_fields(&self) {
        for field in [
            self.fields.first_name,
            self.fields.last_name,
            self.fields.email,
            self.fields.message,
        ] {
            self.page.set_value(field, "");
        }
    }
}
