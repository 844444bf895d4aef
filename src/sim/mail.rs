//! Scriptable mailer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::contact::{Mailer, OutboundMessage, SendError};

/// Mailer whose readiness, latency, and outcome are scripted.
pub struct SimMailer {
    ready_after: Option<Duration>,
    send_latency: Duration,
    failure: Option<String>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl SimMailer {
    /// A mailer that is ready immediately.
    pub fn ready() -> Self {
        Self {
            ready_after: Some(Duration::ZERO),
            send_latency: Duration::from_millis(50),
            failure: None,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mailer that never finishes initializing.
    pub fn never_ready() -> Self {
        Self {
            ready_after: None,
            ..Self::ready()
        }
    }

    /// A mailer that becomes ready after `delay`.
    pub fn ready_after(delay: Duration) -> Self {
        Self {
            ready_after: Some(delay),
            ..Self::ready()
        }
    }

    pub fn with_send_latency(mut self, latency: Duration) -> Self {
        self.send_latency = latency;
        self
    }

    /// Script every send to fail with `reason`.
    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    /// Messages delivered so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for SimMailer {
    fn ready(&self) -> BoxFuture<'static, ()> {
        match self.ready_after {
            Some(delay) => Box::pin(tokio::time::sleep(delay)),
            None => Box::pin(futures_util::future::pending()),
        }
    }

    fn send(&self, message: OutboundMessage) -> BoxFuture<'static, Result<(), SendError>> {
        let latency = self.send_latency;
        let failure = self.failure.clone();
        let sent = Arc::clone(&self.sent);
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            match failure {
                Some(reason) => Err(SendError(reason)),
                None => {
                    sent.lock().unwrap().push(message);
                    Ok(())
                }
            }
        })
    }
}
