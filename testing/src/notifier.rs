//! Notifier that records messages instead of delivering them.

#![allow(clippy::unwrap_used)] // Lock poisoning only happens after a test panicked
#![allow(clippy::missing_panics_doc)]

use async_trait::async_trait;
use eventadmin_core::providers::{BodyProducer, Notifier};
use eventadmin_core::{AdminError, Event, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A delivered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    /// Event short name
    pub event: String,
    /// Sender override, if any
    pub from: Option<String>,
    /// Recipient
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Rendered body
    pub body: String,
}

/// Records every message; optionally fails the Nth send.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    calls: Arc<AtomicUsize>,
    fail_on: Option<usize>,
}

impl RecordingNotifier {
    /// Notifier that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifier whose `n`-th send (1-based) fails without recording.
    #[must_use]
    pub fn failing_on(n: usize) -> Self {
        Self {
            fail_on: Some(n),
            ..Self::default()
        }
    }

    /// Messages delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Send attempts, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        event: &Event,
        from_override: Option<&str>,
        to: &str,
        subject: &str,
        body: BodyProducer,
    ) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(call) {
            return Err(AdminError::Notification(format!(
                "simulated failure on send #{call} to {to}"
            )));
        }

        let body = body()?;
        self.sent.lock().unwrap().push(SentMessage {
            event: event.short_name.clone(),
            from: from_override.map(ToString::to_string),
            to: to.to_string(),
            subject: subject.to_string(),
            body,
        });
        Ok(())
    }
}
