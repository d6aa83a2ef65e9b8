//! Per-event administrative configuration keys.

use crate::types::{EventId, OrganizationId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration flags consulted by the waiting queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigurationKey {
    /// New waiting-queue subscriptions are paused
    StopWaitingQueueSubscriptions,
    /// Waiting queue is offered once the event is sold out
    EnableWaitingQueue,
    /// Pre-registration is offered before sales start
    EnablePreRegistration,
}

impl ConfigurationKey {
    /// Persisted name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StopWaitingQueueSubscriptions => "STOP_WAITING_QUEUE_SUBSCRIPTIONS",
            Self::EnableWaitingQueue => "ENABLE_WAITING_QUEUE",
            Self::EnablePreRegistration => "ENABLE_PRE_REGISTRATION",
        }
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup scope. Event values override organization values, which override
/// system-wide values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigurationScope {
    /// Owning organization
    pub organization_id: OrganizationId,
    /// Event
    pub event_id: EventId,
}

impl ConfigurationScope {
    /// Scope of the given event.
    #[must_use]
    pub const fn event(event: &crate::Event) -> Self {
        Self {
            organization_id: event.organization_id,
            event_id: event.id,
        }
    }
}

/// Parse a stored configuration value as a boolean.
///
/// Only `true` (any case, surrounding whitespace ignored) is truthy.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
