//! Ownership context shared by every administrative operation.
//!
//! An event belongs to exactly one organization; a ticket category belongs to
//! exactly one event.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Get the inner value
            #[must_use]
            pub const fn value(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }
    };
}

int_id!(
    /// Organization identifier
    OrganizationId
);
int_id!(
    /// Event identifier
    EventId
);
int_id!(
    /// Ticket category identifier
    CategoryId
);
int_id!(
    /// Special code identifier
    SpecialCodeId
);
int_id!(
    /// Waiting-queue subscription identifier
    SubscriptionId
);

/// Authenticated identity of the operator issuing a request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Caller(String);

impl Caller {
    /// Wrap a username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// Username of the caller.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Organization owning one or more events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID
    pub id: OrganizationId,
    /// Display name
    pub name: String,
    /// Contact email, used as reply address in notifications
    pub email: String,
}

/// Event as seen by the administrative core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event ID
    pub id: EventId,
    /// URL-safe unique name
    pub short_name: String,
    /// Human readable name
    pub display_name: String,
    /// Owning organization
    pub organization_id: OrganizationId,
    /// Time zone the event takes place in
    pub time_zone: Tz,
    /// Bitmask of enabled content languages (see [`crate::i18n::ContentLanguage`])
    pub locales: i32,
}

/// Ticket category. Immutable for the duration of a code operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCategory {
    /// Category ID
    pub id: CategoryId,
    /// Owning event
    pub event_id: EventId,
    /// Display name
    pub name: String,
    /// Only restricted categories can be unlocked with special codes
    pub access_restricted: bool,
    /// Capacity
    pub max_tickets: i32,
    /// Sales start
    pub inception: DateTime<Utc>,
    /// Sales end
    pub expiration: DateTime<Utc>,
    /// Whether the category has a fixed number of seats
    pub bounded: bool,
}
