//! Waiting-queue subscriptions.

use crate::error::AdminError;
use crate::types::{CategoryId, EventId, SubscriptionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Waiting for a seat
    Waiting,
    /// A seat was offered, reservation pending
    Pending,
    /// Reservation completed
    Acquired,
    /// Offer not taken in time
    Expired,
    /// Removed by an administrator
    Cancelled,
}

impl SubscriptionStatus {
    /// Persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Pending => "PENDING",
            Self::Acquired => "ACQUIRED",
            Self::Expired => "EXPIRED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(Self::Waiting),
            "PENDING" => Ok(Self::Pending),
            "ACQUIRED" => Ok(Self::Acquired),
            "EXPIRED" => Ok(Self::Expired),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(AdminError::InvalidInput(format!(
                "unknown subscription status: {other}"
            ))),
        }
    }
}

/// Why the attendee joined the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
    /// Pre-registration before sales start
    PreSales,
    /// Event sold out
    SoldOut,
}

impl SubscriptionType {
    /// Persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreSales => "PRE_SALES",
            Self::SoldOut => "SOLD_OUT",
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionType {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRE_SALES" => Ok(Self::PreSales),
            "SOLD_OUT" => Ok(Self::SoldOut),
            other => Err(AdminError::InvalidInput(format!(
                "unknown subscription type: {other}"
            ))),
        }
    }
}

/// Prospective attendee waiting for a seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingQueueSubscription {
    /// Subscription ID
    pub id: SubscriptionId,
    /// When the attendee subscribed
    pub creation: DateTime<Utc>,
    /// Event
    pub event_id: EventId,
    /// Current status
    pub status: SubscriptionStatus,
    /// Full name as entered
    pub full_name: String,
    /// First name, when collected separately
    pub first_name: Option<String>,
    /// Last name, when collected separately
    pub last_name: Option<String>,
    /// Contact email
    pub email_address: String,
    /// Reservation created from this subscription
    pub reservation_id: Option<String>,
    /// Preferred language
    pub user_language: String,
    /// Category the attendee asked for
    pub selected_category_id: Option<CategoryId>,
    /// Why the attendee joined
    pub subscription_type: SubscriptionType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_round_trip_through_persisted_form() {
        for status in [
            SubscriptionStatus::Waiting,
            SubscriptionStatus::Pending,
            SubscriptionStatus::Acquired,
            SubscriptionStatus::Expired,
            SubscriptionStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SubscriptionStatus>(), Ok(status));
        }
        assert!("waiting".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn serde_uses_persisted_names() {
        let json = serde_json::to_string(&SubscriptionType::SoldOut).unwrap();
        assert_eq!(json, "\"SOLD_OUT\"");
    }
}
