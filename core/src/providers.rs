//! Collaborator contracts.
//!
//! The core never talks to a database, a mail server or a template engine
//! directly. Each collaborator is a trait object so the web layer can hold
//! `Arc<dyn Trait>` handles and tests can substitute in-memory versions.
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────────────┐
//! │ codes / waiting_queue│ ───▶ │ SpecialCodeStore             │ postgres
//! │ services             │      │ EventRepository              │ postgres
//! │                      │      │ AuthorizationOracle          │ postgres
//! │                      │      │ CategoryLoader               │ postgres
//! │                      │      │ ConfigurationStore           │ postgres
//! │                      │      │ WaitingQueueRepository       │ postgres
//! │                      │      │ SeatAvailability             │ postgres
//! │                      │      │ Notifier                     │ smtp / console
//! │                      │      │ TemplateRenderer             │ built-in
//! └──────────────────────┘      └──────────────────────────────┘
//! ```
//!
//! Mutating store operations report affected rows instead of succeeding
//! silently; the services turn unexpected counts into integrity errors.

use crate::codes::model::SpecialCode;
use crate::configuration::{ConfigurationKey, ConfigurationScope};
use crate::error::Result;
use crate::i18n::Locale;
use crate::template::{TemplateModel, TemplateResource};
use crate::types::{
    Caller, CategoryId, Event, EventId, Organization, OrganizationId, SpecialCodeId,
    SubscriptionId, TicketCategory,
};
use crate::waiting_queue::subscription::{SubscriptionStatus, WaitingQueueSubscription};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Lazily produces a notification body. Only invoked when the message is sent.
pub type BodyProducer = Box<dyn FnOnce() -> Result<String> + Send>;

/// Recipient data written when a code is consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentRecord<'a> {
    /// Code being consumed (trimmed)
    pub code: &'a str,
    /// Assignee name (trimmed)
    pub assignee: &'a str,
    /// Assignee email (trimmed)
    pub email: &'a str,
    /// Language the notification was sent in
    pub language: &'a str,
    /// Send time in the event's time zone
    pub sent_at: DateTime<FixedOffset>,
}

/// Persistence of special codes.
#[async_trait]
pub trait SpecialCodeStore: Send + Sync {
    /// Unsent codes of a category, in stable source order.
    async fn find_unsent_codes(&self, category_id: CategoryId) -> Result<Vec<SpecialCode>>;

    /// Codes of a category that have been sent.
    async fn find_sent_codes(&self, category_id: CategoryId) -> Result<Vec<SpecialCode>>;

    /// Consume a code. Must be a conditional update that only matches unsent
    /// codes; returns the number of rows changed.
    async fn mark_sent(&self, record: &SentRecord<'_>) -> Result<u64>;

    /// Reset recipient data and sent-state of one code; returns rows changed.
    async fn clear_recipient(
        &self,
        code_id: SpecialCodeId,
        category_id: CategoryId,
    ) -> Result<u64>;
}

/// Decides whether a caller may administer an organization's events.
#[async_trait]
pub trait AuthorizationOracle: Send + Sync {
    /// Fails with [`crate::AdminError::NotAuthorized`] if `caller` does not
    /// own `organization_id`.
    async fn check_ownership(
        &self,
        event: &Event,
        caller: &Caller,
        organization_id: OrganizationId,
    ) -> Result<()>;
}

/// Loads the ticket categories of an event.
#[async_trait]
pub trait CategoryLoader: Send + Sync {
    /// All categories of the event, restricted ones included.
    async fn load_categories(&self, event: &Event) -> Result<Vec<TicketCategory>>;
}

/// Event and organization lookups.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Event by its short name.
    async fn find_by_short_name(&self, short_name: &str) -> Result<Option<Event>>;

    /// Organization by id.
    async fn find_organization(&self, id: OrganizationId) -> Result<Option<Organization>>;
}

/// Outbound message transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a simple message on behalf of `event`.
    ///
    /// `from_override` replaces the configured sender address when present.
    async fn send(
        &self,
        event: &Event,
        from_override: Option<&str>,
        to: &str,
        subject: &str,
        body: BodyProducer,
    ) -> Result<()>;
}

/// Renders notification templates.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` for `event` in `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdminError::Template`] if the template cannot be rendered.
    fn render(
        &self,
        event: &Event,
        template: TemplateResource,
        model: &TemplateModel,
        locale: &Locale,
    ) -> Result<String>;
}

/// Layered administrative configuration.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Boolean value of `key` for `scope`, or `None` if unset at every level.
    async fn get_bool(&self, scope: ConfigurationScope, key: ConfigurationKey)
    -> Result<Option<bool>>;

    /// Persist an event-level value.
    async fn save_event_value(
        &self,
        scope: ConfigurationScope,
        key: ConfigurationKey,
        value: &str,
        caller: &Caller,
    ) -> Result<()>;
}

/// Persistence of waiting-queue subscriptions.
#[async_trait]
pub trait WaitingQueueRepository: Send + Sync {
    /// Number of subscribers still waiting.
    async fn count_waiting(&self, event_id: EventId) -> Result<u64>;

    /// Every subscription of the event, oldest first.
    async fn load_all(&self, event_id: EventId) -> Result<Vec<WaitingQueueSubscription>>;

    /// Single subscription of the event.
    async fn find(
        &self,
        event_id: EventId,
        id: SubscriptionId,
    ) -> Result<Option<WaitingQueueSubscription>>;

    /// Move a subscription from `expected` to `new`; returns rows changed.
    async fn update_status(
        &self,
        event_id: EventId,
        id: SubscriptionId,
        new: SubscriptionStatus,
        expected: SubscriptionStatus,
    ) -> Result<u64>;
}

/// Ticket availability signals used by waiting-queue eligibility.
#[async_trait]
pub trait SeatAvailability: Send + Sync {
    /// `true` when no seat of the event can be bought.
    async fn no_seats_available(&self, event: &Event) -> Result<bool>;
}
