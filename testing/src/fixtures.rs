//! Fixture builders and a fully wired in-memory backend.

use crate::mocks::{test_clock, FixedClock};
use crate::notifier::RecordingNotifier;
use crate::stores::{
    InMemoryAuthorization, InMemoryCategoryLoader, InMemoryConfigurationStore,
    InMemoryEventRepository, InMemorySpecialCodeStore, InMemoryWaitingQueueRepository,
    StaticSeatAvailability,
};
use chrono::{DateTime, Duration, Utc};
use eventadmin_core::codes::{NotificationDispatcher, OwnershipGuard, SpecialCodeManager};
use eventadmin_core::environment::Clock;
use eventadmin_core::i18n::{BitmaskLocaleResolver, ContentLanguage};
use eventadmin_core::template::BuiltinTemplateRenderer;
use eventadmin_core::waiting_queue::{
    SubscriptionStatus, SubscriptionType, WaitingQueueManager, WaitingQueueStatusService,
    WaitingQueueSubscription,
};
use eventadmin_core::{
    Caller, CategoryId, Event, EventDirectory, EventId, Organization, OrganizationId,
    SubscriptionId, TicketCategory,
};
use std::sync::Arc;

/// Username owning [`organization`].
pub const OWNER: &str = "admin";

/// Username owning nothing.
pub const STRANGER: &str = "mallory";

/// Public base URL used by [`TestBackend`].
pub const BASE_URL: &str = "https://tickets.example.com";

/// Organizer of [`event`].
#[must_use]
pub fn organization() -> Organization {
    Organization {
        id: OrganizationId(1),
        name: "Rust Events".to_string(),
        email: "info@rust-events.example".to_string(),
    }
}

/// Event `rustconf`, English and Italian, in Europe/Zurich.
#[must_use]
pub fn event() -> Event {
    Event {
        id: EventId(10),
        short_name: "rustconf".to_string(),
        display_name: "RustConf 2026".to_string(),
        organization_id: OrganizationId(1),
        time_zone: chrono_tz::Europe::Zurich,
        locales: ContentLanguage::mask(&[ContentLanguage::English, ContentLanguage::Italian]),
    }
}

/// Category on sale from `inception` to `expiration`.
#[must_use]
pub fn category(
    id: i32,
    event: &Event,
    access_restricted: bool,
    inception: DateTime<Utc>,
    expiration: DateTime<Utc>,
) -> TicketCategory {
    TicketCategory {
        id: CategoryId(id),
        event_id: event.id,
        name: if access_restricted {
            format!("VIP {id}")
        } else {
            format!("Standard {id}")
        },
        access_restricted,
        max_tickets: 100,
        inception,
        expiration,
        bounded: true,
    }
}

/// Subscription of `event` created at `creation`.
#[must_use]
pub fn subscription(
    id: i32,
    event: &Event,
    status: SubscriptionStatus,
    creation: DateTime<Utc>,
) -> WaitingQueueSubscription {
    WaitingQueueSubscription {
        id: SubscriptionId(id),
        creation,
        event_id: event.id,
        status,
        full_name: format!("Attendee {id}"),
        first_name: Some("Attendee".to_string()),
        last_name: Some(id.to_string()),
        email_address: format!("attendee{id}@example.com"),
        reservation_id: None,
        user_language: "en".to_string(),
        selected_category_id: None,
        subscription_type: SubscriptionType::SoldOut,
    }
}

/// Every collaborator in memory, seeded with [`organization`], [`event`],
/// one restricted and one public category, and [`OWNER`] as owner.
#[derive(Clone)]
pub struct TestBackend {
    /// Seeded event
    pub event: Event,
    /// Restricted category (id 1), on sale since a day
    pub restricted: TicketCategory,
    /// Public category (id 2), on sale since a day
    pub public: TicketCategory,
    /// Special codes
    pub codes: InMemorySpecialCodeStore,
    /// Ownership
    pub authorization: InMemoryAuthorization,
    /// Events and organizations
    pub events: InMemoryEventRepository,
    /// Categories
    pub categories: InMemoryCategoryLoader,
    /// Configuration
    pub configuration: InMemoryConfigurationStore,
    /// Waiting queue
    pub queue: InMemoryWaitingQueueRepository,
    /// Seat availability
    pub seats: StaticSeatAvailability,
    /// Outgoing messages
    pub notifier: RecordingNotifier,
    /// Time
    pub clock: FixedClock,
}

impl TestBackend {
    /// Seeded backend with a notifier that never fails.
    #[must_use]
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::new())
    }

    /// Seeded backend using `notifier`.
    #[must_use]
    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        let clock = test_clock();
        let now = clock.now();
        let event = event();
        let restricted = category(1, &event, true, now - Duration::days(1), now + Duration::days(30));
        let public = category(2, &event, false, now - Duration::days(1), now + Duration::days(30));

        let events = InMemoryEventRepository::new();
        events.insert_organization(organization());
        events.insert_event(event.clone());

        let authorization = InMemoryAuthorization::new();
        authorization.grant(event.organization_id, OWNER);

        let categories = InMemoryCategoryLoader::new();
        categories.insert(restricted.clone());
        categories.insert(public.clone());

        Self {
            event,
            restricted,
            public,
            codes: InMemorySpecialCodeStore::new(),
            authorization,
            events,
            categories,
            configuration: InMemoryConfigurationStore::new(),
            queue: InMemoryWaitingQueueRepository::new(),
            seats: StaticSeatAvailability::new(),
            notifier,
            clock,
        }
    }

    /// [`OWNER`] as a caller.
    #[must_use]
    pub fn owner() -> Caller {
        Caller::new(OWNER)
    }

    /// [`STRANGER`] as a caller.
    #[must_use]
    pub fn stranger() -> Caller {
        Caller::new(STRANGER)
    }

    /// Event lookups over this backend.
    #[must_use]
    pub fn event_directory(&self) -> EventDirectory {
        EventDirectory::new(
            Arc::new(self.events.clone()),
            Arc::new(self.authorization.clone()),
            BASE_URL,
        )
    }

    /// Ownership guard over this backend.
    #[must_use]
    pub fn guard(&self) -> OwnershipGuard {
        OwnershipGuard::new(
            Arc::new(self.authorization.clone()),
            Arc::new(self.categories.clone()),
        )
    }

    /// Dispatcher using the built-in renderer.
    #[must_use]
    pub fn dispatcher(&self) -> NotificationDispatcher {
        NotificationDispatcher::new(
            Arc::new(self.codes.clone()),
            Arc::new(self.notifier.clone()),
            Arc::new(BuiltinTemplateRenderer),
            Arc::new(BitmaskLocaleResolver),
            Arc::new(self.clock.clone()),
        )
    }

    /// Special-code manager over this backend.
    #[must_use]
    pub fn code_manager(&self) -> SpecialCodeManager {
        SpecialCodeManager::new(
            self.event_directory(),
            self.guard(),
            self.dispatcher(),
            Arc::new(self.codes.clone()),
        )
    }

    /// Waiting-queue status service over this backend.
    #[must_use]
    pub fn status_service(&self) -> WaitingQueueStatusService {
        WaitingQueueStatusService::new(
            Arc::new(self.categories.clone()),
            Arc::new(self.seats.clone()),
            Arc::new(self.configuration.clone()),
            Arc::new(self.clock.clone()),
        )
    }

    /// Waiting-queue manager over this backend.
    #[must_use]
    pub fn queue_manager(&self) -> WaitingQueueManager {
        WaitingQueueManager::new(
            Arc::new(self.queue.clone()),
            Arc::new(self.categories.clone()),
        )
    }
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}
