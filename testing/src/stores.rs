//! In-memory collaborators.
//!
//! Each store keeps its state behind `Arc<RwLock<..>>`, so clones handed to
//! services share data with the copy the test keeps for assertions.

#![allow(clippy::unwrap_used)] // Lock poisoning only happens after a test panicked
#![allow(clippy::missing_panics_doc)]

use async_trait::async_trait;
use eventadmin_core::codes::{Recipient, SpecialCode};
use eventadmin_core::configuration::{parse_bool, ConfigurationKey, ConfigurationScope};
use eventadmin_core::providers::{
    AuthorizationOracle, CategoryLoader, ConfigurationStore, EventRepository, SeatAvailability,
    SentRecord, SpecialCodeStore, WaitingQueueRepository,
};
use eventadmin_core::waiting_queue::{SubscriptionStatus, WaitingQueueSubscription};
use eventadmin_core::{
    AdminError, Caller, CategoryId, Event, EventId, Organization, OrganizationId, Result,
    SpecialCodeId, SubscriptionId, TicketCategory,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

// ============================================================================
// Special codes
// ============================================================================

/// Special codes kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct InMemorySpecialCodeStore {
    codes: Arc<RwLock<Vec<SpecialCode>>>,
    mark_sent_rows: Arc<RwLock<Option<u64>>>,
    clear_rows: Arc<RwLock<Option<u64>>>,
}

impl InMemorySpecialCodeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add unsent codes to `category_id`, assigning sequential ids.
    pub fn add_codes(&self, category_id: CategoryId, codes: &[&str]) -> Vec<SpecialCodeId> {
        let mut stored = self.codes.write().unwrap();
        codes
            .iter()
            .map(|code| {
                let id = SpecialCodeId(i32::try_from(stored.len()).unwrap_or(i32::MAX) + 1);
                stored.push(SpecialCode {
                    id,
                    category_id,
                    code: (*code).to_string(),
                    recipient: None,
                });
                id
            })
            .collect()
    }

    /// Snapshot of every code.
    #[must_use]
    pub fn codes(&self) -> Vec<SpecialCode> {
        self.codes.read().unwrap().clone()
    }

    /// Code by its text.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<SpecialCode> {
        self.codes
            .read()
            .unwrap()
            .iter()
            .find(|c| c.code == code)
            .cloned()
    }

    /// Report `rows` from every `mark_sent` call without touching state.
    pub fn force_mark_sent_rows(&self, rows: u64) {
        *self.mark_sent_rows.write().unwrap() = Some(rows);
    }

    /// Report `rows` from every `clear_recipient` call without touching state.
    pub fn force_clear_rows(&self, rows: u64) {
        *self.clear_rows.write().unwrap() = Some(rows);
    }

    fn by_category(&self, category_id: CategoryId, sent: bool) -> Vec<SpecialCode> {
        self.codes
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.category_id == category_id && c.recipient.is_some() == sent)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SpecialCodeStore for InMemorySpecialCodeStore {
    async fn find_unsent_codes(&self, category_id: CategoryId) -> Result<Vec<SpecialCode>> {
        Ok(self.by_category(category_id, false))
    }

    async fn find_sent_codes(&self, category_id: CategoryId) -> Result<Vec<SpecialCode>> {
        Ok(self.by_category(category_id, true))
    }

    async fn mark_sent(&self, record: &SentRecord<'_>) -> Result<u64> {
        if let Some(rows) = *self.mark_sent_rows.read().unwrap() {
            return Ok(rows);
        }
        let mut affected = 0;
        for code in self.codes.write().unwrap().iter_mut() {
            if code.code == record.code && code.recipient.is_none() {
                code.recipient = Some(Recipient {
                    name: record.assignee.to_string(),
                    email: record.email.to_string(),
                    language: Some(record.language.to_string()),
                    sent_at: record.sent_at,
                });
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn clear_recipient(
        &self,
        code_id: SpecialCodeId,
        category_id: CategoryId,
    ) -> Result<u64> {
        if let Some(rows) = *self.clear_rows.read().unwrap() {
            return Ok(rows);
        }
        let mut affected = 0;
        for code in self.codes.write().unwrap().iter_mut() {
            if code.id == code_id && code.category_id == category_id && code.recipient.is_some() {
                code.recipient = None;
                affected += 1;
            }
        }
        Ok(affected)
    }
}

// ============================================================================
// Ownership
// ============================================================================

/// Organization owners by username.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAuthorization {
    owners: Arc<RwLock<HashMap<OrganizationId, HashSet<String>>>>,
}

impl InMemoryAuthorization {
    /// Create an oracle that denies everyone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `username` an owner of `organization_id`.
    pub fn grant(&self, organization_id: OrganizationId, username: &str) {
        self.owners
            .write()
            .unwrap()
            .entry(organization_id)
            .or_default()
            .insert(username.to_string());
    }
}

#[async_trait]
impl AuthorizationOracle for InMemoryAuthorization {
    async fn check_ownership(
        &self,
        _event: &Event,
        caller: &Caller,
        organization_id: OrganizationId,
    ) -> Result<()> {
        let owners = self.owners.read().unwrap();
        if owners
            .get(&organization_id)
            .is_some_and(|users| users.contains(caller.username()))
        {
            Ok(())
        } else {
            Err(AdminError::NotAuthorized {
                caller: caller.to_string(),
            })
        }
    }
}

// ============================================================================
// Events and categories
// ============================================================================

/// Events by short name and organizations by id.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<String, Event>>>,
    organizations: Arc<RwLock<HashMap<OrganizationId, Organization>>>,
}

impl InMemoryEventRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace an event.
    pub fn insert_event(&self, event: Event) {
        self.events
            .write()
            .unwrap()
            .insert(event.short_name.clone(), event);
    }

    /// Store or replace an organization.
    pub fn insert_organization(&self, organization: Organization) {
        self.organizations
            .write()
            .unwrap()
            .insert(organization.id, organization);
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_by_short_name(&self, short_name: &str) -> Result<Option<Event>> {
        Ok(self.events.read().unwrap().get(short_name).cloned())
    }

    async fn find_organization(&self, id: OrganizationId) -> Result<Option<Organization>> {
        Ok(self.organizations.read().unwrap().get(&id).cloned())
    }
}

/// Ticket categories by event.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCategoryLoader {
    categories: Arc<RwLock<HashMap<EventId, Vec<TicketCategory>>>>,
}

impl InMemoryCategoryLoader {
    /// Create a loader without categories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every category of `event_id`.
    pub fn set_categories(&self, event_id: EventId, categories: Vec<TicketCategory>) {
        self.categories.write().unwrap().insert(event_id, categories);
    }

    /// Append a category to its event.
    pub fn insert(&self, category: TicketCategory) {
        self.categories
            .write()
            .unwrap()
            .entry(category.event_id)
            .or_default()
            .push(category);
    }
}

#[async_trait]
impl CategoryLoader for InMemoryCategoryLoader {
    async fn load_categories(&self, event: &Event) -> Result<Vec<TicketCategory>> {
        Ok(self
            .categories
            .read()
            .unwrap()
            .get(&event.id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Level {
    System,
    Organization(OrganizationId),
    Event(OrganizationId, EventId),
}

/// Layered configuration with event > organization > system precedence.
#[derive(Clone, Debug, Default)]
pub struct InMemoryConfigurationStore {
    values: Arc<RwLock<HashMap<(Level, ConfigurationKey), String>>>,
    saved_by: Arc<RwLock<Vec<String>>>,
}

impl InMemoryConfigurationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a system-wide value.
    pub fn set_system(&self, key: ConfigurationKey, value: &str) {
        self.put(Level::System, key, value);
    }

    /// Set an organization-level value.
    pub fn set_organization(&self, organization_id: OrganizationId, key: ConfigurationKey, value: &str) {
        self.put(Level::Organization(organization_id), key, value);
    }

    /// Set an event-level value.
    pub fn set_event(&self, event: &Event, key: ConfigurationKey, value: &str) {
        self.put(Level::Event(event.organization_id, event.id), key, value);
    }

    /// Raw event-level value.
    #[must_use]
    pub fn event_value(&self, event: &Event, key: ConfigurationKey) -> Option<String> {
        self.values
            .read()
            .unwrap()
            .get(&(Level::Event(event.organization_id, event.id), key))
            .cloned()
    }

    /// Usernames that saved event values, in order.
    #[must_use]
    pub fn saved_by(&self) -> Vec<String> {
        self.saved_by.read().unwrap().clone()
    }

    fn put(&self, level: Level, key: ConfigurationKey, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert((level, key), value.to_string());
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn get_bool(
        &self,
        scope: ConfigurationScope,
        key: ConfigurationKey,
    ) -> Result<Option<bool>> {
        let values = self.values.read().unwrap();
        let levels = [
            Level::Event(scope.organization_id, scope.event_id),
            Level::Organization(scope.organization_id),
            Level::System,
        ];
        Ok(levels
            .iter()
            .find_map(|level| values.get(&(*level, key)))
            .map(|v| parse_bool(v)))
    }

    async fn save_event_value(
        &self,
        scope: ConfigurationScope,
        key: ConfigurationKey,
        value: &str,
        caller: &Caller,
    ) -> Result<()> {
        self.put(Level::Event(scope.organization_id, scope.event_id), key, value);
        self.saved_by
            .write()
            .unwrap()
            .push(caller.username().to_string());
        Ok(())
    }
}

// ============================================================================
// Waiting queue
// ============================================================================

/// Waiting-queue subscriptions.
#[derive(Clone, Debug, Default)]
pub struct InMemoryWaitingQueueRepository {
    subscriptions: Arc<RwLock<Vec<WaitingQueueSubscription>>>,
}

impl InMemoryWaitingQueueRepository {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscription.
    pub fn insert(&self, subscription: WaitingQueueSubscription) {
        self.subscriptions.write().unwrap().push(subscription);
    }
}

#[async_trait]
impl WaitingQueueRepository for InMemoryWaitingQueueRepository {
    async fn count_waiting(&self, event_id: EventId) -> Result<u64> {
        let count = self
            .subscriptions
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.event_id == event_id && s.status == SubscriptionStatus::Waiting)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn load_all(&self, event_id: EventId) -> Result<Vec<WaitingQueueSubscription>> {
        let mut subscriptions: Vec<_> = self
            .subscriptions
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.event_id == event_id)
            .cloned()
            .collect();
        subscriptions.sort_by_key(|s| (s.creation, s.id));
        Ok(subscriptions)
    }

    async fn find(
        &self,
        event_id: EventId,
        id: SubscriptionId,
    ) -> Result<Option<WaitingQueueSubscription>> {
        Ok(self
            .subscriptions
            .read()
            .unwrap()
            .iter()
            .find(|s| s.event_id == event_id && s.id == id)
            .cloned())
    }

    async fn update_status(
        &self,
        event_id: EventId,
        id: SubscriptionId,
        new: SubscriptionStatus,
        expected: SubscriptionStatus,
    ) -> Result<u64> {
        let mut affected = 0;
        for s in self.subscriptions.write().unwrap().iter_mut() {
            if s.event_id == event_id && s.id == id && s.status == expected {
                s.status = new;
                affected += 1;
            }
        }
        Ok(affected)
    }
}

/// Seat availability set by the test.
#[derive(Clone, Debug, Default)]
pub struct StaticSeatAvailability {
    sold_out: Arc<AtomicBool>,
}

impl StaticSeatAvailability {
    /// Seats are still available.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the global "no seats available" signal.
    pub fn set_sold_out(&self, sold_out: bool) {
        self.sold_out.store(sold_out, Ordering::SeqCst);
    }
}

#[async_trait]
impl SeatAvailability for StaticSeatAvailability {
    async fn no_seats_available(&self, _event: &Event) -> Result<bool> {
        Ok(self.sold_out.load(Ordering::SeqCst))
    }
}
