//! Entry points used by the administrative API.

use super::assigner::CodeAssigner;
use super::dispatcher::NotificationDispatcher;
use super::guard::OwnershipGuard;
use super::model::{AssigneeRequest, CodeAssignment, SpecialCode};
use crate::error::{AdminError, Result};
use crate::events::EventDirectory;
use crate::metrics::SPECIAL_CODES_CLEARED_TOTAL;
use crate::providers::SpecialCodeStore;
use crate::types::{Caller, CategoryId, SpecialCodeId};
use std::sync::Arc;

/// Special-code operations addressed by event name.
///
/// Every operation resolves the event strictly (unknown or foreign events are
/// errors) and runs the [`OwnershipGuard`] before touching codes.
#[derive(Clone)]
pub struct SpecialCodeManager {
    events: EventDirectory,
    guard: OwnershipGuard,
    assigner: CodeAssigner,
    dispatcher: NotificationDispatcher,
    store: Arc<dyn SpecialCodeStore>,
}

impl SpecialCodeManager {
    /// Create a manager.
    #[must_use]
    pub fn new(
        events: EventDirectory,
        guard: OwnershipGuard,
        dispatcher: NotificationDispatcher,
        store: Arc<dyn SpecialCodeStore>,
    ) -> Self {
        let assigner = CodeAssigner::new(guard.clone(), Arc::clone(&store));
        Self {
            events,
            guard,
            assigner,
            dispatcher,
            store,
        }
    }

    /// Resolve a code for every request without sending anything.
    ///
    /// # Errors
    ///
    /// Event resolution, authorization and batch validation errors.
    pub async fn link_assignee_to_code(
        &self,
        requests: Vec<AssigneeRequest>,
        event_name: &str,
        category_id: CategoryId,
        caller: &Caller,
    ) -> Result<Vec<AssigneeRequest>> {
        let event = self.events.require_event(event_name, caller).await?;
        self.assigner
            .reconcile(requests, category_id, &event, caller)
            .await
    }

    /// Send every pinned code to its assignee and mark it as sent.
    ///
    /// Requests must already carry a code (see
    /// [`SpecialCodeManager::link_assignee_to_code`]).
    ///
    /// # Errors
    ///
    /// - validation errors, before anything is sent
    /// - [`AdminError::MissingCode`] if a request has no code
    /// - dispatch errors (see [`NotificationDispatcher::dispatch`])
    #[tracing::instrument(skip(self, requests, caller), fields(caller = %caller, requests = requests.len()))]
    pub async fn send_code_to_assignee(
        &self,
        requests: Vec<AssigneeRequest>,
        event_name: &str,
        category_id: CategoryId,
        caller: &Caller,
    ) -> Result<bool> {
        let event = self.events.require_event(event_name, caller).await?;
        let organization = self.events.load_organizer(&event).await?;

        let batch = self
            .assigner
            .check(requests, category_id, &event, caller)
            .await?;

        let assignments = batch
            .requests
            .into_iter()
            .map(CodeAssignment::try_from)
            .collect::<Result<Vec<_>>>()?;

        let event_page = self.events.event_url(&event);
        self.dispatcher
            .dispatch(&assignments, &event, &organization, &event_page)
            .await
    }

    /// Codes of the category that have been sent.
    ///
    /// # Errors
    ///
    /// Event resolution and authorization errors.
    pub async fn load_sent_codes(
        &self,
        event_name: &str,
        category_id: CategoryId,
        caller: &Caller,
    ) -> Result<Vec<SpecialCode>> {
        let event = self.events.require_event(event_name, caller).await?;
        let category = self.guard.authorize(category_id, &event, caller).await?;
        self.store.find_sent_codes(category.id).await
    }

    /// Reset a sent code to unsent. Returns `false` when nothing changed.
    ///
    /// # Errors
    ///
    /// - event resolution and authorization errors
    /// - [`AdminError::IntegrityViolation`] if more than one row was reset
    #[tracing::instrument(skip(self, caller), fields(caller = %caller))]
    pub async fn clear_recipient_data(
        &self,
        event_name: &str,
        category_id: CategoryId,
        code_id: SpecialCodeId,
        caller: &Caller,
    ) -> Result<bool> {
        let event = self.events.require_event(event_name, caller).await?;
        let category = self.guard.authorize(category_id, &event, caller).await?;

        let affected = self.store.clear_recipient(code_id, category.id).await?;
        if affected > 1 {
            tracing::error!(code_id = %code_id, affected, "Clearing recipient touched several codes");
            return Err(AdminError::IntegrityViolation { affected });
        }

        let cleared = affected == 1;
        if cleared {
            metrics::counter!(SPECIAL_CODES_CLEARED_TOTAL).increment(1);
            tracing::info!(code_id = %code_id, "Recipient data cleared");
        }
        Ok(cleared)
    }
}
