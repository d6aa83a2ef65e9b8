//! Subscriber administration.

use super::export::{export_subscriptions, ExportField, ExportFile, ExportFormat};
use super::subscription::{SubscriptionStatus, WaitingQueueSubscription};
use crate::error::{AdminError, Result};
use crate::metrics::{WAITING_QUEUE_EXPORTS_TOTAL, WAITING_QUEUE_STATUS_CHANGES_TOTAL};
use crate::providers::{CategoryLoader, WaitingQueueRepository};
use crate::types::{Event, EventId, SubscriptionId};
use std::collections::HashMap;
use std::sync::Arc;

/// Counts, lists, moves and exports waiting-queue subscriptions.
#[derive(Clone)]
pub struct WaitingQueueManager {
    repository: Arc<dyn WaitingQueueRepository>,
    categories: Arc<dyn CategoryLoader>,
}

impl WaitingQueueManager {
    /// Create a manager.
    #[must_use]
    pub fn new(
        repository: Arc<dyn WaitingQueueRepository>,
        categories: Arc<dyn CategoryLoader>,
    ) -> Self {
        Self {
            repository,
            categories,
        }
    }

    /// Subscribers still waiting.
    ///
    /// # Errors
    ///
    /// Repository failures.
    pub async fn count_subscribers(&self, event_id: EventId) -> Result<u64> {
        self.repository.count_waiting(event_id).await
    }

    /// Every subscription of the event, oldest first.
    ///
    /// # Errors
    ///
    /// Repository failures.
    pub async fn load_all_subscriptions(
        &self,
        event_id: EventId,
    ) -> Result<Vec<WaitingQueueSubscription>> {
        self.repository.load_all(event_id).await
    }

    /// Move a subscription from `expected` to `new`.
    ///
    /// Returns the updated subscription, or `None` when it does not exist or
    /// is not in `expected` status.
    ///
    /// # Errors
    ///
    /// Repository failures, or [`AdminError::IntegrityViolation`] if several
    /// rows were updated.
    #[tracing::instrument(skip(self))]
    pub async fn update_subscription_status(
        &self,
        event_id: EventId,
        id: SubscriptionId,
        new: SubscriptionStatus,
        expected: SubscriptionStatus,
    ) -> Result<Option<WaitingQueueSubscription>> {
        match self
            .repository
            .update_status(event_id, id, new, expected)
            .await?
        {
            0 => {
                tracing::debug!("Subscription not in expected status");
                Ok(None)
            }
            1 => {
                metrics::counter!(WAITING_QUEUE_STATUS_CHANGES_TOTAL).increment(1);
                tracing::info!(from = %expected, to = %new, "Subscription status changed");
                self.repository.find(event_id, id).await
            }
            affected => {
                tracing::error!(affected, "Subscription update touched several rows");
                Err(AdminError::IntegrityViolation { affected })
            }
        }
    }

    /// Cancel a waiting subscription.
    ///
    /// # Errors
    ///
    /// See [`WaitingQueueManager::update_subscription_status`].
    pub async fn remove_subscriber(
        &self,
        event_id: EventId,
        id: SubscriptionId,
    ) -> Result<Option<WaitingQueueSubscription>> {
        self.update_subscription_status(
            event_id,
            id,
            SubscriptionStatus::Cancelled,
            SubscriptionStatus::Waiting,
        )
        .await
    }

    /// Put a cancelled subscription back in the queue.
    ///
    /// # Errors
    ///
    /// See [`WaitingQueueManager::update_subscription_status`].
    pub async fn restore_subscriber(
        &self,
        event_id: EventId,
        id: SubscriptionId,
    ) -> Result<Option<WaitingQueueSubscription>> {
        self.update_subscription_status(
            event_id,
            id,
            SubscriptionStatus::Waiting,
            SubscriptionStatus::Cancelled,
        )
        .await
    }

    /// Export every subscription of `event` with the requested columns.
    ///
    /// # Errors
    ///
    /// Collaborator failures or [`AdminError::Export`].
    #[tracing::instrument(skip(self, event, fields), fields(event = %event.short_name))]
    pub async fn export(
        &self,
        event: &Event,
        format: ExportFormat,
        fields: &[ExportField],
    ) -> Result<ExportFile> {
        let subscriptions = self.repository.load_all(event.id).await?;
        let category_names: HashMap<_, _> = self
            .categories
            .load_categories(event)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let file = export_subscriptions(format, fields, &subscriptions, event, &category_names)?;

        metrics::counter!(WAITING_QUEUE_EXPORTS_TOTAL, "format" => format.as_str()).increment(1);
        tracing::info!(rows = subscriptions.len(), bytes = file.content.len(), "Waiting queue exported");
        Ok(file)
    }
}
