//! Open/paused state of an event's waiting queue.

use super::eligibility::{sales_phase, SalesPhase};
use crate::configuration::{ConfigurationKey, ConfigurationScope};
use crate::environment::Clock;
use crate::error::Result;
use crate::providers::{CategoryLoader, ConfigurationStore, SeatAvailability};
use crate::types::{Caller, Event};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Waiting-queue state reported to administrators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WaitingQueueStatus {
    /// The event currently accepts subscriptions
    pub active: bool,
    /// Subscriptions are accepted but paused by an administrator
    pub paused: bool,
}

/// Computes and toggles [`WaitingQueueStatus`].
#[derive(Clone)]
pub struct WaitingQueueStatusService {
    categories: Arc<dyn CategoryLoader>,
    seats: Arc<dyn SeatAvailability>,
    configuration: Arc<dyn ConfigurationStore>,
    clock: Arc<dyn Clock>,
}

impl WaitingQueueStatusService {
    /// Create a status service.
    #[must_use]
    pub fn new(
        categories: Arc<dyn CategoryLoader>,
        seats: Arc<dyn SeatAvailability>,
        configuration: Arc<dyn ConfigurationStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            categories,
            seats,
            configuration,
            clock,
        }
    }

    /// Current status of `event`.
    ///
    /// # Errors
    ///
    /// Collaborator failures.
    pub async fn get_status(&self, event: &Event) -> Result<WaitingQueueStatus> {
        let active = self.is_active(event).await?;
        let paused = active
            && self
                .flag(event, ConfigurationKey::StopWaitingQueueSubscriptions)
                .await?;
        Ok(WaitingQueueStatus { active, paused })
    }

    /// Persist the pause flag for `event` and return the recomputed status.
    ///
    /// # Errors
    ///
    /// Collaborator failures.
    #[tracing::instrument(skip(self, event, caller), fields(event = %event.short_name, caller = %caller))]
    pub async fn set_status(
        &self,
        event: &Event,
        paused: bool,
        caller: &Caller,
    ) -> Result<WaitingQueueStatus> {
        self.configuration
            .save_event_value(
                ConfigurationScope::event(event),
                ConfigurationKey::StopWaitingQueueSubscriptions,
                if paused { "true" } else { "false" },
                caller,
            )
            .await?;
        tracing::info!(paused, "Waiting queue subscriptions toggled");
        self.get_status(event).await
    }

    /// Eligibility over the public categories of `event`.
    async fn is_active(&self, event: &Event) -> Result<bool> {
        let public: Vec<_> = self
            .categories
            .load_categories(event)
            .await?
            .into_iter()
            .filter(|c| !c.access_restricted)
            .collect();

        let now = self.clock.now().with_timezone(&event.time_zone);
        let active = match sales_phase(now.to_utc(), &public) {
            SalesPhase::NoCategories => false,
            SalesPhase::PreSales => {
                self.flag(event, ConfigurationKey::EnablePreRegistration)
                    .await?
            }
            SalesPhase::OnSale { last_expiration } => {
                self.flag(event, ConfigurationKey::EnableWaitingQueue).await?
                    && now < last_expiration
                    && self.seats.no_seats_available(event).await?
            }
        };

        tracing::debug!(
            event = %event.short_name,
            categories = public.len(),
            active,
            "Computed waiting queue eligibility"
        );
        Ok(active)
    }

    async fn flag(&self, event: &Event, key: ConfigurationKey) -> Result<bool> {
        Ok(self
            .configuration
            .get_bool(ConfigurationScope::event(event), key)
            .await?
            .unwrap_or(false))
    }
}
