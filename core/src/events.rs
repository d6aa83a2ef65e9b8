//! Resolving events by name on behalf of a caller.

use crate::error::{AdminError, Result};
use crate::providers::{AuthorizationOracle, EventRepository};
use crate::types::{Caller, Event, Organization};
use std::sync::Arc;

/// Event lookups scoped to the caller's organizations.
///
/// Two flavours exist because the HTTP surface mixes conventions: code
/// operations reject unknown events, waiting-queue endpoints answer with an
/// empty result instead.
#[derive(Clone)]
pub struct EventDirectory {
    events: Arc<dyn EventRepository>,
    authorization: Arc<dyn AuthorizationOracle>,
    public_base_url: String,
}

impl EventDirectory {
    /// Create a directory. `public_base_url` is used to build event pages.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventRepository>,
        authorization: Arc<dyn AuthorizationOracle>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            events,
            authorization,
            public_base_url: public_base_url.into(),
        }
    }

    /// Event owned by `caller`.
    ///
    /// # Errors
    ///
    /// [`AdminError::EventNotFound`] if no event has that name,
    /// [`AdminError::NotAuthorized`] if the caller does not own it.
    pub async fn require_event(&self, short_name: &str, caller: &Caller) -> Result<Event> {
        let event = self
            .events
            .find_by_short_name(short_name)
            .await?
            .ok_or_else(|| AdminError::EventNotFound {
                name: short_name.to_string(),
            })?;
        self.authorization
            .check_ownership(&event, caller, event.organization_id)
            .await?;
        Ok(event)
    }

    /// Event owned by `caller`, or `None` when it is missing or not owned.
    ///
    /// # Errors
    ///
    /// Only collaborator failures (e.g. the database) are returned.
    pub async fn find_event(&self, short_name: &str, caller: &Caller) -> Result<Option<Event>> {
        match self.require_event(short_name, caller).await {
            Ok(event) => Ok(Some(event)),
            Err(AdminError::EventNotFound { .. } | AdminError::NotAuthorized { .. }) => {
                tracing::debug!(event = %short_name, caller = %caller, "Event not visible to caller");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Organization owning `event`.
    ///
    /// # Errors
    ///
    /// [`AdminError::Database`] if the organization row is missing.
    pub async fn load_organizer(&self, event: &Event) -> Result<Organization> {
        self.events
            .find_organization(event.organization_id)
            .await?
            .ok_or_else(|| {
                AdminError::Database(format!(
                    "organization {} of event {} not found",
                    event.organization_id, event.short_name
                ))
            })
    }

    /// Public page of the event.
    #[must_use]
    pub fn event_url(&self, event: &Event) -> String {
        format!(
            "{}/event/{}",
            self.public_base_url.trim_end_matches('/'),
            event.short_name
        )
    }
}
