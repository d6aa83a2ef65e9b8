//! Authorization gate for special-code operations.

use crate::error::{AdminError, Result};
use crate::providers::{AuthorizationOracle, CategoryLoader};
use crate::types::{Caller, CategoryId, Event, TicketCategory};
use std::sync::Arc;

/// Verifies that a caller may act on a restricted category of an event.
///
/// Read-only. Every code operation calls [`OwnershipGuard::authorize`] first
/// and explicitly; nothing downstream re-checks ownership.
#[derive(Clone)]
pub struct OwnershipGuard {
    authorization: Arc<dyn AuthorizationOracle>,
    categories: Arc<dyn CategoryLoader>,
}

impl OwnershipGuard {
    /// Create a guard.
    #[must_use]
    pub fn new(
        authorization: Arc<dyn AuthorizationOracle>,
        categories: Arc<dyn CategoryLoader>,
    ) -> Self {
        Self {
            authorization,
            categories,
        }
    }

    /// Authorize `caller` on `category_id` of `event` and return the category.
    ///
    /// # Errors
    ///
    /// - [`AdminError::NotAuthorized`] if the caller does not own the event's organization
    /// - [`AdminError::CategoryNotFound`] if the event has no such category
    /// - [`AdminError::CategoryNotRestricted`] if the category is public
    pub async fn authorize(
        &self,
        category_id: CategoryId,
        event: &Event,
        caller: &Caller,
    ) -> Result<TicketCategory> {
        self.authorization
            .check_ownership(event, caller, event.organization_id)
            .await?;

        let category = self
            .categories
            .load_categories(event)
            .await?
            .into_iter()
            .find(|c| c.id == category_id)
            .ok_or(AdminError::CategoryNotFound {
                category_id: category_id.value(),
            })?;

        if !category.access_restricted {
            return Err(AdminError::CategoryNotRestricted {
                category_id: category_id.value(),
            });
        }

        Ok(category)
    }
}
