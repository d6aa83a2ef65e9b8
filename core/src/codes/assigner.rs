//! Matching assignee requests to available codes.
//!
//! Planning is pure: [`plan_assignment`] takes the de-duplicated batch and the
//! unsent pool and either rejects the batch or returns every request with a
//! code. [`CodeAssigner`] wraps it with the ownership check and the pool
//! lookup. Nothing here mutates persisted state.

use super::guard::OwnershipGuard;
use super::model::{dedupe, AssigneeRequest};
use crate::error::{AdminError, Result};
use crate::providers::SpecialCodeStore;
use crate::types::{Caller, CategoryId, Event, TicketCategory};
use std::collections::HashSet;
use std::sync::Arc;

/// A batch that passed every assignment check.
#[derive(Clone, Debug)]
pub struct CheckedBatch {
    /// Authorized restricted category
    pub category: TicketCategory,
    /// De-duplicated requests in first-occurrence order
    pub requests: Vec<AssigneeRequest>,
    /// Unsent codes in pool order
    pub available: Vec<String>,
}

/// Validate a de-duplicated batch against the unsent pool.
///
/// # Errors
///
/// - [`AdminError::InsufficientCodes`] if there are more requests than unsent codes
/// - [`AdminError::DuplicateCodeRequest`] if two requests pin the same code
/// - [`AdminError::UnknownOrConsumedCode`] if a pinned code is not in the pool
pub fn validate_batch(requests: &[AssigneeRequest], available: &[String]) -> Result<()> {
    if requests.len() > available.len() {
        return Err(AdminError::InsufficientCodes {
            requested: requests.len(),
            available: available.len(),
        });
    }

    let pinned: Vec<&str> = requests.iter().filter_map(AssigneeRequest::pinned_code).collect();
    let distinct: HashSet<&str> = pinned.iter().copied().collect();
    if distinct.len() != pinned.len() {
        return Err(AdminError::DuplicateCodeRequest);
    }

    let pool: HashSet<&str> = available.iter().map(String::as_str).collect();
    if !distinct.is_subset(&pool) {
        return Err(AdminError::UnknownOrConsumedCode);
    }

    Ok(())
}

/// Give every unpinned request the next pool code not claimed by a pinned one.
///
/// Output order: pinned requests first (unchanged), then the newly assigned
/// ones in pool order.
///
/// # Errors
///
/// See [`validate_batch`].
pub fn plan_assignment(
    requests: Vec<AssigneeRequest>,
    available: &[String],
) -> Result<Vec<AssigneeRequest>> {
    validate_batch(&requests, available)?;

    let (pinned, unpinned): (Vec<_>, Vec<_>) = requests
        .into_iter()
        .partition(|r| r.pinned_code().is_some());

    let claimed: HashSet<&str> = pinned.iter().filter_map(AssigneeRequest::pinned_code).collect();
    let free = available.iter().filter(|c| !claimed.contains(c.as_str()));

    // validate_batch guarantees enough free codes for every unpinned request
    let assigned: Vec<AssigneeRequest> = unpinned
        .iter()
        .zip(free)
        .map(|(request, code)| request.with_code(code.clone()))
        .collect();

    Ok(pinned.into_iter().chain(assigned).collect())
}

/// Plans code assignment for a batch of assignees.
#[derive(Clone)]
pub struct CodeAssigner {
    guard: OwnershipGuard,
    store: Arc<dyn SpecialCodeStore>,
}

impl CodeAssigner {
    /// Create an assigner.
    #[must_use]
    pub fn new(guard: OwnershipGuard, store: Arc<dyn SpecialCodeStore>) -> Self {
        Self { guard, store }
    }

    /// Authorize, load the pool, de-duplicate and validate `requests`.
    ///
    /// # Errors
    ///
    /// Any [`OwnershipGuard::authorize`] or [`validate_batch`] error.
    pub async fn check(
        &self,
        requests: Vec<AssigneeRequest>,
        category_id: CategoryId,
        event: &Event,
        caller: &Caller,
    ) -> Result<CheckedBatch> {
        let category = self.guard.authorize(category_id, event, caller).await?;

        let available: Vec<String> = self
            .store
            .find_unsent_codes(category.id)
            .await?
            .into_iter()
            .filter(super::model::SpecialCode::is_unsent)
            .map(|c| c.code)
            .collect();

        let requests = dedupe(requests);
        if let Err(e) = validate_batch(&requests, &available) {
            tracing::warn!(
                event = %event.short_name,
                category = %category.id,
                requested = requests.len(),
                available = available.len(),
                error = %e,
                "Rejected code assignment batch"
            );
            return Err(e);
        }

        Ok(CheckedBatch {
            category,
            requests,
            available,
        })
    }

    /// Resolve a code for every request of the batch.
    ///
    /// Idempotent for identical input as long as the pool is not mutated.
    ///
    /// # Errors
    ///
    /// See [`CodeAssigner::check`].
    #[tracing::instrument(skip(self, requests, event, caller), fields(event = %event.short_name))]
    pub async fn reconcile(
        &self,
        requests: Vec<AssigneeRequest>,
        category_id: CategoryId,
        event: &Event,
        caller: &Caller,
    ) -> Result<Vec<AssigneeRequest>> {
        let batch = self.check(requests, category_id, event, caller).await?;
        plan_assignment(batch.requests, &batch.available)
    }
}
