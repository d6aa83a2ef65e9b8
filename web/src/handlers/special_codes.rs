//! Special-code endpoints of a restricted ticket category.
//!
//! ```text
//! POST   /event/:event/categories/:category/link-codes
//! POST   /event/:event/categories/:category/send-codes
//! GET    /event/:event/categories/:category/sent-codes
//! DELETE /event/:event/categories/:category/codes/:code/recipient
//! ```

use crate::extractors::{AuthenticatedUser, CorrelationId};
use crate::state::AppState;
use crate::WebResult;
use axum::{
    extract::{Path, State},
    Json,
};
use eventadmin_core::codes::{AssigneeRequest, SpecialCode};
use eventadmin_core::{CategoryId, SpecialCodeId};

/// Resolve a code for every assignee without sending anything.
///
/// # Errors
///
/// Event, authorization and batch validation errors.
pub async fn link_codes(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path((event, category)): Path<(String, i32)>,
    Json(requests): Json<Vec<AssigneeRequest>>,
) -> WebResult<Json<Vec<AssigneeRequest>>> {
    let linked = state
        .codes
        .link_assignee_to_code(requests, &event, CategoryId(category), &caller)
        .await?;
    Ok(Json(linked))
}

/// Send every linked code to its assignee.
///
/// # Errors
///
/// Validation errors before anything is sent, then the first dispatch error.
pub async fn send_codes(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    CorrelationId(correlation_id): CorrelationId,
    Path((event, category)): Path<(String, i32)>,
    Json(requests): Json<Vec<AssigneeRequest>>,
) -> WebResult<Json<bool>> {
    tracing::info!(
        correlation_id = %correlation_id,
        event = %event,
        category,
        requests = requests.len(),
        "Sending special codes"
    );
    let sent = state
        .codes
        .send_code_to_assignee(requests, &event, CategoryId(category), &caller)
        .await?;
    Ok(Json(sent))
}

/// Codes already sent.
///
/// # Errors
///
/// Event and authorization errors.
pub async fn sent_codes(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path((event, category)): Path<(String, i32)>,
) -> WebResult<Json<Vec<SpecialCode>>> {
    let codes = state
        .codes
        .load_sent_codes(&event, CategoryId(category), &caller)
        .await?;
    Ok(Json(codes))
}

/// Reset a sent code so it can be assigned again.
///
/// # Errors
///
/// Event and authorization errors, or an integrity violation.
pub async fn clear_recipient(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path((event, category, code)): Path<(String, i32, i32)>,
) -> WebResult<Json<bool>> {
    let cleared = state
        .codes
        .clear_recipient_data(&event, CategoryId(category), SpecialCodeId(code), &caller)
        .await?;
    Ok(Json(cleared))
}
