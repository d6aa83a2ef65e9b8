//! Waiting-queue administration endpoints.
//!
//! Events the caller cannot see are answered with an empty result rather than
//! an error body: `{}` for status, `0`/`[]` with 404 for count and load, an
//! empty 400 for subscriber moves and an empty 404 for exports.

use crate::extractors::AuthenticatedUser;
use crate::state::AppState;
use crate::WebResult;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use eventadmin_core::waiting_queue::{
    available_fields, ExportField, ExportFormat, FieldDescriptor, WaitingQueueStatus,
    WaitingQueueSubscription,
};
use eventadmin_core::{Event, EventId, SubscriptionId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Body of `PUT status`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SetStatusForm {
    /// `true` pauses subscriptions
    pub status: bool,
}

/// Answer to a subscriber move.
#[derive(Debug, Clone, Serialize)]
pub struct ModificationResult {
    /// The moved subscription
    pub modified: WaitingQueueSubscription,
    /// Every subscription of the event after the move
    pub list: Vec<WaitingQueueSubscription>,
}

fn status_body(status: Option<WaitingQueueStatus>) -> Json<Value> {
    Json(status.map_or_else(
        || json!({}),
        |s| json!({ "active": s.active, "paused": s.paused }),
    ))
}

async fn visible_event(
    state: &AppState,
    event: &str,
    caller: &eventadmin_core::Caller,
) -> WebResult<Option<Event>> {
    Ok(state.events.find_event(event, caller).await?)
}

/// `GET /event/:event/waiting-queue/status`
///
/// # Errors
///
/// Collaborator failures.
pub async fn get_status(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(event): Path<String>,
) -> WebResult<Json<Value>> {
    let status = match visible_event(&state, &event, &caller).await? {
        Some(event) => Some(state.status.get_status(&event).await?),
        None => None,
    };
    Ok(status_body(status))
}

/// `PUT /event/:event/waiting-queue/status`
///
/// # Errors
///
/// Collaborator failures.
pub async fn set_status(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(event): Path<String>,
    Json(form): Json<SetStatusForm>,
) -> WebResult<Json<Value>> {
    let status = match visible_event(&state, &event, &caller).await? {
        Some(event) => Some(state.status.set_status(&event, form.status, &caller).await?),
        None => None,
    };
    Ok(status_body(status))
}

/// `GET /event/:event/waiting-queue/count`
///
/// # Errors
///
/// Collaborator failures.
pub async fn count(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(event): Path<String>,
) -> WebResult<(StatusCode, Json<u64>)> {
    match visible_event(&state, &event, &caller).await? {
        Some(event) => Ok((
            StatusCode::OK,
            Json(state.queue.count_subscribers(event.id).await?),
        )),
        None => Ok((StatusCode::NOT_FOUND, Json(0))),
    }
}

/// `GET /event/:event/waiting-queue/load`
///
/// # Errors
///
/// Collaborator failures.
pub async fn load(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(event): Path<String>,
) -> WebResult<(StatusCode, Json<Vec<WaitingQueueSubscription>>)> {
    match visible_event(&state, &event, &caller).await? {
        Some(event) => Ok((
            StatusCode::OK,
            Json(state.queue.load_all_subscriptions(event.id).await?),
        )),
        None => Ok((StatusCode::NOT_FOUND, Json(Vec::new()))),
    }
}

#[derive(Clone, Copy)]
enum Move {
    Remove,
    Restore,
}

async fn move_subscriber(
    state: &AppState,
    caller: &eventadmin_core::Caller,
    event: &str,
    id: i32,
    movement: Move,
) -> WebResult<Response> {
    let Some(event) = visible_event(state, event, caller).await? else {
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };

    let id = SubscriptionId(id);
    let modified = match movement {
        Move::Remove => state.queue.remove_subscriber(event.id, id).await?,
        Move::Restore => state.queue.restore_subscriber(event.id, id).await?,
    };

    match modified {
        Some(modified) => {
            let list = subscriptions(state, event.id).await?;
            Ok(Json(ModificationResult { modified, list }).into_response())
        }
        None => Ok(StatusCode::BAD_REQUEST.into_response()),
    }
}

async fn subscriptions(
    state: &AppState,
    event_id: EventId,
) -> WebResult<Vec<WaitingQueueSubscription>> {
    Ok(state.queue.load_all_subscriptions(event_id).await?)
}

/// `DELETE /event/:event/waiting-queue/subscriber/:id`
///
/// # Errors
///
/// Collaborator failures.
pub async fn remove_subscriber(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path((event, id)): Path<(String, i32)>,
) -> WebResult<Response> {
    move_subscriber(&state, &caller, &event, id, Move::Remove).await
}

/// `PUT /event/:event/waiting-queue/subscriber/:id/restore`
///
/// # Errors
///
/// Collaborator failures.
pub async fn restore_subscriber(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path((event, id)): Path<(String, i32)>,
) -> WebResult<Response> {
    move_subscriber(&state, &caller, &event, id, Move::Restore).await
}

/// `GET /event/:event/waiting-queue/fields`
#[allow(clippy::unused_async)]
pub async fn fields(AuthenticatedUser(_caller): AuthenticatedUser) -> Json<Vec<FieldDescriptor>> {
    Json(available_fields())
}

/// `GET /event/:event/waiting-queue/export?format=csv&fields=email&fields=status`
///
/// `fields` may repeat, so the query is read as raw pairs.
///
/// # Errors
///
/// 400 on an unknown format, collaborator or encoding failures.
pub async fn export(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(event): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> WebResult<Response> {
    let Some(event) = visible_event(&state, &event, &caller).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let format = params
        .iter()
        .find(|(key, _)| key == "format")
        .map_or(Ok(ExportFormat::default()), |(_, value)| value.parse())?;
    let requested: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "fields")
        .map(|(_, value)| value.as_str())
        .collect();
    let selected = ExportField::select(&requested);

    let file = state.queue.export(&event, format, &selected).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.content,
    )
        .into_response())
}
