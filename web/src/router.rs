//! Route table.

use crate::handlers::{health, special_codes, waiting_queue};
use crate::middleware::correlation_id;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Administrative API, nested under `/admin/api`.
fn admin_api() -> Router<AppState> {
    Router::new()
        .route(
            "/event/:event/waiting-queue/status",
            get(waiting_queue::get_status).put(waiting_queue::set_status),
        )
        .route("/event/:event/waiting-queue/count", get(waiting_queue::count))
        .route("/event/:event/waiting-queue/load", get(waiting_queue::load))
        .route(
            "/event/:event/waiting-queue/subscriber/:id",
            delete(waiting_queue::remove_subscriber),
        )
        .route(
            "/event/:event/waiting-queue/subscriber/:id/restore",
            put(waiting_queue::restore_subscriber),
        )
        .route("/event/:event/waiting-queue/fields", get(waiting_queue::fields))
        .route("/event/:event/waiting-queue/export", get(waiting_queue::export))
        .route(
            "/event/:event/categories/:category/link-codes",
            post(special_codes::link_codes),
        )
        .route(
            "/event/:event/categories/:category/send-codes",
            post(special_codes::send_codes),
        )
        .route(
            "/event/:event/categories/:category/sent-codes",
            get(special_codes::sent_codes),
        )
        .route(
            "/event/:event/categories/:category/codes/:code/recipient",
            delete(special_codes::clear_recipient),
        )
}

/// Full application router with tracing and correlation ids.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .nest("/admin/api", admin_api())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(correlation_id))
        .with_state(state)
}
