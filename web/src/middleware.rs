//! Request correlation.
//!
//! Every request gets a correlation id, taken from the `X-Correlation-ID`
//! header when it holds a valid UUID and generated otherwise. The id is
//! stored in the request extensions (read back by
//! [`crate::extractors::CorrelationId`]), recorded on the `http_request` span
//! together with the administrator name, and echoed on the response.

use crate::extractors::AUTHENTICATED_USER_HEADER;
use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Correlation-id middleware, installed with `axum::middleware::from_fn`.
///
/// ```ignore
/// let app = Router::new()
///     .route("/health", get(health_check))
///     .layer(axum::middleware::from_fn(correlation_id));
/// ```
pub async fn correlation_id(mut req: Request, next: Next) -> Response {
    let correlation_id = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    req.extensions_mut().insert(correlation_id);

    let caller = req
        .headers()
        .get(AUTHENTICATED_USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        caller = %caller,
        method = %req.method(),
        uri = %req.uri(),
    );

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}
