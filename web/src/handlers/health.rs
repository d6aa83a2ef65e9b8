//! Health check endpoints.
//!
//! Used by load balancers and orchestrators; neither requires a caller.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

/// Liveness: the process is serving requests.
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness: the database answers.
///
/// ```text
/// GET /ready
/// ```
///
/// # Errors
///
/// 503 when the readiness probe fails.
pub async fn readiness(State(state): State<AppState>) -> Result<(StatusCode, &'static str), AppError> {
    if state.readiness.is_ready().await {
        Ok((StatusCode::OK, "ready"))
    } else {
        tracing::warn!("Readiness probe failed");
        Err(AppError::unavailable("Database unavailable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
