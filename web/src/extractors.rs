//! Custom Axum extractors.
//!
//! - [`CorrelationId`]: the request's correlation id
//! - [`AuthenticatedUser`]: the administrator named by the authenticating proxy

use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use eventadmin_core::Caller;
use uuid::Uuid;

/// Header set by the authenticating reverse proxy.
pub const AUTHENTICATED_USER_HEADER: &str = "X-Authenticated-User";

/// Correlation ID for request tracing.
///
/// Uses the id stored by [`crate::middleware::correlation_id`], then the
/// `X-Correlation-ID` header, and generates a UUID v4 as a last resort.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        let correlation_id = parts
            .headers
            .get(crate::middleware::CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// Administrator issuing the request.
///
/// Rejects with 401 when the header is missing or blank.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHENTICATED_USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Self(Caller::new(name)))
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn caller_from(request: Request<()>) -> Result<AuthenticatedUser, AppError> {
        let (mut parts, ()) = request.into_parts();
        AuthenticatedUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_the_proxy_header() {
        let request = Request::builder()
            .header(AUTHENTICATED_USER_HEADER, " admin ")
            .body(())
            .unwrap();
        let AuthenticatedUser(caller) = caller_from(request).await.unwrap();
        assert_eq!(caller, Caller::new("admin"));
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let err = caller_from(Request::builder().body(()).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn blank_header_is_unauthorized() {
        let request = Request::builder()
            .header(AUTHENTICATED_USER_HEADER, "  ")
            .body(())
            .unwrap();
        assert!(caller_from(request).await.is_err());
    }

    #[tokio::test]
    async fn correlation_id_prefers_extension() {
        let stored = Uuid::new_v4();
        let (mut parts, ()) = Request::builder()
            .header(crate::middleware::CORRELATION_ID_HEADER, Uuid::new_v4().to_string())
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(stored);

        let CorrelationId(id) = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(id, stored);
    }
}
