//! HTTP error responses.
//!
//! [`AppError`] is what every handler returns on failure. Domain errors are
//! converted with `?` through `From<AdminError>`; the response body is a JSON
//! `{code, message}` object.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eventadmin_core::AdminError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<Vec<SpecialCode>>, AppError> {
///     let codes = state.codes.load_sent_codes(&event, category, &caller).await?;
///     Ok(Json(codes))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    /// User-facing message
    message: String,
    /// Stable machine-readable code
    code: String,
    /// Logged, never sent to the client
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
            source: None,
        }
    }

    /// Attach the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// 401 Unauthorized.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message, "UNAUTHORIZED")
    }

    /// 403 Forbidden.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message, "FORBIDDEN")
    }

    /// 404 Not Found.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} {id} not found"),
            "NOT_FOUND",
        )
    }

    /// 409 Conflict.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message, "CONFLICT")
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// 503 Service Unavailable.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message, "SERVICE_UNAVAILABLE")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                ),
                None => tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                ),
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Operator errors keep their message; integrity and collaborator failures are
/// hidden behind a generic 500.
impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match &err {
            AdminError::NotAuthorized { .. } => Self::forbidden(err.to_string()),
            AdminError::EventNotFound { name } => Self::not_found("Event", name),
            AdminError::CategoryNotFound { category_id } => {
                Self::not_found("Ticket category", category_id)
            }
            AdminError::CategoryNotRestricted { .. } => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "CATEGORY_NOT_RESTRICTED")
            }
            AdminError::InsufficientCodes { .. } => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "INSUFFICIENT_CODES")
            }
            AdminError::DuplicateCodeRequest => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "DUPLICATE_CODE_REQUEST")
            }
            AdminError::UnknownOrConsumedCode => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "UNKNOWN_OR_CONSUMED_CODE")
            }
            AdminError::MissingCode => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "MISSING_CODE")
            }
            AdminError::NoLocalesConfigured => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "NO_LOCALES_CONFIGURED")
            }
            AdminError::InvalidInput(message) => Self::bad_request(message.clone()),
            AdminError::ConcurrentModification { .. } => {
                Self::conflict(err.to_string()).with_source(err.into())
            }
            AdminError::IntegrityViolation { .. }
            | AdminError::Notification(_)
            | AdminError::Template(_)
            | AdminError::Database(_)
            | AdminError::Export(_) => {
                Self::internal("An internal error occurred").with_source(err.into())
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::from(AdminError::EventNotFound {
            name: "rustconf".into(),
        });
        assert_eq!(err.to_string(), "[NOT_FOUND] Event rustconf not found");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn operator_errors_are_bad_requests() {
        let err = AppError::from(AdminError::InsufficientCodes {
            requested: 3,
            available: 1,
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "INSUFFICIENT_CODES");
        assert_eq!(err.message, "Requested codes: 3, available: 1");
        assert!(err.source.is_none());
    }

    #[test]
    fn ownership_failure_is_forbidden() {
        let err = AppError::from(AdminError::NotAuthorized {
            caller: "mallory".into(),
        });
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn integrity_violation_hides_details() {
        let err = AppError::from(AdminError::IntegrityViolation { affected: 2 });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred");
        assert!(err.source.is_some());
    }

    #[test]
    fn concurrent_consumption_is_a_conflict() {
        let err = AppError::from(AdminError::ConcurrentModification { affected: 2 });
        assert_eq!(err.status, StatusCode::CONFLICT);
    }
}
