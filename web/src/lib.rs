//! Administrative HTTP API for the event administration core.
//!
//! Thin axum shell over `eventadmin-core`: handlers extract the caller and
//! path parameters, call one service operation and map the result (or the
//! [`eventadmin_core::AdminError`]) to an HTTP response.
//!
//! # Request Flow
//!
//! 1. [`middleware::correlation_id`] assigns a correlation id and opens the request span
//! 2. [`extractors::AuthenticatedUser`] reads the caller set by the authenticating proxy
//! 3. The handler resolves the event and calls the service
//! 4. Errors become JSON `{code, message}` bodies through [`AppError`]
//!
//! # Example
//!
//! ```ignore
//! use eventadmin_web::{router, AppState};
//!
//! let app = router(AppState::new(codes, queue, status, events, readiness));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::AppError;
pub use extractors::{AuthenticatedUser, CorrelationId, AUTHENTICATED_USER_HEADER};
pub use middleware::CORRELATION_ID_HEADER;
pub use router::router;
pub use state::{AlwaysReady, AppState, ReadinessProbe};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
