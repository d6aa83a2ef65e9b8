//! `PostgreSQL` stores for the event administration core.
//!
//! Every collaborator contract of `eventadmin-core` that needs persistence is
//! implemented here with runtime-checked `sqlx` queries:
//!
//! - [`PostgresSpecialCodeStore`]: special codes, consumed with a conditional
//!   update on `sent_ts IS NULL`
//! - [`PostgresEventRepository`]: events, organizations, ownership, categories
//! - [`PostgresConfigurationStore`]: layered configuration
//! - [`PostgresWaitingQueueRepository`]: subscriptions, moved with a
//!   conditional update on the expected status
//! - [`PostgresSeatAvailability`]: ticket availability
//!
//! # Example
//!
//! ```no_run
//! use eventadmin_postgres::{connect, migrate, PoolSettings, PostgresSpecialCodeStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = connect("postgres://localhost/eventadmin", &PoolSettings::default()).await?;
//! migrate(&pool).await?;
//! let codes = PostgresSpecialCodeStore::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod codes;
mod configuration;
mod events;
mod seats;
mod waiting_queue;

pub use codes::PostgresSpecialCodeStore;
pub use configuration::PostgresConfigurationStore;
pub use events::PostgresEventRepository;
pub use seats::PostgresSeatAvailability;
pub use waiting_queue::PostgresWaitingQueueRepository;

use eventadmin_core::{AdminError, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Connection pool sizing.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Maximum connections
    pub max_connections: u32,
    /// Minimum idle connections
    pub min_connections: u32,
    /// Timeout for acquiring a connection
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Open a connection pool.
///
/// # Errors
///
/// Returns [`AdminError::Database`] if the database cannot be reached.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await
        .map_err(|e| AdminError::Database(format!("Failed to connect: {e}")))
}

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns [`AdminError::Database`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AdminError::Database(format!("Migration failed: {e}")))?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// `true` when the database answers a trivial query.
pub async fn ping(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Wrap a driver error with what was being attempted.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AdminError {
    move |e| AdminError::Database(format!("{context}: {e}"))
}

/// Row count as returned by `COUNT(*)`.
pub(crate) fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
