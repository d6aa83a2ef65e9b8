//! Event administration server.
//!
//! Wires the PostgreSQL stores, the configured notifier and the core services
//! into the administrative router. `main` adds tracing, metrics and the
//! listener around [`build_app`].

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod email;

use async_trait::async_trait;
use eventadmin_core::codes::{NotificationDispatcher, OwnershipGuard, SpecialCodeManager};
use eventadmin_core::environment::SystemClock;
use eventadmin_core::i18n::BitmaskLocaleResolver;
use eventadmin_core::providers::{AuthorizationOracle, CategoryLoader, Notifier};
use eventadmin_core::template::BuiltinTemplateRenderer;
use eventadmin_core::waiting_queue::{WaitingQueueManager, WaitingQueueStatusService};
use eventadmin_core::EventDirectory;
use eventadmin_postgres::{
    PostgresConfigurationStore, PostgresEventRepository, PostgresSeatAvailability,
    PostgresSpecialCodeStore, PostgresWaitingQueueRepository,
};
use eventadmin_web::{AppState, ReadinessProbe};
use sqlx::PgPool;
use std::sync::Arc;

pub use config::Config;

/// Readiness backed by a database round trip.
#[derive(Clone)]
pub struct DatabaseReadiness {
    pool: PgPool,
}

impl DatabaseReadiness {
    /// Probe `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadinessProbe for DatabaseReadiness {
    async fn is_ready(&self) -> bool {
        eventadmin_postgres::ping(&self.pool).await
    }
}

/// Assemble the handler state over `pool`.
#[must_use]
pub fn build_state(pool: &PgPool, notifier: Arc<dyn Notifier>, public_base_url: &str) -> AppState {
    let events = Arc::new(PostgresEventRepository::new(pool.clone()));
    let authorization: Arc<dyn AuthorizationOracle> = events.clone();
    let categories: Arc<dyn CategoryLoader> = events.clone();
    let codes = Arc::new(PostgresSpecialCodeStore::new(pool.clone()));
    let clock = Arc::new(SystemClock);

    let directory = EventDirectory::new(events, Arc::clone(&authorization), public_base_url);
    let guard = OwnershipGuard::new(authorization, Arc::clone(&categories));
    let dispatcher = NotificationDispatcher::new(
        codes.clone(),
        notifier,
        Arc::new(BuiltinTemplateRenderer),
        Arc::new(BitmaskLocaleResolver),
        clock.clone(),
    );
    let code_manager = SpecialCodeManager::new(directory.clone(), guard, dispatcher, codes);

    let status = WaitingQueueStatusService::new(
        Arc::clone(&categories),
        Arc::new(PostgresSeatAvailability::new(pool.clone())),
        Arc::new(PostgresConfigurationStore::new(pool.clone())),
        clock,
    );
    let queue = WaitingQueueManager::new(
        Arc::new(PostgresWaitingQueueRepository::new(pool.clone())),
        categories,
    );

    AppState::new(
        code_manager,
        queue,
        status,
        directory,
        Arc::new(DatabaseReadiness::new(pool.clone())),
    )
}

/// Router for `config` over `pool`.
///
/// # Errors
///
/// Returns an error if the notifier cannot be built.
pub fn build_app(config: &Config, pool: &PgPool) -> anyhow::Result<axum::Router> {
    let notifier = email::notifier_from_config(&config.email)?;
    tracing::info!(provider = ?config.email.provider, "Notifier configured");
    Ok(eventadmin_web::router(build_state(
        pool,
        notifier,
        &config.public.base_url,
    )))
}
