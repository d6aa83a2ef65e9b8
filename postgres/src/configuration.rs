//! Layered configuration.

use crate::db_error;
use async_trait::async_trait;
use eventadmin_core::configuration::{parse_bool, ConfigurationKey, ConfigurationScope};
use eventadmin_core::providers::ConfigurationStore;
use eventadmin_core::{Caller, Result};
use sqlx::PgPool;

/// `PostgreSQL` configuration store. Event values win over organization
/// values, which win over system values.
#[derive(Clone)]
pub struct PostgresConfigurationStore {
    pool: PgPool,
}

impl PostgresConfigurationStore {
    /// Create a store over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigurationStore for PostgresConfigurationStore {
    async fn get_bool(
        &self,
        scope: ConfigurationScope,
        key: ConfigurationKey,
    ) -> Result<Option<bool>> {
        let value: Option<(String,)> = sqlx::query_as(
            r"
            SELECT c_value FROM (
                SELECT c_value, 1 AS precedence FROM configuration_event
                    WHERE event_id = $1 AND c_key = $3
                UNION ALL
                SELECT c_value, 2 FROM configuration_organization
                    WHERE organization_id = $2 AND c_key = $3
                UNION ALL
                SELECT c_value, 3 FROM configuration_system
                    WHERE c_key = $3
            ) layered
            ORDER BY precedence
            LIMIT 1
            ",
        )
        .bind(scope.event_id.value())
        .bind(scope.organization_id.value())
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to read configuration"))?;

        Ok(value.map(|(v,)| parse_bool(&v)))
    }

    async fn save_event_value(
        &self,
        scope: ConfigurationScope,
        key: ConfigurationKey,
        value: &str,
        caller: &Caller,
    ) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO configuration_event (organization_id, event_id, c_key, c_value, updated_by)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (event_id, c_key)
            DO UPDATE SET c_value = EXCLUDED.c_value,
                          updated_by = EXCLUDED.updated_by,
                          updated_at = now()
            ",
        )
        .bind(scope.organization_id.value())
        .bind(scope.event_id.value())
        .bind(key.as_str())
        .bind(value)
        .bind(caller.username())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save configuration"))?;

        tracing::debug!(key = %key, value, caller = %caller, "Event configuration saved");
        Ok(())
    }
}
