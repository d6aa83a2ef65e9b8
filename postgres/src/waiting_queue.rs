//! Waiting-queue subscriptions.

use crate::{count, db_error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventadmin_core::providers::WaitingQueueRepository;
use eventadmin_core::waiting_queue::{SubscriptionStatus, WaitingQueueSubscription};
use eventadmin_core::{AdminError, CategoryId, EventId, Result, SubscriptionId};
use sqlx::PgPool;

const COLUMNS: &str = "id, creation, event_id, status, full_name, first_name, last_name, \
     email_address, ticket_reservation_id, user_language, selected_category_id, subscription_type";

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: i32,
    creation: DateTime<Utc>,
    event_id: i32,
    status: String,
    full_name: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email_address: String,
    ticket_reservation_id: Option<String>,
    user_language: String,
    selected_category_id: Option<i32>,
    subscription_type: String,
}

impl TryFrom<SubscriptionRow> for WaitingQueueSubscription {
    type Error = AdminError;

    fn try_from(row: SubscriptionRow) -> Result<Self> {
        Ok(Self {
            id: SubscriptionId(row.id),
            creation: row.creation,
            event_id: EventId(row.event_id),
            status: row.status.parse()?,
            full_name: row.full_name,
            first_name: row.first_name,
            last_name: row.last_name,
            email_address: row.email_address,
            reservation_id: row.ticket_reservation_id,
            user_language: row.user_language,
            selected_category_id: row.selected_category_id.map(CategoryId),
            subscription_type: row.subscription_type.parse()?,
        })
    }
}

/// `PostgreSQL` waiting-queue repository.
#[derive(Clone)]
pub struct PostgresWaitingQueueRepository {
    pool: PgPool,
}

impl PostgresWaitingQueueRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WaitingQueueRepository for PostgresWaitingQueueRepository {
    async fn count_waiting(&self, event_id: EventId) -> Result<u64> {
        let (waiting,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM waiting_queue WHERE event_id = $1 AND status = 'WAITING'",
        )
        .bind(event_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count subscribers"))?;

        Ok(count(waiting))
    }

    async fn load_all(&self, event_id: EventId) -> Result<Vec<WaitingQueueSubscription>> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM waiting_queue WHERE event_id = $1 ORDER BY creation, id"
        ))
        .bind(event_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load subscriptions"))?;

        rows.into_iter()
            .map(WaitingQueueSubscription::try_from)
            .collect()
    }

    async fn find(
        &self,
        event_id: EventId,
        id: SubscriptionId,
    ) -> Result<Option<WaitingQueueSubscription>> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM waiting_queue WHERE event_id = $1 AND id = $2"
        ))
        .bind(event_id.value())
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load subscription"))?;

        row.map(WaitingQueueSubscription::try_from).transpose()
    }

    async fn update_status(
        &self,
        event_id: EventId,
        id: SubscriptionId,
        new: SubscriptionStatus,
        expected: SubscriptionStatus,
    ) -> Result<u64> {
        let result = sqlx::query(
            r"
            UPDATE waiting_queue
            SET status = $1
            WHERE id = $2 AND event_id = $3 AND status = $4
            ",
        )
        .bind(new.as_str())
        .bind(id.value())
        .bind(event_id.value())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update subscription status"))?;

        Ok(result.rows_affected())
    }
}
