//! Special-code persistence.

use crate::db_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use eventadmin_core::codes::{Recipient, SpecialCode};
use eventadmin_core::providers::{SentRecord, SpecialCodeStore};
use eventadmin_core::{CategoryId, Result, SpecialCodeId};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct SpecialPriceRow {
    id: i32,
    code: String,
    ticket_category_id: i32,
    sent_ts: Option<DateTime<Utc>>,
    recipient_name: Option<String>,
    recipient_email: Option<String>,
    recipient_language: Option<String>,
    time_zone: String,
}

impl SpecialPriceRow {
    fn into_code(self) -> SpecialCode {
        // sent time is reported in the event's zone; fall back to UTC on an unknown name
        let zone: Tz = self.time_zone.parse().unwrap_or(Tz::UTC);
        let recipient = self.sent_ts.map(|sent| Recipient {
            name: self.recipient_name.unwrap_or_default(),
            email: self.recipient_email.unwrap_or_default(),
            language: self.recipient_language,
            sent_at: sent.with_timezone(&zone).fixed_offset(),
        });
        SpecialCode {
            id: SpecialCodeId(self.id),
            category_id: CategoryId(self.ticket_category_id),
            code: self.code,
            recipient,
        }
    }
}

/// `PostgreSQL` special-code store.
#[derive(Clone)]
pub struct PostgresSpecialCodeStore {
    pool: PgPool,
}

impl PostgresSpecialCodeStore {
    /// Create a store over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find(&self, category_id: CategoryId, sent: bool) -> Result<Vec<SpecialCode>> {
        let rows: Vec<SpecialPriceRow> = sqlx::query_as(
            r"
            SELECT sp.id, sp.code, sp.ticket_category_id, sp.sent_ts,
                   sp.recipient_name, sp.recipient_email, sp.recipient_language,
                   e.time_zone
            FROM special_price sp
            JOIN ticket_category tc ON tc.id = sp.ticket_category_id
            JOIN event e ON e.id = tc.event_id
            WHERE sp.ticket_category_id = $1
              AND (sp.sent_ts IS NOT NULL) = $2
            ORDER BY sp.id
            ",
        )
        .bind(category_id.value())
        .bind(sent)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load special codes"))?;

        Ok(rows.into_iter().map(SpecialPriceRow::into_code).collect())
    }
}

#[async_trait]
impl SpecialCodeStore for PostgresSpecialCodeStore {
    async fn find_unsent_codes(&self, category_id: CategoryId) -> Result<Vec<SpecialCode>> {
        self.find(category_id, false).await
    }

    async fn find_sent_codes(&self, category_id: CategoryId) -> Result<Vec<SpecialCode>> {
        self.find(category_id, true).await
    }

    async fn mark_sent(&self, record: &SentRecord<'_>) -> Result<u64> {
        let result = sqlx::query(
            r"
            UPDATE special_price
            SET sent_ts = $1, recipient_name = $2, recipient_email = $3, recipient_language = $4
            WHERE code = $5 AND sent_ts IS NULL
            ",
        )
        .bind(record.sent_at)
        .bind(record.assignee)
        .bind(record.email)
        .bind(record.language)
        .bind(record.code)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to mark code as sent"))?;

        Ok(result.rows_affected())
    }

    async fn clear_recipient(
        &self,
        code_id: SpecialCodeId,
        category_id: CategoryId,
    ) -> Result<u64> {
        let result = sqlx::query(
            r"
            UPDATE special_price
            SET sent_ts = NULL, recipient_name = NULL, recipient_email = NULL, recipient_language = NULL
            WHERE id = $1 AND ticket_category_id = $2 AND sent_ts IS NOT NULL
            ",
        )
        .bind(code_id.value())
        .bind(category_id.value())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to clear recipient data"))?;

        Ok(result.rows_affected())
    }
}
