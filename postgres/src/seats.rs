//! Ticket availability.

use crate::db_error;
use async_trait::async_trait;
use eventadmin_core::providers::SeatAvailability;
use eventadmin_core::{Event, Result};
use sqlx::PgPool;

/// Seat statuses that can still be bought.
const FREE_STATUSES: [&str; 2] = ["FREE", "RELEASED"];

/// `PostgreSQL` seat availability, read from the `ticket` table.
#[derive(Clone)]
pub struct PostgresSeatAvailability {
    pool: PgPool,
}

impl PostgresSeatAvailability {
    /// Create a reader over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeatAvailability for PostgresSeatAvailability {
    async fn no_seats_available(&self, event: &Event) -> Result<bool> {
        let (free,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM ticket WHERE event_id = $1 AND status = ANY($2)",
        )
        .bind(event.id.value())
        .bind(&FREE_STATUSES[..])
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count free seats"))?;

        Ok(free == 0)
    }
}
