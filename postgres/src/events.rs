//! Events, organizations, ownership and categories.

use crate::db_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use eventadmin_core::providers::{AuthorizationOracle, CategoryLoader, EventRepository};
use eventadmin_core::{
    AdminError, Caller, CategoryId, Event, EventId, Organization, OrganizationId, Result,
    TicketCategory,
};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i32,
    short_name: String,
    display_name: String,
    org_id: i32,
    time_zone: String,
    locales: i32,
}

impl TryFrom<EventRow> for Event {
    type Error = AdminError;

    fn try_from(row: EventRow) -> Result<Self> {
        let time_zone: Tz = row.time_zone.parse().map_err(|e| {
            AdminError::Database(format!(
                "Invalid time zone {} for event {}: {e}",
                row.time_zone, row.short_name
            ))
        })?;
        Ok(Self {
            id: EventId(row.id),
            short_name: row.short_name,
            display_name: row.display_name,
            organization_id: OrganizationId(row.org_id),
            time_zone,
            locales: row.locales,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    event_id: i32,
    name: String,
    access_restricted: bool,
    max_tickets: i32,
    inception: DateTime<Utc>,
    expiration: DateTime<Utc>,
    bounded: bool,
}

impl From<CategoryRow> for TicketCategory {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId(row.id),
            event_id: EventId(row.event_id),
            name: row.name,
            access_restricted: row.access_restricted,
            max_tickets: row.max_tickets,
            inception: row.inception,
            expiration: row.expiration,
            bounded: row.bounded,
        }
    }
}

/// `PostgreSQL` event lookups.
///
/// Also answers ownership questions from `organization_owner` and loads
/// ticket categories, since all three read the same tables.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn find_by_short_name(&self, short_name: &str) -> Result<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(
            r"
            SELECT id, short_name, display_name, org_id, time_zone, locales
            FROM event
            WHERE short_name = $1
            ",
        )
        .bind(short_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load event"))?;

        row.map(Event::try_from).transpose()
    }

    async fn find_organization(&self, id: OrganizationId) -> Result<Option<Organization>> {
        let row: Option<(i32, String, String)> =
            sqlx::query_as("SELECT id, name, email FROM organization WHERE id = $1")
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to load organization"))?;

        Ok(row.map(|(id, name, email)| Organization {
            id: OrganizationId(id),
            name,
            email,
        }))
    }
}

#[async_trait]
impl AuthorizationOracle for PostgresEventRepository {
    async fn check_ownership(
        &self,
        event: &Event,
        caller: &Caller,
        organization_id: OrganizationId,
    ) -> Result<()> {
        let (owner,): (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS (
                SELECT 1 FROM organization_owner
                WHERE organization_id = $1 AND username = $2
            )
            ",
        )
        .bind(organization_id.value())
        .bind(caller.username())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check ownership"))?;

        if owner {
            Ok(())
        } else {
            tracing::warn!(
                caller = %caller,
                event = %event.short_name,
                organization = %organization_id,
                "Ownership check failed"
            );
            Err(AdminError::NotAuthorized {
                caller: caller.to_string(),
            })
        }
    }
}

#[async_trait]
impl CategoryLoader for PostgresEventRepository {
    async fn load_categories(&self, event: &Event) -> Result<Vec<TicketCategory>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r"
            SELECT id, event_id, name, access_restricted, max_tickets, inception, expiration, bounded
            FROM ticket_category
            WHERE event_id = $1
            ORDER BY inception, id
            ",
        )
        .bind(event.id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load categories"))?;

        Ok(rows.into_iter().map(TicketCategory::from).collect())
    }
}
