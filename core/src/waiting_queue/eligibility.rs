//! Whether an event currently accepts waiting-queue subscriptions.
//!
//! Only publicly saleable categories count; restricted ones are unlocked by
//! special codes and never open the queue.

use crate::types::TicketCategory;
use chrono::{DateTime, Utc};

/// Sales phase of an event, as far as the waiting queue is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SalesPhase {
    /// The event has no public category
    NoCategories,
    /// No category has started selling yet
    PreSales,
    /// At least one category has started; `last_expiration` is the latest end of sales
    OnSale {
        /// Latest expiration among the public categories
        last_expiration: DateTime<Utc>,
    },
}

/// Classify the event at instant `now`.
///
/// `categories` are the public categories of the event. Instants are
/// compared, so the result is the same in every time zone.
#[must_use]
pub fn sales_phase(now: DateTime<Utc>, categories: &[TicketCategory]) -> SalesPhase {
    let Some(last_expiration) = categories.iter().map(|c| c.expiration).max() else {
        return SalesPhase::NoCategories;
    };

    if categories.iter().all(|c| now < c.inception) {
        SalesPhase::PreSales
    } else {
        SalesPhase::OnSale { last_expiration }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryId, EventId};
    use chrono::{Duration, TimeZone};

    fn category(id: i32, inception: DateTime<Utc>, expiration: DateTime<Utc>) -> TicketCategory {
        TicketCategory {
            id: CategoryId(id),
            event_id: EventId(1),
            name: format!("cat-{id}"),
            access_restricted: false,
            max_tickets: 10,
            inception,
            expiration,
            bounded: true,
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).single().unwrap()
    }

    #[test]
    fn no_categories() {
        assert_eq!(sales_phase(base(), &[]), SalesPhase::NoCategories);
    }

    #[test]
    fn before_every_inception_is_pre_sales() {
        let now = base();
        let categories = [
            category(1, now + Duration::days(1), now + Duration::days(10)),
            category(2, now + Duration::hours(1), now + Duration::days(5)),
        ];
        assert_eq!(sales_phase(now, &categories), SalesPhase::PreSales);
    }

    #[test]
    fn on_sale_reports_latest_expiration() {
        let now = base();
        let categories = [
            category(1, now - Duration::days(1), now + Duration::days(10)),
            category(2, now + Duration::hours(1), now + Duration::days(20)),
        ];
        assert_eq!(
            sales_phase(now, &categories),
            SalesPhase::OnSale {
                last_expiration: now + Duration::days(20)
            }
        );
    }
}
