//! Read-side reporting queries.

use chrono::NaiveDate;
use diesel::dsl::count;
use diesel::prelude::*;

use crate::db::model::EventRow;
use crate::db::schema::{events, packages};
use crate::db::{self, DbPool};
use crate::error::{Error, Result};
use crate::store::registry::find_package_id;
use crate::store::resolver::{find_customer_id, find_location_id};

/// One row of the packages-per-customer report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEventCount {
    pub tracking_code: String,
    pub events: i64,
}

/// Read-only reporting over the tracking tables.
///
/// Every report first resolves its natural-key argument to a surrogate id
/// and fails with `NotFound` when the entity is absent; an existing entity
/// with no matching events is an empty result, which is a distinct outcome.
pub struct ReportReader {
    pool: DbPool,
}

impl ReportReader {
    /// Create a reader backed by the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All events for a package, ordered by timestamp ascending.
    ///
    /// # Errors
    /// Returns `NotFound` if no package has the given tracking code.
    pub fn events_for_package(&self, tracking_code: &str) -> Result<Vec<EventRow>> {
        let mut conn = db::checkout(&self.pool)?;

        let package_id = find_package_id(&mut conn, tracking_code)?
            .ok_or_else(|| Error::not_found("package", tracking_code))?;

        events::table
            .filter(events::package_id.eq(package_id))
            .order(events::timestamp.asc())
            .select(EventRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Tracking code and event count for every package of a customer that
    /// has at least one event. Packages with no events are omitted; that is
    /// what the inner join expresses.
    ///
    /// # Errors
    /// Returns `NotFound` if no customer has the given name.
    pub fn packages_with_event_counts(&self, customer_name: &str) -> Result<Vec<PackageEventCount>> {
        let mut conn = db::checkout(&self.pool)?;

        let customer_id = find_customer_id(&mut conn, customer_name)?
            .ok_or_else(|| Error::not_found("customer", customer_name))?;

        let rows: Vec<(String, i64)> = packages::table
            .inner_join(events::table)
            .filter(packages::customer_id.eq(customer_id))
            .group_by(packages::tracking_code)
            .select((packages::tracking_code, count(events::id)))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(tracking_code, events)| PackageEventCount {
                tracking_code,
                events,
            })
            .collect())
    }

    /// All events at a location whose timestamp falls on the given calendar
    /// day, ordered by timestamp ascending.
    ///
    /// Timestamps are fixed-width RFC 3339 UTC text, so the day comparison
    /// is a lexicographic half-open range over the stored strings.
    ///
    /// # Errors
    /// Returns `NotFound` if no location has the given description.
    pub fn events_for_location_on_day(
        &self,
        location_description: &str,
        day: NaiveDate,
    ) -> Result<Vec<EventRow>> {
        let mut conn = db::checkout(&self.pool)?;

        let location_id = find_location_id(&mut conn, location_description)?
            .ok_or_else(|| Error::not_found("location", location_description))?;

        let next_day = day
            .succ_opt()
            .ok_or_else(|| Error::Parse(format!("date out of range: {day}")))?;
        let start = format!("{day}T00:00:00");
        let end = format!("{next_day}T00:00:00");

        events::table
            .filter(events::location_id.eq(location_id))
            .filter(events::timestamp.ge(start))
            .filter(events::timestamp.lt(end))
            .order(events::timestamp.asc())
            .select(EventRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, ensure_schema};
    use crate::store::{EntityResolver, EventRecorder, PackageRegistry};

    fn setup_test_db() -> DbPool {
        let pool = create_pool(":memory:").expect("create pool");
        ensure_schema(&pool).expect("run migrations");
        pool
    }

    fn seed(pool: &DbPool) {
        let resolver = EntityResolver::new(pool.clone());
        resolver.resolve_customer("Acme Oy").unwrap();
        resolver.resolve_location("Helsinki").unwrap();
        let registry = PackageRegistry::new(pool.clone());
        registry.add_package("TC-000001", "Acme Oy").unwrap();
        registry.add_package("TC-000002", "Acme Oy").unwrap();
    }

    /// Insert an event with an explicit timestamp, bypassing the store
    /// default, to pin down ordering and day-boundary behavior.
    fn insert_event_at(pool: &DbPool, tracking_code: &str, timestamp: &str, description: &str) {
        let mut conn = pool.get().unwrap();
        let package_id = find_package_id(&mut conn, tracking_code).unwrap().unwrap();
        let location_id = find_location_id(&mut conn, "Helsinki").unwrap().unwrap();

        diesel::insert_into(events::table)
            .values((
                events::timestamp.eq(timestamp),
                events::package_id.eq(package_id),
                events::location_id.eq(location_id),
                events::description.eq(description),
            ))
            .execute(&mut conn)
            .unwrap();
    }

    #[test]
    fn unknown_package_is_not_found() {
        let pool = setup_test_db();
        let reader = ReportReader::new(pool);

        let result = reader.events_for_package("TC-404");

        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "package",
                ..
            })
        ));
    }

    #[test]
    fn package_with_no_events_is_an_empty_result_not_an_error() {
        let pool = setup_test_db();
        seed(&pool);
        let reader = ReportReader::new(pool);

        let rows = reader.events_for_package("TC-000001").unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn events_come_back_in_timestamp_order_regardless_of_insertion_order() {
        let pool = setup_test_db();
        seed(&pool);
        insert_event_at(&pool, "TC-000001", "2026-08-20T15:00:00.000Z", "third");
        insert_event_at(&pool, "TC-000001", "2026-08-20T09:00:00.000Z", "first");
        insert_event_at(&pool, "TC-000001", "2026-08-20T12:00:00.000Z", "second");
        let reader = ReportReader::new(pool);

        let rows = reader.events_for_package("TC-000001").unwrap();

        let order: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[test]
    fn event_counts_omit_packages_without_events() {
        let pool = setup_test_db();
        seed(&pool);
        // TC-000001 gets three events, TC-000002 gets none.
        insert_event_at(&pool, "TC-000001", "2026-08-20T09:00:00.000Z", "a");
        insert_event_at(&pool, "TC-000001", "2026-08-20T10:00:00.000Z", "b");
        insert_event_at(&pool, "TC-000001", "2026-08-20T11:00:00.000Z", "c");
        let reader = ReportReader::new(pool);

        let rows = reader.packages_with_event_counts("Acme Oy").unwrap();

        assert_eq!(
            rows,
            vec![PackageEventCount {
                tracking_code: "TC-000001".to_string(),
                events: 3,
            }]
        );
    }

    #[test]
    fn event_counts_for_unknown_customer_is_not_found() {
        let pool = setup_test_db();
        seed(&pool);
        let reader = ReportReader::new(pool);

        let result = reader.packages_with_event_counts("Nobody");

        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "customer",
                ..
            })
        ));
    }

    #[test]
    fn day_query_partitions_on_the_midnight_boundary() {
        let pool = setup_test_db();
        seed(&pool);
        insert_event_at(&pool, "TC-000001", "2026-08-20T23:59:59.000Z", "late");
        insert_event_at(&pool, "TC-000001", "2026-08-21T00:00:01.000Z", "early next day");
        let reader = ReportReader::new(pool);

        let day = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let rows = reader.events_for_location_on_day("Helsinki", day).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "late");
    }

    #[test]
    fn day_query_for_unknown_location_is_not_found() {
        let pool = setup_test_db();
        let reader = ReportReader::new(pool);

        let day = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let result = reader.events_for_location_on_day("Atlantis", day);

        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "location",
                ..
            })
        ));
    }

    #[test]
    fn day_query_orders_events_within_the_day() {
        let pool = setup_test_db();
        seed(&pool);
        insert_event_at(&pool, "TC-000001", "2026-08-20T18:00:00.000Z", "evening");
        insert_event_at(&pool, "TC-000002", "2026-08-20T06:00:00.000Z", "morning");
        let reader = ReportReader::new(pool);

        let day = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let rows = reader.events_for_location_on_day("Helsinki", day).unwrap();

        let order: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(order, ["morning", "evening"]);
    }
}
