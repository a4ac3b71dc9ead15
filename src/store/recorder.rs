//! Appends tracking events to the event log.

use diesel::prelude::*;

use crate::db::model::NewEventRow;
use crate::db::schema::events;
use crate::db::{self, DbPool};
use crate::error::{Error, Result};
use crate::store::registry::find_package_id;
use crate::store::resolver::find_location_id;

/// Records location events against registered packages.
///
/// Both the location and the package must already exist; the recorder never
/// creates either. Nothing is written until both references are confirmed,
/// so a failed lookup leaves the store untouched.
pub struct EventRecorder {
    pool: DbPool,
}

impl EventRecorder {
    /// Create a recorder backed by the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append an event for a package at a location.
    ///
    /// The timestamp is assigned by the store at insertion time.
    ///
    /// # Errors
    /// Returns `NotFound` if the location or package does not exist, or a
    /// store error if a lookup or the insert fails.
    pub fn add_event(
        &self,
        location_description: &str,
        tracking_code: &str,
        description: &str,
    ) -> Result<()> {
        let mut conn = db::checkout(&self.pool)?;

        let location_id = find_location_id(&mut conn, location_description)?
            .ok_or_else(|| Error::not_found("location", location_description))?;

        let package_id = find_package_id(&mut conn, tracking_code)?
            .ok_or_else(|| Error::not_found("package", tracking_code))?;

        diesel::insert_into(events::table)
            .values(&NewEventRow {
                package_id,
                location_id,
                description: description.to_owned(),
            })
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, ensure_schema};
    use crate::store::{EntityResolver, PackageRegistry};

    fn setup_test_db() -> DbPool {
        let pool = create_pool(":memory:").expect("create pool");
        ensure_schema(&pool).expect("run migrations");
        pool
    }

    fn seed_package(pool: &DbPool, tracking_code: &str) {
        let resolver = EntityResolver::new(pool.clone());
        resolver.resolve_customer("Acme Oy").unwrap();
        resolver.resolve_location("Helsinki").unwrap();
        PackageRegistry::new(pool.clone())
            .add_package(tracking_code, "Acme Oy")
            .unwrap();
    }

    fn event_count(pool: &DbPool) -> i64 {
        let mut conn = pool.get().unwrap();
        events::table.count().get_result(&mut conn).unwrap()
    }

    #[test]
    fn records_event_for_existing_package_and_location() {
        let pool = setup_test_db();
        seed_package(&pool, "TC-000001");
        let recorder = EventRecorder::new(pool.clone());

        recorder
            .add_event("Helsinki", "TC-000001", "Arrived at sorting center")
            .unwrap();

        assert_eq!(event_count(&pool), 1);
    }

    #[test]
    fn missing_location_writes_nothing() {
        let pool = setup_test_db();
        seed_package(&pool, "TC-000001");
        let recorder = EventRecorder::new(pool.clone());

        let result = recorder.add_event("Atlantis", "TC-000001", "Arrived");

        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "location",
                ..
            })
        ));
        assert_eq!(event_count(&pool), 0);
    }

    #[test]
    fn missing_package_writes_nothing() {
        let pool = setup_test_db();
        seed_package(&pool, "TC-000001");
        let recorder = EventRecorder::new(pool.clone());

        let result = recorder.add_event("Helsinki", "TC-999999", "Arrived");

        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "package",
                ..
            })
        ));
        assert_eq!(event_count(&pool), 0);
    }

    #[test]
    fn recorder_never_creates_the_missing_entities() {
        let pool = setup_test_db();
        let recorder = EventRecorder::new(pool.clone());

        let _ = recorder.add_event("Helsinki", "TC-000001", "Arrived");

        let mut conn = pool.get().unwrap();
        let locations: i64 = crate::db::schema::locations::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        let packages: i64 = crate::db::schema::packages::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(locations, 0);
        assert_eq!(packages, 0);
    }
}
