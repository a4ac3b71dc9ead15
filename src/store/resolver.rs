//! Get-or-create resolution for natural-key entities.
//!
//! Locations and customers are both single-unique-text-column tables, and
//! resolution follows the same two-step shape for each: look the value up,
//! insert if absent. The UNIQUE constraint on the natural-key column closes
//! the check-then-act window; a unique-violation on insert means another
//! writer won, and the winning id is re-read instead of surfacing an error.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use crate::db::model::{NewCustomerRow, NewLocationRow};
use crate::db::schema::{customers, locations};
use crate::db::{self, DbPool};
use crate::error::{Error, Result};
use crate::store::Resolution;

/// Resolves locations and customers by natural key, creating them if absent.
pub struct EntityResolver {
    pool: DbPool,
}

impl EntityResolver {
    /// Create a resolver backed by the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Resolve a location by description, inserting it if absent.
    ///
    /// # Errors
    /// Returns a store error if the lookup or insert fails.
    pub fn resolve_location(&self, description: &str) -> Result<Resolution> {
        let mut conn = db::checkout(&self.pool)?;

        if let Some(id) = find_location_id(&mut conn, description)? {
            return Ok(Resolution::Existing(id));
        }

        let inserted = diesel::insert_into(locations::table)
            .values(&NewLocationRow {
                description: description.to_owned(),
            })
            .execute(&mut conn);

        match inserted {
            Ok(_) => {
                let id = find_location_id(&mut conn, description)?
                    .ok_or_else(|| Error::Database("inserted location not readable".into()))?;
                Ok(Resolution::Created(id))
            }
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                // Lost the race; the winner's row carries the id.
                let id = find_location_id(&mut conn, description)?
                    .ok_or_else(|| Error::Database("conflicting location not readable".into()))?;
                Ok(Resolution::Existing(id))
            }
            Err(e) => Err(Error::Database(e.to_string())),
        }
    }

    /// Resolve a customer by name, inserting it if absent.
    ///
    /// # Errors
    /// Returns a store error if the lookup or insert fails.
    pub fn resolve_customer(&self, name: &str) -> Result<Resolution> {
        let mut conn = db::checkout(&self.pool)?;

        if let Some(id) = find_customer_id(&mut conn, name)? {
            return Ok(Resolution::Existing(id));
        }

        let inserted = diesel::insert_into(customers::table)
            .values(&NewCustomerRow {
                name: name.to_owned(),
            })
            .execute(&mut conn);

        match inserted {
            Ok(_) => {
                let id = find_customer_id(&mut conn, name)?
                    .ok_or_else(|| Error::Database("inserted customer not readable".into()))?;
                Ok(Resolution::Created(id))
            }
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                let id = find_customer_id(&mut conn, name)?
                    .ok_or_else(|| Error::Database("conflicting customer not readable".into()))?;
                Ok(Resolution::Existing(id))
            }
            Err(e) => Err(Error::Database(e.to_string())),
        }
    }
}

/// Read-only lookup of a location id by description.
pub(crate) fn find_location_id(
    conn: &mut diesel::SqliteConnection,
    description: &str,
) -> Result<Option<i32>> {
    locations::table
        .filter(locations::description.eq(description))
        .select(locations::id)
        .first::<i32>(conn)
        .optional()
        .map_err(|e| Error::Database(e.to_string()))
}

/// Read-only lookup of a customer id by name.
pub(crate) fn find_customer_id(
    conn: &mut diesel::SqliteConnection,
    name: &str,
) -> Result<Option<i32>> {
    customers::table
        .filter(customers::name.eq(name))
        .select(customers::id)
        .first::<i32>(conn)
        .optional()
        .map_err(|e| Error::Database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, ensure_schema};

    fn setup_test_db() -> DbPool {
        let pool = create_pool(":memory:").expect("create pool");
        ensure_schema(&pool).expect("run migrations");
        pool
    }

    #[test]
    fn first_resolution_creates_a_row() {
        let pool = setup_test_db();
        let resolver = EntityResolver::new(pool);

        let resolution = resolver.resolve_location("Helsinki").unwrap();

        assert!(resolution.was_created());
        assert!(resolution.id() > 0);
    }

    #[test]
    fn second_resolution_returns_same_id_without_inserting() {
        let pool = setup_test_db();
        let resolver = EntityResolver::new(pool.clone());

        let first = resolver.resolve_location("Helsinki").unwrap();
        let second = resolver.resolve_location("Helsinki").unwrap();

        assert_eq!(first.id(), second.id());
        assert!(matches!(second, Resolution::Existing(_)));

        let mut conn = pool.get().unwrap();
        let count: i64 = locations::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn distinct_values_get_distinct_ids() {
        let pool = setup_test_db();
        let resolver = EntityResolver::new(pool);

        let helsinki = resolver.resolve_location("Helsinki").unwrap();
        let tampere = resolver.resolve_location("Tampere").unwrap();

        assert_ne!(helsinki.id(), tampere.id());
        assert!(tampere.was_created());
    }

    #[test]
    fn customer_resolution_is_idempotent() {
        let pool = setup_test_db();
        let resolver = EntityResolver::new(pool.clone());

        let first = resolver.resolve_customer("Acme Oy").unwrap();
        let second = resolver.resolve_customer("Acme Oy").unwrap();

        assert!(first.was_created());
        assert_eq!(first.id(), second.id());

        let mut conn = pool.get().unwrap();
        let count: i64 = customers::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn locations_and_customers_do_not_share_keyspace() {
        let pool = setup_test_db();
        let resolver = EntityResolver::new(pool);

        // Same text in both tables is two independent rows.
        let location = resolver.resolve_location("Acme Oy").unwrap();
        let customer = resolver.resolve_customer("Acme Oy").unwrap();

        assert!(location.was_created());
        assert!(customer.was_created());
    }
}
