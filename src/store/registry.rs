//! Package registration keyed by tracking code.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use crate::db::model::NewPackageRow;
use crate::db::schema::packages;
use crate::db::{self, DbPool};
use crate::error::{Error, Result};
use crate::store::resolver::find_customer_id;
use crate::store::Resolution;

/// Registers packages under an existing customer.
///
/// The owning customer must already exist; unlike the get-or-create paths
/// for locations and customers, a missing customer is a `NotFound` and
/// nothing is written.
pub struct PackageRegistry {
    pool: DbPool,
}

impl PackageRegistry {
    /// Create a registry backed by the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Register a package with the given tracking code for a customer.
    ///
    /// Returns `Existing` and leaves the store unchanged when a package
    /// with that tracking code is already registered. The customer
    /// reference is fixed at creation and never changed afterwards.
    ///
    /// # Errors
    /// Returns `NotFound` if the customer does not exist, or a store error
    /// if a lookup or the insert fails.
    pub fn add_package(&self, tracking_code: &str, customer_name: &str) -> Result<Resolution> {
        let mut conn = db::checkout(&self.pool)?;

        let customer_id = find_customer_id(&mut conn, customer_name)?
            .ok_or_else(|| Error::not_found("customer", customer_name))?;

        if let Some(id) = find_package_id(&mut conn, tracking_code)? {
            return Ok(Resolution::Existing(id));
        }

        let inserted = diesel::insert_into(packages::table)
            .values(&NewPackageRow {
                tracking_code: tracking_code.to_owned(),
                customer_id,
            })
            .execute(&mut conn);

        match inserted {
            Ok(_) => {
                let id = find_package_id(&mut conn, tracking_code)?
                    .ok_or_else(|| Error::Database("inserted package not readable".into()))?;
                Ok(Resolution::Created(id))
            }
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                let id = find_package_id(&mut conn, tracking_code)?
                    .ok_or_else(|| Error::Database("conflicting package not readable".into()))?;
                Ok(Resolution::Existing(id))
            }
            Err(e) => Err(Error::Database(e.to_string())),
        }
    }
}

/// Read-only lookup of a package id by tracking code.
pub(crate) fn find_package_id(
    conn: &mut diesel::SqliteConnection,
    tracking_code: &str,
) -> Result<Option<i32>> {
    packages::table
        .filter(packages::tracking_code.eq(tracking_code))
        .select(packages::id)
        .first::<i32>(conn)
        .optional()
        .map_err(|e| Error::Database(e.to_string()))
}
