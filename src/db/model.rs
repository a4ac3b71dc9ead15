//! Database row types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{customers, events, locations, packages};

/// Database row for a location.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LocationRow {
    pub id: i32,
    pub description: String,
}

/// Database row for a location (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = locations)]
pub struct NewLocationRow {
    pub description: String,
}

/// Database row for a customer.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CustomerRow {
    pub id: i32,
    pub name: String,
}

/// Database row for a customer (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = customers)]
pub struct NewCustomerRow {
    pub name: String,
}

/// Database row for a package.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = packages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PackageRow {
    pub id: i32,
    pub tracking_code: String,
    pub customer_id: i32,
}

/// Database row for a package (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = packages)]
pub struct NewPackageRow {
    pub tracking_code: String,
    pub customer_id: i32,
}

/// Database row for a tracking event.
///
/// The timestamp is RFC 3339 UTC text assigned by the store at insertion
/// time; events are append-only and never updated.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventRow {
    pub id: i32,
    pub timestamp: String,
    pub package_id: i32,
    pub location_id: i32,
    pub description: String,
}

/// Database row for a tracking event (insertable; timestamp defaulted).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = events)]
pub struct NewEventRow {
    pub package_id: i32,
    pub location_id: i32,
    pub description: String,
}
