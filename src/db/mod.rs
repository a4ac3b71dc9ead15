//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling and idempotent schema setup for the
//! SQLite database backing the tracking tables.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

pub mod model;
pub mod schema;

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// A checked-out pooled connection.
pub type DbConn = diesel::r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Create a connection pool for the given database URL.
///
/// One operator, one in-flight operation: a single connection is enough,
/// and it keeps `:memory:` databases coherent across checkouts.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Ensure the four tracking tables exist, leaving existing tables untouched.
///
/// Safe to call any number of times; already-applied migrations are skipped.
///
/// # Errors
/// Returns an error if a migration fails to apply.
pub fn ensure_schema(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

/// Get a pooled connection, mapping pool exhaustion to a connection error.
pub(crate) fn checkout(pool: &DbPool) -> Result<DbConn> {
    pool.get().map_err(|e| Error::Connection(e.to_string()))
}
