//! Parceltrack - an operator console for tracking parcels through
//! location-based events, backed by SQLite.
//!
//! A single operator drives the tool through numbered menu commands or
//! clap subcommands; every command maps to one operation in the [`store`]
//! layer, which returns structured results that the CLI formats for
//! display.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`db`] - Connection pool, schema setup, Diesel schema and row types
//! - [`store`] - Entity resolution, package registry, event recording,
//!   reports, and the staged load test
//! - [`cli`] - clap definitions, the interactive menu, and output helpers
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use parceltrack::db;
//! use parceltrack::store::{EntityResolver, PackageRegistry};
//!
//! # fn main() -> parceltrack::error::Result<()> {
//! let pool = db::create_pool("parceltrack.db")?;
//! db::ensure_schema(&pool)?;
//!
//! EntityResolver::new(pool.clone()).resolve_customer("Acme Oy")?;
//! PackageRegistry::new(pool).add_package("TC-000001", "Acme Oy")?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod store;
