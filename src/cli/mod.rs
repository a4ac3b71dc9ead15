//! Command-line interface definitions.

pub mod commands;
pub mod menu;
pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Parceltrack - operator console for tracking parcels through location events.
#[derive(Parser, Debug)]
#[command(name = "parceltrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to parceltrack.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Without a subcommand, the interactive menu starts.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the tracking tables if they do not exist
    Init,

    /// Add a location, or report that it already exists
    AddLocation {
        /// Location description, e.g. "Helsinki sorting center"
        description: String,
    },

    /// Add a customer, or report that it already exists
    AddCustomer {
        /// Customer name
        name: String,
    },

    /// Register a package for an existing customer
    AddPackage {
        /// Tracking code of the new package
        tracking_code: String,
        /// Name of the owning customer (must already exist)
        customer: String,
    },

    /// Record an event for a package at a location
    AddEvent {
        /// Location description (must already exist)
        location: String,
        /// Tracking code of the package (must already exist)
        tracking_code: String,
        /// What happened
        description: String,
    },

    /// List all events for a package, oldest first
    Events {
        /// Tracking code of the package
        tracking_code: String,
    },

    /// List a customer's packages with their event counts
    Packages {
        /// Customer name
        customer: String,
    },

    /// List events at a location on a calendar day
    LocationDay {
        /// Location description
        location: String,
        /// Day in YYYY-MM-DD form
        date: NaiveDate,
    },

    /// Run the staged insert/read load test
    LoadTest(LoadTestArgs),
}

/// Overrides for the load-test row counts.
#[derive(Args, Debug)]
pub struct LoadTestArgs {
    /// Rows inserted into each of locations, customers, and packages
    #[arg(long, default_value_t = 1000)]
    pub rows: usize,

    /// Number of event insert transactions
    #[arg(long, default_value_t = 1000)]
    pub batches: usize,

    /// Events inserted per transaction
    #[arg(long, default_value_t = 1000)]
    pub batch_size: usize,

    /// Point queries per read stage
    #[arg(long, default_value_t = 1000)]
    pub queries: usize,
}
