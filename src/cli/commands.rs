//! Handlers for the non-interactive subcommands.
//!
//! Each handler validates its text arguments, invokes exactly one store
//! operation, and formats the structured result for the operator. The
//! store never sees untrimmed or empty strings.

use chrono::NaiveDate;
use tabled::{Table, Tabled};

use crate::cli::{output, Commands, LoadTestArgs};
use crate::db::model::EventRow;
use crate::db::{self, DbPool};
use crate::error::{Error, Result};
use crate::store::{
    EntityResolver, EventRecorder, LoadTestHarness, LoadTestProfile, PackageRegistry,
    Resolution, ReportReader, StageReport,
};

/// Route a parsed subcommand to its handler.
pub fn dispatch(command: Commands, pool: &DbPool) -> Result<()> {
    match command {
        Commands::Init => init(pool),
        Commands::AddLocation { description } => add_location(pool, &description),
        Commands::AddCustomer { name } => add_customer(pool, &name),
        Commands::AddPackage {
            tracking_code,
            customer,
        } => add_package(pool, &tracking_code, &customer),
        Commands::AddEvent {
            location,
            tracking_code,
            description,
        } => add_event(pool, &location, &tracking_code, &description),
        Commands::Events { tracking_code } => events_for_package(pool, &tracking_code),
        Commands::Packages { customer } => packages_for_customer(pool, &customer),
        Commands::LocationDay { location, date } => events_for_location_on_day(pool, &location, date),
        Commands::LoadTest(args) => load_test(pool, &args),
    }
}

/// Trim a text argument, rejecting blank input before it reaches the store.
fn require_nonempty<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Parse(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

pub fn init(pool: &DbPool) -> Result<()> {
    db::ensure_schema(pool)?;
    output::ok("tracking tables ready");
    Ok(())
}

pub fn add_location(pool: &DbPool, description: &str) -> Result<()> {
    let description = require_nonempty("location", description)?;

    match EntityResolver::new(pool.clone()).resolve_location(description)? {
        Resolution::Created(id) => output::ok(&format!("location '{description}' added (id {id})")),
        Resolution::Existing(id) => {
            output::note(&format!("location '{description}' already exists (id {id})"));
        }
    }
    Ok(())
}

pub fn add_customer(pool: &DbPool, name: &str) -> Result<()> {
    let name = require_nonempty("customer", name)?;

    match EntityResolver::new(pool.clone()).resolve_customer(name)? {
        Resolution::Created(id) => output::ok(&format!("customer '{name}' added (id {id})")),
        Resolution::Existing(id) => {
            output::note(&format!("customer '{name}' already exists (id {id})"));
        }
    }
    Ok(())
}

pub fn add_package(pool: &DbPool, tracking_code: &str, customer: &str) -> Result<()> {
    let tracking_code = require_nonempty("tracking code", tracking_code)?;
    let customer = require_nonempty("customer", customer)?;

    match PackageRegistry::new(pool.clone()).add_package(tracking_code, customer)? {
        Resolution::Created(id) => {
            output::ok(&format!("package '{tracking_code}' registered (id {id})"));
        }
        Resolution::Existing(id) => {
            output::note(&format!("package '{tracking_code}' already exists (id {id})"));
        }
    }
    Ok(())
}

pub fn add_event(
    pool: &DbPool,
    location: &str,
    tracking_code: &str,
    description: &str,
) -> Result<()> {
    let location = require_nonempty("location", location)?;
    let tracking_code = require_nonempty("tracking code", tracking_code)?;
    let description = require_nonempty("description", description)?;

    EventRecorder::new(pool.clone()).add_event(location, tracking_code, description)?;
    output::ok(&format!("event recorded for '{tracking_code}' at '{location}'"));
    Ok(())
}

#[derive(Tabled)]
struct EventLine {
    #[tabled(rename = "timestamp")]
    timestamp: String,
    #[tabled(rename = "description")]
    description: String,
}

impl From<EventRow> for EventLine {
    fn from(row: EventRow) -> Self {
        Self {
            timestamp: row.timestamp,
            description: row.description,
        }
    }
}

pub fn events_for_package(pool: &DbPool, tracking_code: &str) -> Result<()> {
    let tracking_code = require_nonempty("tracking code", tracking_code)?;

    let rows = ReportReader::new(pool.clone()).events_for_package(tracking_code)?;
    if rows.is_empty() {
        output::note(&format!("package '{tracking_code}' has no events"));
        return Ok(());
    }

    output::section(&format!("Events for package '{tracking_code}'"));
    let lines: Vec<EventLine> = rows.into_iter().map(EventLine::from).collect();
    output::note(&Table::new(lines).to_string());
    Ok(())
}

#[derive(Tabled)]
struct PackageCountLine {
    #[tabled(rename = "tracking code")]
    tracking_code: String,
    #[tabled(rename = "events")]
    events: i64,
}

pub fn packages_for_customer(pool: &DbPool, customer: &str) -> Result<()> {
    let customer = require_nonempty("customer", customer)?;

    let rows = ReportReader::new(pool.clone()).packages_with_event_counts(customer)?;
    if rows.is_empty() {
        output::note(&format!("customer '{customer}' has no packages with events"));
        return Ok(());
    }

    output::section(&format!("Packages with events for '{customer}'"));
    let lines: Vec<PackageCountLine> = rows
        .into_iter()
        .map(|row| PackageCountLine {
            tracking_code: row.tracking_code,
            events: row.events,
        })
        .collect();
    output::note(&Table::new(lines).to_string());
    Ok(())
}

pub fn events_for_location_on_day(pool: &DbPool, location: &str, date: NaiveDate) -> Result<()> {
    let location = require_nonempty("location", location)?;

    let rows = ReportReader::new(pool.clone()).events_for_location_on_day(location, date)?;
    if rows.is_empty() {
        output::note(&format!("no events at '{location}' on {date}"));
        return Ok(());
    }

    output::section(&format!("Events at '{location}' on {date}"));
    let lines: Vec<EventLine> = rows.into_iter().map(EventLine::from).collect();
    output::note(&Table::new(lines).to_string());
    Ok(())
}

#[derive(Tabled)]
struct StageLine {
    #[tabled(rename = "stage")]
    stage: &'static str,
    #[tabled(rename = "rows")]
    rows: usize,
    #[tabled(rename = "elapsed (ms)")]
    elapsed_ms: u128,
}

impl From<&StageReport> for StageLine {
    fn from(report: &StageReport) -> Self {
        Self {
            stage: report.label,
            rows: report.rows,
            elapsed_ms: report.elapsed.as_millis(),
        }
    }
}

pub fn load_test(pool: &DbPool, args: &LoadTestArgs) -> Result<()> {
    let profile = LoadTestProfile {
        entity_rows: args.rows,
        event_batches: args.batches,
        events_per_batch: args.batch_size,
        point_queries: args.queries,
    };

    output::section("Load test");
    let reports = LoadTestHarness::new(pool.clone()).run(&profile)?;

    let lines: Vec<StageLine> = reports.iter().map(StageLine::from).collect();
    output::note(&Table::new(lines).to_string());

    let total: u128 = reports.iter().map(|r| r.elapsed.as_millis()).sum();
    output::key_value("total elapsed (ms)", total);
    Ok(())
}
