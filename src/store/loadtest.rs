//! Staged bulk-insert and point-read throughput measurement.
//!
//! Populates the schema with synthetic rows in explicitly-transacted
//! batches and times each stage, then times independent point queries with
//! per-statement autocommit back in effect. Transaction scope is expressed
//! through scoped `Connection::transaction` calls, so every exit path
//! commits or rolls back the in-flight batch; no ambient autocommit flag
//! is toggled.
//!
//! A store error aborts the remaining stages. Stages already committed stay
//! committed; in particular, rerunning against an already-populated database
//! stops at the first unique-constraint violation on the synthetic keys.

use std::time::{Duration, Instant};

use diesel::prelude::*;
use rand::Rng;
use tracing::info;

use crate::db::model::{NewCustomerRow, NewEventRow, NewLocationRow, NewPackageRow};
use crate::db::schema::{customers, events, locations, packages};
use crate::db::{self, DbConn, DbPool};
use crate::error::{Error, Result};

/// Row counts for one load-test run.
#[derive(Debug, Clone, Copy)]
pub struct LoadTestProfile {
    /// Rows inserted into each of locations, customers, and packages.
    pub entity_rows: usize,
    /// Number of event insert transactions.
    pub event_batches: usize,
    /// Events inserted per transaction.
    pub events_per_batch: usize,
    /// Independent point queries per read stage.
    pub point_queries: usize,
}

impl Default for LoadTestProfile {
    fn default() -> Self {
        Self {
            entity_rows: 1000,
            event_batches: 1000,
            events_per_batch: 1000,
            point_queries: 1000,
        }
    }
}

/// Wall-clock timing for one completed stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub label: &'static str,
    pub rows: usize,
    pub elapsed: Duration,
}

/// Runs the staged load test against the tracking schema.
pub struct LoadTestHarness {
    pool: DbPool,
}

impl LoadTestHarness {
    /// Create a harness backed by the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Execute all six stages in order, returning per-stage timings.
    ///
    /// # Errors
    /// Returns the first store error; later stages are not attempted.
    pub fn run(&self, profile: &LoadTestProfile) -> Result<Vec<StageReport>> {
        let mut conn = db::checkout(&self.pool)?;
        let mut reports = Vec::with_capacity(6);

        reports.push(self.insert_locations(&mut conn, profile)?);
        reports.push(self.insert_customers(&mut conn, profile)?);
        reports.push(self.insert_packages(&mut conn, profile)?);
        reports.push(self.insert_events(&mut conn, profile)?);
        reports.push(self.count_packages_per_customer(&mut conn, profile)?);
        reports.push(self.count_events_per_package(&mut conn, profile)?);

        Ok(reports)
    }

    fn insert_locations(&self, conn: &mut DbConn, profile: &LoadTestProfile) -> Result<StageReport> {
        let rows: Vec<NewLocationRow> = (1..=profile.entity_rows)
            .map(|i| NewLocationRow {
                description: format!("LOC-{i:04}"),
            })
            .collect();

        let started = Instant::now();
        conn.transaction(|conn| {
            diesel::insert_into(locations::table)
                .values(&rows)
                .execute(conn)
        })
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(finish_stage("insert locations", rows.len(), started))
    }

    fn insert_customers(&self, conn: &mut DbConn, profile: &LoadTestProfile) -> Result<StageReport> {
        let rows: Vec<NewCustomerRow> = (1..=profile.entity_rows)
            .map(|i| NewCustomerRow {
                name: format!("CUST-{i:04}"),
            })
            .collect();

        let started = Instant::now();
        conn.transaction(|conn| {
            diesel::insert_into(customers::table)
                .values(&rows)
                .execute(conn)
        })
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(finish_stage("insert customers", rows.len(), started))
    }

    fn insert_packages(&self, conn: &mut DbConn, profile: &LoadTestProfile) -> Result<StageReport> {
        let customer_ids = require_ids(customers::table.select(customers::id).load(conn))?;
        let mut rng = rand::thread_rng();

        let rows: Vec<NewPackageRow> = (1..=profile.entity_rows)
            .map(|i| NewPackageRow {
                tracking_code: format!("TC-{i:06}"),
                customer_id: pick(&mut rng, &customer_ids),
            })
            .collect();

        let started = Instant::now();
        conn.transaction(|conn| {
            diesel::insert_into(packages::table)
                .values(&rows)
                .execute(conn)
        })
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(finish_stage("insert packages", rows.len(), started))
    }

    fn insert_events(&self, conn: &mut DbConn, profile: &LoadTestProfile) -> Result<StageReport> {
        let package_ids = require_ids(packages::table.select(packages::id).load(conn))?;
        let location_ids = require_ids(locations::table.select(locations::id).load(conn))?;
        let mut rng = rand::thread_rng();

        let started = Instant::now();
        for _ in 0..profile.event_batches {
            let rows: Vec<NewEventRow> = (0..profile.events_per_batch)
                .map(|_| NewEventRow {
                    package_id: pick(&mut rng, &package_ids),
                    location_id: pick(&mut rng, &location_ids),
                    description: "Package registered.".to_string(),
                })
                .collect();

            conn.transaction(|conn| {
                diesel::insert_into(events::table)
                    .values(&rows)
                    .execute(conn)
            })
            .map_err(|e| Error::Database(e.to_string()))?;
        }

        let total = profile.event_batches * profile.events_per_batch;
        Ok(finish_stage("insert events", total, started))
    }

    fn count_packages_per_customer(
        &self,
        conn: &mut DbConn,
        profile: &LoadTestProfile,
    ) -> Result<StageReport> {
        let customer_ids = require_ids(customers::table.select(customers::id).load(conn))?;
        let mut rng = rand::thread_rng();

        let started = Instant::now();
        for _ in 0..profile.point_queries {
            let customer_id = pick(&mut rng, &customer_ids);
            let _count: i64 = packages::table
                .filter(packages::customer_id.eq(customer_id))
                .count()
                .get_result(conn)
                .map_err(|e| Error::Database(e.to_string()))?;
        }

        Ok(finish_stage(
            "count packages per customer",
            profile.point_queries,
            started,
        ))
    }

    fn count_events_per_package(
        &self,
        conn: &mut DbConn,
        profile: &LoadTestProfile,
    ) -> Result<StageReport> {
        let package_ids = require_ids(packages::table.select(packages::id).load(conn))?;
        let mut rng = rand::thread_rng();

        let started = Instant::now();
        for _ in 0..profile.point_queries {
            let package_id = pick(&mut rng, &package_ids);
            let _count: i64 = events::table
                .filter(events::package_id.eq(package_id))
                .count()
                .get_result(conn)
                .map_err(|e| Error::Database(e.to_string()))?;
        }

        Ok(finish_stage(
            "count events per package",
            profile.point_queries,
            started,
        ))
    }
}

fn finish_stage(label: &'static str, rows: usize, started: Instant) -> StageReport {
    let elapsed = started.elapsed();
    info!(
        stage = label,
        rows,
        elapsed_ms = elapsed.as_millis() as u64,
        "load test stage complete"
    );
    StageReport {
        label,
        rows,
        elapsed,
    }
}

/// Unwrap an id listing, requiring at least one referenced row.
fn require_ids(ids: QueryResult<Vec<i32>>) -> Result<Vec<i32>> {
    let ids = ids.map_err(|e| Error::Database(e.to_string()))?;
    if ids.is_empty() {
        return Err(Error::Database(
            "load test requires referenced rows to exist".into(),
        ));
    }
    Ok(ids)
}

fn pick<R: Rng>(rng: &mut R, ids: &[i32]) -> i32 {
    ids[rng.gen_range(0..ids.len())]
}
