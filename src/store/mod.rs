//! Data-access layer for the tracking tables.
//!
//! Each component holds a connection pool and exposes one operator-facing
//! operation: get-or-create resolution for natural-key entities, package
//! registration, event recording, reporting queries, and the staged load
//! test. All writes are append-only; rows are never updated or deleted.

pub mod loadtest;
pub mod recorder;
pub mod registry;
pub mod report;
pub mod resolver;

pub use loadtest::{LoadTestHarness, LoadTestProfile, StageReport};
pub use recorder::EventRecorder;
pub use registry::PackageRegistry;
pub use report::{PackageEventCount, ReportReader};
pub use resolver::EntityResolver;

/// Outcome of a get-or-create resolution.
///
/// "Already exists" is informational, not a failure, so both outcomes carry
/// the surrogate id and the caller decides how to present them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A new row was inserted.
    Created(i32),
    /// A row with this natural key already existed; the store is unchanged.
    Existing(i32),
}

impl Resolution {
    /// The surrogate id, regardless of which branch was taken.
    #[must_use]
    pub fn id(self) -> i32 {
        match self {
            Resolution::Created(id) | Resolution::Existing(id) => id,
        }
    }

    /// Whether this resolution inserted a new row.
    #[must_use]
    pub fn was_created(self) -> bool {
        matches!(self, Resolution::Created(_))
    }
}
