//! Error types.
//!
//! Expected outcomes (missing OFF shift, lease contention, unknown rule
//! names) are reported as values by the operations themselves. The enums
//! here cover conditions a caller cannot recover from locally.

use thiserror::Error;

/// Failure of the backing store behind leases and schedules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("transaction conflict on {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by the scheduler lease protocol.
#[derive(Debug, Error)]
pub enum LeaseError {
    #[error("lease duration must be positive, got {0}s")]
    InvalidDuration(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised when a manual edit cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("worker '{0}' has no assignment in this schedule")]
    UnknownWorker(String),
    #[error("shift type '{0}' is not in the catalogue")]
    UnknownShift(String),
    #[error("day {day} is outside {month}")]
    DayOutOfRange { day: u32, month: String },
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A `YYYY-MM` string that does not name a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month '{0}', expected YYYY-MM")]
pub struct MonthParseError(pub String);

/// Errors raised by the lease-guarded roster workflow.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user '{user_id}' does not hold the scheduler lease for {group}")]
    NotLeaseHolder { user_id: String, group: String },
    #[error(transparent)]
    Lease(#[from] LeaseError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Edit(#[from] EditError),
}
