pub mod migrations;
pub mod records;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use records::ElectionStore;

/// Bookkeeping row written in the same transaction as a bulk load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadInfo {
    pub source: String,
    pub row_count: u64,
    pub loaded_at: DateTime<Utc>,
}

/// A (year, constituency) pair whose winner count is not exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerAnomaly {
    pub year: i32,
    pub constituency: String,
    pub winners: i64,
}
