/// Query layer for the climate dataset.
///
/// `ClimateStore` is the seam between HTTP handlers and storage: the
/// production implementation (`pg`) runs SQL against PostgreSQL, and
/// the test implementation (`fixtures::MemStore`) answers the same
/// questions from an in-memory dataset. Handlers depend only on the
/// trait, which keeps them testable without a database or a socket.

pub mod pg;

#[cfg(test)]
pub(crate) mod fixtures;

use chrono::NaiveDate;

use crate::model::{PrecipReading, StationEntry, TempSummary, TobsReading};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure modes of the query layer.
#[derive(Debug)]
pub enum StoreError {
    /// The measurement table has no rows at all.
    EmptyDataset,
    /// An aggregate filter matched zero rows.
    NoMatchingRows,
    /// The database driver reported an error.
    Db(postgres::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::EmptyDataset => write!(f, "no measurements in the dataset"),
            StoreError::NoMatchingRows => {
                write!(f, "no measurements match the requested date range")
            }
            StoreError::Db(e) => write!(f, "database query failed: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<postgres::Error> for StoreError {
    fn from(e: postgres::Error) -> Self {
        StoreError::Db(e)
    }
}

// ---------------------------------------------------------------------------
// The store trait
// ---------------------------------------------------------------------------

/// Read-only queries over the two-table climate dataset.
///
/// Methods take `&mut self` because the PostgreSQL client needs a
/// mutable borrow per query; the in-memory test store simply ignores
/// the mutability.
pub trait ClimateStore {
    /// The newest measurement date in the dataset.
    fn latest_date(&mut self) -> Result<NaiveDate, StoreError>;

    /// All precipitation readings on or after `cutoff`. No ordering or
    /// deduplication is promised.
    fn precipitation_since(
        &mut self,
        cutoff: NaiveDate,
    ) -> Result<Vec<PrecipReading>, StoreError>;

    /// Every station in the station table.
    fn list_stations(&mut self) -> Result<Vec<StationEntry>, StoreError>;

    /// The station with the most measurement rows. Ties break to the
    /// lexicographically smallest station id, so the answer is stable
    /// across runs.
    fn most_active_station(&mut self) -> Result<String, StoreError>;

    /// Temperature observations for one station on or after `cutoff`.
    fn tobs_since(
        &mut self,
        station: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<TobsReading>, StoreError>;

    /// Min/max/average temperature over `start..=end`, open-ended when
    /// `end` is `None`. `NoMatchingRows` when no observation falls in
    /// the range.
    fn temp_stats(
        &mut self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TempSummary, StoreError>;
}
