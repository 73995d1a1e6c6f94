/// Shared data types for the climate summary service.
///
/// These are the records produced by the query layer (`store`) and
/// consumed by the HTTP handlers (`endpoint`). Observation values are
/// NUMERIC in PostgreSQL and converted to f64 at the store boundary, so
/// everything above the store works in plain floats.

use chrono::NaiveDate;

/// One precipitation observation: a station, a day, and the recorded
/// rainfall in inches. `prcp` is `None` when the gauge reported nothing
/// for that day.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipReading {
    pub station: String,
    pub date: NaiveDate,
    pub prcp: Option<f64>,
}

/// A station's identity. The station table also carries latitude,
/// longitude, and elevation, but no route serves them.
#[derive(Debug, Clone, PartialEq)]
pub struct StationEntry {
    pub station: String,
    pub name: String,
}

/// One temperature observation for a single station.
#[derive(Debug, Clone, PartialEq)]
pub struct TobsReading {
    pub date: NaiveDate,
    pub tobs: Option<f64>,
}

/// Aggregate temperature statistics over a date range. Only constructed
/// when the range matched at least one non-null observation, so the
/// fields are non-optional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}
