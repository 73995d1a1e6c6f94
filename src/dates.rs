/// Calendar arithmetic for the reporting window.
///
/// The precipitation and tobs routes report "the last year of data":
/// everything from one calendar year before the newest measurement date
/// onward. Path-segment dates from the temperature routes are parsed
/// here too, so the endpoint layer rejects malformed input before any
/// query runs.

use chrono::{Datelike, NaiveDate};

/// Returns the date one calendar year before `anchor`: same month and
/// day, previous year. A Feb 29 anchor clamps to Feb 28, since the
/// prior year has no Feb 29.
pub fn one_year_before(anchor: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(anchor.year() - 1, anchor.month(), anchor.day()).unwrap_or_else(|| {
        // only reachable for Feb 29 anchors
        NaiveDate::from_ymd_opt(anchor.year() - 1, 2, 28).expect("Feb 28 exists in every year")
    })
}

/// Parses a `YYYY-MM-DD` path segment. `None` for anything that is not
/// a valid calendar date in that format.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
