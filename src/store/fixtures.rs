/// Test fixtures: an in-memory `ClimateStore` over small datasets.
///
/// `MemStore` answers the same questions as the PostgreSQL store from
/// plain vectors, letting handler and property tests run without a
/// database. The datasets are small enough to verify results by hand
/// but still cover: stations with different row counts, a most-active
/// tie, null precipitation and temperature values, and dates spanning
/// more than one year so the reporting-window cutoff actually filters.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::{ClimateStore, StoreError};
use crate::model::{PrecipReading, StationEntry, TempSummary, TobsReading};

/// One measurement row, mirroring `climate.measurement`.
#[derive(Debug, Clone)]
pub(crate) struct Observation {
    pub station: &'static str,
    pub date: NaiveDate,
    pub prcp: Option<f64>,
    pub tobs: Option<f64>,
}

/// In-memory query layer over fixture rows.
pub(crate) struct MemStore {
    observations: Vec<Observation>,
    stations: Vec<(&'static str, &'static str)>,
}

impl MemStore {
    pub(crate) fn new(
        observations: Vec<Observation>,
        stations: Vec<(&'static str, &'static str)>,
    ) -> Self {
        Self {
            observations,
            stations,
        }
    }
}

impl ClimateStore for MemStore {
    fn latest_date(&mut self) -> Result<NaiveDate, StoreError> {
        self.observations
            .iter()
            .map(|o| o.date)
            .max()
            .ok_or(StoreError::EmptyDataset)
    }

    fn precipitation_since(
        &mut self,
        cutoff: NaiveDate,
    ) -> Result<Vec<PrecipReading>, StoreError> {
        Ok(self
            .observations
            .iter()
            .filter(|o| o.date >= cutoff)
            .map(|o| PrecipReading {
                station: o.station.to_string(),
                date: o.date,
                prcp: o.prcp,
            })
            .collect())
    }

    fn list_stations(&mut self) -> Result<Vec<StationEntry>, StoreError> {
        Ok(self
            .stations
            .iter()
            .map(|(station, name)| StationEntry {
                station: station.to_string(),
                name: name.to_string(),
            })
            .collect())
    }

    fn most_active_station(&mut self) -> Result<String, StoreError> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for obs in &self.observations {
            *counts.entry(obs.station).or_insert(0) += 1;
        }

        counts
            .into_iter()
            // highest count wins; on equal counts the smaller station id
            // compares greater here, matching the SQL tie-break
            .max_by(|(a_station, a_count), (b_station, b_count)| {
                a_count.cmp(b_count).then_with(|| b_station.cmp(a_station))
            })
            .map(|(station, _)| station.to_string())
            .ok_or(StoreError::EmptyDataset)
    }

    fn tobs_since(
        &mut self,
        station: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<TobsReading>, StoreError> {
        Ok(self
            .observations
            .iter()
            .filter(|o| o.station == station && o.date >= cutoff)
            .map(|o| TobsReading {
                date: o.date,
                tobs: o.tobs,
            })
            .collect())
    }

    fn temp_stats(
        &mut self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TempSummary, StoreError> {
        let temps: Vec<f64> = self
            .observations
            .iter()
            .filter(|o| o.date >= start && end.is_none_or(|end| o.date <= end))
            .filter_map(|o| o.tobs)
            .collect();

        if temps.is_empty() {
            return Err(StoreError::NoMatchingRows);
        }

        let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
        let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = temps.iter().sum::<f64>() / temps.len() as f64;

        Ok(TempSummary { min, max, avg })
    }
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

pub(crate) fn d(s: &str) -> NaiveDate {
    crate::dates::parse_iso_date(s).expect("fixture dates are valid")
}

fn obs(
    station: &'static str,
    date: &str,
    prcp: Option<f64>,
    tobs: Option<f64>,
) -> Observation {
    Observation {
        station,
        date: d(date),
        prcp,
        tobs,
    }
}

/// Three Oahu stations with uneven activity. Latest date 2017-08-23, so
/// the one-year reporting window opens at 2016-08-23: the 2016-06-01
/// row falls outside it and the 2016-08-23 row sits exactly on the
/// boundary. MANOA (USC00516128) has the most rows.
pub(crate) fn fixture_oahu_sample() -> MemStore {
    MemStore::new(
        vec![
            obs("USC00516128", "2016-06-01", Some(0.05), Some(73.0)),
            obs("USC00516128", "2017-08-20", Some(1.42), Some(74.0)),
            obs("USC00516128", "2017-08-21", None, Some(76.0)),
            obs("USC00516128", "2017-08-23", Some(0.45), Some(75.0)),
            obs("USC00519397", "2016-08-23", Some(0.00), Some(81.0)),
            obs("USC00519397", "2017-08-22", Some(0.00), Some(82.0)),
            obs("USC00519397", "2017-08-23", Some(0.08), None),
            obs("USC00513117", "2017-08-21", Some(0.25), Some(79.0)),
            obs("USC00513117", "2017-08-23", Some(0.15), Some(77.0)),
        ],
        vec![
            ("USC00513117", "KANEOHE 838.1, HI US"),
            ("USC00516128", "MANOA LYON ARBO 785.2, HI US"),
            ("USC00519397", "WAIKIKI 717.2, HI US"),
        ],
    )
}

/// No measurements, no stations. Exercises the EmptyDataset paths.
pub(crate) fn fixture_empty() -> MemStore {
    MemStore::new(vec![], vec![])
}

/// Two stations with identical row counts. The lexicographically
/// smaller id must win the most-active tie-break.
pub(crate) fn fixture_activity_tie() -> MemStore {
    MemStore::new(
        vec![
            obs("USC00514830", "2017-01-01", Some(0.10), Some(70.0)),
            obs("USC00514830", "2017-01-02", Some(0.20), Some(71.0)),
            obs("USC00511918", "2017-01-01", None, Some(68.0)),
            obs("USC00511918", "2017-01-02", None, Some(69.0)),
        ],
        vec![
            ("USC00511918", "HONOLULU OBSERVATORY 702.2, HI US"),
            ("USC00514830", "KUALOA RANCH HEADQUARTERS 886.9, HI US"),
        ],
    )
}

/// A single station with two observations, 78 F and 80 F, three days
/// apart. Range statistics over the pair are checkable by hand.
pub(crate) fn fixture_single_station_range() -> MemStore {
    MemStore::new(
        vec![
            obs("USC001", "2017-08-20", None, Some(78.0)),
            obs("USC001", "2017-08-23", None, Some(80.0)),
        ],
        vec![("USC001", "TEST STATION, HI US")],
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_date_is_the_chronological_maximum() {
        let mut store = fixture_oahu_sample();
        assert_eq!(store.latest_date().expect("sample has rows"), d("2017-08-23"));
    }

    #[test]
    fn test_latest_date_on_empty_dataset_is_an_error() {
        let mut store = fixture_empty();
        assert!(matches!(
            store.latest_date(),
            Err(StoreError::EmptyDataset)
        ));
    }

    #[test]
    fn test_precipitation_since_returns_no_row_before_cutoff() {
        let mut store = fixture_oahu_sample();
        let cutoff = d("2016-08-23");
        let readings = store.precipitation_since(cutoff).expect("query succeeds");

        assert!(
            readings.iter().all(|r| r.date >= cutoff),
            "no returned reading may predate the cutoff"
        );
        assert!(
            readings.iter().any(|r| r.date == cutoff),
            "a reading dated exactly on the cutoff is included (>= filter)"
        );
        assert_eq!(readings.len(), 8, "only the 2016-06-01 row is excluded");
    }

    #[test]
    fn test_precipitation_preserves_null_readings() {
        let mut store = fixture_oahu_sample();
        let readings = store
            .precipitation_since(d("2016-08-23"))
            .expect("query succeeds");

        let gap = readings
            .iter()
            .find(|r| r.station == "USC00516128" && r.date == d("2017-08-21"))
            .expect("the gap row is in range");
        assert!(gap.prcp.is_none(), "a null gauge reading stays null");
    }

    #[test]
    fn test_list_stations_matches_distinct_station_count() {
        let mut store = fixture_oahu_sample();
        let stations = store.list_stations().expect("query succeeds");
        assert_eq!(stations.len(), 3);

        let mut ids: Vec<_> = stations.iter().map(|s| s.station.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3, "station ids are distinct");
    }

    #[test]
    fn test_most_active_station_has_the_highest_row_count() {
        let mut store = fixture_oahu_sample();
        let busiest = store.most_active_station().expect("sample has rows");
        assert_eq!(busiest, "USC00516128");

        // verify the count claim independently of the implementation
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for obs in &fixture_oahu_sample().observations {
            *counts.entry(obs.station).or_insert(0) += 1;
        }
        let busiest_count = counts[busiest.as_str()];
        assert!(
            counts.values().all(|&c| c <= busiest_count),
            "no station may out-count the busiest"
        );
    }

    #[test]
    fn test_most_active_tie_breaks_to_smallest_station_id() {
        let mut store = fixture_activity_tie();
        assert_eq!(
            store.most_active_station().expect("tie fixture has rows"),
            "USC00511918"
        );
    }

    #[test]
    fn test_most_active_on_empty_dataset_is_an_error() {
        let mut store = fixture_empty();
        assert!(matches!(
            store.most_active_station(),
            Err(StoreError::EmptyDataset)
        ));
    }

    #[test]
    fn test_tobs_since_filters_by_station_and_cutoff() {
        let mut store = fixture_oahu_sample();
        let readings = store
            .tobs_since("USC00516128", d("2016-08-23"))
            .expect("query succeeds");

        assert_eq!(readings.len(), 3, "one MANOA row predates the cutoff");
        assert!(readings.iter().all(|r| r.date >= d("2016-08-23")));
    }

    #[test]
    fn test_temp_stats_orders_min_avg_max() {
        let mut store = fixture_oahu_sample();
        let stats = store
            .temp_stats(d("2016-01-01"), None)
            .expect("range has observations");

        assert!(stats.min <= stats.avg, "min must not exceed avg");
        assert!(stats.avg <= stats.max, "avg must not exceed max");
        assert_eq!(stats.min, 73.0);
        assert_eq!(stats.max, 82.0);
    }

    #[test]
    fn test_temp_stats_skips_null_observations() {
        // 2017-08-23 has a null WAIKIKI tobs alongside real values; the
        // null must not drag the aggregate down.
        let mut store = fixture_oahu_sample();
        let stats = store
            .temp_stats(d("2017-08-23"), Some(d("2017-08-23")))
            .expect("two non-null observations on this day");
        assert_eq!(stats.min, 75.0);
        assert_eq!(stats.max, 77.0);
    }

    #[test]
    fn test_temp_stats_with_no_matching_rows_is_an_error() {
        let mut store = fixture_oahu_sample();
        assert!(matches!(
            store.temp_stats(d("2020-01-01"), None),
            Err(StoreError::NoMatchingRows)
        ));
    }

    #[test]
    fn test_temp_stats_all_null_range_is_an_error() {
        // a range that matches rows but only null observations behaves
        // like an empty range, mirroring SQL's all-NULL aggregate row
        let mut store = MemStore::new(
            vec![obs("USC00519397", "2017-08-23", Some(0.08), None)],
            vec![("USC00519397", "WAIKIKI 717.2, HI US")],
        );
        assert!(matches!(
            store.temp_stats(d("2017-08-23"), Some(d("2017-08-23"))),
            Err(StoreError::NoMatchingRows)
        ));
    }
}
