/// PostgreSQL implementation of the query layer.
///
/// Every operation is a single aggregate or filter query against the
/// two read-only tables under the `climate` schema. NUMERIC observation
/// columns come back as `rust_decimal::Decimal` and are converted to
/// f64 here, at the store boundary, so nothing above this module sees
/// the database's numeric type.

use chrono::NaiveDate;
use postgres::Client;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::{ClimateStore, StoreError};
use crate::model::{PrecipReading, StationEntry, TempSummary, TobsReading};

/// Query layer backed by a live PostgreSQL connection.
pub struct PgStore {
    client: Client,
}

impl PgStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Observation values are small (inches of rain, degrees F), far inside
/// f64's exactly-representable range.
fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

impl ClimateStore for PgStore {
    fn latest_date(&mut self) -> Result<NaiveDate, StoreError> {
        // MAX over an empty table returns one NULL row, not zero rows
        let row = self
            .client
            .query_one("SELECT MAX(date) FROM climate.measurement", &[])?;
        let latest: Option<NaiveDate> = row.get(0);
        latest.ok_or(StoreError::EmptyDataset)
    }

    fn precipitation_since(
        &mut self,
        cutoff: NaiveDate,
    ) -> Result<Vec<PrecipReading>, StoreError> {
        let rows = self.client.query(
            "SELECT station, date, prcp FROM climate.measurement WHERE date >= $1",
            &[&cutoff],
        )?;

        let mut readings = Vec::with_capacity(rows.len());
        for row in rows {
            let prcp: Option<Decimal> = row.get(2);
            readings.push(PrecipReading {
                station: row.get(0),
                date: row.get(1),
                prcp: prcp.map(decimal_to_f64),
            });
        }
        Ok(readings)
    }

    fn list_stations(&mut self) -> Result<Vec<StationEntry>, StoreError> {
        let rows = self
            .client
            .query("SELECT station, name FROM climate.station", &[])?;

        Ok(rows
            .iter()
            .map(|row| StationEntry {
                station: row.get(0),
                name: row.get(1),
            })
            .collect())
    }

    fn most_active_station(&mut self) -> Result<String, StoreError> {
        // station ASC after count DESC makes the tie-break deterministic
        let rows = self.client.query(
            "SELECT station FROM climate.measurement
             GROUP BY station
             ORDER BY COUNT(*) DESC, station ASC
             LIMIT 1",
            &[],
        )?;

        match rows.first() {
            Some(row) => Ok(row.get(0)),
            None => Err(StoreError::EmptyDataset),
        }
    }

    fn tobs_since(
        &mut self,
        station: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<TobsReading>, StoreError> {
        let rows = self.client.query(
            "SELECT date, tobs FROM climate.measurement
             WHERE station = $1 AND date >= $2",
            &[&station, &cutoff],
        )?;

        let mut readings = Vec::with_capacity(rows.len());
        for row in rows {
            let tobs: Option<Decimal> = row.get(1);
            readings.push(TobsReading {
                date: row.get(0),
                tobs: tobs.map(decimal_to_f64),
            });
        }
        Ok(readings)
    }

    fn temp_stats(
        &mut self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TempSummary, StoreError> {
        let row = match end {
            Some(end) => self.client.query_one(
                "SELECT MIN(tobs), MAX(tobs), AVG(tobs)
                 FROM climate.measurement
                 WHERE date >= $1 AND date <= $2",
                &[&start, &end],
            )?,
            None => self.client.query_one(
                "SELECT MIN(tobs), MAX(tobs), AVG(tobs)
                 FROM climate.measurement
                 WHERE date >= $1",
                &[&start],
            )?,
        };

        let min: Option<Decimal> = row.get(0);
        let max: Option<Decimal> = row.get(1);
        let avg: Option<Decimal> = row.get(2);

        match (min, max, avg) {
            (Some(min), Some(max), Some(avg)) => Ok(TempSummary {
                min: decimal_to_f64(min),
                max: decimal_to_f64(max),
                avg: decimal_to_f64(avg),
            }),
            // the aggregate returns a single all-NULL row when nothing matched
            _ => Err(StoreError::NoMatchingRows),
        }
    }
}
