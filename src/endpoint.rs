/// HTTP endpoint serving the climate summary API
///
/// Routes:
/// - GET /                          - Plain-text route listing
/// - GET /api/v1.0/precipitation    - Last year of precipitation readings
/// - GET /api/v1.0/stations         - All weather stations
/// - GET /api/v1.0/tobs             - Last year of temperatures at the busiest station
/// - GET /api/v1.0/{start}          - Min/max/avg temperature from a start date
/// - GET /api/v1.0/{start}/{end}    - Min/max/avg temperature over a date range
///
/// Report builders are pure functions over `&mut dyn ClimateStore`, so
/// every route is testable against the in-memory fixture store. The
/// HTTP layer on top maps their results to status codes and JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use threadpool::ThreadPool;
use tiny_http::Method;

use crate::dates;
use crate::store::pg::PgStore;
use crate::store::{ClimateStore, StoreError};

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// One row of the last-year precipitation report.
#[derive(Debug, Serialize, Deserialize)]
pub struct PrecipitationEntry {
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Precipitation")]
    pub precipitation: Option<f64>,
}

/// One station in the station listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct StationListEntry {
    #[serde(rename = "Station ID")]
    pub station_id: String,
    #[serde(rename = "Station Name")]
    pub station_name: String,
}

/// One temperature observation from the busiest station.
#[derive(Debug, Serialize, Deserialize)]
pub struct TobsEntry {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Temperature (F)")]
    pub temperature: Option<f64>,
}

/// Aggregate temperature statistics for the range routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct TempStatsResponse {
    #[serde(rename = "Min Temp (F)")]
    pub min_temp: f64,
    #[serde(rename = "Max Temp (F)")]
    pub max_temp: f64,
    #[serde(rename = "Avg Temp (F)")]
    pub avg_temp: f64,
}

// ---------------------------------------------------------------------------
// Report builders
// ---------------------------------------------------------------------------

/// Precipitation readings from the last year of data, anchored to the
/// newest measurement date.
pub fn precipitation_report(
    store: &mut dyn ClimateStore,
) -> Result<Vec<PrecipitationEntry>, StoreError> {
    let latest = store.latest_date()?;
    let cutoff = dates::one_year_before(latest);
    let readings = store.precipitation_since(cutoff)?;

    Ok(readings
        .into_iter()
        .map(|r| PrecipitationEntry {
            station: r.station,
            date: r.date,
            precipitation: r.prcp,
        })
        .collect())
}

/// Every station in the dataset.
pub fn station_report(store: &mut dyn ClimateStore) -> Result<Vec<StationListEntry>, StoreError> {
    let stations = store.list_stations()?;

    Ok(stations
        .into_iter()
        .map(|s| StationListEntry {
            station_id: s.station,
            station_name: s.name,
        })
        .collect())
}

/// The last year of temperature observations at the station with the
/// most measurement rows.
pub fn tobs_report(store: &mut dyn ClimateStore) -> Result<Vec<TobsEntry>, StoreError> {
    let latest = store.latest_date()?;
    let cutoff = dates::one_year_before(latest);
    let busiest = store.most_active_station()?;
    let readings = store.tobs_since(&busiest, cutoff)?;

    Ok(readings
        .into_iter()
        .map(|r| TobsEntry {
            date: r.date,
            temperature: r.tobs,
        })
        .collect())
}

/// Min/max/average temperature from `start`, optionally bounded by `end`.
pub fn temp_stats_report(
    store: &mut dyn ClimateStore,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<TempStatsResponse, StoreError> {
    let stats = store.temp_stats(start, end)?;

    Ok(TempStatsResponse {
        min_temp: stats.min,
        max_temp: stats.max,
        avg_temp: stats.avg,
    })
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

const API_PREFIX: &str = "/api/v1.0/";

/// Dispatch one request against the store and produce the response.
pub fn route_request(
    store: &mut dyn ClimateStore,
    method: &Method,
    url: &str,
) -> tiny_http::Response<Cursor<Vec<u8>>> {
    if !matches!(method, Method::Get) {
        return create_response(
            405,
            serde_json::json!({ "error": "only GET is supported" }),
        );
    }

    if url == "/" {
        return handle_home();
    }

    match url {
        "/api/v1.0/precipitation" => {
            return json_or_error(precipitation_report(store));
        }
        "/api/v1.0/stations" => {
            return json_or_error(station_report(store));
        }
        "/api/v1.0/tobs" => {
            return json_or_error(tobs_report(store));
        }
        _ => {}
    }

    // Remaining API paths are date ranges: {start} or {start}/{end}
    if let Some(rest) = url.strip_prefix(API_PREFIX) {
        if !rest.is_empty() {
            return handle_temp_range(store, rest);
        }
    }

    create_response(
        404,
        serde_json::json!({
            "error": "Not found",
            "available_endpoints": [
                "/",
                "/api/v1.0/precipitation",
                "/api/v1.0/stations",
                "/api/v1.0/tobs",
                "/api/v1.0/{start}",
                "/api/v1.0/{start}/{end}"
            ]
        }),
    )
}

/// Handle / - plain-text route listing
fn handle_home() -> tiny_http::Response<Cursor<Vec<u8>>> {
    let body = "\
Available Routes:
  /api/v1.0/precipitation
  /api/v1.0/stations
  /api/v1.0/tobs
  /api/v1.0/{start}
  /api/v1.0/{start}/{end}
Dates take YYYY-MM-DD format.
";
    create_text_response(200, body)
}

/// Handle /api/v1.0/{start} and /api/v1.0/{start}/{end}
fn handle_temp_range(
    store: &mut dyn ClimateStore,
    range: &str,
) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let segments: Vec<&str> = range.split('/').collect();

    let (start_raw, end_raw) = match segments.as_slice() {
        [start] => (*start, None),
        [start, end] => (*start, Some(*end)),
        _ => {
            return create_response(
                404,
                serde_json::json!({
                    "error": "expected /api/v1.0/{start} or /api/v1.0/{start}/{end}"
                }),
            );
        }
    };

    let Some(start) = dates::parse_iso_date(start_raw) else {
        return invalid_date_response(start_raw);
    };

    let end = match end_raw {
        Some(raw) => match dates::parse_iso_date(raw) {
            Some(end) => Some(end),
            None => return invalid_date_response(raw),
        },
        None => None,
    };

    json_or_error(temp_stats_report(store, start, end))
}

fn invalid_date_response(raw: &str) -> tiny_http::Response<Cursor<Vec<u8>>> {
    create_response(
        400,
        serde_json::json!({
            "error": format!("invalid date '{}': expected YYYY-MM-DD", raw)
        }),
    )
}

/// Serialize a report result, mapping store errors to status codes:
/// NoMatchingRows is the client asking about an empty range (404);
/// everything else means the dataset or database is unhealthy (500).
fn json_or_error<T: Serialize>(
    result: Result<T, StoreError>,
) -> tiny_http::Response<Cursor<Vec<u8>>> {
    match result {
        Ok(report) => match serde_json::to_value(&report) {
            Ok(json) => create_response(200, json),
            Err(e) => create_response(
                500,
                serde_json::json!({ "error": format!("response serialization failed: {}", e) }),
            ),
        },
        Err(e) => {
            let status = match e {
                StoreError::NoMatchingRows => 404,
                StoreError::EmptyDataset | StoreError::Db(_) => 500,
            };
            create_response(status, serde_json::json!({ "error": e.to_string() }))
        }
    }
}

/// Create HTTP response with JSON body
fn create_response(
    status_code: u16,
    json: serde_json::Value,
) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string());
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

/// Create HTTP response with plain-text body
fn create_text_response(status_code: u16, body: &str) -> tiny_http::Response<Cursor<Vec<u8>>> {
    tiny_http::Response::from_data(body.as_bytes().to_vec())
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/plain"[..]).unwrap(),
        )
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start the HTTP server on `bind`, serving requests with `workers`
/// threads over one mutex-guarded database connection. Query execution
/// serializes on the connection; parsing and response writes overlap.
///
/// Blocks for the life of the process.
pub fn start_endpoint_server(
    bind: &str,
    workers: usize,
    debug: bool,
    store: PgStore,
) -> Result<(), String> {
    let server = tiny_http::Server::http(bind)
        .map_err(|e| format!("Failed to start HTTP server on {}: {}", bind, e))?;

    let server = Arc::new(server);
    let store = Arc::new(Mutex::new(store));
    let workers = workers.max(1);
    let pool = ThreadPool::new(workers);

    for _ in 0..workers {
        let server = Arc::clone(&server);
        let store = Arc::clone(&store);

        pool.execute(move || {
            loop {
                let request = match server.recv() {
                    Ok(request) => request,
                    Err(e) => {
                        eprintln!("Failed to receive request: {}", e);
                        break;
                    }
                };

                let method = request.method().clone();
                let url = request.url().to_string();

                let response = {
                    let mut guard = match store.lock() {
                        Ok(guard) => guard,
                        // a worker panic mid-query poisons the lock; the
                        // connection handle itself is still usable
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    route_request(&mut *guard, &method, &url)
                };

                if debug {
                    println!("   {} {} -> {}", method, url, response.status_code().0);
                }

                if let Err(e) = request.respond(response) {
                    eprintln!("Failed to send response: {}", e);
                }
            }
        });
    }

    pool.join();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
