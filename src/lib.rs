/// climate_service: read-only HTTP API over a historical climate dataset.
///
/// Serves JSON summaries of daily precipitation and temperature
/// observations, keyed by weather station, from two PostgreSQL tables.
///
/// # Module structure
///
/// ```text
/// climate_service
/// ├── model     — shared data types (PrecipReading, TempSummary, …)
/// ├── config    — service configuration loader (service.toml)
/// ├── db        — PostgreSQL connection and schema validation
/// ├── dates     — reporting-window calendar arithmetic
/// ├── store     — ClimateStore query trait
/// │   ├── pg       — PostgreSQL implementation
/// │   └── fixtures (test only) — in-memory datasets + MemStore
/// └── endpoint  — HTTP routes and JSON response shaping
/// ```

/// Public modules
pub mod config;
pub mod dates;
pub mod db;
pub mod endpoint;
pub mod model;
pub mod store;
