//! Climate Summary API - Main Entry Point
//!
//! A long-running HTTP service that serves read-only JSON summaries of
//! a historical climate dataset (daily precipitation and temperature
//! observations by weather station) held in PostgreSQL. The dataset is
//! populated externally; this process only reads it.
//!
//! Usage:
//!   cargo run --release                        # service.toml + defaults
//!   cargo run --release -- --port 9000         # override listen port
//!   cargo run --release -- --config alt.toml   # alternate config file
//!   cargo run --release -- --debug             # log a line per request
//!
//! Environment:
//!   DATABASE_URL - PostgreSQL connection string (or via .env)

use climate_service::config;
use climate_service::db;
use climate_service::endpoint;
use climate_service::store::pg::PgStore;
use std::env;

fn main() {
    println!("🌦️  Climate Summary API");
    println!("========================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path = "service.toml".to_string();
    let mut port_override: Option<u16> = None;
    let mut debug_override = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a path");
                    std::process::exit(1);
                }
            }
            "--port" => {
                if i + 1 < args.len() {
                    port_override = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--debug" => {
                debug_override = true;
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!(
                    "Usage: {} [--config PATH] [--port PORT] [--debug]",
                    args[0]
                );
                std::process::exit(1);
            }
        }
    }

    // Load service configuration and apply CLI overrides
    let mut server = config::load_config(&config_path).server;
    if let Some(port) = port_override {
        server.port = port;
    }
    if debug_override {
        server.debug = true;
    }

    // Connect and verify the climate tables are reachable
    println!("📊 Connecting to database...");
    let client = match db::connect_and_verify() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("\n❌ Database validation failed: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ Climate dataset reachable\n");

    let bind = server.bind_addr();
    println!("📡 Serving climate API on http://{}", bind);
    println!("   GET /                         - Route listing");
    println!("   GET /api/v1.0/precipitation   - Last year of precipitation readings");
    println!("   GET /api/v1.0/stations        - All weather stations");
    println!("   GET /api/v1.0/tobs            - Last year of temperatures, busiest station");
    println!("   GET /api/v1.0/{{start}}         - Min/max/avg temperature from a date");
    println!("   GET /api/v1.0/{{start}}/{{end}}   - Min/max/avg temperature in a range");
    println!("   Press Ctrl+C to stop\n");

    if let Err(e) = endpoint::start_endpoint_server(
        &bind,
        server.workers,
        server.debug,
        PgStore::new(client),
    ) {
        eprintln!("\n❌ Server error: {}", e);
        std::process::exit(1);
    }
}
