//! Water Office Station Snapshot
//!
//! Fetches the latest water level statement and provisional graph readings
//! for one or more stations (or searches the station list for a region) and
//! prints the result as JSON on stdout, followed by the data-source
//! disclaimer. Logs go to stderr.
//!
//! Usage:
//!   cargo run --release                              # Stations from wateroffice.toml
//!   cargo run --release -- --station 08MH001         # One or more --station flags
//!   cargo run --release -- --region PYR [--flat]     # Search stations in a region
//!   cargo run --release -- --endpoint 8080           # Serve snapshots over HTTP
//!
//! Environment:
//!   HYDROMET_CONFIG - configuration file path (default: wateroffice.toml)
//!   RUST_LOG        - log filter (default: hydromet_service=info)

use chrono::Local;
use hydromet_service::config::{self, ServiceConfig};
use hydromet_service::endpoint;
use hydromet_service::ingest::station_list::ExtractionStrategy;
use hydromet_service::retrieval::Retriever;
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DISCLAIMER_SOURCE: &str = "Extracted from the Environment and Climate Change Canada \
    Real-time Hydrometric Data web site (https://wateroffice.ec.gc.ca/mainmenu/real_time_data_index_e.html)";

#[derive(Default)]
struct Args {
    config_path: Option<PathBuf>,
    stations: Vec<String>,
    region: Option<String>,
    strategy: ExtractionStrategy,
    endpoint_port: Option<u16>,
}

fn usage_exit(program: &str, message: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!(
        "Usage: {} [--config PATH] [--station ID]... [--region CODE [--flat]] [--endpoint PORT]",
        program
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("hydromet_service");
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--config", Some(path)) => parsed.config_path = Some(PathBuf::from(path)),
            ("--station", Some(id)) => parsed.stations.push(id.clone()),
            ("--region", Some(region)) => parsed.region = Some(region.clone()),
            ("--endpoint", Some(port)) => match port.parse() {
                Ok(port) => parsed.endpoint_port = Some(port),
                Err(_) => usage_exit(program, "--endpoint requires a port number"),
            },
            ("--flat", _) => {
                parsed.strategy = ExtractionStrategy::FlatHeuristic;
                i += 1;
                continue;
            }
            (flag @ ("--config" | "--station" | "--region" | "--endpoint"), None) => {
                usage_exit(program, &format!("{} requires a value", flag))
            }
            (other, _) => usage_exit(program, &format!("Unknown argument: {}", other)),
        }
        i += 2;
    }

    parsed
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            error!(error = %e, "failed to serialize output");
            process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hydromet_service=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();

    let config_path = args.config_path.clone().unwrap_or_else(config::config_path);
    let config: ServiceConfig = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error");
            process::exit(1);
        }
    };
    info!(path = %config_path.display(), "configuration loaded");

    let retriever = match Retriever::from_config(&config) {
        Ok(retriever) => retriever,
        Err(e) => {
            error!(error = %e, "failed to initialize HTTP transport");
            process::exit(1);
        }
    };

    if let Some(port) = args.endpoint_port {
        if let Err(e) = endpoint::start_endpoint_server(port, retriever, config.retrieval) {
            error!(error = %e, "endpoint server error");
            process::exit(1);
        }
        return;
    }

    if let Some(region) = &args.region {
        match retriever.search_stations("region", region, args.strategy) {
            Ok(stations) => print_json(&stations),
            Err(e) => {
                error!(region = %region, error = %e, "station search failed");
                process::exit(1);
            }
        }
    } else {
        let stations = if args.stations.is_empty() {
            config.retrieval.stations.clone()
        } else {
            args.stations.clone()
        };
        let range = match config.retrieval.date_range() {
            Ok(range) => range,
            Err(e) => {
                error!(error = %e, "invalid graph window");
                process::exit(1);
            }
        };
        info!(count = stations.len(), "fetching station snapshots");

        let results = retriever.fetch_combined_many(&stations, range, config.retrieval.sensor_ids());
        print_json(&results);
    }

    println!("{} on {}", DISCLAIMER_SOURCE, Local::now().format("%Y-%m-%d"));
}
