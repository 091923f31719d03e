/// Service configuration loader - parses wateroffice.toml
///
/// Keeps endpoint URLs, transport settings and retrieval defaults out of
/// the code so they can be adjusted without recompiling. Every field has a
/// default; a missing file means "use the defaults".

use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::{DateRange, SensorIds, WaterOfficeError, SENSOR_DISCHARGE, SENSOR_WATER_LEVEL};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "wateroffice.toml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "HYDROMET_CONFIG";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid settings in {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: WaterOfficeError,
    },
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoints: EndpointConfig,
    pub transport: TransportConfig,
    pub retrieval: RetrievalConfig,
}

/// Water Office page and service URLs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub search_url: String,
    pub detail_url: String,
    pub graph_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            search_url: "https://wateroffice.ec.gc.ca/search/real_time_results_e.html".to_string(),
            detail_url: "https://wateroffice.ec.gc.ca/report/real_time_e.html".to_string(),
            graph_url: "https://wateroffice.ec.gc.ca/services/real_time_graph/json/inline".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub user_agent: String,
    /// Per-request timeout; also bounds each branch of a combined fetch.
    pub timeout_seconds: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub water_level_sensor: u32,
    pub discharge_sensor: u32,
    /// Length of the graph window ending today.
    pub graph_window_days: u32,
    /// Worker threads used when fetching several stations at once.
    pub max_parallel_stations: usize,
    /// Stations fetched by the binary when none are given on the command line.
    pub stations: Vec<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            water_level_sensor: SENSOR_WATER_LEVEL,
            discharge_sensor: SENSOR_DISCHARGE,
            graph_window_days: 7,
            max_parallel_stations: 4,
            stations: vec!["08MH001".to_string()],
        }
    }
}

impl RetrievalConfig {
    pub fn sensor_ids(&self) -> SensorIds {
        SensorIds {
            water_level: self.water_level_sensor,
            discharge: self.discharge_sensor,
        }
    }

    /// The configured graph window ending today.
    pub fn date_range(&self) -> Result<DateRange, WaterOfficeError> {
        DateRange::last_days(self.graph_window_days)
    }
}

/// Parses configuration from TOML text. A graph window too long to
/// express as a date range is rejected here rather than on first use.
pub fn parse_config(contents: &str, path: &Path) -> Result<ServiceConfig, ConfigError> {
    let config: ServiceConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    config.retrieval.date_range().map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(config)
}

/// Loads configuration from `path`, falling back to defaults when the file
/// does not exist. A file that exists but cannot be read or parsed is an
/// error.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ServiceConfig::default()),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolves the configuration path from `.env` / `HYDROMET_CONFIG`,
/// defaulting to `wateroffice.toml` in the working directory.
pub fn config_path() -> PathBuf {
    dotenv::dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}
