//! hydromet_service: Water Office real-time hydrometric station retrieval.
//!
//! Fetches station metadata, the latest water level statement and
//! provisional graph readings from Environment and Climate Change Canada's
//! Real-time Hydrometric Data site (wateroffice.ec.gc.ca) and normalizes
//! them into serializable records.
//!
//! # Module structure
//!
//! ```text
//! hydromet_service
//! ├── model       - shared data types (StationRecord, StationDetail, GraphDataPoint,
//! │                 CombinedStationResult, WaterOfficeError, …)
//! ├── config      - service configuration loader (wateroffice.toml)
//! ├── transport   - HTTP GET with the fixed User-Agent and disclaimer cookie
//! ├── markup      - lenient HTML parsing and text helpers
//! ├── ingest
//! │   ├── station_list   - search results table → StationRecord list
//! │   ├── station_detail - detail page → latest water level statement
//! │   ├── graph_data     - graph JSON → provisional water level + discharge
//! │   └── fixtures (test only) - representative pages and payloads
//! ├── retrieval   - concurrent detail + graph fetch, station search, fan-out
//! └── endpoint    - JSON snapshot HTTP API
//! ```

// Public modules
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod markup;
pub mod model;
pub mod retrieval;
pub mod transport;
