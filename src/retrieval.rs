/// Retrieval orchestration for Water Office stations
///
/// This module ties transport and extraction together:
/// 1. Station search: search page -> `StationRecord` list
/// 2. Detail fetch: detail page -> latest water level statement
/// 3. Graph fetch: graph JSON -> provisional water level + discharge
/// 4. Combined fetch: detail and graph concurrently, joined into one
///    `CombinedStationResult` with a per-branch outcome
/// 5. Multi-station fan-out on a bounded thread pool
///
/// A combined fetch never hangs: each branch runs on its own thread and is
/// recorded as `TimedOut` once the branch deadline passes.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use threadpool::ThreadPool;
use tracing::{info, warn};

use crate::config::{EndpointConfig, ServiceConfig};
use crate::ingest::graph_data;
use crate::ingest::station_detail;
use crate::ingest::station_list::{self, ExtractionStrategy};
use crate::markup::Document;
use crate::model::{
    BranchOutcome, CombinedStationResult, DateRange, GraphDataPoint, SensorIds, StationDetail,
    StationRecord, WaterOfficeError,
};
use crate::transport::{HttpTransport, Transport};

/// Slack on top of the HTTP timeout before a branch is abandoned, so the
/// transport's own timeout normally fires first.
const BRANCH_GRACE: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Single-request operations
// ---------------------------------------------------------------------------

fn fetch_detail(
    transport: &dyn Transport,
    detail_url: &str,
    station_id: &str,
) -> Result<StationDetail, WaterOfficeError> {
    let html = transport.get(detail_url, &[("stn", station_id.to_string())])?;
    let doc = Document::parse(&html);
    station_detail::extract_latest_statement(&doc)
}

fn fetch_graph(
    transport: &dyn Transport,
    graph_url: &str,
    station_id: &str,
    range: DateRange,
    sensors: SensorIds,
) -> Result<GraphDataPoint, WaterOfficeError> {
    let params = [
        ("station", station_id.to_string()),
        ("start_date", range.start().to_string()),
        ("end_date", range.end().to_string()),
        ("param1", sensors.water_level.to_string()),
        ("param2", sensors.discharge.to_string()),
    ];
    let body = transport.get(graph_url, &params)?;
    let payload = graph_data::parse_graph_payload(&body)?;
    graph_data::extract_graph_point(&payload, sensors)
}

// ---------------------------------------------------------------------------
// Retriever
// ---------------------------------------------------------------------------

enum BranchMessage {
    Detail(Result<StationDetail, WaterOfficeError>),
    Graph(Result<GraphDataPoint, WaterOfficeError>),
}

/// Fetches and extracts Water Office data for one or more stations.
///
/// Cheap to clone; clones share the transport and the worker pool.
#[derive(Clone)]
pub struct Retriever {
    transport: Arc<dyn Transport>,
    endpoints: EndpointConfig,
    branch_timeout: Duration,
    pool: ThreadPool,
}

impl Retriever {
    /// Create a retriever over an arbitrary transport
    pub fn new(transport: Arc<dyn Transport>, config: &ServiceConfig) -> Self {
        let workers = config.retrieval.max_parallel_stations.max(1);
        Self {
            transport,
            endpoints: config.endpoints.clone(),
            branch_timeout: Duration::from_secs(config.transport.timeout_seconds) + BRANCH_GRACE,
            pool: ThreadPool::with_name("station-retrieval".to_string(), workers),
        }
    }

    /// Create a retriever backed by the reqwest transport
    pub fn from_config(config: &ServiceConfig) -> Result<Self, WaterOfficeError> {
        let transport = HttpTransport::new(&config.transport)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    /// Override how long a combined fetch waits for each branch
    pub fn with_branch_timeout(mut self, timeout: Duration) -> Self {
        self.branch_timeout = timeout;
        self
    }

    /// Search the real-time station list, e.g. `("region", "PYR")`.
    pub fn search_stations(
        &self,
        search_type: &str,
        region: &str,
        strategy: ExtractionStrategy,
    ) -> Result<Vec<StationRecord>, WaterOfficeError> {
        let params = [
            ("search_type", search_type.to_string()),
            ("region", region.to_string()),
        ];
        let html = self.transport.get(&self.endpoints.search_url, &params)?;
        let doc = Document::parse(&html);
        let stations = station_list::extract_station_list(&doc, strategy)?;

        info!(search_type, region, count = stations.len(), "station search complete");
        Ok(stations)
    }

    pub fn fetch_station_detail(&self, station_id: &str) -> Result<StationDetail, WaterOfficeError> {
        fetch_detail(self.transport.as_ref(), &self.endpoints.detail_url, station_id)
    }

    pub fn fetch_graph_point(
        &self,
        station_id: &str,
        range: DateRange,
        sensors: SensorIds,
    ) -> Result<GraphDataPoint, WaterOfficeError> {
        fetch_graph(self.transport.as_ref(), &self.endpoints.graph_url, station_id, range, sensors)
    }

    /// Fetch the detail page and graph data concurrently and join them.
    ///
    /// Both branches are always reported: a failed or timed-out branch shows
    /// up as `BranchOutcome::Failed` next to the other branch's data.
    pub fn fetch_combined(
        &self,
        station_id: &str,
        range: DateRange,
        sensors: SensorIds,
    ) -> CombinedStationResult {
        let (tx, rx) = mpsc::channel();

        let detail_spawned = {
            let tx = tx.clone();
            let transport = Arc::clone(&self.transport);
            let url = self.endpoints.detail_url.clone();
            let station = station_id.to_string();
            thread::Builder::new()
                .name(format!("detail-{}", station_id))
                .spawn(move || {
                    let result = fetch_detail(transport.as_ref(), &url, &station);
                    let _ = tx.send(BranchMessage::Detail(result));
                })
        };

        let graph_spawned = {
            let transport = Arc::clone(&self.transport);
            let url = self.endpoints.graph_url.clone();
            let station = station_id.to_string();
            thread::Builder::new()
                .name(format!("graph-{}", station_id))
                .spawn(move || {
                    let result = fetch_graph(transport.as_ref(), &url, &station, range, sensors);
                    let _ = tx.send(BranchMessage::Graph(result));
                })
        };

        let mut detail = detail_spawned
            .err()
            .map(|e| Err(WaterOfficeError::Transport(format!("Failed to start detail fetch: {}", e))));
        let mut graph = graph_spawned
            .err()
            .map(|e| Err(WaterOfficeError::Transport(format!("Failed to start graph fetch: {}", e))));

        let deadline = Instant::now() + self.branch_timeout;
        let mut timed_out = false;

        while detail.is_none() || graph.is_none() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(BranchMessage::Detail(result)) => detail = Some(result),
                Ok(BranchMessage::Graph(result)) => graph = Some(result),
                Err(RecvTimeoutError::Timeout) => {
                    timed_out = true;
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let detail = detail.unwrap_or_else(|| Err(self.missing_branch("detail", timed_out)));
        let graph = graph.unwrap_or_else(|| Err(self.missing_branch("graph", timed_out)));

        let result = CombinedStationResult {
            station_id: station_id.to_string(),
            detail: BranchOutcome::from(detail),
            graph: BranchOutcome::from(graph),
        };

        for (branch, err) in result.failures() {
            warn!(station = station_id, branch, error = %err, "branch failed");
        }
        info!(
            station = station_id,
            detail_ok = result.detail.is_ok(),
            graph_ok = result.graph.is_ok(),
            "combined fetch complete"
        );

        result
    }

    /// Combined fetch for several stations on the worker pool. Results are
    /// returned in the order of `station_ids`.
    pub fn fetch_combined_many(
        &self,
        station_ids: &[String],
        range: DateRange,
        sensors: SensorIds,
    ) -> Vec<CombinedStationResult> {
        let (tx, rx) = mpsc::channel();

        for (index, station_id) in station_ids.iter().enumerate() {
            let retriever = self.clone();
            let tx = tx.clone();
            let station = station_id.clone();
            self.pool.execute(move || {
                let result = retriever.fetch_combined(&station, range, sensors);
                let _ = tx.send((index, result));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<CombinedStationResult>> = vec![None; station_ids.len()];
        for (index, result) in rx.iter() {
            slots[index] = Some(result);
        }

        slots
            .into_iter()
            .zip(station_ids)
            .map(|(slot, station_id)| {
                slot.unwrap_or_else(|| {
                    let lost = WaterOfficeError::Transport("station worker exited without a result".to_string());
                    CombinedStationResult {
                        station_id: station_id.clone(),
                        detail: BranchOutcome::Failed(lost.clone()),
                        graph: BranchOutcome::Failed(lost),
                    }
                })
            })
            .collect()
    }

    fn missing_branch(&self, branch: &str, timed_out: bool) -> WaterOfficeError {
        if timed_out {
            WaterOfficeError::TimedOut {
                after_ms: self.branch_timeout.as_millis() as u64,
            }
        } else {
            WaterOfficeError::Transport(format!("{} worker exited without a result", branch))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
