/// Core data types for the Water Office retrieval service.
///
/// This module defines the shared domain model imported by all other modules:
/// station records extracted from the search page, the latest-water-level
/// statement from a detail page, provisional graph readings, the combined
/// per-station result, and the error taxonomy. It contains no I/O.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Statement returned when a detail page carries no latest-water-level
/// paragraph. Station offline or under maintenance; not a failure.
pub const WATER_LEVEL_UNAVAILABLE: &str =
    "Water level unavailable at this time. Please try again later.";

/// Comment attached to every graph reading. Values come from the
/// `provisional` series and have not been quality controlled.
pub const PROVISIONAL_COMMENT: &str = "Provisional data subject to revision.";

/// Graph endpoint sensor id for water level, in metres.
pub const SENSOR_WATER_LEVEL: u32 = 46;

/// Graph endpoint sensor id for discharge, in cubic metres per second.
pub const SENSOR_DISCHARGE: u32 = 47;

// ---------------------------------------------------------------------------
// Station types
// ---------------------------------------------------------------------------

/// One row of the real-time station search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Site code, e.g. "08MH001".
    pub id: String,
    pub name: String,
    /// Two-letter province/territory code, e.g. "BC".
    pub province: String,
}

/// The narrative "latest water level" sentence from a station detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDetail {
    pub latest_water_statement: String,
}

impl StationDetail {
    /// Detail for a page with no current reading.
    pub fn unavailable() -> Self {
        Self {
            latest_water_statement: WATER_LEVEL_UNAVAILABLE.to_string(),
        }
    }

    /// False when the page had no latest-water-level paragraph.
    pub fn has_current_reading(&self) -> bool {
        self.latest_water_statement != WATER_LEVEL_UNAVAILABLE
    }
}

/// Provisional water level and discharge as of fetch time.
///
/// A `None` value means the sensor was present in the payload but had no
/// provisional value yet. An absent sensor is an error, not a `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDataPoint {
    pub comment: String,
    pub water_level: Option<f64>,
    pub discharge_level: Option<f64>,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Inclusive date window for the graph endpoint. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WaterOfficeError> {
        if start > end {
            return Err(WaterOfficeError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days`-long window ending on `end`. Fails when the start would
    /// fall before the earliest representable date.
    pub fn ending_on(end: NaiveDate, days: u32) -> Result<Self, WaterOfficeError> {
        let start = end
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or(WaterOfficeError::InvalidWindow(days))?;
        Ok(Self { start, end })
    }

    /// The `days`-long window ending today (local time).
    pub fn last_days(days: u32) -> Result<Self, WaterOfficeError> {
        Self::ending_on(Local::now().date_naive(), days)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// The pair of graph sensors requested for a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorIds {
    pub water_level: u32,
    pub discharge: u32,
}

impl Default for SensorIds {
    fn default() -> Self {
        Self {
            water_level: SENSOR_WATER_LEVEL,
            discharge: SENSOR_DISCHARGE,
        }
    }
}

// ---------------------------------------------------------------------------
// Combined result
// ---------------------------------------------------------------------------

/// Outcome of one branch of a combined fetch: its data, or why it failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BranchOutcome<T> {
    Ok(T),
    Failed(WaterOfficeError),
}

impl<T> BranchOutcome<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            BranchOutcome::Ok(data) => Some(data),
            BranchOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&WaterOfficeError> {
        match self {
            BranchOutcome::Ok(_) => None,
            BranchOutcome::Failed(err) => Some(err),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, BranchOutcome::Ok(_))
    }
}

impl<T> From<Result<T, WaterOfficeError>> for BranchOutcome<T> {
    fn from(result: Result<T, WaterOfficeError>) -> Self {
        match result {
            Ok(data) => BranchOutcome::Ok(data),
            Err(err) => BranchOutcome::Failed(err),
        }
    }
}

/// One successful entry of a combined result, in detail-then-graph order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CombinedEntry {
    Detail(StationDetail),
    Graph(GraphDataPoint),
}

/// Detail page and graph data for one station, fetched together.
///
/// Each branch carries its own outcome so a caller can tell "no current
/// reading" (a successful detail with the unavailable statement) apart from
/// "the graph endpoint was unreachable" (a failed graph branch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedStationResult {
    pub station_id: String,
    pub detail: BranchOutcome<StationDetail>,
    pub graph: BranchOutcome<GraphDataPoint>,
}

impl CombinedStationResult {
    /// Successful branches, detail first.
    pub fn entries(&self) -> Vec<CombinedEntry> {
        let mut entries = Vec::with_capacity(2);
        if let Some(detail) = self.detail.data() {
            entries.push(CombinedEntry::Detail(detail.clone()));
        }
        if let Some(point) = self.graph.data() {
            entries.push(CombinedEntry::Graph(point.clone()));
        }
        entries
    }

    /// Failed branches, labelled "detail" or "graph".
    pub fn failures(&self) -> Vec<(&'static str, &WaterOfficeError)> {
        let mut failures = Vec::new();
        if let Some(err) = self.detail.failure() {
            failures.push(("detail", err));
        }
        if let Some(err) = self.graph.failure() {
            failures.push(("graph", err));
        }
        failures
    }

    pub fn is_complete(&self) -> bool {
        self.detail.is_ok() && self.graph.is_ok()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or extracting Water Office data.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum WaterOfficeError {
    /// DNS, connection or protocol failure before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),
    /// No response within the configured timeout.
    #[error("Timed out after {after_ms} ms")]
    #[serde(rename_all = "camelCase")]
    TimedOut { after_ms: u64 },
    /// Any HTTP status other than 200.
    #[error("HTTP error: {0}")]
    RemoteStatus(u16),
    /// The flat extraction lists disagree in length.
    #[error("Station table misaligned: {labels} labels, {ids} ids, {provinces} province codes")]
    ParseMismatch {
        labels: usize,
        ids: usize,
        provinces: usize,
    },
    /// The graph payload has no entry for the sensor.
    #[error("Sensor {0} missing from graph payload")]
    MissingSensor(u32),
    /// The response body could not be interpreted.
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Graph window of {0} days is out of range")]
    InvalidWindow(u32),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
