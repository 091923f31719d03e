/// Station search results extraction.
///
/// Turns the real-time search results table into `StationRecord`s. Cells
/// have fixed positional roles within each body row:
///
///   td[1] - `<label>` with the station name
///   td[2] - two-letter province/territory code
///   td[3] - station number
///
/// Two strategies are available. `RowScoped` reads each row on its own and
/// cannot misalign across rows; it is the default. `FlatHeuristic` collects
/// labels, digit-bearing cells and two-character cells page-wide and zips
/// them, refusing with `ParseMismatch` when the three lists disagree in
/// length.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::markup::{self, Document};
use crate::model::{StationRecord, WaterOfficeError};

const NAME_CELL: usize = 1;
const PROVINCE_CELL: usize = 2;
const ID_CELL: usize = 3;
const MIN_CELLS: usize = 4;

/// Two-character cell text that is a yes/no flag, not a province code.
const NOT_A_PROVINCE: &str = "No";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    #[default]
    RowScoped,
    FlatHeuristic,
}

/// Extracts station records from a parsed search results page.
///
/// # Errors
/// - `WaterOfficeError::ParseMismatch` - flat heuristic only; the label, id
///   and province lists have different lengths.
/// - `WaterOfficeError::Malformed` - a selector failed to compile.
pub fn extract_station_list(
    doc: &Document,
    strategy: ExtractionStrategy,
) -> Result<Vec<StationRecord>, WaterOfficeError> {
    match strategy {
        ExtractionStrategy::RowScoped => extract_row_scoped(doc),
        ExtractionStrategy::FlatHeuristic => extract_flat(doc),
    }
}

// ---------------------------------------------------------------------------
// Row-scoped extraction
// ---------------------------------------------------------------------------

fn extract_row_scoped(doc: &Document) -> Result<Vec<StationRecord>, WaterOfficeError> {
    let row_sel = markup::selector("tbody > tr")?;
    let label_sel = markup::selector("label")?;

    let mut stations = Vec::new();

    for (index, row) in doc.select(&row_sel).enumerate() {
        let cells: Vec<_> = markup::child_elements(row, "td").collect();
        if cells.len() < MIN_CELLS {
            debug!(row = index, cells = cells.len(), "skipping short row");
            continue;
        }

        let Some(label) = cells[NAME_CELL].select(&label_sel).next() else {
            debug!(row = index, "skipping row without station label");
            continue;
        };

        let name = markup::full_text(label);
        let province = markup::full_text(cells[PROVINCE_CELL]);
        let id = markup::full_text(cells[ID_CELL]);

        if name.is_empty() || id.is_empty() || province.is_empty() {
            debug!(row = index, "skipping row with blank name, id or province");
            continue;
        }

        stations.push(StationRecord { id, name, province });
    }

    Ok(stations)
}

// ---------------------------------------------------------------------------
// Flat heuristic extraction
// ---------------------------------------------------------------------------

fn extract_flat(doc: &Document) -> Result<Vec<StationRecord>, WaterOfficeError> {
    let label_sel = markup::selector("tbody > tr > td > label")?;
    let cell_sel = markup::selector("tbody tr td")?;

    let labels: Vec<String> = doc.select(&label_sel).map(markup::full_text).collect();

    let cell_texts: Vec<String> = doc
        .select(&cell_sel)
        .map(|cell| markup::direct_text(cell).trim().to_string())
        .collect();

    let ids: Vec<&String> = cell_texts.iter().filter(|text| looks_like_station_id(text)).collect();
    let provinces: Vec<&String> = cell_texts.iter().filter(|text| looks_like_province(text)).collect();

    if labels.len() != ids.len() || ids.len() != provinces.len() {
        return Err(WaterOfficeError::ParseMismatch {
            labels: labels.len(),
            ids: ids.len(),
            provinces: provinces.len(),
        });
    }

    Ok(labels
        .into_iter()
        .zip(ids)
        .zip(provinces)
        .map(|((name, id), province)| StationRecord {
            id: id.clone(),
            name,
            province: province.clone(),
        })
        .collect())
}

fn looks_like_station_id(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn looks_like_province(text: &str) -> bool {
    text.chars().count() == 2 && text != NOT_A_PROVINCE
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
