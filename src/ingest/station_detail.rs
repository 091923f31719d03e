/// Station detail page extraction.
///
/// The detail page reports current conditions as a free-text paragraph
/// ("The latest water level recorded was ..."). The first `<p>` whose own
/// text contains the marker phrase is taken; if none does, the station has
/// no current reading and the unavailable statement is returned.

use crate::markup::{self, Document};
use crate::model::{StationDetail, WaterOfficeError};

/// Case-sensitive phrase identifying the current-conditions paragraph.
pub const LATEST_WATER_LEVEL_MARKER: &str = "latest water level";

/// Extracts the latest water level statement from a parsed detail page.
///
/// Matching looks only at each paragraph's direct text; the returned
/// statement is the matching paragraph's full text with whitespace
/// collapsed, so values wrapped in `<strong>` and the like are kept.
pub fn extract_latest_statement(doc: &Document) -> Result<StationDetail, WaterOfficeError> {
    let paragraph_sel = markup::selector("p")?;

    let statement = doc
        .select(&paragraph_sel)
        .find(|p| markup::direct_text(*p).contains(LATEST_WATER_LEVEL_MARKER))
        .map(markup::full_text);

    Ok(match statement {
        Some(latest_water_statement) => StationDetail { latest_water_statement },
        None => StationDetail::unavailable(),
    })
}
