/// Test fixtures: representative Water Office pages and graph payloads.
///
/// These fixtures are trimmed to the minimum needed to exercise the
/// extractors. They pin the markup shape the extractors rely on.
///
/// Search results page (real_time_results_e.html):
///   table > tbody > tr
///     td[0] - selection checkbox (no text)
///     td[1] - <label> holding the station name
///     td[2] - province/territory code, e.g. "BC"
///     td[3] - station number, e.g. "08MH001"
///     td[4] - "Yes"/"No" flag column
///
/// Detail page (real_time_e.html?stn=...):
///   any number of <p>; at most one contains "latest water level".
///
/// Graph payload (real_time_graph/json/inline):
///   { "<sensor id>": { "provisional": <number|null>, ... }, ... }

/// Three complete station rows, laid out with real-world whitespace.
#[cfg(test)]
pub(crate) fn fixture_search_results_html() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<head><title>Real-Time Hydrometric Data Search Results</title></head>
<body>
  <h1>Search Results</h1>
  <table class="table" id="resultsTable">
    <thead>
      <tr><th>Select</th><th>Station Name</th><th>Province</th><th>Station Number</th><th>Historical</th></tr>
    </thead>
    <tbody>
      <tr>
        <td><input type="checkbox" name="check" id="08MH001" value="08MH001"></td>
        <td><label for="08MH001">CHILLIWACK RIVER AT VEDDER CROSSING</label></td>
        <td>BC</td>
        <td>08MH001</td>
        <td>No</td>
      </tr>
      <tr>
        <td><input type="checkbox" name="check" id="08MF005" value="08MF005"></td>
        <td><label for="08MF005">FRASER RIVER AT HOPE</label></td>
        <td>BC</td>
        <td>08MF005</td>
        <td>Yes</td>
      </tr>
      <tr>
        <td><input type="checkbox" name="check" id="09AB001" value="09AB001"></td>
        <td><label for="09AB001">YUKON RIVER AT WHITEHORSE</label></td>
        <td>YT</td>
        <td>09AB001</td>
        <td>No</td>
      </tr>
    </tbody>
  </table>
</body>
</html>"#
}

/// One good row, one row missing cells, one row whose name cell has no
/// label, and a second good row.
#[cfg(test)]
pub(crate) fn fixture_search_results_with_incomplete_rows_html() -> &'static str {
    r#"<html><body><table><tbody>
      <tr>
        <td></td>
        <td><label>CHILLIWACK RIVER AT VEDDER CROSSING</label></td>
        <td>BC</td>
        <td>08MH001</td>
      </tr>
      <tr>
        <td></td>
        <td><label>TRUNCATED ROW</label></td>
        <td>BC</td>
      </tr>
      <tr>
        <td></td>
        <td>UNLABELLED STATION</td>
        <td>AB</td>
        <td>05AA008</td>
      </tr>
      <tr>
        <td></td>
        <td><label>FRASER RIVER AT HOPE</label></td>
        <td>BC</td>
        <td>08MF005</td>
      </tr>
    </tbody></table></body></html>"#
}

/// The second row's province cell is empty, so the flat heuristic finds
/// three labels and three ids but only two province codes, and the
/// row-scoped extractor drops that row.
#[cfg(test)]
pub(crate) fn fixture_search_results_missing_province_html() -> &'static str {
    r#"<html><body><table><tbody>
      <tr><td></td><td><label>CHILLIWACK RIVER AT VEDDER CROSSING</label></td><td>BC</td><td>08MH001</td></tr>
      <tr><td></td><td><label>FRASER RIVER AT HOPE</label></td><td></td><td>08MF005</td></tr>
      <tr><td></td><td><label>YUKON RIVER AT WHITEHORSE</label></td><td>YT</td><td>09AB001</td></tr>
    </tbody></table></body></html>"#
}

/// An extra numeric column ("Drainage area") adds digit-bearing cells that
/// the flat heuristic mistakes for station ids.
#[cfg(test)]
pub(crate) fn fixture_search_results_extra_numeric_column_html() -> &'static str {
    r#"<html><body><table><tbody>
      <tr><td></td><td><label>CHILLIWACK RIVER AT VEDDER CROSSING</label></td><td>BC</td><td>08MH001</td><td>1230</td></tr>
      <tr><td></td><td><label>FRASER RIVER AT HOPE</label></td><td>BC</td><td>08MF005</td><td>217000</td></tr>
    </tbody></table></body></html>"#
}

/// Each row carries an extra cell whose label sits inside a wrapper
/// element. Only the station-name labels are direct children of a cell.
#[cfg(test)]
pub(crate) fn fixture_search_results_nested_label_html() -> &'static str {
    r#"<html><body><table><tbody>
      <tr><td></td><td><label>CHILLIWACK RIVER AT VEDDER CROSSING</label></td><td>BC</td><td>08MH001</td><td><span><label>Historical</label></span></td></tr>
      <tr><td></td><td><label>FRASER RIVER AT HOPE</label></td><td>BC</td><td>08MF005</td><td><span><label>Historical</label></span></td></tr>
    </tbody></table></body></html>"#
}

/// Page with no result rows.
#[cfg(test)]
pub(crate) fn fixture_search_results_empty_html() -> &'static str {
    r#"<html><body><p>No stations matched your search.</p><table><tbody></tbody></table></body></html>"#
}

/// Detail page with the plain latest-water-level sentence.
#[cfg(test)]
pub(crate) fn fixture_station_detail_html() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<body>
  <h1>CHILLIWACK RIVER AT VEDDER CROSSING (08MH001)</h1>
  <p>Real-time data are provisional and subject to revision.</p>
  <p>The latest water level recorded was 1.2 m.</p>
  <p>Data are updated hourly.</p>
</body>
</html>"#
}

/// Detail page where the value is wrapped in nested markup.
#[cfg(test)]
pub(crate) fn fixture_station_detail_nested_markup_html() -> &'static str {
    r#"<html><body>
  <p>
    The latest water level recorded was <strong>2.31 m</strong>
    on <time>2022-10-08 10:45 PDT</time>.
  </p>
</body></html>"#
}

/// Detail page for a station that is offline: no latest-water-level text.
#[cfg(test)]
pub(crate) fn fixture_station_detail_offline_html() -> &'static str {
    r#"<html><body>
  <h1>SLESSE CREEK NEAR VEDDER CROSSING (08MH056)</h1>
  <p>This station is temporarily out of service.</p>
  <p>Real-time data are provisional and subject to revision.</p>
</body></html>"#
}

/// Detail page with two matching paragraphs; the first one wins.
#[cfg(test)]
pub(crate) fn fixture_station_detail_two_matches_html() -> &'static str {
    r#"<html><body>
  <p>The latest water level recorded was 1.2 m.</p>
  <p>The latest water level recorded was 9.9 m.</p>
</body></html>"#
}

/// Both sensors with provisional values.
#[cfg(test)]
pub(crate) fn fixture_graph_payload_json() -> &'static str {
    r#"{
      "46": { "provisional": 1.23 },
      "47": { "provisional": 45.6 }
    }"#
}

/// Discharge sensor present but not yet provisional.
#[cfg(test)]
pub(crate) fn fixture_graph_payload_null_discharge_json() -> &'static str {
    r#"{
      "46": { "provisional": 1.23 },
      "47": { "provisional": null }
    }"#
}

/// Discharge sensor absent from the payload.
#[cfg(test)]
pub(crate) fn fixture_graph_payload_missing_discharge_json() -> &'static str {
    r#"{
      "46": { "provisional": 1.23 }
    }"#
}
