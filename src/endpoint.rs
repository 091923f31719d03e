/// HTTP endpoint for querying station snapshots
///
/// Provides a small JSON API for the downstream website / alerting job.
/// Every request triggers a fresh fetch; nothing is cached or stored.
///
/// Endpoints:
/// - GET /health - Service health check
/// - GET /station/{station_id} - Combined detail + graph snapshot
/// - GET /search/{region} - Real-time stations in a region, e.g. PYR

use serde_json::json;
use std::io::Cursor;
use tracing::{info, warn};

use crate::config::RetrievalConfig;
use crate::ingest::station_list::ExtractionStrategy;
use crate::retrieval::Retriever;

type JsonResponse = tiny_http::Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port. Blocks forever.
pub fn start_endpoint_server(port: u16, retriever: Retriever, retrieval: RetrievalConfig) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    info!(port, "HTTP endpoint listening");

    for request in server.incoming_requests() {
        let (status, body) = route(request.url(), &retriever, &retrieval);
        info!(url = request.url(), status, "request served");

        if let Err(e) = request.respond(create_response(status, &body)) {
            warn!(error = %e, "failed to send response");
        }
    }

    Ok(())
}

/// Maps a request path to a status code and JSON body.
pub fn route(url: &str, retriever: &Retriever, retrieval: &RetrievalConfig) -> (u16, serde_json::Value) {
    let path = url.split('?').next().unwrap_or_default();

    if path == "/health" {
        handle_health()
    } else if let Some(station_id) = path.strip_prefix("/station/") {
        handle_station_query(station_id, retriever, retrieval)
    } else if let Some(region) = path.strip_prefix("/search/") {
        handle_search(region, retriever)
    } else {
        (
            404,
            json!({
                "error": "Not found",
                "available_endpoints": ["/health", "/station/{station_id}", "/search/{region}"]
            }),
        )
    }
}

/// Handle /health endpoint
fn handle_health() -> (u16, serde_json::Value) {
    (
        200,
        json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        }),
    )
}

/// Handle /station/{station_id} endpoint
///
/// Partial results are still a 200: branch failures are reported inside
/// the body.
fn handle_station_query(station_id: &str, retriever: &Retriever, retrieval: &RetrievalConfig) -> (u16, serde_json::Value) {
    if !is_valid_code(station_id) {
        return (400, json!({ "error": "Invalid station id", "station_id": station_id }));
    }

    let range = match retrieval.date_range() {
        Ok(range) => range,
        Err(e) => return (500, json!({ "error": e.to_string(), "station_id": station_id })),
    };

    let result = retriever.fetch_combined(station_id, range, retrieval.sensor_ids());
    match serde_json::to_value(&result) {
        Ok(body) => (200, body),
        Err(e) => (500, json!({ "error": e.to_string(), "station_id": station_id })),
    }
}

/// Handle /search/{region} endpoint
fn handle_search(region: &str, retriever: &Retriever) -> (u16, serde_json::Value) {
    if !is_valid_code(region) {
        return (400, json!({ "error": "Invalid region", "region": region }));
    }

    match retriever.search_stations("region", region, ExtractionStrategy::RowScoped) {
        Ok(stations) => (200, json!({ "region": region, "stations": stations })),
        Err(e) => (502, json!({ "error": e.to_string(), "region": region })),
    }
}

fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &serde_json::Value) -> JsonResponse {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| "{}".to_string());
    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointConfig, ServiceConfig};
    use crate::ingest::fixtures::*;
    use crate::model::WaterOfficeError;
    use crate::transport::{QueryParams, Transport};
    use std::sync::Arc;

    /// Serves the healthy fixtures for every endpoint; search fails.
    struct FixtureTransport;

    impl Transport for FixtureTransport {
        fn get(&self, url: &str, _params: &QueryParams<'_>) -> Result<String, WaterOfficeError> {
            match url {
                "http://fixture/detail" => Ok(fixture_station_detail_html().to_string()),
                "http://fixture/graph" => Ok(fixture_graph_payload_json().to_string()),
                _ => Err(WaterOfficeError::RemoteStatus(500)),
            }
        }
    }

    fn fixture_retriever() -> (Retriever, RetrievalConfig) {
        let mut config = ServiceConfig::default();
        config.endpoints = EndpointConfig {
            search_url: "http://fixture/search".to_string(),
            detail_url: "http://fixture/detail".to_string(),
            graph_url: "http://fixture/graph".to_string(),
        };
        (Retriever::new(Arc::new(FixtureTransport), &config), config.retrieval)
    }

    #[test]
    fn test_health_endpoint() {
        let (retriever, retrieval) = fixture_retriever();
        let (status, body) = route("/health", &retriever, &retrieval);
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "hydromet_service");
    }

    #[test]
    fn test_station_endpoint_returns_combined_result() {
        let (retriever, retrieval) = fixture_retriever();
        let (status, body) = route("/station/08MH001", &retriever, &retrieval);

        assert_eq!(status, 200);
        assert_eq!(body["stationId"], "08MH001");
        assert_eq!(
            body["detail"]["ok"]["latestWaterStatement"],
            "The latest water level recorded was 1.2 m."
        );
        assert_eq!(body["graph"]["ok"]["waterLevel"], 1.23);
    }

    #[test]
    fn test_query_string_is_ignored() {
        let (retriever, retrieval) = fixture_retriever();
        let (status, body) = route("/station/08MH001?format=json", &retriever, &retrieval);
        assert_eq!(status, 200);
        assert_eq!(body["stationId"], "08MH001");
    }

    #[test]
    fn test_invalid_station_id_is_bad_request() {
        let (retriever, retrieval) = fixture_retriever();
        let (status, _) = route("/station/", &retriever, &retrieval);
        assert_eq!(status, 400);
        let (status, _) = route("/station/08MH001%20OR%201", &retriever, &retrieval);
        assert_eq!(status, 400);
    }

    #[test]
    fn test_search_failure_is_bad_gateway() {
        let (retriever, retrieval) = fixture_retriever();
        let (status, body) = route("/search/PYR", &retriever, &retrieval);
        assert_eq!(status, 502);
        assert_eq!(body["error"], "HTTP error: 500");
    }

    #[test]
    fn test_unrepresentable_window_is_server_error() {
        let (retriever, mut retrieval) = fixture_retriever();
        retrieval.graph_window_days = u32::MAX;

        let (status, body) = route("/station/08MH001", &retriever, &retrieval);
        assert_eq!(status, 500, "bad window must not take the server down");
        assert_eq!(body["error"], format!("Graph window of {} days is out of range", u32::MAX));
    }

    #[test]
    fn test_unknown_route_is_not_found() {
        let (retriever, retrieval) = fixture_retriever();
        let (status, body) = route("/site/05568500", &retriever, &retrieval);
        assert_eq!(status, 404);
        assert!(body["available_endpoints"].is_array());
    }
}
