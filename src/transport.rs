/// HTTP transport for Water Office requests.
///
/// Every request carries a desktop browser User-Agent and the
/// `disclaimer=agree` cookie; the site serves a disclaimer page instead of
/// data without it. Only HTTP 200 counts as success. There is no retry.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::config::TransportConfig;
use crate::model::WaterOfficeError;

/// Cookie acknowledging the site's data disclaimer.
pub const DISCLAIMER_COOKIE: &str = "disclaimer=agree";

/// Query parameters as (name, value) pairs, in request order.
pub type QueryParams<'a> = [(&'a str, String)];

/// One HTTP GET returning the decoded body.
///
/// Implementations must return `RemoteStatus` for any non-200 response and
/// must not hand back an error page's body as data.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, params: &QueryParams<'_>) -> Result<String, WaterOfficeError>;
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Appends percent-encoded query parameters to `base`.
///
/// # Example
/// ```
/// use hydromet_service::transport::build_url;
///
/// let url = build_url(
///     "https://wateroffice.ec.gc.ca/report/real_time_e.html",
///     &[("stn", "08MH001".to_string())],
/// );
/// assert_eq!(url, "https://wateroffice.ec.gc.ca/report/real_time_e.html?stn=08MH001");
/// ```
pub fn build_url(base: &str, params: &QueryParams<'_>) -> String {
    if params.is_empty() {
        return base.to_string();
    }

    let query = params
        .iter()
        .map(|(name, value)| format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if base.contains('?') { '&' } else { '?' };

    format!("{}{}{}", base, separator, query)
}

// ---------------------------------------------------------------------------
// reqwest implementation
// ---------------------------------------------------------------------------

/// Blocking reqwest transport with the fixed headers baked into the client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, WaterOfficeError> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(DISCLAIMER_COOKIE));

        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| WaterOfficeError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, err: reqwest::Error) -> WaterOfficeError {
        if err.is_timeout() {
            WaterOfficeError::TimedOut {
                after_ms: self.timeout.as_millis() as u64,
            }
        } else {
            WaterOfficeError::Transport(err.to_string())
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, params: &QueryParams<'_>) -> Result<String, WaterOfficeError> {
        let url = build_url(url, params);
        debug!(%url, "GET");

        let response = self.client.get(&url).send().map_err(|e| self.classify(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(WaterOfficeError::RemoteStatus(status.as_u16()));
        }

        response.text().map_err(|e| self.classify(e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
