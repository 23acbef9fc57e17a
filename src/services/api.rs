//! Names API client
//!
//! Two implementations of [`NamesApi`]: [`HttpApi`] talks to a live server,
//! [`MockApi`] answers from embedded fixtures after a simulated delay.
//! Calls are blocking; the query cache runs them on worker threads.

use super::fixtures;
use crate::config::{ApiMode, Config};
use crate::model::api::{
    ApiErrorBody, CountriesResponse, MetaYearsResponse, NameTrendResponse, NamesListResponse,
};
use crate::model::filters::{NameTrendParams, NamesFilterParams};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Search term that makes the mock return the empty result fixture
pub const EMPTY_RESULT_SEARCH: &str = "xyz123";

/// Errors surfaced by the API client
///
/// `Display` is the human-readable message shown inline in the UI.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Non-2xx response
    #[error("{message}")]
    Http { status: u16, message: String },
    /// Connection, DNS or timeout failure
    #[error("Network error: {0}")]
    Network(String),
    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// The four read operations of the names API
pub trait NamesApi: Send + Sync {
    fn fetch_meta_years(&self) -> Result<MetaYearsResponse, ApiError>;

    fn fetch_countries(&self) -> Result<CountriesResponse, ApiError>;

    fn fetch_names(&self, filters: &NamesFilterParams) -> Result<NamesListResponse, ApiError>;

    fn fetch_name_trend(&self, params: &NameTrendParams) -> Result<NameTrendResponse, ApiError>;
}

/// Build the client selected by the configured API mode
pub fn build_api(config: &Config) -> Result<Arc<dyn NamesApi>, ApiError> {
    match config.api_mode {
        ApiMode::Mock => Ok(Arc::new(MockApi::new(config.mock_delay))),
        ApiMode::Real => {
            let api = HttpApi::new(&config.api_base_url, config.request_timeout)?;
            info!(base_url = api.base_url(), "using HTTP API");
            Ok(Arc::new(api))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Mock
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixture-backed client
pub struct MockApi {
    delay: Duration,
}

impl MockApi {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl NamesApi for MockApi {
    fn fetch_meta_years(&self) -> Result<MetaYearsResponse, ApiError> {
        self.simulate_latency();
        fixtures::meta_years()
    }

    fn fetch_countries(&self) -> Result<CountriesResponse, ApiError> {
        self.simulate_latency();
        fixtures::countries()
    }

    fn fetch_names(&self, filters: &NamesFilterParams) -> Result<NamesListResponse, ApiError> {
        self.simulate_latency();
        let is_empty_search = filters
            .search_term()
            .is_some_and(|s| s.eq_ignore_ascii_case(EMPTY_RESULT_SEARCH));
        if is_empty_search {
            return fixtures::names_list_empty();
        }
        fixtures::names_list()
    }

    fn fetch_name_trend(&self, params: &NameTrendParams) -> Result<NameTrendResponse, ApiError> {
        self.simulate_latency();
        let mut trend = fixtures::name_detail()?;
        trend.name = params.name.clone();
        Ok(trend)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP
// ═══════════════════════════════════════════════════════════════════════════════

/// Client for a live names API server
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let started = Instant::now();

        let response = self.client.get(&url).send().map_err(|e| {
            warn!(%url, error = %e, "request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "response");

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(error_from_body(
                status.as_u16(),
                status.canonical_reason(),
                &body,
            ));
        }

        response
            .json::<T>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl NamesApi for HttpApi {
    fn fetch_meta_years(&self) -> Result<MetaYearsResponse, ApiError> {
        self.get("/api/meta/years")
    }

    fn fetch_countries(&self) -> Result<CountriesResponse, ApiError> {
        self.get("/api/meta/countries")
    }

    fn fetch_names(&self, filters: &NamesFilterParams) -> Result<NamesListResponse, ApiError> {
        self.get(&format!("/api/names{}", filters.to_query_string()))
    }

    fn fetch_name_trend(&self, params: &NameTrendParams) -> Result<NameTrendResponse, ApiError> {
        self.get(&params.endpoint())
    }
}

/// Build the error for a non-2xx response
///
/// Uses the `message` of a JSON error body when there is one, otherwise
/// the status line.
pub fn error_from_body(status: u16, reason: Option<&str>, body: &str) -> ApiError {
    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => format!("HTTP {}: {}", status, reason.unwrap_or_default()),
    };
    ApiError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    /// Serve a single HTTP response and report the request line
    fn serve_once(status_line: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(request_line.trim_end().to_string());
        });

        (format!("http://{}", addr), rx)
    }

    fn http_api(base: &str) -> HttpApi {
        HttpApi::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_mock_empty_search_sentinel() {
        let api = MockApi::new(Duration::ZERO);
        let params = NamesFilterParams {
            search: Some("xyz123".to_string()),
            ..Default::default()
        };
        assert!(api.fetch_names(&params).unwrap().is_empty());

        let upper = NamesFilterParams {
            search: Some("XYZ123".to_string()),
            ..Default::default()
        };
        assert!(api.fetch_names(&upper).unwrap().is_empty());
    }

    #[test]
    fn test_mock_other_search_returns_fixture() {
        let api = MockApi::new(Duration::ZERO);
        let standard = fixtures::names_list().unwrap();
        for term in ["alex", "xyz12", "xyz1234", ""] {
            let params = NamesFilterParams {
                search: Some(term.to_string()),
                ..Default::default()
            };
            assert_eq!(api.fetch_names(&params).unwrap(), standard);
        }
    }

    #[test]
    fn test_mock_meta_endpoints() {
        let api = MockApi::new(Duration::ZERO);
        assert_eq!(api.fetch_meta_years().unwrap().min_year, 1880);
        assert!(!api.fetch_countries().unwrap().countries.is_empty());
        assert_eq!(api.fetch_name_trend(&NameTrendParams::new("Alex")).unwrap().name, "Alex");
    }

    #[test]
    fn test_error_from_json_body() {
        let err = error_from_body(400, Some("Bad Request"), r#"{"code":"INVALID","message":"year_min must be <= year_max"}"#);
        assert_eq!(
            err,
            ApiError::Http {
                status: 400,
                message: "year_min must be <= year_max".to_string()
            }
        );
        assert_eq!(err.to_string(), "year_min must be <= year_max");
    }

    #[test]
    fn test_error_from_status_line() {
        let err = error_from_body(502, Some("Bad Gateway"), "<html>upstream down</html>");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_http_names_request_and_decode() {
        let body = serde_json::to_string(&fixtures::names_list().unwrap()).unwrap();
        let (base, requests) = serve_once("200 OK", &body);
        let api = http_api(&base);

        let params = NamesFilterParams {
            page: Some(2),
            countries: vec!["US".to_string(), "UK".to_string()],
            ..Default::default()
        };
        let response = api.fetch_names(&params).unwrap();

        assert_eq!(response.names.len(), 10);
        assert_eq!(
            requests.recv().unwrap(),
            "GET /api/names?page=2&countries=US&countries=UK HTTP/1.1"
        );
    }

    #[test]
    fn test_http_trend_path_is_encoded() {
        let body = serde_json::to_string(&fixtures::name_detail().unwrap()).unwrap();
        let (base, requests) = serve_once("200 OK", &body);
        let api = http_api(&format!("{}/", base));

        api.fetch_name_trend(&NameTrendParams::new("Mary Ann")).unwrap();

        assert_eq!(requests.recv().unwrap(), "GET /api/names/Mary%20Ann HTTP/1.1");
    }

    #[test]
    fn test_http_error_uses_body_message() {
        let (base, _requests) = serve_once(
            "404 Not Found",
            r#"{"code":"NOT_FOUND","message":"Name not found"}"#,
        );
        let err = http_api(&base).fetch_meta_years().unwrap_err();
        assert_eq!(err.to_string(), "Name not found");
    }

    #[test]
    fn test_http_error_without_body_uses_status() {
        let (base, _requests) = serve_once("500 Internal Server Error", "");
        let err = http_api(&base).fetch_countries().unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn test_http_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = http_api(&format!("http://{}", addr)).fetch_meta_years().unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = http_api("http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
    }
}
