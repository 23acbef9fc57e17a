//! Runtime configuration
//!
//! Resolved once at startup from, lowest precedence first: built-in
//! defaults, a `.env` file, environment variables, command-line flags.
//!
//! - `NAMES_API_MODE` / `--mode`: `mock` or `real` (default `mock`)
//! - `NAMES_API_BASE_URL` / `--base-url` (default `http://localhost:8000`)
//! - `NAMES_MOCK_DELAY_MS` / `--mock-delay-ms` (default `200`)
//! - `NAMES_PAGE_SIZE` / `--page-size` (default `20`)
//! - `NAMES_REQUEST_TIMEOUT_MS` (default `10000`)
//! - `NAMES_QUERY_RETRY`: extra attempts after a failed fetch (default `3`)
//! - `NAMES_LOG_FILE` / `--log-file` (default `names-tui.log`)
//! - `RUST_LOG` (default `info`)

use clap::Parser;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_MOCK_DELAY_MS: u64 = 200;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_QUERY_RETRY: u32 = 3;
pub const DEFAULT_LOG_FILE: &str = "names-tui.log";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Command-line flags
#[derive(Debug, Default, Parser)]
#[command(name = "names-tui")]
#[command(version, about = "Explore name popularity statistics and trends", long_about = None)]
pub struct Cli {
    /// Data source: `mock` (bundled fixtures) or `real` (HTTP API)
    #[arg(long)]
    pub mode: Option<String>,

    /// Base URL of the names API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Simulated latency for mock responses, in milliseconds
    #[arg(long)]
    pub mock_delay_ms: Option<u64>,

    /// Rows per page in the explorer
    #[arg(long)]
    pub page_size: Option<u32>,

    /// File that receives log output
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Screen to open on start, e.g. `/names` or `/name/Alex`
    #[arg(long, default_value = "/")]
    pub route: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid API mode {0:?} (expected \"mock\" or \"real\")")]
    InvalidMode(String),
    #[error("invalid value {value:?} for {name}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("unknown start route {0:?}")]
    InvalidRoute(String),
}

/// Where data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiMode {
    #[default]
    Mock,
    Real,
}

impl FromStr for ApiMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(ApiMode::Mock),
            "real" => Ok(ApiMode::Real),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiMode::Mock => write!(f, "mock"),
            ApiMode::Real => write!(f, "real"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_mode: ApiMode,
    /// Without trailing slash
    pub api_base_url: String,
    pub mock_delay: Duration,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub query_retry: u32,
    pub log_file: PathBuf,
    pub log_filter: String,
    pub start_route: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_mode: ApiMode::Mock,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            mock_delay: Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            query_retry: DEFAULT_QUERY_RETRY,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            start_route: "/".to_string(),
        }
    }
}

impl Config {
    /// Resolve from flags and the process environment
    ///
    /// Call `dotenvy::dotenv()` first so `.env` values are visible.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli, |name| env::var(name).ok())
    }

    /// Resolve from flags and an arbitrary variable lookup
    pub fn resolve(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_mode = match cli.mode.clone().or_else(|| lookup("NAMES_API_MODE")) {
            Some(mode) => mode.parse()?,
            None => defaults.api_mode,
        };

        let api_base_url = cli
            .base_url
            .clone()
            .or_else(|| lookup("NAMES_API_BASE_URL"))
            .unwrap_or(defaults.api_base_url)
            .trim_end_matches('/')
            .to_string();

        let mock_delay_ms = match cli.mock_delay_ms {
            Some(ms) => ms,
            None => parse_var(&lookup, "NAMES_MOCK_DELAY_MS")?.unwrap_or(DEFAULT_MOCK_DELAY_MS),
        };

        let page_size = match cli.page_size {
            Some(size) => size,
            None => parse_var(&lookup, "NAMES_PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        if page_size == 0 {
            return Err(ConfigError::InvalidNumber {
                name: "page size",
                value: page_size.to_string(),
            });
        }

        let request_timeout_ms = parse_var(&lookup, "NAMES_REQUEST_TIMEOUT_MS")?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
        let query_retry = parse_var(&lookup, "NAMES_QUERY_RETRY")?.unwrap_or(defaults.query_retry);

        let log_file = cli
            .log_file
            .clone()
            .or_else(|| lookup("NAMES_LOG_FILE").map(PathBuf::from))
            .unwrap_or(defaults.log_file);

        let log_filter = lookup("RUST_LOG").unwrap_or(defaults.log_filter);

        Ok(Self {
            api_mode,
            api_base_url,
            mock_delay: Duration::from_millis(mock_delay_ms),
            page_size,
            request_timeout: Duration::from_millis(request_timeout_ms),
            query_retry,
            log_file,
            log_filter,
            start_route: cli.route.clone(),
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn cli() -> Cli {
        Cli {
            route: "/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(&cli(), vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_mode, ApiMode::Mock);
        assert_eq!(config.mock_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = Config::resolve(
            &cli(),
            vars(&[
                ("NAMES_API_MODE", "real"),
                ("NAMES_API_BASE_URL", "https://names.example.org/"),
                ("NAMES_PAGE_SIZE", "50"),
                ("NAMES_REQUEST_TIMEOUT_MS", "2500"),
                ("NAMES_QUERY_RETRY", "0"),
                ("RUST_LOG", "names_tui=debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_mode, ApiMode::Real);
        assert_eq!(config.api_base_url, "https://names.example.org");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.query_retry, 0);
        assert_eq!(config.log_filter, "names_tui=debug");
    }

    #[test]
    fn test_flags_override_env() {
        let cli = Cli {
            mode: Some("mock".to_string()),
            mock_delay_ms: Some(0),
            route: "/names".to_string(),
            ..Default::default()
        };
        let config = Config::resolve(
            &cli,
            vars(&[("NAMES_API_MODE", "real"), ("NAMES_MOCK_DELAY_MS", "900")]),
        )
        .unwrap();

        assert_eq!(config.api_mode, ApiMode::Mock);
        assert_eq!(config.mock_delay, Duration::ZERO);
        assert_eq!(config.start_route, "/names");
    }

    #[test]
    fn test_unknown_mode_is_an_error() {
        let err = Config::resolve(&cli(), vars(&[("NAMES_API_MODE", "staging")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidMode("staging".to_string()));
    }

    #[test]
    fn test_bad_numbers_are_errors() {
        let err = Config::resolve(&cli(), vars(&[("NAMES_PAGE_SIZE", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: "NAMES_PAGE_SIZE", .. }));

        let zero = Cli {
            page_size: Some(0),
            ..cli()
        };
        assert!(Config::resolve(&zero, vars(&[])).is_err());
    }

    #[test]
    fn test_mode_parse_is_case_insensitive() {
        assert_eq!("REAL".parse::<ApiMode>(), Ok(ApiMode::Real));
        assert_eq!(ApiMode::Mock.to_string(), "mock");
    }
}
