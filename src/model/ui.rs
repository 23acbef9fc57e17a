//! UI state - routes and navigation helpers
//!
//! Screens are addressed by path-like routes so the starting screen can be
//! chosen from the command line and the back stack can be logged readably.

use super::filters::encode_pairs;
use std::fmt;

/// A screen of the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Landing screen
    Home,
    /// Names explorer (list + filters)
    Names,
    /// Trend detail for a single name
    NameDetail(String),
}

impl Route {
    pub const HOME: &'static str = "/";
    pub const NAMES_EXPLORER: &'static str = "/names";
    pub const NAME_DETAIL_PREFIX: &'static str = "/name/";

    /// Path for this route, with the name percent-encoded
    pub fn path(&self) -> String {
        match self {
            Route::Home => Self::HOME.to_string(),
            Route::Names => Self::NAMES_EXPLORER.to_string(),
            Route::NameDetail(name) => {
                format!("{}{}", Self::NAME_DETAIL_PREFIX, urlencoding::encode(name))
            }
        }
    }

    /// Parse a path back into a route; the query string, if any, is ignored
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split('?').next().unwrap_or_default();
        let trimmed = if path.len() > 1 { path.trim_end_matches('/') } else { path };

        match trimmed {
            "" | Self::HOME => Some(Route::Home),
            Self::NAMES_EXPLORER => Some(Route::Names),
            _ => {
                let encoded = trimmed.strip_prefix(Self::NAME_DETAIL_PREFIX)?;
                if encoded.is_empty() || encoded.contains('/') {
                    return None;
                }
                let name = urlencoding::decode(encoded).ok()?.into_owned();
                Some(Route::NameDetail(name))
            }
        }
    }

    /// Title shown in the header
    pub fn title(&self) -> String {
        match self {
            Route::Home => "Home".to_string(),
            Route::Names => "Explore names".to_string(),
            Route::NameDetail(name) => name.clone(),
        }
    }

    /// Header tab index (detail pages belong to the explorer tab)
    pub fn tab_index(&self) -> usize {
        match self {
            Route::Home => 0,
            Route::Names | Route::NameDetail(_) => 1,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Header navigation tabs
pub const NAV_TABS: [&str; 2] = ["Home", "Explore names"];

/// Append query parameters to a path; parameters with no value are skipped
pub fn build_url_with_params(path: &str, params: &[(&str, Option<String>)]) -> String {
    let present: Vec<(&str, &str)> = params
        .iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
        .collect();
    format!("{}{}", path, encode_pairs(&present))
}

/// Back stack of visited routes
#[derive(Debug, Default)]
pub struct History {
    stack: Vec<Route>,
}

impl History {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, route: Route) {
        self.stack.push(route);
    }

    pub fn pop(&mut self) -> Option<Route> {
        self.stack.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Names.path(), "/names");
        assert_eq!(Route::NameDetail("Mary Ann".to_string()).path(), "/name/Mary%20Ann");
    }

    #[test]
    fn test_route_parse_inverts_path() {
        for route in [
            Route::Home,
            Route::Names,
            Route::NameDetail("Zoë".to_string()),
            Route::NameDetail("Jean-Luc".to_string()),
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_route_parse_edge_cases() {
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(Route::parse("/names/"), Some(Route::Names));
        assert_eq!(Route::parse("/names?page=2"), Some(Route::Names));
        assert_eq!(Route::parse("/name/"), None);
        assert_eq!(Route::parse("/name/a/b"), None);
        assert_eq!(Route::parse("/unknown"), None);
    }

    #[test]
    fn test_build_url_with_params() {
        assert_eq!(build_url_with_params("/names", &[]), "/names");
        assert_eq!(
            build_url_with_params("/names", &[("page", Some("2".to_string())), ("search", None)]),
            "/names?page=2"
        );
        assert_eq!(build_url_with_params("/names", &[("search", None)]), "/names");
    }

    #[test]
    fn test_history_stack() {
        let mut history = History::new();
        assert!(history.is_empty());
        history.push(Route::Home);
        history.push(Route::Names);
        assert_eq!(history.len(), 2);
        assert_eq!(history.pop(), Some(Route::Names));
        assert_eq!(history.pop(), Some(Route::Home));
        assert_eq!(history.pop(), None);
    }
}
