//! Request parameters for the names endpoints
//!
//! Parameters serialize to a form-urlencoded query string. Array-valued
//! filters repeat their key, absent values are omitted. The serialized
//! string doubles as the query cache key.

use std::fmt;
use url::form_urlencoded;

/// Column the names list is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    Name,
    #[default]
    TotalCount,
    GenderBalance,
    Rank,
}

impl SortBy {
    pub fn all() -> [SortBy; 4] {
        [
            SortBy::Name,
            SortBy::TotalCount,
            SortBy::GenderBalance,
            SortBy::Rank,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::TotalCount => "total_count",
            SortBy::GenderBalance => "gender_balance",
            SortBy::Rank => "rank",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Name => "Name",
            SortBy::TotalCount => "Total count",
            SortBy::GenderBalance => "Gender balance",
            SortBy::Rank => "Rank",
        }
    }

    /// Next sort column, wrapping around
    pub fn next(&self) -> SortBy {
        let all = Self::all();
        let idx = all.iter().position(|s| s == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Previous sort column, wrapping around
    pub fn prev(&self) -> SortBy {
        let all = Self::all();
        let idx = all.iter().position(|s| s == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggle(&self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

/// Filters for `/api/names`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamesFilterParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub countries: Vec<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub gender_balance_min: Option<u8>,
    pub gender_balance_max: Option<u8>,
    pub min_count: Option<u64>,
    pub top_n: Option<u64>,
    pub coverage_percent: Option<f64>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub search: Option<String>,
}

impl NamesFilterParams {
    /// Key/value pairs in wire order
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "page", self.page);
        push_opt(&mut pairs, "page_size", self.page_size);
        for code in &self.countries {
            pairs.push(("countries", code.clone()));
        }
        push_opt(&mut pairs, "year_min", self.year_min);
        push_opt(&mut pairs, "year_max", self.year_max);
        push_opt(&mut pairs, "gender_balance_min", self.gender_balance_min);
        push_opt(&mut pairs, "gender_balance_max", self.gender_balance_max);
        push_opt(&mut pairs, "min_count", self.min_count);
        push_opt(&mut pairs, "top_n", self.top_n);
        push_opt(&mut pairs, "coverage_percent", self.coverage_percent);
        push_opt(&mut pairs, "sort_by", self.sort_by.map(|s| s.as_str()));
        push_opt(&mut pairs, "sort_order", self.sort_order.map(|s| s.as_str()));
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }

    /// `?k=v&...`, or an empty string when no parameter is set
    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.to_query_pairs())
    }

    /// Search term when one is set and non-empty
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

/// Parameters for `/api/names/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameTrendParams {
    pub name: String,
    pub countries: Vec<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

impl NameTrendParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Query pairs, excluding the name (which goes into the path)
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for code in &self.countries {
            pairs.push(("countries", code.clone()));
        }
        push_opt(&mut pairs, "year_min", self.year_min);
        push_opt(&mut pairs, "year_max", self.year_max);
        pairs
    }

    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.to_query_pairs())
    }

    /// Endpoint path and query, e.g. `/api/names/Alex?year_min=1990`
    pub fn endpoint(&self) -> String {
        format!(
            "/api/names/{}{}",
            urlencoding::encode(&self.name),
            self.to_query_string()
        )
    }
}

impl fmt::Display for NamesFilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/api/names{}", self.to_query_string())
    }
}

fn push_opt<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

/// Encode pairs as a query string with a leading `?`
pub fn encode_pairs<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    format!("?{}", serializer.finish())
}
