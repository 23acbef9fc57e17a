//! API response types
//!
//! Data-transfer shapes for every endpoint of the names API. Values are
//! deserialized once per response and shared read-only afterwards.

use serde::{Deserialize, Serialize};

/// Available year range in the dataset (`/api/meta/years`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaYearsResponse {
    pub min_year: i32,
    pub max_year: i32,
}

impl MetaYearsResponse {
    /// Clamp a year into the available range
    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min_year, self.max_year)
    }
}

/// A country with the data source its counts come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub data_source_name: String,
    pub data_source_url: String,
    #[serde(default)]
    pub data_source_description: Option<String>,
    #[serde(default)]
    pub data_source_requires_manual_download: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub countries: Vec<Country>,
}

/// Popularity summary returned alongside each names page
///
/// `active_driver` names the filter the server applied; the three
/// `derived_*` values are what the other two filters would have been.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularitySummary {
    pub population_total: u64,
    #[serde(default)]
    pub active_driver: Option<String>,
    #[serde(default)]
    pub active_value: Option<f64>,
    pub derived_min_count: u64,
    pub derived_top_n: u64,
    pub derived_coverage_percent: f64,
}

/// Pagination metadata plus the popularity summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamesListMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub db_start: i32,
    pub db_end: i32,
    pub popularity_summary: PopularitySummary,
}

impl NamesListMeta {
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }
}

/// One row of the names list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameEntry {
    pub name: String,
    pub total_count: u64,
    pub female_count: u64,
    pub male_count: u64,
    #[serde(default)]
    pub unknown_count: u64,
    /// 0 = all female, 100 = all male; absent when nothing is recorded
    #[serde(default)]
    pub gender_balance: Option<f64>,
    #[serde(default)]
    pub has_unknown_data: bool,
    pub rank: u64,
    /// Share of the population covered up to and including this name, in percent
    pub cumulative_share: f64,
    pub name_start: i32,
    pub name_end: i32,
    #[serde(default)]
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamesListResponse {
    pub meta: NamesListMeta,
    pub names: Vec<NameEntry>,
}

impl NamesListResponse {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Yearly statistics for a single name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub year: i32,
    pub total_count: u64,
    pub female_count: u64,
    pub male_count: u64,
    #[serde(default)]
    pub unknown_count: u64,
    #[serde(default)]
    pub gender_balance: Option<f64>,
}

/// Per-country breakdown for a single name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStats {
    pub country_code: String,
    pub country_name: String,
    pub total_count: u64,
    pub female_count: u64,
    pub male_count: u64,
    #[serde(default)]
    pub unknown_count: u64,
    #[serde(default)]
    pub gender_balance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSummary {
    pub total_count: u64,
    pub female_count: u64,
    pub male_count: u64,
    #[serde(default)]
    pub unknown_count: u64,
    #[serde(default)]
    pub gender_balance: Option<f64>,
    #[serde(default)]
    pub has_unknown_data: bool,
    pub name_start: i32,
    pub name_end: i32,
    #[serde(default)]
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameTrendMeta {
    pub db_start: i32,
    pub db_end: i32,
}

/// Trend data for one name (`/api/names/{name}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameTrendResponse {
    pub name: String,
    pub meta: NameTrendMeta,
    pub summary: NameSummary,
    /// Ordered by year; may be empty
    #[serde(default)]
    pub time_series: Vec<TimeSeriesPoint>,
    #[serde(default)]
    pub by_country: Vec<CountryStats>,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}
