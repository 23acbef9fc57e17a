//! Embedded JSON fixtures served in mock mode
//!
//! Each call parses the fixture again so every caller gets its own snapshot.

use super::api::ApiError;
use crate::model::api::{
    CountriesResponse, MetaYearsResponse, NameTrendResponse, NamesListResponse,
};
use serde::de::DeserializeOwned;

const META_YEARS: &str = include_str!("../../fixtures/meta-years.json");
const COUNTRIES: &str = include_str!("../../fixtures/countries.json");
const NAMES_LIST: &str = include_str!("../../fixtures/names-list.json");
const NAMES_LIST_EMPTY: &str = include_str!("../../fixtures/names-list-empty.json");
const NAME_DETAIL: &str = include_str!("../../fixtures/name-detail.json");

fn parse<T: DeserializeOwned>(fixture: &'static str, raw: &str) -> Result<T, ApiError> {
    serde_json::from_str(raw).map_err(|e| ApiError::Decode(format!("fixture {}: {}", fixture, e)))
}

pub fn meta_years() -> Result<MetaYearsResponse, ApiError> {
    parse("meta-years", META_YEARS)
}

pub fn countries() -> Result<CountriesResponse, ApiError> {
    parse("countries", COUNTRIES)
}

pub fn names_list() -> Result<NamesListResponse, ApiError> {
    parse("names-list", NAMES_LIST)
}

pub fn names_list_empty() -> Result<NamesListResponse, ApiError> {
    parse("names-list-empty", NAMES_LIST_EMPTY)
}

pub fn name_detail() -> Result<NameTrendResponse, ApiError> {
    parse("name-detail", NAME_DETAIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fixtures_parse() {
        let years = meta_years().unwrap();
        assert!(years.min_year < years.max_year);

        assert!(!countries().unwrap().countries.is_empty());

        let names = names_list().unwrap();
        assert!(!names.names.is_empty());
        assert_eq!(names.meta.total_count as usize, names.names.len());

        let empty = names_list_empty().unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.meta.total_count, 0);

        let detail = name_detail().unwrap();
        assert!(!detail.time_series.is_empty());
    }

    #[test]
    fn test_fixture_ranks_are_ordered() {
        let names = names_list().unwrap();
        let ranks: Vec<u64> = names.names.iter().map(|n| n.rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_detail_series_is_time_ordered() {
        let detail = name_detail().unwrap();
        assert!(detail
            .time_series
            .windows(2)
            .all(|w| w[0].year < w[1].year));
    }
}
