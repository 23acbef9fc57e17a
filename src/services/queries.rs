//! Data hooks used by the views
//!
//! One [`QueryCache`] per endpoint. Views call these on every draw; the
//! caches decide whether a request actually goes out.

use super::api::NamesApi;
use super::query_cache::{QueryCache, QueryState};
use crate::model::api::{CountriesResponse, MetaYearsResponse, NameTrendResponse, NamesListResponse};
use crate::model::filters::{NameTrendParams, NamesFilterParams};
use std::sync::Arc;
use std::time::Duration;

const META_YEARS_KEY: &str = "meta/years";
const COUNTRIES_KEY: &str = "meta/countries";

/// How long a names page or trend stays fresh
pub const LIST_STALE_TIME: Duration = Duration::from_secs(300);

/// Result of the names hook
#[derive(Debug, Clone)]
pub struct NamesQuery {
    pub state: QueryState<NamesListResponse>,
    /// The data belongs to the previously resolved filters
    pub is_placeholder: bool,
    /// A request for these filters is running
    pub is_fetching: bool,
}

pub struct Queries {
    api: Arc<dyn NamesApi>,
    meta_years: QueryCache<String, MetaYearsResponse>,
    countries: QueryCache<String, CountriesResponse>,
    names: QueryCache<String, NamesListResponse>,
    name_trend: QueryCache<String, NameTrendResponse>,
    last_names_key: Option<String>,
}

impl Queries {
    pub fn new(api: Arc<dyn NamesApi>) -> Self {
        Self {
            api,
            meta_years: QueryCache::new("meta_years", None),
            countries: QueryCache::new("countries", None),
            names: QueryCache::new("names", Some(LIST_STALE_TIME)),
            name_trend: QueryCache::new("name_trend", Some(LIST_STALE_TIME)),
            last_names_key: None,
        }
    }

    /// Override the retry policy of every cache
    pub fn with_retry(mut self, retry: u32, retry_delay: Duration) -> Self {
        self.meta_years = self.meta_years.with_retry(retry, retry_delay);
        self.countries = self.countries.with_retry(retry, retry_delay);
        self.names = self.names.with_retry(retry, retry_delay);
        self.name_trend = self.name_trend.with_retry(retry, retry_delay);
        self
    }

    /// Available year range; loaded once per session
    pub fn meta_years(&mut self) -> QueryState<MetaYearsResponse> {
        let api = Arc::clone(&self.api);
        self.meta_years
            .fetch(META_YEARS_KEY.to_string(), move || api.fetch_meta_years())
    }

    /// Country list; loaded once per session
    pub fn countries(&mut self) -> QueryState<CountriesResponse> {
        let api = Arc::clone(&self.api);
        self.countries
            .fetch(COUNTRIES_KEY.to_string(), move || api.fetch_countries())
    }

    /// One page of names for the given filters
    ///
    /// While a new filter set loads, the last resolved page is returned as
    /// placeholder data.
    pub fn names(&mut self, params: &NamesFilterParams) -> NamesQuery {
        let key = params.to_string();
        let api = Arc::clone(&self.api);
        let request = params.clone();
        let state = self.names.fetch(key.clone(), move || api.fetch_names(&request));
        let is_fetching = self.names.is_fetching(&key);

        match state {
            QueryState::Data(_) => {
                self.last_names_key = Some(key);
                NamesQuery {
                    state,
                    is_placeholder: false,
                    is_fetching,
                }
            }
            QueryState::Loading => {
                let previous = self
                    .last_names_key
                    .as_ref()
                    .filter(|k| **k != key)
                    .map(|k| self.names.state(k))
                    .filter(|s| s.data().is_some());
                match previous {
                    Some(previous) => NamesQuery {
                        state: previous,
                        is_placeholder: true,
                        is_fetching,
                    },
                    None => NamesQuery {
                        state,
                        is_placeholder: false,
                        is_fetching,
                    },
                }
            }
            _ => NamesQuery {
                state,
                is_placeholder: false,
                is_fetching,
            },
        }
    }

    /// Trend for one name; disabled queries stay idle and send nothing
    pub fn name_trend(&mut self, params: &NameTrendParams, enabled: bool) -> QueryState<NameTrendResponse> {
        if !enabled {
            return QueryState::Idle;
        }
        let api = Arc::clone(&self.api);
        let request = params.clone();
        self.name_trend
            .fetch(params.endpoint(), move || api.fetch_name_trend(&request))
    }

    /// Apply finished fetches from every cache
    pub fn poll(&mut self) -> bool {
        // Non-short-circuiting so every cache is drained
        self.meta_years.poll() | self.countries.poll() | self.names.poll() | self.name_trend.poll()
    }

    /// Refetch names and trends; session-long metadata is only retried if it failed
    pub fn refresh(&mut self) {
        self.meta_years.invalidate_errors();
        self.countries.invalidate_errors();
        self.names.clear();
        self.name_trend.clear();
        self.last_names_key = None;
    }

    /// Refetch one trend, leaving the cached names pages alone
    pub fn refresh_trend(&mut self, params: &NameTrendParams) {
        self.meta_years.invalidate_errors();
        self.countries.invalidate_errors();
        self.name_trend.invalidate(&params.endpoint());
    }

    pub fn spawn_counts(&self) -> [usize; 4] {
        [
            self.meta_years.spawn_count(),
            self.countries.spawn_count(),
            self.names.spawn_count(),
            self.name_trend.spawn_count(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::filters::SortBy;
    use crate::services::api::{ApiError, MockApi};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Instant;

    fn queries(delay_ms: u64) -> Queries {
        Queries::new(Arc::new(MockApi::new(Duration::from_millis(delay_ms))))
            .with_retry(0, Duration::ZERO)
    }

    fn wait_until(queries: &mut Queries, mut done: impl FnMut(&mut Queries) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(3);
        while !done(queries) && Instant::now() < deadline {
            queries.poll();
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn page(n: u32) -> NamesFilterParams {
        NamesFilterParams {
            page: Some(n),
            page_size: Some(20),
            ..Default::default()
        }
    }

    #[test]
    fn test_meta_queries_never_refetch() {
        let mut q = queries(0);
        wait_until(&mut q, |q| q.meta_years().data().is_some() && q.countries().data().is_some());

        for _ in 0..20 {
            q.meta_years();
            q.countries();
            q.poll();
        }
        q.refresh();
        q.meta_years();
        q.countries();

        let [years, countries, _, _] = q.spawn_counts();
        assert_eq!(years, 1);
        assert_eq!(countries, 1);
    }

    #[test]
    fn test_names_keeps_previous_page_while_loading() {
        let mut q = queries(100);
        wait_until(&mut q, |q| q.names(&page(1)).state.data().is_some());
        let first = q.names(&page(1));
        assert!(!first.is_placeholder);

        let next = q.names(&page(2));
        assert!(next.is_placeholder);
        assert!(Arc::ptr_eq(
            next.state.data().unwrap(),
            first.state.data().unwrap()
        ));

        wait_until(&mut q, |q| !q.names(&page(2)).is_placeholder);
        let resolved = q.names(&page(2));
        assert!(!resolved.is_placeholder);
        assert!(resolved.state.data().is_some());
    }

    #[test]
    fn test_first_names_load_has_no_placeholder() {
        let mut q = queries(50);
        let first = q.names(&page(1));
        assert!(matches!(first.state, QueryState::Loading));
        assert!(!first.is_placeholder);
    }

    #[test]
    fn test_changing_sort_uses_new_key() {
        let mut q = queries(0);
        wait_until(&mut q, |q| q.names(&page(1)).state.data().is_some());

        let sorted = NamesFilterParams {
            sort_by: Some(SortBy::Name),
            ..page(1)
        };
        q.names(&sorted);
        assert_eq!(q.spawn_counts()[2], 2);
    }

    #[test]
    fn test_disabled_trend_is_idle() {
        let mut q = queries(0);
        let state = q.name_trend(&NameTrendParams::new(""), false);
        assert!(matches!(state, QueryState::Idle));
        assert_eq!(q.spawn_counts()[3], 0);
    }

    #[test]
    fn test_trend_loads_when_enabled() {
        let mut q = queries(0);
        let params = NameTrendParams::new("Alex");
        wait_until(&mut q, |q| q.name_trend(&params, true).data().is_some());
        let state = q.name_trend(&params, true);
        assert_eq!(state.data().unwrap().name, "Alex");
    }

    #[test]
    fn test_refresh_trend_only_refetches_that_trend() {
        let mut q = queries(0);
        let params = NameTrendParams::new("Alex");
        wait_until(&mut q, |q| {
            q.names(&page(1)).state.data().is_some() && q.name_trend(&params, true).data().is_some()
        });

        q.refresh_trend(&params);
        q.names(&page(1));
        q.name_trend(&params, true);
        let [_, _, names, trends] = q.spawn_counts();
        assert_eq!(names, 1);
        assert_eq!(trends, 2);
    }

    struct FailingApi {
        calls: AtomicUsize,
    }

    impl NamesApi for FailingApi {
        fn fetch_meta_years(&self) -> Result<MetaYearsResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Network("connection refused".to_string()))
        }

        fn fetch_countries(&self) -> Result<CountriesResponse, ApiError> {
            Err(ApiError::Network("connection refused".to_string()))
        }

        fn fetch_names(&self, _: &NamesFilterParams) -> Result<NamesListResponse, ApiError> {
            Err(ApiError::Http {
                status: 503,
                message: "HTTP 503: Service Unavailable".to_string(),
            })
        }

        fn fetch_name_trend(&self, _: &NameTrendParams) -> Result<NameTrendResponse, ApiError> {
            Err(ApiError::Decode("missing field `name`".to_string()))
        }
    }

    #[test]
    fn test_errors_surface_as_messages() {
        let api = Arc::new(FailingApi {
            calls: AtomicUsize::new(0),
        });
        let mut q = Queries::new(api.clone()).with_retry(2, Duration::ZERO);

        wait_until(&mut q, |q| q.names(&page(1)).state.error().is_some());
        assert_eq!(q.names(&page(1)).state.error(), Some("HTTP 503: Service Unavailable"));

        wait_until(&mut q, |q| q.meta_years().error().is_some());
        assert_eq!(q.meta_years().error(), Some("Network error: connection refused"));
        assert_eq!(api.calls.load(Ordering::SeqCst), 3);
    }
}
