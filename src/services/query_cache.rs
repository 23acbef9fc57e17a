//! Keyed query cache with background fetching
//!
//! Each distinct key is fetched at most once at a time on a worker thread.
//! Results come back over a channel and are applied by [`QueryCache::poll`],
//! which the app calls on every tick.

use super::api::ApiError;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Extra attempts after a failed fetch
pub const DEFAULT_RETRY: u32 = 3;

/// Pause between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(300);

/// State of a single query as seen by a view
#[derive(Debug)]
pub enum QueryState<V> {
    /// Query is disabled and nothing was requested
    Idle,
    /// First load in progress, nothing to show yet
    Loading,
    /// All attempts failed
    Error(String),
    Data(Arc<V>),
}

// Manual impl: `V` itself need not be `Clone`, the data is behind an `Arc`
impl<V> Clone for QueryState<V> {
    fn clone(&self) -> Self {
        match self {
            QueryState::Idle => QueryState::Idle,
            QueryState::Loading => QueryState::Loading,
            QueryState::Error(msg) => QueryState::Error(msg.clone()),
            QueryState::Data(data) => QueryState::Data(Arc::clone(data)),
        }
    }
}

impl<V> QueryState<V> {
    pub fn data(&self) -> Option<&Arc<V>> {
        match self {
            QueryState::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

struct Entry<V> {
    state: QueryState<V>,
    fetched_at: Option<Instant>,
    in_flight: bool,
}

impl<V> Entry<V> {
    fn loading() -> Self {
        Self {
            state: QueryState::Loading,
            fetched_at: None,
            in_flight: false,
        }
    }
}

type FetchResult<K, V> = (K, Result<V, ApiError>);

/// Cache of query results keyed by `K`
pub struct QueryCache<K, V> {
    name: &'static str,
    entries: HashMap<K, Entry<V>>,
    /// `None` means entries never go stale
    stale_time: Option<Duration>,
    retry: u32,
    retry_delay: Duration,
    sender: Sender<FetchResult<K, V>>,
    receiver: Receiver<FetchResult<K, V>>,
    spawned: usize,
}

impl<K, V> QueryCache<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + 'static,
    V: Send + Sync + 'static,
{
    pub fn new(name: &'static str, stale_time: Option<Duration>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            name,
            entries: HashMap::new(),
            stale_time,
            retry: DEFAULT_RETRY,
            retry_delay: DEFAULT_RETRY_DELAY,
            sender,
            receiver,
            spawned: 0,
        }
    }

    pub fn with_retry(mut self, retry: u32, retry_delay: Duration) -> Self {
        self.retry = retry;
        self.retry_delay = retry_delay;
        self
    }

    /// Current state for `key`, starting a fetch when needed
    ///
    /// A fetch starts when there is no entry or the entry is stale, and no
    /// request for the key is already running. Existing data stays visible
    /// during a background refresh.
    pub fn fetch<F>(&mut self, key: K, fetcher: F) -> QueryState<V>
    where
        F: Fn() -> Result<V, ApiError> + Send + 'static,
    {
        let needs_fetch = match self.entries.get(&key) {
            None => true,
            Some(entry) if entry.in_flight => {
                debug!(cache = self.name, ?key, "deduplicated in-flight request");
                false
            }
            Some(entry) => self.is_stale(entry),
        };

        if needs_fetch {
            self.spawn(key.clone(), fetcher);
        }

        self.state(&key)
    }

    /// Current state for `key` without fetching
    pub fn state(&self, key: &K) -> QueryState<V> {
        self.entries
            .get(key)
            .map(|e| e.state.clone())
            .unwrap_or(QueryState::Idle)
    }

    /// Whether a request for `key` is running
    pub fn is_fetching(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(|e| e.in_flight)
    }

    /// Apply finished fetches, returns true if any entry changed
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        loop {
            match self.receiver.try_recv() {
                Ok((key, result)) => {
                    changed = true;
                    let entry = self.entries.entry(key.clone()).or_insert_with(Entry::loading);
                    entry.in_flight = false;
                    entry.fetched_at = Some(Instant::now());
                    match result {
                        Ok(data) => {
                            debug!(cache = self.name, ?key, "query resolved");
                            entry.state = QueryState::Data(Arc::new(data));
                        }
                        Err(err) => {
                            warn!(cache = self.name, ?key, error = %err, "query failed");
                            // A failed refresh keeps the data already shown
                            if entry.state.data().is_none() {
                                entry.state = QueryState::Error(err.to_string());
                            }
                        }
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        changed
    }

    /// Make the next fetch of `key` refetch
    ///
    /// An entry with a request running is only marked stale; the running
    /// request's result stands in for the refetch.
    pub fn invalidate(&mut self, key: &K) {
        match self.entries.get_mut(key) {
            Some(entry) if entry.in_flight => entry.fetched_at = None,
            Some(_) => {
                self.entries.remove(key);
            }
            None => {}
        }
    }

    /// Drop entries that ended in an error
    pub fn invalidate_errors(&mut self) {
        self.entries
            .retain(|_, e| e.in_flight || !matches!(e.state, QueryState::Error(_)));
    }

    /// Drop every entry that is not currently being fetched
    pub fn clear(&mut self) {
        self.entries.retain(|_, e| e.in_flight);
    }

    /// Number of workers started so far
    pub fn spawn_count(&self) -> usize {
        self.spawned
    }

    fn is_stale(&self, entry: &Entry<V>) -> bool {
        match (self.stale_time, entry.fetched_at) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(stale), Some(at)) => at.elapsed() >= stale,
        }
    }

    fn spawn<F>(&mut self, key: K, fetcher: F)
    where
        F: Fn() -> Result<V, ApiError> + Send + 'static,
    {
        let entry = self.entries.entry(key.clone()).or_insert_with(Entry::loading);
        entry.in_flight = true;
        self.spawned += 1;

        debug!(cache = self.name, ?key, "spawning fetch");

        let tx = self.sender.clone();
        let retry = self.retry;
        let retry_delay = self.retry_delay;
        let name = self.name;

        thread::spawn(move || {
            let mut attempt = 0;
            let result = loop {
                match fetcher() {
                    Ok(data) => break Ok(data),
                    Err(err) if attempt < retry => {
                        attempt += 1;
                        debug!(cache = name, ?key, attempt, error = %err, "retrying fetch");
                        if !retry_delay.is_zero() {
                            thread::sleep(retry_delay);
                        }
                    }
                    Err(err) => break Err(err),
                }
            };
            let _ = tx.send((key, result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn cache(stale_time: Option<Duration>) -> QueryCache<String, u32> {
        QueryCache::new("test", stale_time).with_retry(DEFAULT_RETRY, Duration::ZERO)
    }

    /// Poll until the key has settled or give up after two seconds
    fn settle(cache: &mut QueryCache<String, u32>, key: &str) -> QueryState<u32> {
        let key = key.to_string();
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            cache.poll();
            if !cache.is_fetching(&key) || Instant::now() > deadline {
                return cache.state(&key);
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_first_fetch_is_loading_then_data() {
        let mut cache = cache(None);
        let state = cache.fetch("a".to_string(), || Ok(7));
        assert!(matches!(state, QueryState::Loading));

        let state = settle(&mut cache, "a");
        assert_eq!(state.data().map(|d| **d), Some(7));
    }

    #[test]
    fn test_in_flight_requests_are_deduplicated() {
        let mut cache = cache(None);
        let gate = Arc::new(Mutex::new(()));
        let guard = gate.lock().unwrap();

        for _ in 0..5 {
            let gate = Arc::clone(&gate);
            cache.fetch("same".to_string(), move || {
                let _g = gate.lock().unwrap();
                Ok(1)
            });
        }
        assert_eq!(cache.spawn_count(), 1);

        drop(guard);
        settle(&mut cache, "same");
        assert_eq!(cache.spawn_count(), 1);
    }

    #[test]
    fn test_never_stale_is_not_refetched() {
        let mut cache = cache(None);
        cache.fetch("k".to_string(), || Ok(1));
        settle(&mut cache, "k");

        for _ in 0..10 {
            let state = cache.fetch("k".to_string(), || Ok(2));
            assert_eq!(state.data().map(|d| **d), Some(1));
        }
        assert_eq!(cache.spawn_count(), 1);
    }

    #[test]
    fn test_stale_entry_refetches_and_keeps_data() {
        let mut cache = cache(Some(Duration::ZERO));
        cache.fetch("k".to_string(), || Ok(1));
        settle(&mut cache, "k");

        let state = cache.fetch("k".to_string(), || Ok(2));
        assert_eq!(state.data().map(|d| **d), Some(1));
        assert_eq!(cache.spawn_count(), 2);

        let state = settle(&mut cache, "k");
        assert_eq!(state.data().map(|d| **d), Some(2));
    }

    #[test]
    fn test_retries_before_success() {
        let mut cache = cache(None);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        cache.fetch("flaky".to_string(), move || {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(ApiError::Network("reset".to_string()))
            } else {
                Ok(9)
            }
        });

        let state = settle(&mut cache, "flaky");
        assert_eq!(state.data().map(|d| **d), Some(9));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_error_after_retries_exhausted() {
        let mut cache = cache(None);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        cache.fetch("down".to_string(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Http {
                status: 500,
                message: "HTTP 500: Internal Server Error".to_string(),
            })
        });

        let state = settle(&mut cache, "down");
        assert_eq!(state.error(), Some("HTTP 500: Internal Server Error"));
        assert_eq!(calls.load(Ordering::SeqCst), 1 + DEFAULT_RETRY as usize);

        // Errors are not refetched until invalidated
        cache.fetch("down".to_string(), || Ok(1));
        assert_eq!(cache.spawn_count(), 1);

        cache.invalidate_errors();
        cache.fetch("down".to_string(), || Ok(1));
        assert_eq!(cache.spawn_count(), 2);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = cache(None);
        cache.fetch("a".to_string(), || Ok(1));
        cache.fetch("b".to_string(), || Ok(2));
        settle(&mut cache, "a");
        settle(&mut cache, "b");

        cache.invalidate(&"a".to_string());
        assert!(matches!(cache.state(&"a".to_string()), QueryState::Idle));
        assert!(cache.state(&"b".to_string()).data().is_some());

        cache.clear();
        assert!(matches!(cache.state(&"b".to_string()), QueryState::Idle));
    }

    #[test]
    fn test_invalidate_keeps_in_flight_request() {
        let mut cache = cache(None);
        let gate = Arc::new(Mutex::new(()));
        let guard = gate.lock().unwrap();

        let fetcher_gate = Arc::clone(&gate);
        let fetcher = move || {
            let _g = fetcher_gate.lock().unwrap();
            Ok(3)
        };
        cache.fetch("slow".to_string(), fetcher.clone());

        for _ in 0..3 {
            cache.invalidate(&"slow".to_string());
            let state = cache.fetch("slow".to_string(), fetcher.clone());
            assert!(matches!(state, QueryState::Loading));
        }
        assert_eq!(cache.spawn_count(), 1);

        drop(guard);
        let state = settle(&mut cache, "slow");
        assert_eq!(state.data().map(|d| **d), Some(3));
        assert_eq!(cache.spawn_count(), 1);
    }

    #[test]
    fn test_poll_reports_changes() {
        let mut cache = cache(None);
        assert!(!cache.poll());
        cache.fetch("a".to_string(), || Ok(1));
        settle(&mut cache, "a");
        assert!(!cache.poll());
    }
}
