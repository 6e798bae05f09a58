//! Single-flight asset cache.
//!
//! Loads the asset source at most once per epoch. When many callers ask for
//! the records while a load is running, only one fetch-and-parse happens and
//! every caller receives the same result.
//!
//! ```text
//! Caller A ─┐
//!           │                         spawned load
//! Caller B ─┼──► AssetCache ──────► fetch + parse
//!           │        │                    │
//! Caller C ─┘        │                    │
//!                    ▼                    ▼
//!              [A, B, C all          [one load]
//!               receive same              │
//!               snapshot]◄───────────────┘
//! ```
//!
//! # Implementation
//!
//! The state machine lives behind a `std::sync::Mutex` that is never held
//! across an await. While `Loading`, the state holds a broadcast sender;
//! callers subscribe under the lock and the load task publishes its outcome
//! under the same lock, so no caller can miss it. The load runs on its own
//! task, which keeps the cache consistent even if every caller gives up.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::source::{AssetSource, SourceError};
use super::stats::CacheStats;
use crate::asset::{AssetCsvParser, AssetRecord, ParseError, ParseStats};
use crate::coord::AdmissibleRegion;

/// Immutable snapshot of the loaded records, shared by all readers.
pub type AssetSnapshot = Arc<[AssetRecord]>;

/// Outcome broadcast to every waiter of a load.
type LoadOutcome = Result<AssetSnapshot, CacheError>;

/// Errors surfaced by a cache load. Shared verbatim with every waiter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// The source could not be fetched.
    #[error("Failed to fetch asset source: {0}")]
    Fetch(#[source] Arc<SourceError>),

    /// The source was fetched but is empty or lacks coordinate columns.
    #[error("Failed to parse asset source: {0}")]
    Parse(#[from] ParseError),

    /// The load task ended without producing an outcome.
    #[error("Asset load was interrupted before completing")]
    Interrupted,
}

impl From<SourceError> for CacheError {
    fn from(e: SourceError) -> Self {
        CacheError::Fetch(Arc::new(e))
    }
}

enum CacheState {
    Unloaded,
    Loading {
        sender: broadcast::Sender<LoadOutcome>,
        /// Set when `invalidate` arrives mid-load; the result is delivered
        /// to waiters but not retained.
        invalidated: bool,
    },
    Loaded {
        records: AssetSnapshot,
    },
}

struct StateCell {
    state: CacheState,
    epoch: u64,
    last_parse: Option<ParseStats>,
}

struct Inner<S> {
    source: S,
    region: AdmissibleRegion,
    cell: Mutex<StateCell>,
    total_requests: AtomicU64,
    coalesced_requests: AtomicU64,
    loads_started: AtomicU64,
    loads_failed: AtomicU64,
}

impl<S> Inner<S> {
    fn lock(&self) -> MutexGuard<'_, StateCell> {
        // State transitions are single assignments, so a poisoned guard
        // still holds a consistent value.
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide cache of asset records with single-flight loading.
///
/// Cloning is cheap and shares the same state.
pub struct AssetCache<S: AssetSource> {
    inner: Arc<Inner<S>>,
}

impl<S: AssetSource> Clone for AssetCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: AssetSource> AssetCache<S> {
    /// Creates an unloaded cache over `source`, admitting records inside `region`.
    pub fn new(source: S, region: AdmissibleRegion) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                region,
                cell: Mutex::new(StateCell {
                    state: CacheState::Unloaded,
                    epoch: 0,
                    last_parse: None,
                }),
                total_requests: AtomicU64::new(0),
                coalesced_requests: AtomicU64::new(0),
                loads_started: AtomicU64::new(0),
                loads_failed: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the loaded records, loading the source if needed.
    ///
    /// Concurrent callers share a single in-flight load. A failed load is not
    /// cached: the cache returns to unloaded and the next call retries.
    pub async fn get_or_load(&self) -> Result<AssetSnapshot, CacheError> {
        self.inner.total_requests.fetch_add(1, Ordering::Relaxed);

        let mut receiver = {
            let mut guard = self.inner.lock();
            let cell = &mut *guard;
            match &cell.state {
                CacheState::Loaded { records } => return Ok(Arc::clone(records)),
                CacheState::Loading { sender, .. } => {
                    let coalesced = self.inner.coalesced_requests.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!(coalesced, "Asset load in flight, waiting for result");
                    sender.subscribe()
                }
                CacheState::Unloaded => {
                    // Capacity 1: exactly one outcome is ever sent per load.
                    let (sender, receiver) = broadcast::channel(1);
                    cell.state = CacheState::Loading {
                        sender: sender.clone(),
                        invalidated: false,
                    };
                    self.inner.loads_started.fetch_add(1, Ordering::Relaxed);
                    debug!(epoch = cell.epoch, source = %self.inner.source.describe(), "Starting asset load");
                    self.spawn_load(sender);
                    receiver
                }
            }
        };

        match receiver.recv().await {
            Ok(outcome) => outcome,
            Err(_) => Err(CacheError::Interrupted),
        }
    }

    /// Resets the cache so the next call reloads the source.
    ///
    /// Snapshots already handed out stay valid. A load in flight is not
    /// duplicated; its waiters still get its result, but the result is
    /// dropped instead of becoming the cached snapshot.
    pub fn invalidate(&self) {
        let mut guard = self.inner.lock();
        let cell = &mut *guard;
        match &mut cell.state {
            CacheState::Unloaded => return,
            CacheState::Loading { invalidated, .. } => *invalidated = true,
            CacheState::Loaded { .. } => cell.state = CacheState::Unloaded,
        }
        cell.epoch += 1;
        info!(epoch = cell.epoch, "Asset cache invalidated");
    }

    /// Returns true if a snapshot is currently cached.
    pub fn is_loaded(&self) -> bool {
        matches!(self.inner.lock().state, CacheState::Loaded { .. })
    }

    /// Returns the region records are validated against.
    pub fn region(&self) -> &AdmissibleRegion {
        &self.inner.region
    }

    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let cell = self.inner.lock();
        CacheStats {
            total_requests: self.inner.total_requests.load(Ordering::Relaxed),
            coalesced_requests: self.inner.coalesced_requests.load(Ordering::Relaxed),
            loads_started: self.inner.loads_started.load(Ordering::Relaxed),
            loads_failed: self.inner.loads_failed.load(Ordering::Relaxed),
            epoch: cell.epoch,
            last_parse: cell.last_parse,
        }
    }

    /// Logs current statistics.
    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            total_requests = stats.total_requests,
            coalesced = stats.coalesced_requests,
            loads_started = stats.loads_started,
            loads_failed = stats.loads_failed,
            epoch = stats.epoch,
            coalescing_ratio = format!("{:.1}%", stats.coalescing_ratio() * 100.0),
            failure_rate = format!("{:.1}%", stats.failure_rate() * 100.0),
            "Asset cache statistics"
        );
    }

    /// Runs the load on its own task and settles the state from a
    /// supervising task, so a panicking source still releases the waiters.
    fn spawn_load(&self, sender: broadcast::Sender<LoadOutcome>) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let loader = Arc::clone(&inner);
            let outcome = match tokio::spawn(async move { load(&loader).await }).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "Asset load task aborted");
                    Err(CacheError::Interrupted)
                }
            };
            finish_load(&inner, outcome, sender);
        });
    }
}

/// Fetch and parse the source. Parsing runs on the blocking pool since
/// exports can be large.
async fn load<S: AssetSource>(inner: &Inner<S>) -> Result<(AssetSnapshot, ParseStats), CacheError> {
    let text = inner.source.fetch().await?;
    let region = inner.region;

    let parsed = tokio::task::spawn_blocking(move || AssetCsvParser::parse_with_stats(&text, &region))
        .await
        .map_err(|_| CacheError::Interrupted)??;

    Ok((parsed.records.into(), parsed.stats))
}

/// Publish the outcome and leave the `Loading` state, atomically.
fn finish_load<S: AssetSource>(
    inner: &Inner<S>,
    outcome: Result<(AssetSnapshot, ParseStats), CacheError>,
    sender: broadcast::Sender<LoadOutcome>,
) {
    let mut cell = inner.lock();
    let invalidated = matches!(
        cell.state,
        CacheState::Loading {
            invalidated: true,
            ..
        }
    );

    let outcome = match outcome {
        Ok((records, stats)) => {
            info!(
                records = records.len(),
                dropped = stats.dropped(),
                epoch = cell.epoch,
                "Loaded asset records"
            );
            cell.last_parse = Some(stats);
            cell.state = if invalidated {
                debug!("Load finished after invalidation, not retaining snapshot");
                CacheState::Unloaded
            } else {
                CacheState::Loaded {
                    records: Arc::clone(&records),
                }
            };
            Ok(records)
        }
        Err(e) => {
            inner.loads_failed.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, source = %inner.source.describe(), "Asset load failed");
            cell.state = CacheState::Unloaded;
            Err(e)
        }
    };

    // Receivers may all have been dropped; the state is already settled.
    let _ = sender.send(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StaticSource;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    const CSV: &str = "LATITUDE,LONGITUDE\n40.7,-74.0\n40.8,-73.9\n91.0,-74.0\n";

    /// Source that counts fetches and can be made slow or failing.
    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        delay: Duration,
        responses: Mutex<Vec<Result<String, SourceError>>>,
    }

    impl CountingSource {
        fn new(delay: Duration, responses: Vec<Result<String, SourceError>>) -> Self {
            Self {
                fetches: Arc::new(AtomicUsize::new(0)),
                delay,
                responses: Mutex::new(responses),
            }
        }
    }

    impl AssetSource for CountingSource {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        async fn fetch(&self) -> Result<String, SourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(CSV.to_string())
            } else {
                responses.remove(0)
            }
        }
    }

    fn nyc() -> AdmissibleRegion {
        AdmissibleRegion::default()
    }

    #[tokio::test]
    async fn test_first_call_loads() {
        let cache = AssetCache::new(StaticSource::new(CSV), nyc());
        assert!(!cache.is_loaded());

        let records = cache.get_or_load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(cache.is_loaded());

        let stats = cache.stats();
        assert_eq!(stats.loads_started, 1);
        assert_eq!(stats.last_parse.map(|p| p.out_of_region), Some(1));
    }

    #[tokio::test]
    async fn test_second_call_uses_snapshot() {
        let source = CountingSource::new(Duration::ZERO, vec![]);
        let fetches = Arc::clone(&source.fetches);
        let cache = AssetCache::new(source, nyc());

        let first = cache.get_or_load().await.unwrap();
        let second = cache.get_or_load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_load() {
        let source = CountingSource::new(Duration::from_millis(50), vec![]);
        let fetches = Arc::clone(&source.fetches);
        let cache = AssetCache::new(source, nyc());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_or_load().await })
            })
            .collect();

        let results: Vec<_> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap().unwrap())
            .collect();

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        for records in &results {
            assert!(Arc::ptr_eq(records, &results[0]));
        }

        let stats = cache.stats();
        assert_eq!(stats.total_requests, 10);
        assert_eq!(stats.loads_started, 1);
        assert_eq!(stats.coalesced_requests, 9);
    }

    #[tokio::test]
    async fn test_failure_is_shared_and_not_cached() {
        let source = CountingSource::new(
            Duration::from_millis(20),
            vec![Err(SourceError::HttpError("connection reset".to_string()))],
        );
        let fetches = Arc::clone(&source.fetches);
        let cache = AssetCache::new(source, nyc());

        let (a, b) = tokio::join!(cache.get_or_load(), cache.get_or_load());
        assert!(matches!(a, Err(CacheError::Fetch(_))));
        assert!(matches!(b, Err(CacheError::Fetch(_))));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(!cache.is_loaded());

        // Retry succeeds with a fresh fetch
        let records = cache.get_or_load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().loads_failed, 1);
    }

    #[tokio::test]
    async fn test_parse_error_surfaces() {
        let cache = AssetCache::new(StaticSource::new("name,value\na,b\n"), nyc());
        let result = cache.get_or_load().await;
        assert!(matches!(
            result,
            Err(CacheError::Parse(ParseError::MissingColumns { .. }))
        ));

        let cache = AssetCache::new(StaticSource::new(""), nyc());
        let result = cache.get_or_load().await;
        assert!(matches!(result, Err(CacheError::Parse(ParseError::EmptyData))));
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let source = CountingSource::new(Duration::ZERO, vec![]);
        let fetches = Arc::clone(&source.fetches);
        let cache = AssetCache::new(source, nyc());

        let old = cache.get_or_load().await.unwrap();
        cache.invalidate();
        assert!(!cache.is_loaded());
        assert_eq!(cache.stats().epoch, 1);

        let new = cache.get_or_load().await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&old, &new));
        // Old snapshot remains readable
        assert_eq!(old.len(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_when_unloaded_is_noop() {
        let cache = AssetCache::new(StaticSource::new(CSV), nyc());
        cache.invalidate();
        assert_eq!(cache.stats().epoch, 0);
    }

    #[tokio::test]
    async fn test_invalidate_during_load_does_not_retain_result() {
        let source = CountingSource::new(Duration::from_millis(50), vec![]);
        let fetches = Arc::clone(&source.fetches);
        let cache = AssetCache::new(source, nyc());

        let waiter = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_or_load().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.invalidate();

        // Joining after the invalidate still shares the in-flight load
        let joined = cache.get_or_load().await.unwrap();
        let first = waiter.await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &joined));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(!cache.is_loaded());

        cache.get_or_load().await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    /// Source whose first fetch panics.
    struct PanicsOnce {
        panicked: std::sync::atomic::AtomicBool,
    }

    impl AssetSource for PanicsOnce {
        fn describe(&self) -> String {
            "panics-once".to_string()
        }

        async fn fetch(&self) -> Result<String, SourceError> {
            if !self.panicked.swap(true, Ordering::SeqCst) {
                panic!("source exploded");
            }
            Ok(CSV.to_string())
        }
    }

    #[tokio::test]
    async fn test_panicking_load_is_interrupted_and_retried() {
        let cache = AssetCache::new(
            PanicsOnce {
                panicked: std::sync::atomic::AtomicBool::new(false),
            },
            nyc(),
        );

        let first = tokio::time::timeout(Duration::from_secs(2), cache.get_or_load())
            .await
            .expect("load after panic must not hang");
        assert!(matches!(first, Err(CacheError::Interrupted)));
        assert!(!cache.is_loaded());
        assert_eq!(cache.stats().loads_failed, 1);

        let second = tokio::time::timeout(Duration::from_secs(2), cache.get_or_load())
            .await
            .expect("retry must not hang");
        assert_eq!(second.unwrap().len(), 2);
        assert_eq!(cache.stats().loads_started, 2);
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_strand_load() {
        let source = CountingSource::new(Duration::from_millis(30), vec![]);
        let fetches = Arc::clone(&source.fetches);
        let cache = AssetCache::new(source, nyc());

        // Starter gives up before the load completes
        let abandoned =
            tokio::time::timeout(Duration::from_millis(5), cache.get_or_load()).await;
        assert!(abandoned.is_err());

        let records = cache.get_or_load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}
