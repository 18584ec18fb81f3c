//! Fetch orchestration module
//!
//! Issues the upstream request for one ticker, normalizes the page and
//! publishes a three-valued status: Loading, Error or Ready.
//!
//! Every request is tagged with a monotonic sequence number when it is
//! issued. A response is applied only if its sequence number is still the
//! latest; anything older is discarded, so a slow request can never
//! overwrite the result of a newer one. Failures are never retried here;
//! retry is the caller's decision via [`OptionsDataStore::refetch`].

use crate::chain::{normalize_results, OptionContract};
use crate::polygon::{ChainQuery, OptionsSource};
use crate::telemetry::{increment_counter, record_latency, set_gauge, CounterMetric, GaugeMetric, LatencyMetric};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Published fetch state
#[derive(Debug, Clone)]
pub enum FetchStatus {
    /// A request is in flight
    Loading,
    /// The latest request failed
    Error {
        /// Human-readable failure, including HTTP status where available
        message: String,
        /// False for configuration problems that a retry cannot fix
        retryable: bool,
    },
    /// The latest request succeeded; the dataset may be empty
    Ready(Arc<[OptionContract]>),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn data(&self) -> Option<&Arc<[OptionContract]>> {
        match self {
            FetchStatus::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchStatus::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// What happened to a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response became the published state
    Applied,
    /// A newer request was issued first; the response was dropped
    Discarded,
}

/// Fetch orchestrator for one ticker query
///
/// Cheap to clone; clones share the same state and sequence counter.
pub struct OptionsDataStore<S> {
    source: Arc<S>,
    query: Arc<ChainQuery>,
    sequence: Arc<AtomicU64>,
    state: Arc<watch::Sender<FetchStatus>>,
}

impl<S> Clone for OptionsDataStore<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            query: Arc::clone(&self.query),
            sequence: Arc::clone(&self.sequence),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: OptionsSource + 'static> OptionsDataStore<S> {
    /// Create a store in the Loading state; nothing is fetched until
    /// [`fetch`](Self::fetch) or [`refetch`](Self::refetch) is called
    pub fn new(source: S, query: ChainQuery) -> Self {
        Self::with_shared_source(Arc::new(source), query)
    }

    pub fn with_shared_source(source: Arc<S>, query: ChainQuery) -> Self {
        let (state, _) = watch::channel(FetchStatus::Loading);
        Self {
            source,
            query: Arc::new(query),
            sequence: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    pub fn query(&self) -> &ChainQuery {
        &self.query
    }

    /// Snapshot of the current status
    pub fn status(&self) -> FetchStatus {
        self.state.borrow().clone()
    }

    /// Current dataset; `None` unless Ready
    pub fn data(&self) -> Option<Arc<[OptionContract]>> {
        self.state.borrow().data().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error().map(str::to_string)
    }

    /// Receive every status change
    pub fn subscribe(&self) -> watch::Receiver<FetchStatus> {
        self.state.subscribe()
    }

    /// Sequence number of the most recently issued request
    pub fn latest_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Issue a request.
    ///
    /// The request is tagged and the status switches to Loading as soon as
    /// this is called, not when the returned future is first polled.
    pub fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send + 'static {
        let sequence = self.begin();
        let store = self.clone();
        async move { store.complete(sequence).await }
    }

    /// Re-issue the same request in the background. Any in-flight request
    /// keeps running but its response will be discarded.
    pub fn refetch(&self) -> JoinHandle<FetchOutcome> {
        tracing::info!(ticker = %self.query.underlying_ticker, "Refetching options chain");
        tokio::spawn(self.fetch())
    }

    fn begin(&self) -> u64 {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(FetchStatus::Loading);
        increment_counter(CounterMetric::FetchesIssued, 1);
        tracing::debug!(sequence, ticker = %self.query.underlying_ticker, "Issued options chain request");
        sequence
    }

    async fn complete(&self, sequence: u64) -> FetchOutcome {
        let started = Instant::now();
        let result = self.source.fetch_chain(&self.query).await;
        record_latency(LatencyMetric::ChainFetch, started.elapsed());

        let status = match result {
            Ok(chain) => {
                let normalized = normalize_results(chain.results.as_deref().unwrap_or_default());
                if !normalized.dropped.is_empty() {
                    increment_counter(CounterMetric::RecordsDropped, normalized.dropped.len() as u64);
                    tracing::debug!(dropped = ?normalized.dropped, "Dropped invalid contract records");
                }
                tracing::info!(
                    sequence,
                    ticker = %self.query.underlying_ticker,
                    contracts = normalized.contracts.len(),
                    dropped = normalized.dropped.len(),
                    defaulted_open_interest = normalized.defaulted_open_interest(),
                    "Options chain loaded"
                );
                FetchStatus::Ready(normalized.contracts.into())
            }
            Err(e) => {
                tracing::warn!(sequence, ticker = %self.query.underlying_ticker, error = %e, "Options chain fetch failed");
                FetchStatus::Error {
                    message: e.to_string(),
                    retryable: e.is_retryable(),
                }
            }
        };

        let dataset_size = status.data().map(|d| d.len());
        let failed = status.error().is_some();

        // the check runs under the channel's write lock, so a newer request
        // cannot publish Loading between the check and the store
        let latest = &self.sequence;
        let applied = self.state.send_if_modified(move |current| {
            if latest.load(Ordering::SeqCst) != sequence {
                return false;
            }
            *current = status;
            true
        });

        if !applied {
            increment_counter(CounterMetric::StaleResponses, 1);
            tracing::debug!(
                sequence,
                latest = self.latest_sequence(),
                "Discarded stale options chain response"
            );
            return FetchOutcome::Discarded;
        }

        if failed {
            increment_counter(CounterMetric::FetchFailures, 1);
        }
        set_gauge(GaugeMetric::DatasetSize, dataset_size.unwrap_or(0) as f64);
        FetchOutcome::Applied
    }
}
