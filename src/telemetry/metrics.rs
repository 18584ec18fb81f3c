//! Prometheus metrics
//!
//! Thin wrappers over the `metrics` facade. Without an installed recorder
//! every call is a no-op.

use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Upstream requests issued, including refetches
    FetchesIssued,
    /// Requests whose applied result was an error
    FetchFailures,
    /// Responses dropped because a newer request was issued
    StaleResponses,
    /// Raw records rejected by normalization
    RecordsDropped,
}

impl CounterMetric {
    pub fn name(self) -> &'static str {
        match self {
            CounterMetric::FetchesIssued => "options_scatter_fetches_total",
            CounterMetric::FetchFailures => "options_scatter_fetch_failures_total",
            CounterMetric::StaleResponses => "options_scatter_stale_responses_total",
            CounterMetric::RecordsDropped => "options_scatter_records_dropped_total",
        }
    }
}

/// Gauge metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeMetric {
    /// Contracts in the current dataset
    DatasetSize,
    /// Marks in the last rendered scene
    RenderedMarks,
}

impl GaugeMetric {
    pub fn name(self) -> &'static str {
        match self {
            GaugeMetric::DatasetSize => "options_scatter_dataset_contracts",
            GaugeMetric::RenderedMarks => "options_scatter_rendered_marks",
        }
    }
}

/// Latency metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyMetric {
    /// Upstream chain request
    ChainFetch,
    /// Scale derivation plus scene composition
    SceneBuild,
}

impl LatencyMetric {
    pub fn name(self) -> &'static str {
        match self {
            LatencyMetric::ChainFetch => "options_scatter_chain_fetch_latency_ms",
            LatencyMetric::SceneBuild => "options_scatter_scene_build_latency_ms",
        }
    }
}

/// Increment a counter
pub fn increment_counter(metric: CounterMetric, value: u64) {
    metrics::counter!(metric.name()).increment(value);
    tracing::trace!(metric = metric.name(), value, "Incrementing counter");
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
    tracing::trace!(metric = metric.name(), value, "Setting gauge");
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let value_ms = duration.as_secs_f64() * 1000.0;
    metrics::histogram!(metric.name()).record(value_ms);
    tracing::trace!(metric = metric.name(), value_ms, "Recording latency");
}
