//! Prometheus metrics

use crate::source::Source;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// One adapter call, including retries
    SourceFetch(Source),
    /// One full sweep, excluding the pause that follows it
    Sweep,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Items in the loaded catalog
    CatalogItems,
}

/// Counter metric types, labelled by source or sink
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Samples delivered to the sinks
    SamplesRecorded,
    /// Quotes without a usable price
    EmptyQuotes,
    /// Failed adapter calls
    FetchFailures,
    /// Failed sink appends
    SinkFailures,
    /// Moves at or above the threshold
    NotableChanges,
}

impl CounterMetric {
    fn name(&self) -> &'static str {
        match self {
            CounterMetric::SamplesRecorded => "pricemon_samples_recorded_total",
            CounterMetric::EmptyQuotes => "pricemon_empty_quotes_total",
            CounterMetric::FetchFailures => "pricemon_fetch_failures_total",
            CounterMetric::SinkFailures => "pricemon_sink_failures_total",
            CounterMetric::NotableChanges => "pricemon_notable_changes_total",
        }
    }

    fn label_key(&self) -> &'static str {
        match self {
            CounterMetric::SinkFailures => "sink",
            _ => "source",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    match metric {
        LatencyMetric::SourceFetch(source) => {
            ::metrics::histogram!("pricemon_fetch_latency_ms", "source" => source.as_str()).record(ms);
        }
        LatencyMetric::Sweep => {
            ::metrics::histogram!("pricemon_sweep_duration_ms").record(ms);
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::CatalogItems => "pricemon_catalog_items",
    };
    ::metrics::gauge!(metric_name).set(value);
}

/// Increment a counter for the given source or sink label
pub fn increment(metric: CounterMetric, label: &'static str) {
    ::metrics::counter!(metric.name(), metric.label_key() => label).increment(1);
}
