//! Monitor scheduler
//!
//! Walks the catalog item by item, asking each source for a quote in a
//! fixed order. Usable quotes become samples that fan out to every sink
//! and to the change detector. The loop pauses between calls to respect
//! upstream rate limits and between sweeps for the configured interval.

use super::Clock;
use crate::catalog::CatalogItem;
use crate::config::ConfigError;
use crate::detector::{ChangeDetector, NotableChange, Observation};
use crate::sample::{bucket_timestamp, normalize, PriceSample};
use crate::sink::SampleSink;
use crate::source::PriceSource;
use crate::telemetry::{self, CounterMetric, GaugeMetric, LatencyMetric};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Scheduler timing settings
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Pause between sweeps; also the bucketing interval (0 disables bucketing)
    pub interval_secs: u64,
    /// Pause after each adapter call
    pub request_gap: Duration,
    /// Stop after this many sweeps; `None` runs until the process exits
    pub max_sweeps: Option<u64>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_secs: 1800,
            request_gap: Duration::from_millis(400),
            max_sweeps: None,
        }
    }
}

/// Where the scheduler currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Sweeping {
        item_index: usize,
        source_index: usize,
    },
    Pausing,
}

/// Outcome of one sweep
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Samples delivered to the sinks, in capture order
    pub samples: Vec<PriceSample>,
    /// Notable changes, in capture order
    pub notable: Vec<NotableChange>,
    /// Adapter calls that failed
    pub fetch_failures: usize,
    /// Adapter calls that returned no usable price
    pub empty_quotes: usize,
    /// Individual sink appends that failed
    pub sink_failures: usize,
}

/// The price monitoring loop
pub struct Monitor<C: Clock> {
    settings: MonitorSettings,
    catalog: Vec<CatalogItem>,
    sources: Vec<Box<dyn PriceSource>>,
    sinks: Vec<Box<dyn SampleSink>>,
    detector: ChangeDetector,
    clock: C,
    state: MonitorState,
    sweeps_completed: u64,
}

impl<C: Clock> Monitor<C> {
    /// Create a monitor; refuses an empty catalog
    pub fn new(
        settings: MonitorSettings,
        catalog: Vec<CatalogItem>,
        sources: Vec<Box<dyn PriceSource>>,
        sinks: Vec<Box<dyn SampleSink>>,
        detector: ChangeDetector,
        clock: C,
    ) -> Result<Self, ConfigError> {
        if catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        Ok(Self {
            settings,
            catalog,
            sources,
            sinks,
            detector,
            clock,
            state: MonitorState::Pausing,
            sweeps_completed: 0,
        })
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn sweeps_completed(&self) -> u64 {
        self.sweeps_completed
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Run sweeps until `max_sweeps` is reached, or forever
    ///
    /// Returns the number of sweeps completed.
    pub async fn run(&mut self) -> u64 {
        tracing::info!(
            items = self.catalog.len(),
            sources = self.sources.len(),
            sinks = self.sinks.len(),
            interval_secs = self.settings.interval_secs,
            threshold_pct = %self.detector.threshold_pct(),
            "Monitoring started"
        );
        telemetry::set_gauge(GaugeMetric::CatalogItems, self.catalog.len() as f64);

        loop {
            let started = Instant::now();
            let report = self.run_sweep().await;
            telemetry::record_latency(LatencyMetric::Sweep, started.elapsed());

            tracing::info!(
                sweep = self.sweeps_completed,
                samples = report.samples.len(),
                notable = report.notable.len(),
                fetch_failures = report.fetch_failures,
                empty_quotes = report.empty_quotes,
                sink_failures = report.sink_failures,
                "Sweep complete"
            );

            if self
                .settings
                .max_sweeps
                .is_some_and(|max| self.sweeps_completed >= max)
            {
                return self.sweeps_completed;
            }

            self.state = MonitorState::Pausing;
            self.clock
                .sleep(Duration::from_secs(self.settings.interval_secs))
                .await;
        }
    }

    /// Run one full pass over every item and source
    pub async fn run_sweep(&mut self) -> SweepReport {
        let mut report = SweepReport::default();
        let interval = i64::try_from(self.settings.interval_secs).unwrap_or(i64::MAX);
        let sweep_bucket = (interval > 0).then(|| bucket_timestamp(self.clock.now(), interval));

        for (item_index, item) in self.catalog.iter().enumerate() {
            for (source_index, source) in self.sources.iter().enumerate() {
                self.state = MonitorState::Sweeping {
                    item_index,
                    source_index,
                };

                let started = Instant::now();
                let result = source.fetch_quote(item).await;
                telemetry::record_latency(
                    LatencyMetric::SourceFetch(source.source()),
                    started.elapsed(),
                );

                let quote = match result {
                    Ok(Some(quote)) => Some(quote),
                    Ok(None) => {
                        tracing::debug!(
                            item = %item.id,
                            source = %source.source(),
                            "Item not quotable by source"
                        );
                        None
                    }
                    Err(e) => {
                        tracing::warn!(
                            item = %item.id,
                            source = %source.source(),
                            error = %e,
                            "Fetch failed"
                        );
                        report.fetch_failures += 1;
                        telemetry::increment(
                            CounterMetric::FetchFailures,
                            source.source().as_str(),
                        );
                        None
                    }
                };

                let timestamp: DateTime<Utc> = sweep_bucket.unwrap_or_else(|| self.clock.now());
                let sample = quote.and_then(|q| {
                    let sample = normalize(&item.id, source.source(), &q, timestamp);
                    if sample.is_none() {
                        report.empty_quotes += 1;
                        telemetry::increment(
                            CounterMetric::EmptyQuotes,
                            source.source().as_str(),
                        );
                    }
                    sample
                });

                if let Some(sample) = sample {
                    report.sink_failures += Self::deliver(&mut self.sinks, &sample).await;
                    if let Observation::Notable(change) =
                        self.detector.observe(&sample.item_id, sample.source, sample.price)
                    {
                        tracing::info!(
                            item = %change.item_id,
                            source = %change.source,
                            pct = %change.pct,
                            "{}",
                            change
                        );
                        telemetry::increment(
                            CounterMetric::NotableChanges,
                            change.source.as_str(),
                        );
                        report.notable.push(change);
                    }
                    telemetry::increment(CounterMetric::SamplesRecorded, sample.source.as_str());
                    report.samples.push(sample);
                }

                self.clock.sleep(self.settings.request_gap).await;
            }
        }

        self.sweeps_completed += 1;
        report
    }

    /// Append `sample` to every sink, returning the number of failures
    async fn deliver(sinks: &mut [Box<dyn SampleSink>], sample: &PriceSample) -> usize {
        let mut failures = 0;
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.append(sample).await {
                tracing::warn!(
                    sink = sink.name(),
                    item = %sample.item_id,
                    source = %sample.source,
                    error = %e,
                    "Sink append failed"
                );
                telemetry::increment(CounterMetric::SinkFailures, sink.name());
                failures += 1;
            }
        }
        failures
    }
}
