//! End-to-end tests for the monitoring loop

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use skin_price_monitor::catalog::CatalogItem;
use skin_price_monitor::detector::ChangeDetector;
use skin_price_monitor::monitor::{ManualClock, Monitor, MonitorSettings};
use skin_price_monitor::sample::PriceSample;
use skin_price_monitor::sink::{CsvSink, SampleSink, SinkError, CSV_HEADER};
use skin_price_monitor::source::{PriceSource, RawQuote, Source, SourceError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type QuoteResult = Result<Option<RawQuote>, SourceError>;

/// Source that replays one scripted result per call
struct ScriptedSource {
    source: Source,
    script: Mutex<VecDeque<QuoteResult>>,
}

impl ScriptedSource {
    fn new(source: Source, script: Vec<QuoteResult>) -> Self {
        Self {
            source,
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch_quote(&self, _item: &CatalogItem) -> QuoteResult {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }
}

#[derive(Clone, Default)]
struct MemorySink(Arc<Mutex<Vec<PriceSample>>>);

#[async_trait]
impl SampleSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn append(&mut self, sample: &PriceSample) -> Result<(), SinkError> {
        self.0.lock().unwrap().push(sample.clone());
        Ok(())
    }
}

struct BrokenSink;

#[async_trait]
impl SampleSink for BrokenSink {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn append(&mut self, _sample: &PriceSample) -> Result<(), SinkError> {
        Err(SinkError::Io(std::io::Error::other("disk full")))
    }
}

fn quote(price: rust_decimal::Decimal, volume: u64) -> QuoteResult {
    Ok(Some(RawQuote::new(Some(price), Some(volume))))
}

fn unavailable() -> QuoteResult {
    Err(SourceError::Status {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: "maintenance".to_string(),
    })
}

fn redline() -> CatalogItem {
    CatalogItem::new("ak-redline", "AK-47 | Redline (Field-Tested)", Some(33815))
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.timestamp_opt(1_699_999_300, 0).unwrap())
}

fn settings(max_sweeps: u64) -> MonitorSettings {
    MonitorSettings {
        interval_secs: 1800,
        request_gap: Duration::from_millis(400),
        max_sweeps: Some(max_sweeps),
    }
}

#[tokio::test]
async fn test_two_sweeps_detect_drop() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("price_samples.csv");
    let memory = MemorySink::default();

    let sources: Vec<Box<dyn PriceSource>> = vec![
        Box::new(ScriptedSource::new(
            Source::Buff163,
            vec![quote(dec!(100.00), 50), quote(dec!(98.00), 50)],
        )),
        Box::new(ScriptedSource::new(
            Source::Steam,
            vec![quote(dec!(101.00), 40), quote(dec!(101.00), 40)],
        )),
    ];
    let sinks: Vec<Box<dyn SampleSink>> =
        vec![Box::new(memory.clone()), Box::new(CsvSink::new(&csv_path))];

    let mut monitor = Monitor::new(
        settings(2),
        vec![redline()],
        sources,
        sinks,
        ChangeDetector::new(dec!(0.5)),
        clock(),
    )
    .unwrap();

    let first = monitor.run_sweep().await;
    assert_eq!(first.samples.len(), 2);
    assert!(first.notable.is_empty());
    assert_eq!(memory.0.lock().unwrap().len(), 2);
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert_eq!(csv.lines().next(), Some(CSV_HEADER));

    let second = monitor.run_sweep().await;
    assert_eq!(second.samples.len(), 2);
    assert_eq!(second.notable.len(), 1);
    let change = &second.notable[0];
    assert_eq!(change.source, Source::Buff163);
    assert_eq!(change.previous, dec!(100.00));
    assert_eq!(change.current, dec!(98.00));
    assert_eq!(change.pct, dec!(-2.0));
    assert_eq!(
        monitor.detector().state().get("ak-redline", Source::Buff163),
        Some(dec!(98.00))
    );

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 5);
    assert_eq!(csv.matches(CSV_HEADER).count(), 1);
}

#[tokio::test]
async fn test_run_buckets_each_sweep() {
    let memory = MemorySink::default();
    let sources: Vec<Box<dyn PriceSource>> = vec![
        Box::new(ScriptedSource::new(
            Source::Buff163,
            vec![quote(dec!(10), 1), quote(dec!(10), 1)],
        )),
        Box::new(ScriptedSource::new(
            Source::Steam,
            vec![quote(dec!(11), 1), quote(dec!(11), 1)],
        )),
    ];

    let mut monitor = Monitor::new(
        settings(2),
        vec![redline()],
        sources,
        vec![Box::new(memory.clone())],
        ChangeDetector::new(dec!(0.5)),
        clock(),
    )
    .unwrap();

    assert_eq!(monitor.run().await, 2);

    let samples = memory.0.lock().unwrap();
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0].timestamp, samples[1].timestamp);
    assert_eq!(samples[2].timestamp, samples[3].timestamp);
    assert_eq!(
        (samples[2].timestamp - samples[0].timestamp).num_seconds(),
        1800
    );
}

#[tokio::test]
async fn test_transport_failure_isolated_to_one_source() {
    let memory = MemorySink::default();
    let sources: Vec<Box<dyn PriceSource>> = vec![
        Box::new(ScriptedSource::new(Source::Buff163, vec![unavailable()])),
        Box::new(ScriptedSource::new(Source::Steam, vec![quote(dec!(101.00), 40)])),
    ];

    let mut monitor = Monitor::new(
        settings(1),
        vec![redline()],
        sources,
        vec![Box::new(memory.clone())],
        ChangeDetector::new(dec!(0.5)),
        clock(),
    )
    .unwrap();

    let report = monitor.run_sweep().await;
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.samples.len(), 1);
    assert_eq!(report.samples[0].source, Source::Steam);
    assert_eq!(memory.0.lock().unwrap().len(), 1);
    assert_eq!(
        monitor.detector().state().get("ak-redline", Source::Steam),
        Some(dec!(101.00))
    );
}

#[tokio::test]
async fn test_sink_failure_does_not_block_other_sink() {
    let memory = MemorySink::default();
    let sources: Vec<Box<dyn PriceSource>> = vec![Box::new(ScriptedSource::new(
        Source::Steam,
        vec![quote(dec!(5), 1), quote(dec!(6), 1)],
    ))];
    let sinks: Vec<Box<dyn SampleSink>> = vec![Box::new(BrokenSink), Box::new(memory.clone())];

    let mut monitor = Monitor::new(
        settings(1),
        vec![redline(), CatalogItem::new("awp-asiimov", "AWP | Asiimov (Field-Tested)", None)],
        sources,
        sinks,
        ChangeDetector::new(dec!(0.5)),
        clock(),
    )
    .unwrap();

    let report = monitor.run_sweep().await;
    assert_eq!(report.sink_failures, 2);
    assert_eq!(report.samples.len(), 2);
    assert_eq!(memory.0.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_csv_only_receives_every_sample() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("samples.csv");
    let sources: Vec<Box<dyn PriceSource>> = vec![
        Box::new(ScriptedSource::new(Source::Buff163, vec![quote(dec!(7.25), 3)])),
        Box::new(ScriptedSource::new(
            Source::Steam,
            vec![Ok(Some(RawQuote::new(Some(dec!(7.40)), None)))],
        )),
    ];

    let mut monitor = Monitor::new(
        settings(1),
        vec![redline()],
        sources,
        vec![Box::new(CsvSink::new(&csv_path))],
        ChangeDetector::new(dec!(0.5)),
        clock(),
    )
    .unwrap();
    monitor.run().await;

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(
        rows,
        vec![
            "2023-11-14T22:00:00+00:00,ak-redline,buff163,7.25,3",
            "2023-11-14T22:00:00+00:00,ak-redline,steam,7.40,",
        ]
    );
}
