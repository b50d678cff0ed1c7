//! Telemetry: the observation side of the simulation.
//!
//! The engine is pure state transition; everything observable leaves it as
//! typed events, periodic samples, and departure records pushed into a
//! [`TelemetrySink`]. The [`Collector`] is the aggregate sink backing the
//! final report: running counts, warm-up-gated sojourn sums, the periodic
//! queue-size series, and the full per-order departure record set.

use crate::models::event::Event;
use crate::models::order::{Departure, DepartureRecord};
use serde::{Deserialize, Serialize};

/// Abstract sink for everything the simulation loop observes.
pub trait TelemetrySink {
    /// A discrete event: arrival, stage change, cancellation, or delivery.
    fn record_event(&mut self, event: &Event);

    /// A periodic (time, pipeline size) snapshot.
    fn record_sample(&mut self, time: f64, pipeline_size: usize);

    /// Ownership of a departed order's record.
    fn record_departure(&mut self, record: DepartureRecord);
}

/// Sink that discards everything. Useful in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record_event(&mut self, _event: &Event) {}
    fn record_sample(&mut self, _time: f64, _pipeline_size: usize) {}
    fn record_departure(&mut self, _record: DepartureRecord) {}
}

/// Fan a run out to several sinks (e.g. the collector plus a trace writer).
#[derive(Default)]
pub struct FanoutSink<'a> {
    sinks: Vec<&'a mut dyn TelemetrySink>,
}

impl<'a> FanoutSink<'a> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn push(&mut self, sink: &'a mut dyn TelemetrySink) {
        self.sinks.push(sink);
    }
}

impl TelemetrySink for FanoutSink<'_> {
    fn record_event(&mut self, event: &Event) {
        for sink in &mut self.sinks {
            sink.record_event(event);
        }
    }

    fn record_sample(&mut self, time: f64, pipeline_size: usize) {
        for sink in &mut self.sinks {
            sink.record_sample(time, pipeline_size);
        }
    }

    fn record_departure(&mut self, record: DepartureRecord) {
        for sink in &mut self.sinks {
            sink.record_departure(record.clone());
        }
    }
}

/// Append-only sequence of periodic (time, pipeline_size) samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    samples: Vec<(f64, usize)>,
}

impl SampleSeries {
    pub fn push(&mut self, time: f64, pipeline_size: usize) {
        self.samples.push((time, pipeline_size));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[(f64, usize)] {
        &self.samples
    }
}

/// Running aggregate statistics for one simulation run.
///
/// Sojourn sums only include orders whose arrival time is at or beyond the
/// warm-up threshold; averages divide by the full delivered count of the
/// class and are zero (not an error) when nothing of that class delivered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_arrived: usize,
    pub arrived_express: usize,
    pub arrived_normal: usize,

    pub delivered: usize,
    pub delivered_express: usize,
    pub delivered_normal: usize,

    pub cancelled: usize,
    pub cancelled_express: usize,
    pub cancelled_normal: usize,

    pub sum_sojourn_all: f64,
    pub sum_sojourn_express: f64,
    pub sum_sojourn_normal: f64,
}

impl SummaryStats {
    pub fn avg_sojourn(&self) -> f64 {
        if self.delivered == 0 {
            0.0
        } else {
            self.sum_sojourn_all / self.delivered as f64
        }
    }

    pub fn avg_sojourn_express(&self) -> f64 {
        if self.delivered_express == 0 {
            0.0
        } else {
            self.sum_sojourn_express / self.delivered_express as f64
        }
    }

    pub fn avg_sojourn_normal(&self) -> f64 {
        if self.delivered_normal == 0 {
            0.0
        } else {
            self.sum_sojourn_normal / self.delivered_normal as f64
        }
    }
}

/// The aggregate sink: stats, sample series, and all departure records.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    warmup: f64,
    stats: SummaryStats,
    samples: SampleSeries,
    departures: Vec<DepartureRecord>,
}

impl Collector {
    /// Create a collector gating sojourn sums on the given warm-up
    /// threshold.
    pub fn new(warmup: f64) -> Self {
        Self {
            warmup,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> &SummaryStats {
        &self.stats
    }

    pub fn samples(&self) -> &SampleSeries {
        &self.samples
    }

    /// All departure records, delivered and cancelled, in departure order.
    pub fn departures(&self) -> &[DepartureRecord] {
        &self.departures
    }

    /// Only the delivered records, in delivery order.
    pub fn delivered_records(&self) -> impl Iterator<Item = &DepartureRecord> {
        self.departures.iter().filter(|r| r.is_delivered())
    }
}

impl TelemetrySink for Collector {
    fn record_event(&mut self, event: &Event) {
        if let Event::Arrival { priority, .. } = event {
            self.stats.total_arrived += 1;
            if priority.is_express() {
                self.stats.arrived_express += 1;
            } else {
                self.stats.arrived_normal += 1;
            }
        }
    }

    fn record_sample(&mut self, time: f64, pipeline_size: usize) {
        self.samples.push(time, pipeline_size);
    }

    fn record_departure(&mut self, record: DepartureRecord) {
        match record.outcome {
            Departure::Delivered => {
                self.stats.delivered += 1;
                if record.priority.is_express() {
                    self.stats.delivered_express += 1;
                } else {
                    self.stats.delivered_normal += 1;
                }
                if record.arrival_time >= self.warmup {
                    self.stats.sum_sojourn_all += record.sojourn;
                    if record.priority.is_express() {
                        self.stats.sum_sojourn_express += record.sojourn;
                    } else {
                        self.stats.sum_sojourn_normal += record.sojourn;
                    }
                }
            }
            Departure::Cancelled { .. } => {
                self.stats.cancelled += 1;
                if record.priority.is_express() {
                    self.stats.cancelled_express += 1;
                } else {
                    self.stats.cancelled_normal += 1;
                }
            }
        }
        self.departures.push(record);
    }
}
