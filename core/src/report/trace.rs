//! Bounded console/event trace.
//!
//! A [`TelemetrySink`] that renders events as human-readable lines, capped
//! at a maximum event count. The trace is an optional artifact: write
//! failures poison the writer and are reported once, and the simulation
//! carries on untouched.

use crate::models::event::Event;
use crate::models::order::DepartureRecord;
use crate::models::stage::Stage;
use crate::telemetry::TelemetrySink;
use std::io::Write;

/// Event trace writer with a maximum line count.
pub struct TraceWriter<W: Write> {
    out: W,
    max_events: usize,
    written: usize,
    poisoned: bool,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W, max_events: usize) -> Self {
        Self {
            out,
            max_events,
            written: 0,
            poisoned: false,
        }
    }

    /// Number of trace lines emitted so far.
    pub fn events_written(&self) -> usize {
        self.written
    }

    /// True if a write failed and the trace was abandoned.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: String) {
        if self.poisoned || self.written >= self.max_events {
            return;
        }
        if writeln!(self.out, "{}", line).is_err() {
            self.poisoned = true;
            return;
        }
        self.written += 1;
    }
}

impl<W: Write> TelemetrySink for TraceWriter<W> {
    fn record_event(&mut self, event: &Event) {
        let line = match event {
            Event::Arrival {
                time,
                id,
                priority,
                stage,
                pipeline_size,
            } => format!(
                "[t={:7.3}] ARRIVAL    : Order {} ({}) entered at {}. Queue size = {}",
                time,
                id,
                priority.label(),
                stage.name(),
                pipeline_size
            ),
            Event::StageChange {
                time,
                id,
                priority,
                from,
                to,
                pipeline_size,
            } => format!(
                "[t={:7.3}] {:<10}: Order {} ({}) {} -> {}. Queue size = {}",
                time,
                Stage::phase_label(*from, *to),
                id,
                priority.label(),
                from.name(),
                to.name(),
                pipeline_size
            ),
            Event::Cancellation {
                time,
                id,
                priority,
                stage,
                pipeline_size,
            } => format!(
                "[t={:7.3}] CANCELLED  : Order {} ({}) cancelled at stage {}. Queue size(before) = {}",
                time,
                id,
                priority.label(),
                stage.name(),
                pipeline_size
            ),
            Event::Delivery {
                time,
                id,
                priority,
                sojourn,
                pipeline_size,
            } => format!(
                "[t={:7.3}] DELIVERED  : Order {} ({}) completed. Time in system = {:.3}, Queue size(before) = {}",
                time,
                id,
                priority.label(),
                sojourn,
                pipeline_size
            ),
        };
        self.emit(line);
    }

    fn record_sample(&mut self, _time: f64, _pipeline_size: usize) {
        // Samples go to the CSV series, not the trace.
    }

    fn record_departure(&mut self, _record: DepartureRecord) {
        // Departures are already traced via their events.
    }
}
