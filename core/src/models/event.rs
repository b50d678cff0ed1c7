//! Typed simulation events.
//!
//! The engine emits one event per observable state change: arrivals, stage
//! transitions, cancellations, and deliveries. Events are pure values; how
//! they are rendered (console trace, files) is a sink concern, not engine
//! logic. All events carry the simulated time and the pipeline size the
//! observer would have seen at that moment.

use crate::models::order::{OrderId, Priority};
use crate::models::stage::Stage;

/// A single observable simulation event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// New order admitted into the pipeline
    Arrival {
        time: f64,
        id: OrderId,
        priority: Priority,
        stage: Stage,
        /// Pipeline size after insertion
        pipeline_size: usize,
    },

    /// Order advanced one non-terminal stage
    StageChange {
        time: f64,
        id: OrderId,
        priority: Priority,
        from: Stage,
        to: Stage,
        pipeline_size: usize,
    },

    /// Order cancelled mid-pipeline
    Cancellation {
        time: f64,
        id: OrderId,
        priority: Priority,
        stage: Stage,
        /// Pipeline size before removal
        pipeline_size: usize,
    },

    /// Order reached the terminal stage
    Delivery {
        time: f64,
        id: OrderId,
        priority: Priority,
        sojourn: f64,
        /// Pipeline size before removal
        pipeline_size: usize,
    },
}

impl Event {
    /// Simulated time at which this event occurred
    pub fn time(&self) -> f64 {
        match self {
            Event::Arrival { time, .. } => *time,
            Event::StageChange { time, .. } => *time,
            Event::Cancellation { time, .. } => *time,
            Event::Delivery { time, .. } => *time,
        }
    }

    /// The order this event concerns
    pub fn order_id(&self) -> OrderId {
        match self {
            Event::Arrival { id, .. } => *id,
            Event::StageChange { id, .. } => *id,
            Event::Cancellation { id, .. } => *id,
            Event::Delivery { id, .. } => *id,
        }
    }

    /// Short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Arrival { .. } => "Arrival",
            Event::StageChange { .. } => "StageChange",
            Event::Cancellation { .. } => "Cancellation",
            Event::Delivery { .. } => "Delivery",
        }
    }

    /// Priority class of the order this event concerns
    pub fn priority(&self) -> Priority {
        match self {
            Event::Arrival { priority, .. } => *priority,
            Event::StageChange { priority, .. } => *priority,
            Event::Cancellation { priority, .. } => *priority,
            Event::Delivery { priority, .. } => *priority,
        }
    }
}
