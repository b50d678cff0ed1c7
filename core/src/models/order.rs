//! Order model
//!
//! Represents one unit of work traversing the fulfillment pipeline.
//! Each order has:
//! - A monotonically increasing numeric id, assigned at admission
//! - A priority class (normal or express)
//! - Its current stage
//! - Arrival and (once terminal) delivery times
//!
//! While active, an order is owned exclusively by the pipeline. When it
//! departs (delivered or cancelled) it is converted into an immutable
//! [`DepartureRecord`] and handed to the telemetry sink.

use crate::models::stage::Stage;
use serde::{Deserialize, Serialize};

/// Identifier for an order. Assigned sequentially starting from 1.
pub type OrderId = u64;

/// Priority class of an order.
///
/// Express orders are spliced immediately after the service cursor and are
/// therefore serviced ahead of already-queued normal orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Normal,
    Express,
}

impl Priority {
    /// Label used in trace output.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Normal => "NORMAL",
            Priority::Express => "EXPRESS",
        }
    }

    pub fn is_express(&self) -> bool {
        matches!(self, Priority::Express)
    }
}

/// An in-flight order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: OrderId,

    /// Priority class
    pub priority: Priority,

    /// Current processing stage
    pub stage: Stage,

    /// Simulated time at which the order was admitted
    pub arrival_time: f64,

    /// Simulated time at which the order reached DELIVERED
    /// (None until terminal)
    pub delivered_time: Option<f64>,
}

impl Order {
    /// Create a new order in the initial stage.
    pub fn new(id: OrderId, priority: Priority, arrival_time: f64) -> Self {
        Self {
            id,
            priority,
            stage: Stage::Placed,
            arrival_time,
            delivered_time: None,
        }
    }
}

/// How an order left the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Departure {
    /// Order completed all stages
    Delivered,

    /// Order was cancelled mid-pipeline, at the recorded stage
    Cancelled { at_stage: Stage },
}

/// Immutable record of a departed order.
///
/// Produced exactly once per order, on cancellation or delivery. Ownership
/// of the order's data transfers here; the pipeline never references the
/// order again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureRecord {
    pub id: OrderId,
    pub priority: Priority,
    pub arrival_time: f64,
    /// Time of delivery or cancellation
    pub departed_time: f64,
    pub outcome: Departure,
    /// departed_time - arrival_time
    pub sojourn: f64,
}

impl DepartureRecord {
    /// Record a delivery. The order's `delivered_time` must already be set.
    pub fn delivered(order: Order) -> Self {
        let departed_time = order.delivered_time.unwrap_or(order.arrival_time);
        Self {
            id: order.id,
            priority: order.priority,
            arrival_time: order.arrival_time,
            departed_time,
            outcome: Departure::Delivered,
            sojourn: departed_time - order.arrival_time,
        }
    }

    /// Record a cancellation at the order's current stage.
    pub fn cancelled(order: Order, time: f64) -> Self {
        Self {
            id: order.id,
            priority: order.priority,
            arrival_time: order.arrival_time,
            departed_time: time,
            outcome: Departure::Cancelled {
                at_stage: order.stage,
            },
            sojourn: time - order.arrival_time,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, Departure::Delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_starts_placed() {
        let order = Order::new(1, Priority::Normal, 3.5);
        assert_eq!(order.stage, Stage::Placed);
        assert_eq!(order.arrival_time, 3.5);
        assert!(order.delivered_time.is_none());
    }

    #[test]
    fn test_delivered_record_sojourn() {
        let mut order = Order::new(7, Priority::Express, 10.0);
        order.stage = Stage::Delivered;
        order.delivered_time = Some(16.25);

        let record = DepartureRecord::delivered(order);
        assert!(record.is_delivered());
        assert_eq!(record.sojourn, 6.25);
        assert_eq!(record.departed_time, 16.25);
    }

    #[test]
    fn test_cancelled_record_keeps_stage() {
        let mut order = Order::new(3, Priority::Normal, 2.0);
        order.stage = Stage::Dispatched;

        let record = DepartureRecord::cancelled(order, 9.0);
        assert!(!record.is_delivered());
        assert_eq!(
            record.outcome,
            Departure::Cancelled {
                at_stage: Stage::Dispatched
            }
        );
        assert_eq!(record.sojourn, 7.0);
    }
}
