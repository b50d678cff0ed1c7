//! Fulfillment stages and stage-transition rules.
//!
//! The pipeline is a fixed linear sequence:
//! PLACED → PACKED → DISPATCHED → OUT_FOR_DELIVERY → DELIVERED (terminal).
//!
//! Cancellation is only possible for stages strictly after PLACED and
//! before DELIVERED. Mean service durations per non-terminal stage live in
//! [`StageTimes`], a runtime configuration table.

use serde::{Deserialize, Serialize};

/// Processing stage of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Placed,
    Packed,
    Dispatched,
    OutForDelivery,
    Delivered,
}

impl Stage {
    /// Stage after this one. Terminal stage returns itself.
    pub fn next(&self) -> Stage {
        match self {
            Stage::Placed => Stage::Packed,
            Stage::Packed => Stage::Dispatched,
            Stage::Dispatched => Stage::OutForDelivery,
            Stage::OutForDelivery => Stage::Delivered,
            Stage::Delivered => Stage::Delivered,
        }
    }

    /// DELIVERED is the sole terminal stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Delivered)
    }

    /// Cancellation is evaluated only strictly after PLACED and before
    /// DELIVERED.
    pub fn is_cancellable(&self) -> bool {
        !matches!(self, Stage::Placed | Stage::Delivered)
    }

    /// Display name used in records and trace output.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Placed => "PLACED",
            Stage::Packed => "PACKED",
            Stage::Dispatched => "DISPATCHED",
            Stage::OutForDelivery => "OUT_FOR_DELIVERY",
            Stage::Delivered => "DELIVERED",
        }
    }

    /// Label describing the transition between two stages, as printed in
    /// the console trace.
    pub fn phase_label(from: Stage, to: Stage) -> &'static str {
        match (from, to) {
            (Stage::Placed, Stage::Packed) => "PACKING",
            (Stage::Packed, Stage::Dispatched) => "DISPATCHED",
            (Stage::Dispatched, Stage::OutForDelivery) => "IN_TRANSIT",
            (Stage::OutForDelivery, Stage::Delivered) => "DELIVERED",
            _ => "STAGE_MOVE",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Mean service duration per non-terminal stage.
///
/// Runtime-settable configuration, not compile-time constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    pub placed: f64,
    pub packed: f64,
    pub dispatched: f64,
    pub out_for_delivery: f64,
}

impl StageTimes {
    /// Mean service time for an order currently in `stage`.
    ///
    /// The terminal stage is never serviced; it falls back to 1.0 like the
    /// other unreachable arms.
    pub fn mean_for(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Placed => self.placed,
            Stage::Packed => self.packed,
            Stage::Dispatched => self.dispatched,
            Stage::OutForDelivery => self.out_for_delivery,
            Stage::Delivered => 1.0,
        }
    }
}

impl Default for StageTimes {
    fn default() -> Self {
        Self {
            placed: 0.7,
            packed: 1.0,
            dispatched: 0.9,
            out_for_delivery: 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering_is_linear() {
        let mut stage = Stage::Placed;
        let expected = [
            Stage::Packed,
            Stage::Dispatched,
            Stage::OutForDelivery,
            Stage::Delivered,
        ];
        for want in expected {
            stage = stage.next();
            assert_eq!(stage, want);
        }
        // Terminal stage is absorbing
        assert_eq!(Stage::Delivered.next(), Stage::Delivered);
    }

    #[test]
    fn test_cancellable_window() {
        assert!(!Stage::Placed.is_cancellable());
        assert!(Stage::Packed.is_cancellable());
        assert!(Stage::Dispatched.is_cancellable());
        assert!(Stage::OutForDelivery.is_cancellable());
        assert!(!Stage::Delivered.is_cancellable());
    }

    #[test]
    fn test_only_delivered_is_terminal() {
        assert!(Stage::Delivered.is_terminal());
        assert!(!Stage::OutForDelivery.is_terminal());
        assert!(!Stage::Placed.is_terminal());
    }

    #[test]
    fn test_default_means() {
        let times = StageTimes::default();
        assert_eq!(times.mean_for(Stage::Placed), 0.7);
        assert_eq!(times.mean_for(Stage::Packed), 1.0);
        assert_eq!(times.mean_for(Stage::Dispatched), 0.9);
        assert_eq!(times.mean_for(Stage::OutForDelivery), 0.6);
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Stage::phase_label(Stage::Placed, Stage::Packed), "PACKING");
        assert_eq!(
            Stage::phase_label(Stage::Dispatched, Stage::OutForDelivery),
            "IN_TRANSIT"
        );
        assert_eq!(
            Stage::phase_label(Stage::Placed, Stage::Dispatched),
            "STAGE_MOVE"
        );
    }
}
