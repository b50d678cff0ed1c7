//! Arrival schedule: the externally supplied list of order arrivals.
//!
//! The schedule is parsed before the simulation starts, clamped to the
//! configured maximum order count (excess entries are dropped, not an
//! error), and stably sorted ascending by arrival time so ties keep their
//! input order.

use serde::{Deserialize, Serialize};

/// One scheduled arrival.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledArrival {
    /// Simulated time at which the order arrives
    pub arrival_time: f64,

    /// Whether the order is express (priority insertion)
    #[serde(default)]
    pub express: bool,
}

/// Immutable, ascending-time-sorted arrival schedule.
///
/// Invariant: arrival times are non-decreasing after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrivalSchedule {
    entries: Vec<ScheduledArrival>,
}

impl ArrivalSchedule {
    /// Build a schedule from raw entries.
    ///
    /// Entries beyond `max_orders` are silently dropped before sorting,
    /// mirroring the input clamp of the collaborator interface. The sort is
    /// stable: same-time entries keep their original relative order.
    pub fn new(mut entries: Vec<ScheduledArrival>, max_orders: usize) -> Self {
        entries.truncate(max_orders);
        entries.sort_by(|a, b| {
            a.arrival_time
                .partial_cmp(&b.arrival_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { entries }
    }

    /// Empty schedule.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The i-th arrival in time order.
    pub fn get(&self, index: usize) -> Option<&ScheduledArrival> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledArrival> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrival(t: f64, express: bool) -> ScheduledArrival {
        ScheduledArrival {
            arrival_time: t,
            express,
        }
    }

    #[test]
    fn test_sorted_ascending() {
        let schedule = ArrivalSchedule::new(
            vec![arrival(5.0, false), arrival(1.0, true), arrival(3.0, false)],
            100,
        );

        let times: Vec<f64> = schedule.iter().map(|a| a.arrival_time).collect();
        assert_eq!(times, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_stable_sort_keeps_tie_order() {
        let schedule = ArrivalSchedule::new(
            vec![
                arrival(2.0, false),
                arrival(2.0, true),
                arrival(1.0, false),
                arrival(2.0, false),
            ],
            100,
        );

        // The three t=2.0 entries keep input order: normal, express, normal
        let flags: Vec<bool> = schedule.iter().map(|a| a.express).collect();
        assert_eq!(flags, vec![false, false, true, false]);
    }

    #[test]
    fn test_clamp_applies_before_sort() {
        // Five entries, max 3: the clamp drops the trailing two entries of
        // the raw input, then sorts what is left.
        let schedule = ArrivalSchedule::new(
            vec![
                arrival(9.0, false),
                arrival(1.0, false),
                arrival(4.0, false),
                arrival(0.5, true),
                arrival(2.0, false),
            ],
            3,
        );

        assert_eq!(schedule.len(), 3);
        let times: Vec<f64> = schedule.iter().map(|a| a.arrival_time).collect();
        assert_eq!(times, vec![1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = ArrivalSchedule::empty();
        assert!(schedule.is_empty());
        assert!(schedule.get(0).is_none());
    }
}
