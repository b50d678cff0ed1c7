//! Simulation Engine
//!
//! Main loop integrating all components:
//! - Arrival admission (schedule-driven, priority-aware insertion)
//! - Service sampling (exponential durations per stage)
//! - Cancellation and stage transitions
//! - Periodic queue-size sampling
//! - Event emission to a telemetry sink
//!
//! # Loop shape
//!
//! ```text
//! While now < horizon:
//! 1. Admit every scheduled arrival that is due
//! 2. Record a queue-size sample if a sampling tick was reached
//! 3. If the pipeline is empty: jump to the next arrival or terminate
//! 4. Advance the cursor; draw a service duration for that order's stage
//! 5. Apply the cancellation/stage-transition rule; departed orders leave
//!    the ring and become departure records
//! ```
//!
//! # Determinism
//!
//! All randomness flows through one seeded xorshift64* stream. Fixed seed,
//! schedule, and config produce byte-identical event, sample, and departure
//! sequences.

use crate::models::event::Event;
use crate::models::order::{DepartureRecord, Order, OrderId, Priority};
use crate::models::stage::{Stage, StageTimes};
use crate::pipeline::{AdmitError, OrderPipeline};
use crate::rng::{variate, RngManager};
use crate::schedule::{ArrivalSchedule, ScheduledArrival};
use crate::telemetry::TelemetrySink;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Configuration
// ============================================================================

/// Complete simulation configuration.
///
/// Every tunable is runtime-settable; nothing here is a compile-time
/// constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Maximum simulated time; the run terminates once time passes it
    pub horizon: f64,

    /// Mean service duration per non-terminal stage
    pub stage_times: StageTimes,

    /// Probability that a serviced order in a cancellable stage is
    /// cancelled, evaluated independently at each service
    pub cancel_probability: f64,

    /// Arrival-time cutoff below which sojourn times are excluded from
    /// aggregate averages
    pub warmup: f64,

    /// Simulated-time interval between queue-size samples
    pub sample_interval: f64,

    /// Maximum number of events the console trace renders
    pub max_trace_events: usize,

    /// Maximum admissible order count; longer schedules are clamped
    pub max_orders: usize,

    /// RNG seed for deterministic replay
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 500.0,
            stage_times: StageTimes::default(),
            cancel_probability: 0.01,
            warmup: 20.0,
            sample_interval: 5.0,
            max_trace_events: 200,
            max_orders: 1000,
            rng_seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "horizon must be finite and > 0".to_string(),
            ));
        }
        if !self.sample_interval.is_finite() || self.sample_interval <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "sample_interval must be finite and > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.cancel_probability) {
            return Err(SimulationError::InvalidConfig(
                "cancel_probability must be within [0, 1]".to_string(),
            ));
        }
        if !self.warmup.is_finite() || self.warmup < 0.0 {
            return Err(SimulationError::InvalidConfig(
                "warmup must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Simulation error types.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Resource exhaustion while admitting an arrival. Fatal for the run,
    /// surfaced explicitly rather than crashing.
    #[error("admission failed: {0}")]
    Admission(#[from] AdmitError),
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Simulated time at termination
    pub end_time: f64,

    /// Orders admitted over the whole run
    pub orders_admitted: usize,

    /// Orders still active in the pipeline at termination
    pub orders_remaining: usize,
}

// ============================================================================
// Simulation
// ============================================================================

/// The simulation loop: owns the pipeline, the clock, and the RNG stream.
///
/// Each instance is self-contained; independent simulations share no
/// mutable state and can run side by side.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    schedule: ArrivalSchedule,
    pipeline: OrderPipeline,
    rng: RngManager,

    /// Current simulated time
    now: f64,

    /// Next sampling tick
    next_sample: f64,

    /// Index of the next not-yet-admitted scheduled arrival
    next_arrival: usize,

    /// Next order id to assign
    next_id: OrderId,

    orders_admitted: usize,
}

impl Simulation {
    /// Create a simulation from a validated configuration and a schedule.
    ///
    /// The schedule is clamped to `config.max_orders` and stably sorted by
    /// arrival time.
    pub fn new(
        config: SimulationConfig,
        arrivals: Vec<ScheduledArrival>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let schedule = ArrivalSchedule::new(arrivals, config.max_orders);
        let rng = RngManager::new(config.rng_seed);
        let next_sample = config.sample_interval;
        Ok(Self {
            config,
            schedule,
            pipeline: OrderPipeline::new(),
            rng,
            now: 0.0,
            next_sample,
            next_arrival: 0,
            next_id: 1,
            orders_admitted: 0,
        })
    }

    /// Current simulated time.
    pub fn current_time(&self) -> f64 {
        self.now
    }

    /// Active orders in the ring.
    pub fn pipeline(&self) -> &OrderPipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation to termination, reporting to `sink`.
    ///
    /// Terminates when simulated time passes the horizon, or when both the
    /// pipeline and the arrival schedule are exhausted.
    pub fn run(&mut self, sink: &mut dyn TelemetrySink) -> Result<RunSummary, SimulationError> {
        let horizon = self.config.horizon;

        while self.now < horizon {
            // STEP 1: ADMISSION
            // Admit every scheduled arrival that is due by now.
            while let Some(arrival) = self.schedule.get(self.next_arrival).copied() {
                if self.now < arrival.arrival_time {
                    break;
                }
                self.admit(arrival, sink)?;
                self.next_arrival += 1;
            }

            // STEP 2: SAMPLING
            // One sample per iteration at most; ticks skipped by the idle
            // fast-forward below are not back-filled.
            if self.now >= self.next_sample {
                sink.record_sample(self.now, self.pipeline.len());
                self.next_sample += self.config.sample_interval;
            }

            // STEP 3: IDLE FAST-FORWARD
            if self.pipeline.is_empty() {
                match self.schedule.get(self.next_arrival) {
                    Some(arrival) if arrival.arrival_time <= horizon => {
                        self.now = arrival.arrival_time;
                        continue;
                    }
                    _ => break,
                }
            }

            // STEP 4: SERVICE
            // Move to the next order in the ring and draw its service time.
            self.pipeline.advance();
            let (id, priority, stage, arrival_time) = match self.pipeline.current() {
                Some(order) => (order.id, order.priority, order.stage, order.arrival_time),
                None => break, // unreachable: emptiness handled in step 3
            };

            let mean = self.config.stage_times.mean_for(stage);
            let service = variate::exponential(&mut self.rng, mean);
            self.now += service;
            if self.now > horizon {
                break;
            }

            // STEP 5: CANCELLATION / STAGE TRANSITION
            if stage.is_cancellable() && self.rng.next_f64() < self.config.cancel_probability {
                sink.record_event(&Event::Cancellation {
                    time: self.now,
                    id,
                    priority,
                    stage,
                    pipeline_size: self.pipeline.len(),
                });
                if let Some((order, _successor)) = self.pipeline.remove_current() {
                    sink.record_departure(DepartureRecord::cancelled(order, self.now));
                }
                continue;
            }

            let to = stage.next();
            if to.is_terminal() {
                sink.record_event(&Event::Delivery {
                    time: self.now,
                    id,
                    priority,
                    sojourn: self.now - arrival_time,
                    pipeline_size: self.pipeline.len(),
                });
                if let Some((mut order, _successor)) = self.pipeline.remove_current() {
                    order.stage = to;
                    order.delivered_time = Some(self.now);
                    sink.record_departure(DepartureRecord::delivered(order));
                }
                continue;
            }

            if let Some(order) = self.pipeline.current_mut() {
                order.stage = to;
            }
            sink.record_event(&Event::StageChange {
                time: self.now,
                id,
                priority,
                from: stage,
                to,
                pipeline_size: self.pipeline.len(),
            });
            // Cursor stays on this order; the next iteration advances past it.
        }

        Ok(RunSummary {
            end_time: self.now,
            orders_admitted: self.orders_admitted,
            orders_remaining: self.pipeline.len(),
        })
    }

    /// Admit one scheduled arrival: create the order in PLACED and splice
    /// it into the ring (after the cursor for express, before the head for
    /// normal).
    fn admit(
        &mut self,
        arrival: ScheduledArrival,
        sink: &mut dyn TelemetrySink,
    ) -> Result<(), SimulationError> {
        let priority = if arrival.express {
            Priority::Express
        } else {
            Priority::Normal
        };
        let id = self.next_id;
        self.next_id += 1;

        let order = Order::new(id, priority, arrival.arrival_time);
        match priority {
            Priority::Express => self.pipeline.insert_priority(order)?,
            Priority::Normal => self.pipeline.insert_normal(order)?,
        }
        self.orders_admitted += 1;

        sink.record_event(&Event::Arrival {
            time: self.now,
            id,
            priority,
            stage: Stage::Placed,
            pipeline_size: self.pipeline.len(),
        });
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::NullSink;

    #[test]
    fn test_config_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.horizon, 500.0);
        assert_eq!(config.cancel_probability, 0.01);
        assert_eq!(config.warmup, 20.0);
        assert_eq!(config.sample_interval, 5.0);
        assert_eq!(config.max_trace_events, 200);
        assert_eq!(config.max_orders, 1000);
        config.validate().unwrap();
    }

    #[test]
    fn test_invalid_horizon_rejected() {
        let config = SimulationConfig {
            horizon: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_cancel_probability_rejected() {
        let config = SimulationConfig {
            cancel_probability: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_sample_interval_rejected() {
        let config = SimulationConfig {
            sample_interval: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_schedule_terminates_immediately() {
        let mut sim = Simulation::new(SimulationConfig::default(), Vec::new()).unwrap();
        let summary = sim.run(&mut NullSink).unwrap();

        assert_eq!(summary.end_time, 0.0);
        assert_eq!(summary.orders_admitted, 0);
        assert_eq!(summary.orders_remaining, 0);
    }

    #[test]
    fn test_schedule_clamped_to_max_orders() {
        let config = SimulationConfig {
            max_orders: 2,
            ..Default::default()
        };
        let arrivals = vec![
            ScheduledArrival {
                arrival_time: 0.0,
                express: false,
            };
            5
        ];
        let mut sim = Simulation::new(config, arrivals).unwrap();
        let summary = sim.run(&mut NullSink).unwrap();

        assert_eq!(summary.orders_admitted, 2);
    }

    #[test]
    fn test_idle_fast_forward_jumps_to_next_arrival() {
        let arrivals = vec![ScheduledArrival {
            arrival_time: 100.0,
            express: false,
        }];
        let mut sim = Simulation::new(SimulationConfig::default(), arrivals).unwrap();
        let summary = sim.run(&mut NullSink).unwrap();

        // The order was admitted (time jumped straight to t=100) and the
        // run ended after it departed.
        assert_eq!(summary.orders_admitted, 1);
        assert!(summary.end_time >= 100.0);
    }

    #[test]
    fn test_arrival_beyond_horizon_never_admitted() {
        let arrivals = vec![ScheduledArrival {
            arrival_time: 600.0,
            express: false,
        }];
        let mut sim = Simulation::new(SimulationConfig::default(), arrivals).unwrap();
        let summary = sim.run(&mut NullSink).unwrap();

        assert_eq!(summary.orders_admitted, 0);
        assert_eq!(summary.end_time, 0.0);
    }
}
