//! Fulfillment Simulator Core - Rust Engine
//!
//! Discrete-event simulator of an order-fulfillment pipeline with
//! deterministic execution.
//!
//! # Architecture
//!
//! - **models**: Domain types (Order, Stage, Event)
//! - **pipeline**: Cyclic arena of in-flight orders (the service ring)
//! - **schedule**: Sorted, clamped arrival schedule
//! - **engine**: Main simulation loop
//! - **telemetry**: Event/sample sinks and aggregate statistics
//! - **report**: CSV, summary, and console-trace output
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG, single stream)
//! 2. Active orders are owned exclusively by the pipeline
//! 3. The ring is always a single closed cycle with a live cursor

// Module declarations
pub mod engine;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod rng;
pub mod schedule;
pub mod telemetry;

// Re-exports for convenience
pub use engine::{RunSummary, Simulation, SimulationConfig, SimulationError};
pub use models::{
    event::Event,
    order::{Departure, DepartureRecord, Order, OrderId, Priority},
    stage::{Stage, StageTimes},
};
pub use pipeline::{AdmitError, OrderPipeline};
pub use rng::RngManager;
pub use schedule::{ArrivalSchedule, ScheduledArrival};
pub use telemetry::{Collector, FanoutSink, NullSink, SampleSeries, SummaryStats, TelemetrySink};
