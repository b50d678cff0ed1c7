//! Simulation loop orchestration.

mod engine;

pub use engine::{RunSummary, Simulation, SimulationConfig, SimulationError};
