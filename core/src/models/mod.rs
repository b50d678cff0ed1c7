//! Domain types for the fulfillment simulation.

pub mod event;
pub mod order;
pub mod stage;

pub use event::Event;
pub use order::{Departure, DepartureRecord, Order, OrderId, Priority};
pub use stage::{Stage, StageTimes};
