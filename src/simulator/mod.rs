//! Simulation driver
//!
//! Owns the scheduler, channel and timers for a run, synthesizes the
//! sending application's traffic and dispatches events to the protocol
//! entities until every message has been delivered or nothing is left to
//! happen.

pub mod config;
pub mod driver;
pub mod error;
pub mod stats;

pub use config::SimulationConfig;
pub use driver::Simulator;
pub use error::{SimulationError, SimulationResult};
pub use stats::SimulationStats;
