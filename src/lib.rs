//! Discrete-event simulator for reliable data transfer over an unreliable
//! channel.
//!
//! A sender and a receiver exchange [`packet::Packet`]s through a
//! [`channel::Channel`] that may lose, corrupt and delay them. All time is
//! simulated: the [`scheduler::Scheduler`] hands out events in timestamp
//! order and the [`simulator::Simulator`] dispatches them to the protocol
//! entities. Renderers follow a run through the [`observer`] stream.

pub mod channel;
pub mod metrics;
pub mod observer;
pub mod packet;
pub mod protocol;
pub mod scheduler;
pub mod simulator;
pub mod timer;

pub use channel::{Channel, ChannelConfig};
pub use packet::Packet;
pub use protocol::ProtocolKind;
pub use simulator::{SimulationConfig, SimulationError, SimulationResult, SimulationStats, Simulator};
