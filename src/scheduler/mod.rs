pub mod queue;
pub mod types;

pub use queue::Scheduler;
pub use types::{Entity, Event, EventId, EventKind, SchedulerStats};
