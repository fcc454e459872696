//! Observation-only event stream for renderers.
//!
//! The driver appends [`ObserverEvent`]s to an unbounded FIFO that another
//! thread (or task) drains at its own pace. The producer side never blocks;
//! if the consumer is gone, events are counted and dropped. Renderers may
//! steer pacing through [`PlaybackControl`], which the driver polls between
//! iterations.

pub mod control;
pub mod queue;
pub mod types;

pub use control::PlaybackControl;
pub use queue::{channel, EventSink, EventStream};
pub use types::{EventData, EventName, Host, ObserverEvent};
