pub mod medium;
pub mod types;

pub use medium::Channel;
pub use types::{
    ChannelConfig, CorruptionMode, CorruptionThresholds, InFlight, NetworkVerdict, TransitMode,
    CORRUPT_SEQUENCE_NUMBER,
};
