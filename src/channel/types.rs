use crate::packet::Packet;
use crate::scheduler::EventId;
use serde::{Deserialize, Serialize};

/// Sequence number written into a packet whose header gets corrupted.
/// Never equal to a valid alternating-bit value.
pub const CORRUPT_SEQUENCE_NUMBER: u32 = 999_999;

/// How long a packet spends in the channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransitMode {
    /// Uniform draw from the channel's `[min_transit, max_transit)` range.
    Uniform,
    /// Fixed `step_interval * (steps + 1)`, with one animation tick per step.
    Animated { steps: u32, step_interval: f64 },
}

/// Draw thresholds selecting which part of a packet gets corrupted.
///
/// A single uniform draw `x` picks payload (`x < payload`, non-empty
/// payload only), sequence number (`x < sequence`) or checksum (otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorruptionThresholds {
    pub payload: f64,
    pub sequence: f64,
}

impl Default for CorruptionThresholds {
    fn default() -> Self {
        Self {
            payload: 0.75,
            sequence: 0.875,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub min_transit: f64,
    pub max_transit: f64,
    pub transit: TransitMode,
    pub corruption: CorruptionThresholds,
    pub corrupt_sequence_number: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            min_transit: 0.5,
            max_transit: 5.0,
            transit: TransitMode::Uniform,
            corruption: CorruptionThresholds::default(),
            corrupt_sequence_number: CORRUPT_SEQUENCE_NUMBER,
        }
    }
}

impl ChannelConfig {
    /// Deterministic, evenly paced transit for visualized runs.
    ///
    /// Each animation step takes half the pacing delay.
    pub fn animated(steps: u32, pause: f64) -> Self {
        Self {
            transit: TransitMode::Animated {
                steps,
                step_interval: pause / 2.0,
            },
            ..Default::default()
        }
    }

    /// Fixed transit range, mostly useful to make tests exact.
    pub fn with_transit_range(min_transit: f64, max_transit: f64) -> Self {
        Self {
            min_transit,
            max_transit,
            ..Default::default()
        }
    }

    pub fn animation_steps(&self) -> Option<u32> {
        match self.transit {
            TransitMode::Uniform => None,
            TransitMode::Animated { steps, .. } => Some(steps),
        }
    }
}

/// Events scheduled for one packet handed to the channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InFlight {
    pub arrival: EventId,
    pub effect: EventId,
    pub arrival_time: f64,
    pub effect_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CorruptionMode {
    /// One payload character replaced by a random letter.
    Payload { position: usize, replacement: char },
    /// Sequence number overwritten with the out-of-band sentinel.
    Sequence,
    /// Checksum incremented (or set to 1 when absent).
    Checksum,
}

/// Outcome of a mid-transit network effect.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkVerdict {
    /// Arrival cancelled; the packet never shows up.
    Lost { packet: Packet },
    /// The in-flight copy was mutated; `packet` is its new state.
    Corrupted { packet: Packet, mode: CorruptionMode },
    Delivered,
}
