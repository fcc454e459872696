use crate::channel::{ChannelConfig, TransitMode};
use crate::protocol::{ProtocolKind, DEFAULT_RETRANSMIT_TIMEOUT};
use crate::simulator::error::{SimulationError, SimulationResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Duration;

/// Longest wall-clock pacing delay accepted per event, in seconds.
pub const MAX_PAUSE: f64 = 3600.0;

/// Everything a run needs to know up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Messages the sending application will produce.
    pub message_count: u32,
    /// Mean of the exponential inter-arrival time between messages.
    pub mean_interarrival: f64,
    /// Per-packet loss probability, `[0, 1)`.
    pub loss_probability: f64,
    /// Per-packet corruption probability, `[0, 1)`.
    pub corruption_probability: f64,
    /// Wall-clock pacing delay per event, in seconds. Zero runs flat out.
    pub pause: f64,
    /// Sender retransmission timeout, in simulated seconds.
    pub retransmit_timeout: f64,
    /// Seed for every random draw; entropy when absent.
    pub seed: Option<u64>,
    pub protocol: ProtocolKind,
    pub channel: ChannelConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            message_count: 20,
            mean_interarrival: 1000.0,
            loss_probability: 0.0,
            corruption_probability: 0.0,
            pause: 0.0,
            retransmit_timeout: DEFAULT_RETRANSMIT_TIMEOUT,
            seed: None,
            protocol: ProtocolKind::default(),
            channel: ChannelConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new(message_count: u32, mean_interarrival: f64) -> Self {
        Self {
            message_count,
            mean_interarrival,
            ..Default::default()
        }
    }

    /// Paced run with deterministic animated transit.
    ///
    /// Each packet takes `pause / 2 * (steps + 1)` simulated seconds to
    /// cross, emitting one animation tick per step.
    pub fn visualized(pause: f64, steps: u32) -> Self {
        Self {
            pause,
            channel: ChannelConfig::animated(steps, pause),
            ..Default::default()
        }
    }

    pub fn with_message_count(mut self, message_count: u32) -> Self {
        self.message_count = message_count;
        self
    }

    pub fn with_mean_interarrival(mut self, mean: f64) -> Self {
        self.mean_interarrival = mean;
        self
    }

    pub fn with_loss_probability(mut self, probability: f64) -> Self {
        self.loss_probability = probability;
        self
    }

    pub fn with_corruption_probability(mut self, probability: f64) -> Self {
        self.corruption_probability = probability;
        self
    }

    pub fn with_pause(mut self, pause: f64) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_retransmit_timeout(mut self, timeout: f64) -> Self {
        self.retransmit_timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_protocol(mut self, protocol: ProtocolKind) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }

    /// Check every parameter; a probability of 1.0 makes progress impossible.
    pub fn validate(&self) -> SimulationResult<()> {
        check_probability("loss probability", self.loss_probability)?;
        check_probability("corruption probability", self.corruption_probability)?;

        if !(self.mean_interarrival.is_finite() && self.mean_interarrival > 0.0) {
            return Err(invalid(format!(
                "mean inter-arrival time must be positive, got {}",
                self.mean_interarrival
            )));
        }
        if !(0.0..=MAX_PAUSE).contains(&self.pause) {
            return Err(invalid(format!(
                "pacing delay must be in [0, {MAX_PAUSE}], got {}",
                self.pause
            )));
        }
        if !(self.retransmit_timeout.is_finite() && self.retransmit_timeout > 0.0) {
            return Err(invalid(format!(
                "retransmit timeout must be positive, got {}",
                self.retransmit_timeout
            )));
        }

        // A zero transit would let the arrival fire before its network effect.
        let channel = &self.channel;
        if !(channel.min_transit.is_finite() && channel.min_transit > 0.0)
            || !channel.max_transit.is_finite()
            || channel.max_transit < channel.min_transit
        {
            return Err(invalid(format!(
                "transit range [{}, {}) is not valid",
                channel.min_transit, channel.max_transit
            )));
        }
        if let TransitMode::Animated {
            steps,
            step_interval,
        } = channel.transit
        {
            if steps == 0 {
                return Err(invalid("animated transit needs at least one step"));
            }
            if !(step_interval.is_finite() && step_interval > 0.0) {
                return Err(invalid(format!(
                    "animation step interval must be positive, got {step_interval}"
                )));
            }
        }

        let thresholds = channel.corruption;
        if !(0.0..=1.0).contains(&thresholds.payload)
            || !(0.0..=1.0).contains(&thresholds.sequence)
            || thresholds.payload > thresholds.sequence
        {
            return Err(invalid(format!(
                "corruption thresholds must satisfy 0 <= payload <= sequence <= 1, got {} / {}",
                thresholds.payload, thresholds.sequence
            )));
        }
        if channel.corrupt_sequence_number <= 1 {
            return Err(invalid(
                "corrupt sequence number must not be a valid alternating bit",
            ));
        }

        Ok(())
    }

    /// Wall-clock pacing delay per event.
    pub fn pause_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.pause).unwrap_or(Duration::ZERO)
    }

    /// Parameter block printed before a run starts.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\tnmsgs       = {}", self.message_count);
        let _ = writeln!(out, "\tfreq        = {}", self.mean_interarrival);
        let _ = writeln!(out, "\tlossprob    = {}", self.loss_probability);
        let _ = writeln!(out, "\tcorruptprob = {}", self.corruption_probability);
        let _ = writeln!(out, "\tpause       = {}", self.pause);
        let _ = writeln!(out, "\ttimeout     = {}", self.retransmit_timeout);
        let _ = writeln!(out, "\tprotocol    = {}", self.protocol);
        match self.seed {
            Some(seed) => {
                let _ = writeln!(out, "\tseed        = {seed}");
            }
            None => {
                let _ = writeln!(out, "\tseed        = (entropy)");
            }
        }
        out
    }
}

fn check_probability(name: &str, value: f64) -> SimulationResult<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in [0, 1), got {value}")))
    }
}

fn invalid(message: impl Into<String>) -> SimulationError {
    SimulationError::InvalidConfig(message.into())
}
