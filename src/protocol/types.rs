use crate::protocol::passthrough::{PassthroughReceiver, PassthroughSender};
use crate::protocol::stop_and_wait::{StopAndWaitReceiver, StopAndWaitSender};
use crate::protocol::traits::{RdtReceiver, RdtSender};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Retransmission timeout, in simulated seconds.
pub const DEFAULT_RETRANSMIT_TIMEOUT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SenderState {
    /// May accept new application data.
    Idle,
    /// One packet outstanding.
    AwaitingAck,
}

/// Which sender/receiver pair a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolKind {
    /// Alternating-bit stop-and-wait with retransmission.
    #[default]
    StopAndWait,
    /// Fire-and-forget pair that trusts the channel completely.
    Passthrough,
}

impl ProtocolKind {
    pub fn build(self, retransmit_timeout: f64) -> (Box<dyn RdtSender>, Box<dyn RdtReceiver>) {
        match self {
            ProtocolKind::StopAndWait => (
                Box::new(StopAndWaitSender::new(retransmit_timeout)),
                Box::new(StopAndWaitReceiver::new()),
            ),
            ProtocolKind::Passthrough => (
                Box::new(PassthroughSender::new()),
                Box::new(PassthroughReceiver::new()),
            ),
        }
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolKind::StopAndWait => f.write_str("stop-and-wait"),
            ProtocolKind::Passthrough => f.write_str("passthrough"),
        }
    }
}

impl FromStr for ProtocolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stop-and-wait" | "stop_and_wait" | "rdt3" | "abp" => Ok(ProtocolKind::StopAndWait),
            "passthrough" | "rdt1" => Ok(ProtocolKind::Passthrough),
            other => Err(format!(
                "unknown protocol '{other}' (expected stop-and-wait or passthrough)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_protocol() {
        assert_eq!(ProtocolKind::default(), ProtocolKind::StopAndWait);
        assert_eq!(ProtocolKind::StopAndWait.to_string(), "stop-and-wait");
    }

    #[test]
    fn test_parse_protocol() {
        assert_eq!("stop-and-wait".parse(), Ok(ProtocolKind::StopAndWait));
        assert_eq!("Passthrough".parse(), Ok(ProtocolKind::Passthrough));
        assert!("go-back-n".parse::<ProtocolKind>().is_err());
    }

    #[test]
    fn test_build_fresh_entities() {
        let (sender, _receiver) = ProtocolKind::StopAndWait.build(DEFAULT_RETRANSMIT_TIMEOUT);
        assert!(!sender.awaiting_ack());

        let (sender, _receiver) = ProtocolKind::Passthrough.build(DEFAULT_RETRANSMIT_TIMEOUT);
        assert!(!sender.awaiting_ack());
    }
}
