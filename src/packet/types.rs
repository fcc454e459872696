use crate::packet::verifier::PacketVerifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload carried by every acknowledgment packet.
pub const ACK_PAYLOAD: &str = "ACK";

/// The unit exchanged between the two entities.
///
/// Packets are plain values: the channel clones whatever it is handed, so a
/// sender may keep mutating its own copy after a send without the in-flight
/// copy noticing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub sequence_number: u32,
    pub payload: String,
    /// `None` until the packet is sealed.
    pub checksum: Option<u32>,
}

impl Packet {
    /// Create an unsealed packet (no checksum yet).
    pub fn new(sequence_number: u32, payload: impl Into<String>) -> Self {
        Self {
            sequence_number,
            payload: payload.into(),
            checksum: None,
        }
    }

    /// Create a packet with its checksum already computed.
    pub fn sealed(sequence_number: u32, payload: impl Into<String>) -> Self {
        let mut packet = Self::new(sequence_number, payload);
        packet.seal();
        packet
    }

    /// Build the acknowledgment for `sequence_number`.
    pub fn ack(sequence_number: u32) -> Self {
        Self::sealed(sequence_number, ACK_PAYLOAD)
    }

    /// Recompute and store the checksum from the current header and payload.
    pub fn seal(&mut self) {
        self.checksum = Some(PacketVerifier::calculate_checksum(
            self.sequence_number,
            &self.payload,
        ));
    }

    pub fn is_ack(&self) -> bool {
        self.payload == ACK_PAYLOAD
    }

    /// Shorthand for [`PacketVerifier::verify`].
    pub fn verify(&self) -> bool {
        PacketVerifier::verify(self)
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.checksum {
            Some(checksum) => write!(
                f,
                "Pkt(seq={}, payload='{}', checksum={})",
                self.sequence_number, self.payload, checksum
            ),
            None => write!(
                f,
                "Pkt(seq={}, payload='{}', checksum=None)",
                self.sequence_number, self.payload
            ),
        }
    }
}
