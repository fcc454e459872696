use crate::packet::types::Packet;

pub struct PacketVerifier;

impl PacketVerifier {
    /// Sum of the payload's character codes plus the sequence number.
    pub fn calculate_checksum(sequence_number: u32, payload: &str) -> u32 {
        payload
            .chars()
            .fold(sequence_number, |sum, c| sum.wrapping_add(c as u32))
    }

    /// Recompute the checksum and compare it to the stored one.
    ///
    /// A packet that was never sealed never verifies.
    pub fn verify(packet: &Packet) -> bool {
        match packet.checksum {
            Some(stored) => {
                stored == Self::calculate_checksum(packet.sequence_number, &packet.payload)
            }
            None => false,
        }
    }
}
