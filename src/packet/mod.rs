pub mod types;
pub mod verifier;

pub use types::{Packet, ACK_PAYLOAD};
pub use verifier::PacketVerifier;
