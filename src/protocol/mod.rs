pub mod passthrough;
pub mod stop_and_wait;
pub mod traits;
pub mod types;

pub use passthrough::{PassthroughReceiver, PassthroughSender};
pub use stop_and_wait::{StopAndWaitReceiver, StopAndWaitSender};
pub use traits::{RdtReceiver, RdtSender, ReceiverLink, SenderLink};
pub use types::{ProtocolKind, SenderState, DEFAULT_RETRANSMIT_TIMEOUT};

#[cfg(test)]
pub(crate) mod testing;
