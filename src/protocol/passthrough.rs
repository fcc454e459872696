//! A sender/receiver pair for a channel that never fails.
//!
//! No acknowledgments, no timers, no sequence numbers worth the name. Useful
//! as a baseline against which the stop-and-wait pair can be compared.

use crate::packet::Packet;
use crate::protocol::traits::{RdtReceiver, RdtSender, ReceiverLink, SenderLink};

#[derive(Debug, Clone, Default)]
pub struct PassthroughSender;

impl PassthroughSender {
    pub fn new() -> Self {
        Self
    }
}

impl RdtSender for PassthroughSender {
    fn submit(&mut self, message: &str, link: &mut dyn SenderLink) -> bool {
        link.send(&Packet::sealed(0, message));
        true
    }

    fn on_packet_arrived(&mut self, packet: Packet, link: &mut dyn SenderLink) {
        tracing::debug!("[{:8.2}] RDT_RECV @ Sender: ignoring {}", link.now(), packet);
    }

    fn on_timer_expired(&mut self, _link: &mut dyn SenderLink) {}
}

#[derive(Debug, Clone, Default)]
pub struct PassthroughReceiver;

impl PassthroughReceiver {
    pub fn new() -> Self {
        Self
    }
}

impl RdtReceiver for PassthroughReceiver {
    fn on_packet_arrived(&mut self, packet: Packet, link: &mut dyn ReceiverLink) {
        // Even the trusting receiver never hands corrupted data upward.
        if packet.verify() {
            link.deliver(&packet.payload);
        }
    }
}
