//! Seams between the simulation core and protocol implementations.
//!
//! The driver only ever talks to `dyn RdtSender` / `dyn RdtReceiver`, and an
//! entity only ever reaches the outside world through the link it is handed
//! on each call. Swapping in another protocol touches nothing else.

use crate::packet::Packet;

/// What a sending entity may do to the world.
pub trait SenderLink {
    /// Hand a packet to the channel. The channel keeps its own copy.
    fn send(&mut self, packet: &Packet);

    /// Arm this entity's retransmission timer.
    fn start_timer(&mut self, duration: f64);

    fn stop_timer(&mut self);

    /// Current simulated time.
    fn now(&self) -> f64;
}

/// What a receiving entity may do to the world.
pub trait ReceiverLink {
    fn send(&mut self, packet: &Packet);

    /// Pass a message up to the receiving application.
    fn deliver(&mut self, message: &str);

    fn now(&self) -> f64;
}

pub trait RdtSender: Send {
    /// Offer a message from the application.
    ///
    /// Returns `false` when the entity cannot take it yet; the caller must
    /// offer the same message again later.
    fn submit(&mut self, message: &str, link: &mut dyn SenderLink) -> bool;

    fn on_packet_arrived(&mut self, packet: Packet, link: &mut dyn SenderLink);

    fn on_timer_expired(&mut self, link: &mut dyn SenderLink);

    /// Whether a packet is outstanding. Implementations without
    /// acknowledgments never wait.
    fn awaiting_ack(&self) -> bool {
        false
    }
}

pub trait RdtReceiver: Send {
    fn on_packet_arrived(&mut self, packet: Packet, link: &mut dyn ReceiverLink);
}
