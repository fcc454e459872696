use crate::packet::Packet;
use crate::protocol::traits::{ReceiverLink, SenderLink};

/// Link that records everything an entity asks of it.
#[derive(Debug, Default)]
pub(crate) struct RecordingLink {
    pub sent: Vec<Packet>,
    pub delivered: Vec<String>,
    pub timer_starts: Vec<f64>,
    pub timer_stops: usize,
}

impl SenderLink for RecordingLink {
    fn send(&mut self, packet: &Packet) {
        self.sent.push(packet.clone());
    }

    fn start_timer(&mut self, duration: f64) {
        self.timer_starts.push(duration);
    }

    fn stop_timer(&mut self) {
        self.timer_stops += 1;
    }

    fn now(&self) -> f64 {
        0.0
    }
}

impl ReceiverLink for RecordingLink {
    fn send(&mut self, packet: &Packet) {
        self.sent.push(packet.clone());
    }

    fn deliver(&mut self, message: &str) {
        self.delivered.push(message.to_string());
    }

    fn now(&self) -> f64 {
        0.0
    }
}
