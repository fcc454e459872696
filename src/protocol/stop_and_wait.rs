use crate::packet::Packet;
use crate::protocol::traits::{RdtReceiver, RdtSender, ReceiverLink, SenderLink};
use crate::protocol::types::SenderState;

/// Alternating-bit sender: one packet in flight, retransmitted on timeout.
#[derive(Debug, Clone)]
pub struct StopAndWaitSender {
    current_sequence: u32,
    state: SenderState,
    outstanding: Option<String>,
    retransmit_timeout: f64,
}

impl StopAndWaitSender {
    pub fn new(retransmit_timeout: f64) -> Self {
        Self {
            current_sequence: 0,
            state: SenderState::Idle,
            outstanding: None,
            retransmit_timeout,
        }
    }

    pub fn state(&self) -> SenderState {
        self.state
    }

    pub fn current_sequence(&self) -> u32 {
        self.current_sequence
    }

    /// Last message handed to the channel, kept for retransmission.
    pub fn outstanding(&self) -> Option<&str> {
        self.outstanding.as_deref()
    }
}

impl RdtSender for StopAndWaitSender {
    fn submit(&mut self, message: &str, link: &mut dyn SenderLink) -> bool {
        if self.state == SenderState::AwaitingAck {
            return false;
        }

        let packet = Packet::sealed(self.current_sequence, message);
        tracing::debug!("[{:8.2}] RDT_SEND @ Sender: {}", link.now(), packet);

        self.outstanding = Some(message.to_string());
        self.state = SenderState::AwaitingAck;
        link.send(&packet);
        link.start_timer(self.retransmit_timeout);
        true
    }

    fn on_packet_arrived(&mut self, packet: Packet, link: &mut dyn SenderLink) {
        let expected_ack = self.state == SenderState::AwaitingAck
            && packet.is_ack()
            && packet.sequence_number == self.current_sequence
            && packet.verify();

        if !expected_ack {
            tracing::debug!("[{:8.2}] RDT_RECV @ Sender: ignoring {}", link.now(), packet);
            return;
        }

        self.current_sequence ^= 1;
        self.state = SenderState::Idle;
        link.stop_timer();
    }

    fn on_timer_expired(&mut self, link: &mut dyn SenderLink) {
        self.state = SenderState::Idle;
        if let Some(message) = self.outstanding.take() {
            self.submit(&message, link);
        }
    }

    fn awaiting_ack(&self) -> bool {
        self.state == SenderState::AwaitingAck
    }
}

/// Alternating-bit receiver: delivers each sequence number once and
/// re-acknowledges duplicates.
#[derive(Debug, Clone, Default)]
pub struct StopAndWaitReceiver {
    expected_sequence: u32,
    last_accepted: Option<u32>,
}

impl StopAndWaitReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_sequence(&self) -> u32 {
        self.expected_sequence
    }

    pub fn last_accepted(&self) -> Option<u32> {
        self.last_accepted
    }
}

impl RdtReceiver for StopAndWaitReceiver {
    fn on_packet_arrived(&mut self, packet: Packet, link: &mut dyn ReceiverLink) {
        if !packet.verify() {
            tracing::debug!("[{:8.2}] RDT_RECV @ Receiver: bad checksum {}", link.now(), packet);
            return;
        }

        if packet.sequence_number == self.expected_sequence {
            link.deliver(&packet.payload);
            self.last_accepted = Some(packet.sequence_number);
            self.expected_sequence ^= 1;
            link.send(&Packet::ack(packet.sequence_number));
        } else if Some(packet.sequence_number) == self.last_accepted {
            tracing::debug!(
                "[{:8.2}] RDT_RECV @ Receiver: duplicate seq {}, re-acknowledging",
                link.now(),
                packet.sequence_number
            );
            link.send(&Packet::ack(packet.sequence_number));
        } else {
            tracing::debug!("[{:8.2}] RDT_RECV @ Receiver: dropping {}", link.now(), packet);
        }
    }
}
