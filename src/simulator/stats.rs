use serde::{Deserialize, Serialize};

/// Counters collected by the driver over one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Messages accepted by the sending entity.
    pub messages_sent: u64,
    /// Messages handed up to the receiving application.
    pub messages_received: u64,
    /// Packets handed to the channel, retransmissions and ACKs included.
    pub packets_sent: u64,
    pub packets_lost: u64,
    pub packets_corrupted: u64,
    pub timeouts: u64,
    /// Submissions refused because the sender was busy.
    pub busy_rejections: u64,
    /// Timer usage errors absorbed during the run.
    pub timer_misuse: u64,
    /// Simulated time of the last dispatched event.
    pub final_time: f64,
    /// Concatenation of every accepted message, in submission order.
    pub sent: String,
    /// Concatenation of every delivered message, in delivery order.
    pub received: String,
}

impl SimulationStats {
    /// True when what arrived is an in-order, duplicate-free prefix of
    /// what was sent.
    pub fn delivered_in_order(&self) -> bool {
        self.sent.starts_with(&self.received)
    }

    pub fn delivery_ratio(&self) -> f64 {
        if self.messages_sent == 0 {
            return 1.0;
        }
        self.messages_received as f64 / self.messages_sent as f64
    }

    /// End-of-run report, one line per entry.
    pub fn summary_lines(&self, message_count: u32) -> Vec<String> {
        vec![
            format!(
                "Simulator terminated at time {:.3} after sending {}/{} msgs from layer 5.",
                self.final_time, self.messages_sent, message_count
            ),
            format!(
                "STATS: {} packets sent, {} lost, {} corrupted, {} timeouts.",
                self.packets_sent, self.packets_lost, self.packets_corrupted, self.timeouts
            ),
            format!("Sent    : {}", self.sent),
            format!("Received: {}", self.received),
        ]
    }

    pub fn summary(&self, message_count: u32) -> String {
        self.summary_lines(message_count).join("\n")
    }
}
