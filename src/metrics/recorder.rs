//! Metrics recorder for simulation runs

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    // Channel
    describe_counter!(
        "rdt_packets_sent_total",
        "Packets handed to the channel, by originating entity"
    );
    describe_counter!(
        "rdt_packets_lost_total",
        "Packets dropped by the channel"
    );
    describe_counter!(
        "rdt_packets_corrupted_total",
        "Packets corrupted in transit, by corruption mode"
    );

    // Application layer
    describe_counter!(
        "rdt_messages_submitted_total",
        "Messages accepted by the sending entity"
    );
    describe_counter!(
        "rdt_messages_delivered_total",
        "Messages delivered to the receiving application"
    );

    // Protocol behaviour
    describe_counter!("rdt_timeouts_total", "Retransmission timer expiries");
    describe_counter!(
        "rdt_sender_busy_total",
        "Submissions refused while a packet was outstanding"
    );
    describe_counter!(
        "rdt_timer_misuse_total",
        "Timer started twice or stopped while idle"
    );

    describe_gauge!("rdt_simulated_time", "Current simulated clock");
    describe_counter!("rdt_runs_completed_total", "Simulation runs finished");
    describe_histogram!(
        "rdt_run_duration_seconds",
        "Wall-clock duration of a simulation run"
    );
}

// ============== Channel ==============

pub fn record_packet_sent(from: &str) {
    counter!("rdt_packets_sent_total", "from" => from.to_string()).increment(1);
}

pub fn record_packet_lost() {
    counter!("rdt_packets_lost_total").increment(1);
}

pub fn record_packet_corrupted(mode: &str) {
    counter!("rdt_packets_corrupted_total", "mode" => mode.to_string()).increment(1);
}

// ============== Application ==============

pub fn record_message_submitted() {
    counter!("rdt_messages_submitted_total").increment(1);
}

pub fn record_message_delivered() {
    counter!("rdt_messages_delivered_total").increment(1);
}

// ============== Protocol ==============

pub fn record_timeout() {
    counter!("rdt_timeouts_total").increment(1);
}

pub fn record_sender_busy() {
    counter!("rdt_sender_busy_total").increment(1);
}

pub fn record_timer_misuse(count: u64) {
    if count > 0 {
        counter!("rdt_timer_misuse_total").increment(count);
    }
}

/// Update the simulated clock gauge
pub fn set_simulated_time(time: f64) {
    gauge!("rdt_simulated_time").set(time);
}

/// Wall-clock timing for one run, labelled with the protocol in use
pub struct RunMetrics {
    protocol: String,
    start_time: Instant,
}

impl RunMetrics {
    pub fn start(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            start_time: Instant::now(),
        }
    }

    /// Mark the run as finished and record its duration
    pub fn complete(self) {
        counter!("rdt_runs_completed_total", "protocol" => self.protocol.clone()).increment(1);
        histogram!("rdt_run_duration_seconds", "protocol" => self.protocol)
            .record(self.start_time.elapsed().as_secs_f64());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
