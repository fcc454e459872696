//! Metrics and observability module
//!
//! Counters for everything the driver observes, recorded through the
//! `metrics` facade. Nothing is collected unless a recorder is installed;
//! the CLI installs the Prometheus one with `--metrics` and prints the text
//! exposition after the run.
//!
//! Key metrics exposed:
//! - Packets handed to the channel, lost and corrupted
//! - Messages submitted and delivered end-to-end
//! - Timeouts, sender-busy rejections and timer usage errors
//! - Simulated clock and wall-clock run duration

pub mod exporter;
pub mod recorder;

pub use exporter::{install_prometheus, render_metrics, MetricsError, MetricsResult};
pub use recorder::{
    init_metrics, record_message_delivered, record_message_submitted, record_packet_corrupted,
    record_packet_lost, record_packet_sent, record_sender_busy, record_timeout,
    record_timer_misuse, set_simulated_time, RunMetrics,
};
