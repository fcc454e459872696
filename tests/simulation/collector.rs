//! Aggregates statistics over repeated seeded runs

#![allow(dead_code)]

use rdt_sim::simulator::{SimulationConfig, SimulationStats, Simulator};

/// Totals over a batch of runs
#[derive(Debug, Clone, Default)]
pub struct TrialSummary {
    pub runs: usize,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub packets_sent: u64,
    pub packets_lost: u64,
    pub packets_corrupted: u64,
    pub timeouts: u64,
    /// Runs whose delivered string was not an in-order prefix of the sent one
    pub out_of_order_runs: usize,
}

impl TrialSummary {
    pub fn delivery_ratio(&self) -> f64 {
        if self.messages_sent == 0 {
            return 1.0;
        }
        self.messages_received as f64 / self.messages_sent as f64
    }

    pub fn loss_ratio(&self) -> f64 {
        if self.packets_sent == 0 {
            return 0.0;
        }
        self.packets_lost as f64 / self.packets_sent as f64
    }
}

/// Runs one configuration under a range of seeds
pub struct TrialCollector {
    config: SimulationConfig,
    results: Vec<SimulationStats>,
}

impl TrialCollector {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            results: Vec::new(),
        }
    }

    /// Run `trials` times with seeds `first_seed..first_seed + trials`
    pub fn run(mut self, first_seed: u64, trials: u64) -> Self {
        for seed in first_seed..first_seed + trials {
            let config = self.config.clone().with_seed(seed);
            let stats = Simulator::new(config)
                .expect("valid config")
                .run()
                .expect("run completes");
            self.results.push(stats);
        }
        self
    }

    pub fn results(&self) -> &[SimulationStats] {
        &self.results
    }

    pub fn summary(&self) -> TrialSummary {
        let mut summary = TrialSummary {
            runs: self.results.len(),
            ..Default::default()
        };
        for stats in &self.results {
            summary.messages_sent += stats.messages_sent;
            summary.messages_received += stats.messages_received;
            summary.packets_sent += stats.packets_sent;
            summary.packets_lost += stats.packets_lost;
            summary.packets_corrupted += stats.packets_corrupted;
            summary.timeouts += stats.timeouts;
            if !stats.delivered_in_order() {
                summary.out_of_order_runs += 1;
            }
        }
        summary
    }
}
