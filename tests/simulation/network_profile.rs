//! Predefined channel profiles for testing

#![allow(dead_code)]

use rdt_sim::simulator::SimulationConfig;

/// Named impairment profile
#[derive(Debug, Clone)]
pub struct NetworkProfile {
    pub name: &'static str,
    pub loss_probability: f64,
    pub corruption_probability: f64,
}

impl NetworkProfile {
    pub fn all_profiles() -> Vec<NetworkProfile> {
        vec![
            Self::perfect(),
            Self::lossy(),
            Self::noisy(),
            Self::degraded(),
            Self::hostile(),
        ]
    }

    pub fn perfect() -> Self {
        Self {
            name: "perfect",
            loss_probability: 0.0,
            corruption_probability: 0.0,
        }
    }

    /// One packet in ten dropped
    pub fn lossy() -> Self {
        Self {
            name: "lossy",
            loss_probability: 0.1,
            corruption_probability: 0.0,
        }
    }

    /// One packet in five corrupted
    pub fn noisy() -> Self {
        Self {
            name: "noisy",
            loss_probability: 0.0,
            corruption_probability: 0.2,
        }
    }

    pub fn degraded() -> Self {
        Self {
            name: "degraded",
            loss_probability: 0.2,
            corruption_probability: 0.2,
        }
    }

    pub fn hostile() -> Self {
        Self {
            name: "hostile",
            loss_probability: 0.4,
            corruption_probability: 0.3,
        }
    }

    /// Apply this profile's impairments on top of `config`
    pub fn apply(&self, config: SimulationConfig) -> SimulationConfig {
        config
            .with_loss_probability(self.loss_probability)
            .with_corruption_probability(self.corruption_probability)
    }
}
