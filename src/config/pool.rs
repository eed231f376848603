use super::traits::ConfigSection;
use crate::error::{CodonSoupError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub capacity: usize,
    pub selection_policy: SelectionPolicy,
    /// Top-N genomes analysed by gene statistics
    pub gene_stats_sample: usize,
}

/// How an immigrant is drawn from the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Highest fitness, uniform random among ties
    TopFitness,
    /// Roulette wheel over non-negative fitness
    FitnessWeighted,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            selection_policy: SelectionPolicy::TopFitness,
            gene_stats_sample: 500,
        }
    }
}

impl ConfigSection for PoolConfig {
    fn section_name() -> &'static str {
        "pool"
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CodonSoupError::Configuration(
                "Pool capacity must be at least 1".to_string()
            ));
        }
        Ok(())
    }
}
