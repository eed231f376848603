use super::traits::ConfigSection;
use crate::error::{CodonSoupError, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the per-client generation loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub ticks_per_generation: usize,
    pub generations: usize,
    /// Fixed seed for reproducible runs; generation `g` uses `seed + g`
    pub seed: Option<u64>,
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
    /// Failed submissions kept for retry at later generation boundaries
    pub max_pending_submissions: usize,
    /// Ticks between progress reports inside a generation (0 disables)
    pub progress_interval: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            ticks_per_generation: 300,
            generations: 1000,
            seed: None,
            min_delay_secs: 0,
            max_delay_secs: 0,
            max_pending_submissions: 8,
            progress_interval: 100,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(CodonSoupError::Configuration(
                "Population size must be at least 1".to_string()
            ));
        }
        if self.ticks_per_generation == 0 {
            return Err(CodonSoupError::Configuration(
                "Ticks per generation must be at least 1".to_string()
            ));
        }
        if self.min_delay_secs > self.max_delay_secs {
            return Err(CodonSoupError::Configuration(format!(
                "min_delay_secs ({}) exceeds max_delay_secs ({})",
                self.min_delay_secs, self.max_delay_secs
            )));
        }
        Ok(())
    }
}
