use super::traits::{check_unit_interval, ConfigSection};
use crate::error::{CodonSoupError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    pub point_rate: f64,       // per codon
    pub insertion_rate: f64,   // per codon position
    pub deletion_rate: f64,    // per codon
    pub duplication_rate: f64, // per reproduction event
    pub min_duplication_len: usize,
    pub max_duplication_len: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            point_rate: 0.02,
            insertion_rate: 0.005,
            deletion_rate: 0.003,
            duplication_rate: 0.01,
            min_duplication_len: 5,
            max_duplication_len: 15,
        }
    }
}

impl MutationConfig {
    /// Only point mutations at the given rate
    pub fn point_only(rate: f64) -> Self {
        Self {
            point_rate: rate,
            insertion_rate: 0.0,
            deletion_rate: 0.0,
            duplication_rate: 0.0,
            ..Self::default()
        }
    }
}

impl ConfigSection for MutationConfig {
    fn section_name() -> &'static str {
        "mutation"
    }

    fn validate(&self) -> Result<()> {
        let section = Self::section_name();
        check_unit_interval(section, "point_rate", self.point_rate)?;
        check_unit_interval(section, "insertion_rate", self.insertion_rate)?;
        check_unit_interval(section, "deletion_rate", self.deletion_rate)?;
        check_unit_interval(section, "duplication_rate", self.duplication_rate)?;

        if self.min_duplication_len == 0 || self.min_duplication_len > self.max_duplication_len {
            return Err(CodonSoupError::Configuration(format!(
                "Duplication length range {}..={} is empty",
                self.min_duplication_len, self.max_duplication_len
            )));
        }
        Ok(())
    }
}
