use super::traits::{check_unit_interval, ConfigSection};
use crate::error::{CodonSoupError, Result};
use crate::types::Thresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    pub max_passes: usize,
    /// START threshold moves by `-magnitude * start_shift` per regulator
    pub start_shift: f64,
    /// STOP threshold moves by `+magnitude * stop_shift` per regulator
    pub stop_shift: f64,
    pub min_start_threshold: f64,
    pub max_start_threshold: f64,
    pub min_stop_threshold: f64,
    pub max_stop_threshold: f64,
    pub base_thresholds: Thresholds,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            max_passes: 4,
            start_shift: 0.1,
            stop_shift: 0.05,
            min_start_threshold: 0.70,
            max_start_threshold: 0.99,
            min_stop_threshold: 0.01,
            max_stop_threshold: 0.30,
            base_thresholds: Thresholds::default(),
        }
    }
}

impl ConfigSection for ExpressionConfig {
    fn section_name() -> &'static str {
        "expression"
    }

    fn validate(&self) -> Result<()> {
        let section = Self::section_name();
        check_unit_interval(section, "base_thresholds.start", self.base_thresholds.start)?;
        check_unit_interval(section, "base_thresholds.stop", self.base_thresholds.stop)?;
        check_unit_interval(section, "min_start_threshold", self.min_start_threshold)?;
        check_unit_interval(section, "max_start_threshold", self.max_start_threshold)?;
        check_unit_interval(section, "min_stop_threshold", self.min_stop_threshold)?;
        check_unit_interval(section, "max_stop_threshold", self.max_stop_threshold)?;

        if self.max_passes == 0 {
            return Err(CodonSoupError::Configuration(
                "Expression needs at least one pass".to_string()
            ));
        }
        // START and STOP bands must never overlap or a codon could be both
        if self.max_stop_threshold >= self.min_start_threshold
            || self.base_thresholds.stop >= self.base_thresholds.start
        {
            return Err(CodonSoupError::Configuration(
                "STOP thresholds must stay below START thresholds".to_string()
            ));
        }
        if self.min_start_threshold > self.max_start_threshold
            || self.min_stop_threshold > self.max_stop_threshold
        {
            return Err(CodonSoupError::Configuration(
                "Threshold bounds are inverted".to_string()
            ));
        }
        Ok(())
    }
}
