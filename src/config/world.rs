use super::traits::{check_positive, check_unit_interval, ConfigSection};
use crate::error::{CodonSoupError, Result};
use serde::{Deserialize, Serialize};

/// Environment and metabolism parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub size: usize,
    pub light_top: f64,
    pub light_bottom: f64,
    pub flicker_probability: f64,
    pub flicker_amplitude: f64,
    pub nutrient_floor: f64,
    pub nutrient_regen: f64,
    pub blur_passes: usize,

    pub initial_energy: f64,
    pub reproduction_threshold: f64,
    pub basal_cost: f64,
    pub movement_cost: f64, // per unit of speed
    pub gain_scale: f64,
    /// Fraction of harvested energy removed from the local nutrient cell
    pub harvest_depletion: f64,
    pub reproduction_depletion: f64,
    pub sense_distance: f64,
    pub offspring_spread: f64,
    pub max_population: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 120,
            light_top: 1.0,
            light_bottom: 0.1,
            flicker_probability: 0.05,
            flicker_amplitude: 0.02,
            nutrient_floor: 0.5,
            nutrient_regen: 0.002,
            blur_passes: 5,
            initial_energy: 15.0,
            reproduction_threshold: 25.0,
            basal_cost: 0.02,
            movement_cost: 0.05,
            gain_scale: 0.5,
            harvest_depletion: 0.1,
            reproduction_depletion: 0.15,
            sense_distance: 3.0,
            offspring_spread: 5.0,
            max_population: 1000,
        }
    }
}

impl ConfigSection for WorldConfig {
    fn section_name() -> &'static str {
        "world"
    }

    fn validate(&self) -> Result<()> {
        let section = Self::section_name();
        if self.size < 2 {
            return Err(CodonSoupError::Configuration(
                "World size must be at least 2".to_string()
            ));
        }
        if self.max_population == 0 {
            return Err(CodonSoupError::Configuration(
                "max_population must be at least 1".to_string()
            ));
        }
        check_unit_interval(section, "light_top", self.light_top)?;
        check_unit_interval(section, "light_bottom", self.light_bottom)?;
        check_unit_interval(section, "flicker_probability", self.flicker_probability)?;
        check_unit_interval(section, "nutrient_floor", self.nutrient_floor)?;
        check_unit_interval(section, "harvest_depletion", self.harvest_depletion)?;
        check_positive(section, "initial_energy", self.initial_energy)?;
        check_positive(section, "reproduction_threshold", self.reproduction_threshold)?;

        for (name, value) in [
            ("basal_cost", self.basal_cost),
            ("movement_cost", self.movement_cost),
            ("gain_scale", self.gain_scale),
            ("nutrient_regen", self.nutrient_regen),
            ("flicker_amplitude", self.flicker_amplitude),
            ("reproduction_depletion", self.reproduction_depletion),
            ("sense_distance", self.sense_distance),
            ("offspring_spread", self.offspring_spread),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CodonSoupError::Configuration(format!(
                    "{}.{} must be non-negative, got {}",
                    section, name, value
                )));
            }
        }
        Ok(())
    }
}
