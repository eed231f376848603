use crate::error::{CodonSoupError, Result};
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<()>;
}

/// Shared check for probability-like fields
pub(crate) fn check_unit_interval(section: &str, name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CodonSoupError::Configuration(format!(
            "{}.{} must be between 0 and 1, got {}",
            section, name, value
        )));
    }
    Ok(())
}

pub(crate) fn check_positive(section: &str, name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(CodonSoupError::Configuration(format!(
            "{}.{} must be positive, got {}",
            section, name, value
        )));
    }
    Ok(())
}
