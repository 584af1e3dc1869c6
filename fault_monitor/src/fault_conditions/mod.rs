use crate::error::FaultError;

pub mod heating_coil_rise;

pub use heating_coil_rise::{HeatingCoilRise, HeatingCoilSignals};

pub(crate) fn check_non_negative(key: &str, value: f64) -> Result<(), FaultError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FaultError::InvalidConfig(format!(
            "{key} must be a finite, non-negative number (got {value})"
        )))
    }
}

pub(crate) fn check_fraction(key: &str, value: f64) -> Result<(), FaultError> {
    if utils::is_unit_fraction(value) {
        Ok(())
    } else {
        Err(FaultError::InvalidConfig(format!(
            "{key} must lie between 0.0 and 1.0 (got {value})"
        )))
    }
}

/// Fraction below full scale, used for "off" and "running" cut-offs.
pub(crate) fn check_cutoff(key: &str, value: f64) -> Result<(), FaultError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(FaultError::InvalidConfig(format!(
            "{key} must lie in [0.0, 1.0) (got {value})"
        )))
    }
}
