use data_transfer_objects::{FaultConditionConfig, OperatingMode};

/**
Heating coil temperature rise (FC15): with the heating coil commanded off and the supply fan
    moving air, the leaving-air temperature must not exceed the entering-air temperature by the
    combined tolerance or more. The combined tolerance is the root-sum-square of the entering and
    leaving sensor errors plus the heat the supply fan adds to the airstream.
 **/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilRiseThresholds {
    pub combined_tolerance: f64,
    pub command_off_epsilon: f64,
    pub supply_fan_min_speed: f64,
}

impl From<&FaultConditionConfig> for CoilRiseThresholds {
    fn from(config: &FaultConditionConfig) -> Self {
        CoilRiseThresholds {
            combined_tolerance: combined_tolerance(
                config.coil_temp_enter_err_thres,
                config.coil_temp_leave_err_thres,
                config.delta_supply_fan,
            ),
            command_off_epsilon: config.command_off_epsilon,
            supply_fan_min_speed: config.supply_fan_min_speed,
        }
    }
}

pub fn combined_tolerance(enter_err_thres: f64, leave_err_thres: f64, delta_supply_fan: f64) -> f64 {
    utils::root_sum_square(enter_err_thres, leave_err_thres) + delta_supply_fan
}

pub fn heating_coil_rise_violated(
    enter_temp: f64,
    leave_temp: f64,
    heating: f64,
    supply_fan: f64,
    thresholds: &CoilRiseThresholds,
) -> bool {
    heating <= thresholds.command_off_epsilon
        && supply_fan > thresholds.supply_fan_min_speed
        && leave_temp - enter_temp > thresholds.combined_tolerance
}

/// Runs `rule` for every sample whose operating mode is recognised. Samples
/// tagged `NotApplicable` are never violations.
pub fn evaluate_gated<F>(modes: &[OperatingMode], rule: F) -> Vec<bool>
where
    F: Fn(usize) -> bool,
{
    modes
        .iter()
        .enumerate()
        .map(|(index, mode)| mode.is_applicable() && rule(index))
        .collect()
}
