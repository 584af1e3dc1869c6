use data_transfer_objects::{FaultConditionConfig, OperatingMode};

/// Damper and cooling-command limits that separate the AHU operating states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeThresholds {
    pub economizer_full_open: f64,
    pub command_off_epsilon: f64,
    pub ahu_min_oa_dpr: f64,
    pub min_oa_margin: f64,
}

impl From<&FaultConditionConfig> for ModeThresholds {
    fn from(config: &FaultConditionConfig) -> Self {
        ModeThresholds {
            economizer_full_open: config.economizer_full_open,
            command_off_epsilon: config.command_off_epsilon,
            ahu_min_oa_dpr: config.ahu_min_oa_dpr,
            min_oa_margin: config.min_oa_margin,
        }
    }
}

pub fn classify_sample(cooling: f64, economizer: f64, thresholds: &ModeThresholds) -> OperatingMode {
    let cooling_on = cooling > thresholds.command_off_epsilon;
    let cooling_off = cooling <= thresholds.command_off_epsilon;
    if cooling_on && economizer >= thresholds.economizer_full_open {
        OperatingMode::MechanicalCoolingAssisted
    } else if cooling_on
        && utils::near(economizer, thresholds.ahu_min_oa_dpr, thresholds.min_oa_margin)
    {
        OperatingMode::MechanicalCoolingMinOutdoorAir
    } else if cooling_off && economizer < thresholds.economizer_full_open {
        OperatingMode::EconomizerOnly
    } else {
        OperatingMode::NotApplicable
    }
}

pub fn classify(cooling: &[f64], economizer: &[f64], thresholds: &ModeThresholds) -> Vec<OperatingMode> {
    cooling
        .iter()
        .zip(economizer)
        .map(|(&cooling, &economizer)| classify_sample(cooling, economizer, thresholds))
        .collect()
}
