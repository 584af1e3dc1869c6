//! Fault condition 15: temperature rise across an inactive heating coil while
//! the AHU is economizing (OS2) or mechanically cooling at full (OS3) or
//! minimum (OS4) outdoor air.

use std::num::NonZeroUsize;

use data_transfer_objects::{DomainKind, FaultConditionConfig, OperatingMode, Signal};
use polars::prelude::{NamedFrom, Series};

use crate::column_registry::ColumnSpecRegistry;
use crate::engine::FaultCondition;
use crate::error::FaultError;
use crate::fault_conditions::{check_cutoff, check_fraction, check_non_negative};
use crate::input_validator::ValidatedFrame;
use crate::operating_state::{self, ModeThresholds};
use crate::rules_engine::{self, CoilRiseThresholds};

#[derive(Debug, Clone)]
pub struct HeatingCoilRise {
    config: FaultConditionConfig,
    registry: ColumnSpecRegistry,
    window_size: NonZeroUsize,
    mode_thresholds: ModeThresholds,
    rise_thresholds: CoilRiseThresholds,
}

#[derive(Debug)]
pub struct HeatingCoilSignals {
    pub enter_temp: Vec<f64>,
    pub leave_temp: Vec<f64>,
    pub heating: Vec<f64>,
    pub cooling: Vec<f64>,
    pub economizer: Vec<f64>,
    pub supply_fan: Vec<f64>,
}

impl HeatingCoilRise {
    pub const NAME: &'static str = "fc15";

    pub fn new(config: FaultConditionConfig) -> Result<HeatingCoilRise, FaultError> {
        for (key, value) in [
            ("delta_supply_fan", config.delta_supply_fan),
            ("coil_temp_enter_err_thres", config.coil_temp_enter_err_thres),
            ("coil_temp_leave_err_thres", config.coil_temp_leave_err_thres),
            ("supply_degf_err_thres", config.supply_degf_err_thres),
            ("mix_degf_err_thres", config.mix_degf_err_thres),
            ("outdoor_degf_err_thres", config.outdoor_degf_err_thres),
            ("min_oa_margin", config.min_oa_margin),
        ] {
            check_non_negative(key, value)?;
        }
        check_fraction("ahu_min_oa_dpr", config.ahu_min_oa_dpr)?;
        check_fraction("economizer_full_open", config.economizer_full_open)?;
        check_cutoff("command_off_epsilon", config.command_off_epsilon)?;
        check_cutoff("supply_fan_min_speed", config.supply_fan_min_speed)?;
        let window_size = NonZeroUsize::new(config.rolling_window_size).ok_or_else(|| {
            FaultError::InvalidConfig("rolling_window_size must be at least 1".to_string())
        })?;

        let bindings = &config.columns;
        let registry = ColumnSpecRegistry::new()
            .with(bindings, Signal::HeatingCoilEnterTemp, DomainKind::Temperature)
            .with(bindings, Signal::HeatingCoilLeaveTemp, DomainKind::Temperature)
            .with(bindings, Signal::CoolingCommand, DomainKind::Command)
            .with(bindings, Signal::HeatingCommand, DomainKind::Command)
            .with(bindings, Signal::EconomizerCommand, DomainKind::Command)
            .with(bindings, Signal::SupplyFanSpeed, DomainKind::Command);

        Ok(HeatingCoilRise {
            mode_thresholds: ModeThresholds::from(&config),
            rise_thresholds: CoilRiseThresholds::from(&config),
            registry,
            window_size,
            config,
        })
    }

    pub fn combined_tolerance(&self) -> f64 {
        self.rise_thresholds.combined_tolerance
    }

    pub fn delta_temp_column(&self) -> String {
        format!("{}_htg_delta_temp", Self::NAME)
    }

    pub fn tolerance_column(&self) -> String {
        format!("{}_combined_tolerance", Self::NAME)
    }
}

impl FaultCondition for HeatingCoilRise {
    type Signals = HeatingCoilSignals;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn registry(&self) -> &ColumnSpecRegistry {
        &self.registry
    }

    fn window_size(&self) -> NonZeroUsize {
        self.window_size
    }

    fn troubleshoot_mode(&self) -> bool {
        self.config.troubleshoot_mode
    }

    fn signals(&self, mut frame: ValidatedFrame) -> Result<HeatingCoilSignals, FaultError> {
        Ok(HeatingCoilSignals {
            enter_temp: frame.take(Signal::HeatingCoilEnterTemp)?,
            leave_temp: frame.take(Signal::HeatingCoilLeaveTemp)?,
            heating: frame.take(Signal::HeatingCommand)?,
            cooling: frame.take(Signal::CoolingCommand)?,
            economizer: frame.take(Signal::EconomizerCommand)?,
            supply_fan: frame.take(Signal::SupplyFanSpeed)?,
        })
    }

    fn classify(&self, signals: &HeatingCoilSignals) -> Vec<OperatingMode> {
        operating_state::classify(&signals.cooling, &signals.economizer, &self.mode_thresholds)
    }

    fn evaluate(&self, signals: &HeatingCoilSignals, modes: &[OperatingMode]) -> Vec<bool> {
        rules_engine::evaluate_gated(modes, |index| {
            rules_engine::heating_coil_rise_violated(
                signals.enter_temp[index],
                signals.leave_temp[index],
                signals.heating[index],
                signals.supply_fan[index],
                &self.rise_thresholds,
            )
        })
    }

    fn diagnostics(&self, signals: &HeatingCoilSignals) -> Vec<Series> {
        let delta_temp: Vec<f64> = signals
            .leave_temp
            .iter()
            .zip(&signals.enter_temp)
            .map(|(leave, enter)| leave - enter)
            .collect();
        let tolerance = vec![self.combined_tolerance(); delta_temp.len()];
        vec![
            Series::new(&self.delta_temp_column(), delta_temp),
            Series::new(&self.tolerance_column(), tolerance),
        ]
    }
}
