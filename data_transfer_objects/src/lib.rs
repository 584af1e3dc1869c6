use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical AHU signals a fault condition can bind to a frame column.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum Signal {
    HeatingCoilEnterTemp,
    HeatingCoilLeaveTemp,
    CoolingCommand,
    HeatingCommand,
    EconomizerCommand,
    SupplyFanSpeed,
    OutdoorAirTemp,
    MixedAirTemp,
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Numeric domain a column is validated against.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum DomainKind {
    /// Float in [0.0, 1.0].
    UnitFraction,
    Temperature,
    /// Actuator or VFD command, validated like `UnitFraction`.
    Command,
}

impl DomainKind {
    pub fn is_fraction(&self) -> bool {
        matches!(self, DomainKind::UnitFraction | DomainKind::Command)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ColumnSpec {
    pub signal: Signal,
    pub column: String,
    pub kind: DomainKind,
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum OperatingMode {
    /// OS2: free cooling through the economizer, no mechanical cooling.
    EconomizerOnly,
    /// OS3: mechanical cooling with the outdoor-air damper fully open.
    MechanicalCoolingAssisted,
    /// OS4: mechanical cooling with the damper held at minimum outdoor air.
    MechanicalCoolingMinOutdoorAir,
    NotApplicable,
}

impl OperatingMode {
    pub fn tag(&self) -> &'static str {
        match self {
            OperatingMode::EconomizerOnly => "economizer_only",
            OperatingMode::MechanicalCoolingAssisted => "mechanical_cooling_assisted",
            OperatingMode::MechanicalCoolingMinOutdoorAir => "mechanical_cooling_min_oa",
            OperatingMode::NotApplicable => "not_applicable",
        }
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, OperatingMode::NotApplicable)
    }
}

impl FromStr for OperatingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economizer_only" => Ok(OperatingMode::EconomizerOnly),
            "mechanical_cooling_assisted" => Ok(OperatingMode::MechanicalCoolingAssisted),
            "mechanical_cooling_min_oa" => Ok(OperatingMode::MechanicalCoolingMinOutdoorAir),
            "not_applicable" => Ok(OperatingMode::NotApplicable),
            _ => Err(()),
        }
    }
}

impl Display for OperatingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Physical column names for every signal the AHU fault catalog knows about.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ColumnBindings {
    pub htg_coil_enter_temp: String,
    pub htg_coil_leave_temp: String,
    pub cooling_sig: String,
    pub heating_sig: String,
    pub economizer_sig: String,
    pub supply_vfd_speed: String,
    pub outdoor_air_temp: String,
    pub mix_air_temp: String,
}

impl ColumnBindings {
    pub fn column_for(&self, signal: Signal) -> &str {
        match signal {
            Signal::HeatingCoilEnterTemp => &self.htg_coil_enter_temp,
            Signal::HeatingCoilLeaveTemp => &self.htg_coil_leave_temp,
            Signal::CoolingCommand => &self.cooling_sig,
            Signal::HeatingCommand => &self.heating_sig,
            Signal::EconomizerCommand => &self.economizer_sig,
            Signal::SupplyFanSpeed => &self.supply_vfd_speed,
            Signal::OutdoorAirTemp => &self.outdoor_air_temp,
            Signal::MixedAirTemp => &self.mix_air_temp,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct FaultConditionConfig {
    pub delta_supply_fan: f64,
    pub coil_temp_enter_err_thres: f64,
    pub coil_temp_leave_err_thres: f64,
    pub supply_degf_err_thres: f64,
    pub mix_degf_err_thres: f64,
    pub outdoor_degf_err_thres: f64,
    pub ahu_min_oa_dpr: f64,
    pub rolling_window_size: usize,
    #[serde(default)]
    pub troubleshoot_mode: bool,
    #[serde(default = "default_economizer_full_open")]
    pub economizer_full_open: f64,
    #[serde(default = "default_command_threshold")]
    pub command_off_epsilon: f64,
    #[serde(default = "default_command_threshold")]
    pub supply_fan_min_speed: f64,
    #[serde(default = "default_command_threshold")]
    pub min_oa_margin: f64,
    pub columns: ColumnBindings,
}

fn default_economizer_full_open() -> f64 {
    0.9
}

fn default_command_threshold() -> f64 {
    0.01
}
