//! Temperature rise across an inactive heating coil in OS2, OS3 and OS4.

use std::sync::Arc;

use data_transfer_objects::{ColumnBindings, FaultConditionConfig, OperatingMode};
use fault_monitor::{FaultConditionEngine, FaultError, HeatingCoilRise, TypeMismatch};
use polars::prelude::*;

const HTG_COIL_ENTER_TEMP_COL: &str = "htg_enter_air_temp";
const HTG_COIL_LEAVE_TEMP_COL: &str = "htg_leave_air_temp";
const CLG_COIL_CMD_COL: &str = "cooling_sig_col";
const HTG_COIL_CMD_COL: &str = "heating_sig_col";
const MIX_AIR_DAMPER_COL: &str = "economizer_sig_col";
const SUPPLY_VFD_SPEED_COL: &str = "supply_vfd_speed";
const FLAG_COL: &str = "fc15_flag";

fn config() -> FaultConditionConfig {
    FaultConditionConfig {
        delta_supply_fan: 2.0,
        coil_temp_enter_err_thres: 1.0,
        coil_temp_leave_err_thres: 1.0,
        supply_degf_err_thres: 2.0,
        mix_degf_err_thres: 2.0,
        outdoor_degf_err_thres: 5.0,
        ahu_min_oa_dpr: 0.2,
        rolling_window_size: 5,
        troubleshoot_mode: false,
        economizer_full_open: 0.9,
        command_off_epsilon: 0.01,
        supply_fan_min_speed: 0.01,
        min_oa_margin: 0.01,
        columns: ColumnBindings {
            htg_coil_enter_temp: HTG_COIL_ENTER_TEMP_COL.to_string(),
            htg_coil_leave_temp: HTG_COIL_LEAVE_TEMP_COL.to_string(),
            cooling_sig: CLG_COIL_CMD_COL.to_string(),
            heating_sig: HTG_COIL_CMD_COL.to_string(),
            economizer_sig: MIX_AIR_DAMPER_COL.to_string(),
            supply_vfd_speed: SUPPLY_VFD_SPEED_COL.to_string(),
            outdoor_air_temp: "out_air_temp".to_string(),
            mix_air_temp: "mix_air_temp".to_string(),
        },
    }
}

fn engine() -> FaultConditionEngine<HeatingCoilRise> {
    FaultConditionEngine::new(HeatingCoilRise::new(config()).unwrap())
}

fn troubleshooting_engine() -> FaultConditionEngine<HeatingCoilRise> {
    let mut config = config();
    config.troubleshoot_mode = true;
    FaultConditionEngine::new(HeatingCoilRise::new(config).unwrap())
}

fn frame(enter: &[f64], leave: &[f64], heating: f64, cooling: f64, damper: f64) -> DataFrame {
    let rows = enter.len();
    df!(
        HTG_COIL_ENTER_TEMP_COL => enter,
        HTG_COIL_LEAVE_TEMP_COL => leave,
        HTG_COIL_CMD_COL => vec![heating; rows],
        CLG_COIL_CMD_COL => vec![cooling; rows],
        MIX_AIR_DAMPER_COL => vec![damper; rows],
        SUPPLY_VFD_SPEED_COL => vec![0.55; rows]
    )
    .unwrap()
}

fn flags(result: &DataFrame) -> Vec<i32> {
    result
        .column(FLAG_COL)
        .unwrap()
        .i32()
        .unwrap()
        .into_iter()
        .map(|flag| flag.unwrap())
        .collect()
}

fn flag_sum(result: &DataFrame) -> i32 {
    flags(result).iter().sum()
}

fn no_fault_df_econ() -> DataFrame {
    frame(&[55.0; 6], &[56.5; 6], 0.0, 0.0, 0.55)
}

fn no_fault_df_os3() -> DataFrame {
    frame(&[55.0; 6], &[56.5; 6], 0.0, 0.55, 0.99)
}

fn fault_df_in_econ() -> DataFrame {
    frame(&[136.5; 6], &[140.0; 6], 0.0, 0.0, 0.55)
}

fn fault_df_in_os3() -> DataFrame {
    frame(&[136.5; 6], &[140.0; 6], 0.0, 0.55, 0.99)
}

fn malformed_damper_df(damper: Series) -> DataFrame {
    let mut frame = df!(
        HTG_COIL_ENTER_TEMP_COL => &[50.5; 6],
        HTG_COIL_LEAVE_TEMP_COL => &[55; 6],
        HTG_COIL_CMD_COL => &[0.0; 6],
        CLG_COIL_CMD_COL => &[0.55; 6],
        SUPPLY_VFD_SPEED_COL => &[0.55; 6]
    )
    .unwrap();
    frame.with_column(damper).unwrap();
    frame
}

#[test]
fn it_shall_not_flag_a_small_rise_in_economizer_mode() {
    let result = engine().apply(&no_fault_df_econ()).unwrap();
    assert_eq!(flag_sum(&result), 0);
}

#[test]
fn it_shall_not_flag_a_small_rise_in_os3() {
    let result = engine().apply(&no_fault_df_os3()).unwrap();
    assert_eq!(flag_sum(&result), 0);
}

#[test]
fn it_shall_flag_a_sustained_rise_in_economizer_mode() {
    let result = engine().apply(&fault_df_in_econ()).unwrap();
    assert_eq!(flags(&result), vec![0, 0, 0, 0, 1, 1]);
}

#[test]
fn it_shall_flag_a_sustained_rise_in_os3() {
    let result = engine().apply(&fault_df_in_os3()).unwrap();
    assert_eq!(flag_sum(&result), 2);
}

#[test]
fn it_shall_flag_a_sustained_rise_at_minimum_outdoor_air() {
    let result = engine()
        .apply(&frame(&[136.5; 6], &[140.0; 6], 0.0, 0.55, 0.2))
        .unwrap();
    assert_eq!(flag_sum(&result), 2);
}

#[test]
fn it_shall_not_flag_samples_outside_known_modes() {
    let result = engine()
        .apply(&frame(&[136.5; 6], &[140.0; 6], 0.0, 0.55, 0.55))
        .unwrap();
    assert_eq!(flag_sum(&result), 0);
}

#[test]
fn it_shall_not_flag_while_the_heating_coil_is_on() {
    let result = engine()
        .apply(&frame(&[136.5; 6], &[140.0; 6], 0.6, 0.0, 0.55))
        .unwrap();
    assert_eq!(flag_sum(&result), 0);
}

#[test]
fn it_shall_not_flag_without_airflow() {
    let mut frame = fault_df_in_econ();
    frame
        .with_column(Series::new(SUPPLY_VFD_SPEED_COL, &[0.0; 6]))
        .unwrap();
    assert_eq!(flag_sum(&engine().apply(&frame).unwrap()), 0);
}

#[test]
fn it_shall_restart_the_window_after_a_clean_sample() {
    let enter = [136.5; 12];
    let mut leave = [140.0; 12];
    leave[6] = 137.0;
    let result = engine().apply(&frame(&enter, &leave, 0.0, 0.0, 0.55)).unwrap();
    assert_eq!(flags(&result), vec![0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn it_shall_keep_the_input_columns_untouched() {
    let input = fault_df_in_econ();
    let result = engine().apply(&input).unwrap();
    assert_eq!(result.width(), input.width() + 1);
    for column in input.get_columns() {
        assert!(result.column(column.name()).unwrap().series_equal(column));
    }
}

#[test]
fn it_shall_ignore_unrelated_columns() {
    let mut input = fault_df_in_os3();
    input
        .with_column(Series::new("out_air_temp", &["n/a"; 6]))
        .unwrap();
    assert_eq!(flag_sum(&engine().apply(&input).unwrap()), 2);
}

#[test]
fn it_shall_produce_identical_flags_on_repeated_calls() {
    let engine = engine();
    let input = fault_df_in_econ();
    let first = engine.apply(&input).unwrap();
    let second = engine.apply(&input).unwrap();
    assert_eq!(flags(&first), flags(&second));
}

#[test]
fn it_shall_flag_every_fully_faulty_window() {
    for window in 1..=8 {
        let mut config = config();
        config.rolling_window_size = window;
        let engine = FaultConditionEngine::new(HeatingCoilRise::new(config).unwrap());
        let result = engine
            .apply(&frame(&[136.5; 8], &[140.0; 8], 0.0, 0.0, 0.55))
            .unwrap();
        assert_eq!(flag_sum(&result) as usize, 8 - window + 1);
    }
}

#[test]
fn it_shall_not_flag_a_frame_shorter_than_the_window() {
    let result = engine()
        .apply(&frame(&[136.5; 3], &[140.0; 3], 0.0, 0.0, 0.55))
        .unwrap();
    assert_eq!(flag_sum(&result), 0);
}

#[test]
fn it_shall_fail_on_a_missing_column() {
    let input = fault_df_in_econ().drop(HTG_COIL_LEAVE_TEMP_COL).unwrap();
    let error = engine().apply(&input).unwrap_err();
    assert!(matches!(error, FaultError::MissingColumn(ref column) if column == HTG_COIL_LEAVE_TEMP_COL));
    assert!(error.to_string().contains(HTG_COIL_LEAVE_TEMP_COL));
}

#[test]
fn it_shall_fail_on_integer_damper_positions() {
    let error = engine()
        .apply(&malformed_damper_df(Series::new(MIX_AIR_DAMPER_COL, &[55; 6])))
        .unwrap_err();
    assert!(matches!(
        error,
        FaultError::TypeMismatch(TypeMismatch::IntegralFraction { ref column }) if column == MIX_AIR_DAMPER_COL
    ));
    assert_eq!(
        error.to_string(),
        "economizer_sig_col column failed with a check that the data is a float"
    );
}

#[test]
fn it_shall_fail_on_damper_positions_above_one() {
    let error = engine()
        .apply(&malformed_damper_df(Series::new(
            MIX_AIR_DAMPER_COL,
            &[1.1, 1.2, 1.1, 1.3, 1.1, 1.2],
        )))
        .unwrap_err();
    assert!(matches!(
        error,
        FaultError::TypeMismatch(TypeMismatch::OutOfRange { ref column, .. }) if column == MIX_AIR_DAMPER_COL
    ));
}

#[test]
fn it_shall_fail_on_mixed_valid_and_out_of_range_positions() {
    let error = engine()
        .apply(&malformed_damper_df(Series::new(
            MIX_AIR_DAMPER_COL,
            &[1.1, 0.55, 1.2, 1.3, 0.55, 1.1],
        )))
        .unwrap_err();
    assert!(matches!(
        error,
        FaultError::TypeMismatch(TypeMismatch::OutOfRange { .. })
    ));
    assert_eq!(error.column(), Some(MIX_AIR_DAMPER_COL));
}

#[test]
fn it_shall_fail_on_a_single_out_of_range_position() {
    let error = engine()
        .apply(&malformed_damper_df(Series::new(
            MIX_AIR_DAMPER_COL,
            &[0.55, 0.55, 0.55, 0.55, 0.55, 1.01],
        )))
        .unwrap_err();
    assert_eq!(error.column(), Some(MIX_AIR_DAMPER_COL));
}

#[test]
fn it_shall_add_diagnostics_in_troubleshoot_mode() {
    let result = troubleshooting_engine().apply(&fault_df_in_os3()).unwrap();
    let modes: Vec<&str> = result
        .column("fc15_mode")
        .unwrap()
        .utf8()
        .unwrap()
        .into_iter()
        .map(|mode| mode.unwrap())
        .collect();
    assert_eq!(modes, vec![OperatingMode::MechanicalCoolingAssisted.tag(); 6]);

    let checks: Vec<bool> = result
        .column("fc15_combined_check")
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .map(|check| check.unwrap())
        .collect();
    assert_eq!(checks, vec![true; 6]);

    let delta = result.column("fc15_htg_delta_temp").unwrap().f64().unwrap();
    assert_eq!(delta.get(0), Some(3.5));
    let tolerance = result
        .column("fc15_combined_tolerance")
        .unwrap()
        .f64()
        .unwrap();
    assert!((tolerance.get(0).unwrap() - (2f64.sqrt() + 2.0)).abs() < 1e-12);
    assert_eq!(flag_sum(&result), 2);
}

#[test]
fn it_shall_omit_diagnostics_by_default() {
    let result = engine().apply(&fault_df_in_os3()).unwrap();
    assert!(result.column("fc15_mode").is_err());
    assert!(result.column("fc15_combined_tolerance").is_err());
}

#[test]
fn it_shall_evaluate_a_batch_in_order() {
    let engine = Arc::new(engine());
    let frames = vec![
        no_fault_df_econ(),
        fault_df_in_econ(),
        malformed_damper_df(Series::new(MIX_AIR_DAMPER_COL, &[55; 6])),
        fault_df_in_os3(),
    ];
    let results = engine.apply_batch(frames, 3);
    assert_eq!(results.len(), 4);
    assert_eq!(flag_sum(results[0].as_ref().unwrap()), 0);
    assert_eq!(flag_sum(results[1].as_ref().unwrap()), 2);
    assert!(matches!(results[2], Err(FaultError::TypeMismatch(_))));
    assert_eq!(flag_sum(results[3].as_ref().unwrap()), 2);
}
