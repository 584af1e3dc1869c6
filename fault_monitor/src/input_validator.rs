use std::collections::HashMap;

use data_transfer_objects::{ColumnSpec, Signal};
use log::debug;
use polars::prelude::{DataFrame, DataType, Series};

use crate::column_registry::ColumnSpecRegistry;
use crate::error::{FaultError, TypeMismatch};

/// The registered columns of a frame that passed validation, read as `f64`.
/// Nulls are carried as `NaN`.
#[derive(Debug)]
pub struct ValidatedFrame {
    columns: HashMap<Signal, Vec<f64>>,
}

impl ValidatedFrame {
    /// Moves the column out, leaving the signal unavailable afterwards.
    pub fn take(&mut self, signal: Signal) -> Result<Vec<f64>, FaultError> {
        self.columns.remove(&signal).ok_or_else(|| unregistered(signal))
    }
}

fn unregistered(signal: Signal) -> FaultError {
    FaultError::InvalidConfig(format!("{signal} was never registered"))
}

/// Checks that every registered column exists before looking at any of
/// their contents, then checks each column against its domain.
pub fn validate(
    frame: &DataFrame,
    registry: &ColumnSpecRegistry,
) -> Result<ValidatedFrame, FaultError> {
    let mut present: Vec<(&ColumnSpec, &Series)> = Vec::with_capacity(registry.len());
    for spec in registry.iter() {
        let series = frame
            .column(&spec.column)
            .map_err(|_| FaultError::MissingColumn(spec.column.clone()))?;
        present.push((spec, series));
    }

    let mut columns = HashMap::with_capacity(present.len());
    for (spec, series) in present {
        let values = read_column(spec, series)?;
        debug!("{} ({:?}) validated as {}", spec.column, spec.kind, spec.signal);
        columns.insert(spec.signal, values);
    }
    Ok(ValidatedFrame { columns })
}

fn read_column(spec: &ColumnSpec, series: &Series) -> Result<Vec<f64>, FaultError> {
    let dtype = series.dtype();
    let is_float = matches!(dtype, DataType::Float32 | DataType::Float64);
    if !is_float && !dtype.is_numeric() {
        return Err(TypeMismatch::NotNumeric {
            column: spec.column.clone(),
            dtype: dtype.to_string(),
        }
        .into());
    }
    if spec.kind.is_fraction() && !is_float {
        return Err(TypeMismatch::IntegralFraction {
            column: spec.column.clone(),
        }
        .into());
    }

    let cast = series.cast(&DataType::Float64)?;
    let values: Vec<f64> = cast
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect();
    if spec.kind.is_fraction() {
        check_fraction(&spec.column, &values)?;
    }
    Ok(values)
}

/// One pass over the column: tracks whether every value is a whole number
/// and remembers the first value outside [0.0, 1.0]. A column of whole
/// numbers is only rejected as mis-scaled when it also leaves the unit
/// interval, so idle commands stored as `0.0` stay valid.
fn check_fraction(column: &str, values: &[f64]) -> Result<(), TypeMismatch> {
    let mut all_integral = true;
    let mut out_of_range = None;
    for &value in values.iter().filter(|value| !value.is_nan()) {
        all_integral &= utils::is_integral(value);
        if out_of_range.is_none() && !utils::is_unit_fraction(value) {
            out_of_range = Some(value);
        }
    }
    match out_of_range {
        Some(_) if all_integral => Err(TypeMismatch::IntegralFraction {
            column: column.to_string(),
        }),
        Some(value) => Err(TypeMismatch::OutOfRange {
            column: column.to_string(),
            value,
        }),
        None => Ok(()),
    }
}
