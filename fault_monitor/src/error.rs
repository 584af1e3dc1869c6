use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaultError {
    #[error("{0} column is missing from the input frame")]
    MissingColumn(String),

    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),

    #[error("invalid fault condition configuration: {0}")]
    InvalidConfig(String),

    #[error("frame error: {0}")]
    Frame(#[from] PolarsError),

    #[error("worker evaluating frame {0} stopped without a result")]
    Worker(usize),
}

/// Raised when a column holds numbers of the wrong kind for its domain.
#[derive(Error, Debug, PartialEq)]
pub enum TypeMismatch {
    #[error("{column} column failed with a check that the data is a float")]
    IntegralFraction { column: String },

    #[error("{column} column failed with a check that the data is a float between 0.0 and 1.0 (found {value})")]
    OutOfRange { column: String, value: f64 },

    #[error("{column} column has non-numeric type {dtype}")]
    NotNumeric { column: String, dtype: String },
}

impl TypeMismatch {
    pub fn column(&self) -> &str {
        match self {
            TypeMismatch::IntegralFraction { column }
            | TypeMismatch::OutOfRange { column, .. }
            | TypeMismatch::NotNumeric { column, .. } => column,
        }
    }
}

impl FaultError {
    /// Physical column the error refers to, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            FaultError::MissingColumn(column) => Some(column),
            FaultError::TypeMismatch(mismatch) => Some(mismatch.column()),
            FaultError::InvalidConfig(_) | FaultError::Frame(_) | FaultError::Worker(_) => None,
        }
    }
}
