//! Rule engine for air-handling-unit fault conditions.
//!
//! A fault condition validates the columns it reads, tags every sample with
//! an operating state, evaluates an instantaneous violation and only raises
//! its flag once the violation has held for a full rolling window.

pub mod column_registry;
pub mod engine;
pub mod error;
pub mod fault_conditions;
pub mod input_validator;
pub mod operating_state;
pub mod rules_engine;
pub mod sliding_window;

pub use column_registry::ColumnSpecRegistry;
pub use engine::{FaultCondition, FaultConditionEngine};
pub use error::{FaultError, TypeMismatch};
pub use fault_conditions::{HeatingCoilRise, HeatingCoilSignals};
pub use input_validator::ValidatedFrame;
