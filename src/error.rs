//! Error types for parameter validation, runtime parameter access and the reference household
//! table.
//!
//! There are two kinds of error a simulation has to react to. A [`ValidationError`] is raised
//! once, before the first tick, when a loaded [`ParameterSet`](crate::parameters::ParameterSet)
//! violates a static invariant; it is fatal to the run. An [`AccessError`] is raised when the
//! intervention scheduler tries to write an out-of-domain value to a runtime parameter; the write
//! is rejected, the previous value is kept and the run carries on.
//!
//! `ParamsError` wraps all of them (and `serde_json` errors from callers that load parameters
//! from JSON) so that `?` works across layers.

use std::fmt::{self, Display};

use crate::parameters::RuntimeParameter;

/// Provides `ParamsError` and maps to other errors to
/// convert to a `ParamsError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum ParamsError {
    ValidationError(ValidationError),
    AccessError(AccessError),
    HouseholdTableError(HouseholdTableError),
    JsonError(serde_json::Error),
    ParamsError(String),
}

impl From<ValidationError> for ParamsError {
    fn from(error: ValidationError) -> Self {
        ParamsError::ValidationError(error)
    }
}

impl From<AccessError> for ParamsError {
    fn from(error: AccessError) -> Self {
        ParamsError::AccessError(error)
    }
}

impl From<HouseholdTableError> for ParamsError {
    fn from(error: HouseholdTableError) -> Self {
        ParamsError::HouseholdTableError(error)
    }
}

impl From<serde_json::Error> for ParamsError {
    fn from(error: serde_json::Error) -> Self {
        ParamsError::JsonError(error)
    }
}

impl From<String> for ParamsError {
    fn from(error: String) -> Self {
        ParamsError::ParamsError(error)
    }
}

impl From<&str> for ParamsError {
    fn from(error: &str) -> Self {
        ParamsError::ParamsError(error.to_string())
    }
}

impl std::error::Error for ParamsError {}

impl Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamsError::ValidationError(error) => write!(f, "{error}"),
            ParamsError::AccessError(error) => write!(f, "{error}"),
            ParamsError::HouseholdTableError(error) => write!(f, "{error}"),
            ParamsError::JsonError(error) => write!(f, "invalid parameter JSON: {error}"),
            ParamsError::ParamsError(msg) => write!(f, "{msg}"),
        }
    }
}

/// The constraint a parameter value violated.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// A probability or fraction outside of `[0, 1]`.
    OutOfUnitInterval { value: f64 },
    /// A count, length, mean or standard deviation below zero.
    Negative { value: f64 },
    /// `NaN` or an infinity.
    NotFinite,
    /// A boolean-like flag that is neither 0 nor 1.
    NotFlag { value: i64 },
    /// A value above a fixed compile-time maximum.
    AboveMaximum { value: i64, max: i64 },
    /// An on/off pair where the "on" day comes after the "off" day.
    Ordering { on: i32, off: i32 },
    /// A value that must not exceed the value of another field.
    ExceedsField {
        other: &'static str,
        value: i64,
        limit: i64,
    },
    /// A derived conditional probability left `[0, 1]`.
    ConditionalProbability { stage: &'static str, value: f64 },
    /// A hospital array cell the loader never filled in.
    IncompleteArray { index: String },
    /// A value that must be strictly positive.
    NotPositive { value: i64 },
    /// A real value given for an integer-valued parameter.
    NotInteger { value: f64 },
    /// The reference household table is not usable.
    HouseholdTable(HouseholdTableError),
}

impl Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Constraint::OutOfUnitInterval { value } => {
                write!(f, "value {value} is outside the domain [0, 1]")
            }
            Constraint::Negative { value } => write!(f, "value {value} must not be negative"),
            Constraint::NotFinite => write!(f, "value must be finite"),
            Constraint::NotFlag { value } => write!(f, "flag value {value} must be 0 or 1"),
            Constraint::AboveMaximum { value, max } => {
                write!(f, "value {value} exceeds the maximum of {max}")
            }
            Constraint::Ordering { on, off } => write!(
                f,
                "ordering constraint violated: on-time {on} is after off-time {off}"
            ),
            Constraint::ExceedsField {
                other,
                value,
                limit,
            } => write!(f, "value {value} exceeds {other} ({limit})"),
            Constraint::ConditionalProbability { stage, value } => write!(
                f,
                "conditional probability of {stage} is {value}, outside the domain [0, 1]"
            ),
            Constraint::IncompleteArray { index } => write!(
                f,
                "array completeness violated: no value was provided for {index}"
            ),
            Constraint::NotPositive { value } => {
                write!(f, "value {value} must be strictly positive")
            }
            Constraint::NotInteger { value } => {
                write!(f, "value {value} must be an integer")
            }
            Constraint::HouseholdTable(error) => write!(f, "{error}"),
        }
    }
}

/// A static field or cross-field invariant violation detected before the first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    field: String,
    constraint: Constraint,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }

    /// The name of the offending field, e.g. `"lockdown.lockdown_time_on"` or
    /// `"outcomes.mild_fraction[age_40_49]"`.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid parameter {}: {}", self.field, self.constraint)
    }
}

impl std::error::Error for ValidationError {}

/// An out-of-domain value passed to a runtime parameter write. The write did not happen.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessError {
    parameter: RuntimeParameter,
    value: String,
    constraint: Constraint,
}

impl AccessError {
    #[must_use]
    pub fn new(parameter: RuntimeParameter, value: impl Display, constraint: Constraint) -> Self {
        Self {
            parameter,
            value: value.to_string(),
            constraint,
        }
    }

    #[must_use]
    pub fn parameter(&self) -> RuntimeParameter {
        self.parameter
    }

    #[must_use]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }
}

impl Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "cannot set {} to {}: {}",
            self.parameter, self.value, self.constraint
        )
    }
}

impl std::error::Error for AccessError {}

/// Contract violations of the reference household table lifecycle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HouseholdTableError {
    /// `populate` was called on a table that already holds data.
    AlreadyPopulated,
    /// `rows` or `width` was zero.
    InvalidShape { rows: usize, width: usize },
    /// The data buffer does not hold exactly `rows * width` entries.
    LengthMismatch { expected: usize, actual: usize },
    /// The table was read before it was populated.
    Unpopulated,
    /// The table was used after it was released.
    UseAfterRelease,
    /// A row index at or beyond the row count.
    OutOfRange { index: usize, rows: usize },
}

impl Display for HouseholdTableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HouseholdTableError::AlreadyPopulated => {
                write!(f, "reference household table is already populated")
            }
            HouseholdTableError::InvalidShape { rows, width } => write!(
                f,
                "reference household table needs a positive shape, got {rows} rows of width {width}"
            ),
            HouseholdTableError::LengthMismatch { expected, actual } => write!(
                f,
                "reference household table expected {expected} entries but received {actual}"
            ),
            HouseholdTableError::Unpopulated => {
                write!(f, "reference household table has not been populated")
            }
            HouseholdTableError::UseAfterRelease => {
                write!(f, "reference household table was used after release")
            }
            HouseholdTableError::OutOfRange { index, rows } => write!(
                f,
                "reference household row {index} is out of range for a table of {rows} rows"
            ),
        }
    }
}

impl std::error::Error for HouseholdTableError {}
