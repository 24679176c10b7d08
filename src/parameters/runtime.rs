//! Runtime access to the intervention parameters.
//!
//! A running simulation may change a fixed whitelist of parameters between ticks, typically
//! from a scheduled intervention (see [`InterventionSchedule`](crate::schedule::InterventionSchedule)).
//! The whitelist is the [`RuntimeParameter`] enumeration; anything not listed there can only be
//! set before validation. Every entry carries a [`Domain`], and a write outside the domain is
//! rejected with an [`AccessError`] while the current value stays in place.
//!
//! Dispatch goes through [`RUNTIME_PARAMETER_TABLE`], a static table indexed by the enumeration,
//! so reading or writing a parameter never involves a name lookup. Names are only used when a
//! caller parses one with [`RuntimeParameter::from_str`](std::str::FromStr::from_str).

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::error::{AccessError, Constraint};
use crate::log::{info, trace, warn, AuditTarget};
use crate::numeric::is_probability;
use crate::parameters::set::{
    InterventionParameters, ParameterSet, MAX_DAILY_INTERACTIONS_KEPT, MAX_TEST_WAIT_DAYS,
};

const AUDIT: &str = AuditTarget::Runtime.target();

/// The parameters a running simulation may change.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumCount,
    EnumString,
    IntoStaticStr,
    strum::Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RuntimeParameter {
    TestOnSymptoms,
    TestOnTraced,
    QuarantineOnTraced,
    TraceableInteractionFraction,
    TracingNetworkDepth,
    AllowClinicalDiagnosis,
    QuarantineHouseholdOnPositive,
    QuarantineHouseholdOnSymptoms,
    QuarantineHouseholdOnTraced,
    QuarantineHouseholdContactsOnPositive,
    QuarantineHouseholdContactsOnSymptoms,
    QuarantineDays,
    TestOrderWait,
    TestResultWait,
    SelfQuarantineFraction,
    LockdownOn,
    LockdownElderlyOn,
    AppTurnedOn,
    AppUsersFraction,
}

impl RuntimeParameter {
    #[must_use]
    pub fn entry(self) -> &'static RuntimeParameterEntry {
        &RUNTIME_PARAMETER_TABLE[self as usize]
    }

    #[must_use]
    pub fn domain(self) -> Domain {
        self.entry().domain
    }

    /// The snake_case name, which is also the name of the field in
    /// [`InterventionParameters`].
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A runtime parameter value: flags, day counts and depths are integers, fractions are reals.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Integer(i64),
    Real(f64),
}

impl ParameterValue {
    /// The value as a real. Integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            ParameterValue::Integer(value) => value as f64,
            ParameterValue::Real(value) => value,
        }
    }

    /// The value as an integer, or `None` for a real.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            ParameterValue::Integer(value) => Some(value),
            ParameterValue::Real(_) => None,
        }
    }

    /// Whether the value is a set flag. Only meaningful for [`Domain::Flag`] parameters.
    #[must_use]
    pub fn is_on(self) -> bool {
        self == ParameterValue::Integer(1)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        ParameterValue::Integer(i64::from(value))
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Integer(i64::from(value))
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Real(value)
    }
}

impl Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParameterValue::Integer(value) => write!(f, "{value}"),
            ParameterValue::Real(value) => write!(f, "{value}"),
        }
    }
}

/// The set of values a runtime parameter accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Domain {
    /// 0 or 1.
    Flag,
    /// A number of days in `[0, max]`.
    Days { max: i64 },
    /// A non-negative integer that fits the field.
    Depth,
    /// A real in `[0, 1]`. The integers 0 and 1 are accepted and widened.
    Fraction,
}

impl Domain {
    /// Checks `value` against the domain and returns it in the representation the parameter is
    /// stored in.
    pub fn check(self, value: ParameterValue) -> Result<ParameterValue, Constraint> {
        match (self, value) {
            (Domain::Fraction, ParameterValue::Real(real)) => {
                if is_probability(real) {
                    Ok(value)
                } else {
                    Err(Constraint::OutOfUnitInterval { value: real })
                }
            }
            (Domain::Fraction, ParameterValue::Integer(integer)) => match integer {
                0 | 1 => Ok(ParameterValue::Real(value.as_f64())),
                _ => Err(Constraint::OutOfUnitInterval {
                    value: value.as_f64(),
                }),
            },
            (_, ParameterValue::Real(real)) => Err(Constraint::NotInteger { value: real }),
            (Domain::Flag, ParameterValue::Integer(integer)) => match integer {
                0 | 1 => Ok(value),
                _ => Err(Constraint::NotFlag { value: integer }),
            },
            (Domain::Days { max }, ParameterValue::Integer(integer)) => {
                check_integer(integer, max).map(|()| value)
            }
            (Domain::Depth, ParameterValue::Integer(integer)) => {
                check_integer(integer, i64::from(i32::MAX)).map(|()| value)
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn check_integer(value: i64, max: i64) -> Result<(), Constraint> {
    if value < 0 {
        Err(Constraint::Negative {
            value: value as f64,
        })
    } else if value > max {
        Err(Constraint::AboveMaximum { value, max })
    } else {
        Ok(())
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Domain::Flag => write!(f, "{{0, 1}}"),
            Domain::Days { max } => write!(f, "[0, {max}]"),
            Domain::Depth => write!(f, "[0, {}]", i32::MAX),
            Domain::Fraction => write!(f, "[0, 1]"),
        }
    }
}

/// A bound on a runtime parameter given by a static field of the parameter set.
#[derive(Copy, Clone, Debug)]
pub struct FieldLimit {
    pub field: &'static str,
    pub value: fn(&ParameterSet) -> i64,
}

/// One row of the dispatch table.
#[derive(Copy, Clone, Debug)]
pub struct RuntimeParameterEntry {
    pub parameter: RuntimeParameter,
    pub domain: Domain,
    pub limit: Option<FieldLimit>,
    get: fn(&InterventionParameters) -> ParameterValue,
    set: fn(&mut InterventionParameters, ParameterValue),
}

impl RuntimeParameterEntry {
    #[must_use]
    pub fn read(&self, interventions: &InterventionParameters) -> ParameterValue {
        (self.get)(interventions)
    }

    /// Checks `value` against the domain and, if there is one, the field limit. Returns the
    /// value in its stored representation.
    pub fn check(
        &self,
        value: ParameterValue,
        parameters: &ParameterSet,
    ) -> Result<ParameterValue, Constraint> {
        let value = self.domain.check(value)?;
        if let (Some(limit), ParameterValue::Integer(integer)) = (self.limit, value) {
            let bound = (limit.value)(parameters);
            if integer > bound {
                return Err(Constraint::ExceedsField {
                    other: limit.field,
                    value: integer,
                    limit: bound,
                });
            }
        }
        Ok(value)
    }
}

// Only called with values that passed `Domain::check`, so the integer fits an i32.
#[allow(clippy::cast_possible_truncation)]
fn stored_integer(value: ParameterValue) -> i32 {
    match value {
        ParameterValue::Integer(integer) => integer as i32,
        ParameterValue::Real(real) => real as i32,
    }
}

macro_rules! runtime_parameter_entry {
    ($parameter:ident, $field:ident, real, $domain:expr) => {
        RuntimeParameterEntry {
            parameter: RuntimeParameter::$parameter,
            domain: $domain,
            limit: None,
            get: |interventions| ParameterValue::Real(interventions.$field),
            set: |interventions, value| interventions.$field = value.as_f64(),
        }
    };
    ($parameter:ident, $field:ident, integer, $domain:expr) => {
        runtime_parameter_entry!($parameter, $field, integer, $domain, None)
    };
    ($parameter:ident, $field:ident, integer, $domain:expr, $limit:expr) => {
        RuntimeParameterEntry {
            parameter: RuntimeParameter::$parameter,
            domain: $domain,
            limit: $limit,
            get: |interventions| ParameterValue::Integer(i64::from(interventions.$field)),
            set: |interventions, value| interventions.$field = stored_integer(value),
        }
    };
}

/// The dispatch table, in declaration order of [`RuntimeParameter`].
pub static RUNTIME_PARAMETER_TABLE: [RuntimeParameterEntry; RuntimeParameter::COUNT] = [
    runtime_parameter_entry!(TestOnSymptoms, test_on_symptoms, integer, Domain::Flag),
    runtime_parameter_entry!(TestOnTraced, test_on_traced, integer, Domain::Flag),
    runtime_parameter_entry!(QuarantineOnTraced, quarantine_on_traced, integer, Domain::Flag),
    runtime_parameter_entry!(
        TraceableInteractionFraction,
        traceable_interaction_fraction,
        real,
        Domain::Fraction
    ),
    runtime_parameter_entry!(
        TracingNetworkDepth,
        tracing_network_depth,
        integer,
        Domain::Depth
    ),
    runtime_parameter_entry!(
        AllowClinicalDiagnosis,
        allow_clinical_diagnosis,
        integer,
        Domain::Flag
    ),
    runtime_parameter_entry!(
        QuarantineHouseholdOnPositive,
        quarantine_household_on_positive,
        integer,
        Domain::Flag
    ),
    runtime_parameter_entry!(
        QuarantineHouseholdOnSymptoms,
        quarantine_household_on_symptoms,
        integer,
        Domain::Flag
    ),
    runtime_parameter_entry!(
        QuarantineHouseholdOnTraced,
        quarantine_household_on_traced,
        integer,
        Domain::Flag
    ),
    runtime_parameter_entry!(
        QuarantineHouseholdContactsOnPositive,
        quarantine_household_contacts_on_positive,
        integer,
        Domain::Flag
    ),
    runtime_parameter_entry!(
        QuarantineHouseholdContactsOnSymptoms,
        quarantine_household_contacts_on_symptoms,
        integer,
        Domain::Flag
    ),
    runtime_parameter_entry!(
        QuarantineDays,
        quarantine_days,
        integer,
        Domain::Days {
            max: MAX_DAILY_INTERACTIONS_KEPT as i64
        },
        Some(FieldLimit {
            field: "run.days_of_interactions",
            value: |parameters| i64::from(parameters.run.days_of_interactions),
        })
    ),
    runtime_parameter_entry!(
        TestOrderWait,
        test_order_wait,
        integer,
        Domain::Days {
            max: MAX_TEST_WAIT_DAYS as i64
        }
    ),
    runtime_parameter_entry!(
        TestResultWait,
        test_result_wait,
        integer,
        Domain::Days {
            max: MAX_TEST_WAIT_DAYS as i64
        }
    ),
    runtime_parameter_entry!(
        SelfQuarantineFraction,
        self_quarantine_fraction,
        real,
        Domain::Fraction
    ),
    runtime_parameter_entry!(LockdownOn, lockdown_on, integer, Domain::Flag),
    runtime_parameter_entry!(LockdownElderlyOn, lockdown_elderly_on, integer, Domain::Flag),
    runtime_parameter_entry!(AppTurnedOn, app_turned_on, integer, Domain::Flag),
    runtime_parameter_entry!(AppUsersFraction, app_users_fraction, real, Domain::Fraction),
];

/// Reads and writes the whitelisted runtime parameters. Implemented by
/// [`ValidatedParameters`](crate::parameters::ValidatedParameters), so only a validated set can
/// be changed at runtime.
///
/// Reads take `&self` and writes `&mut self`: while per-tick workers hold a shared borrow (or
/// work from an [`intervention_snapshot`](RuntimeParameterExt::intervention_snapshot)) no write
/// can happen, and a tick observes one consistent set of values.
pub trait RuntimeParameterExt {
    /// Returns the current value of `parameter`.
    fn get_runtime_parameter(&self, parameter: RuntimeParameter) -> ParameterValue;

    /// Sets `parameter` to `value` and returns the previous value.
    ///
    /// # Errors
    /// If `value` is outside the parameter's domain, or exceeds the field that bounds it, the
    /// write is rejected and the current value is kept.
    fn set_runtime_parameter(
        &mut self,
        parameter: RuntimeParameter,
        value: impl Into<ParameterValue>,
    ) -> Result<ParameterValue, AccessError>;

    /// A copy of every runtime parameter, for code that reads many of them per tick.
    fn intervention_snapshot(&self) -> InterventionParameters;
}

/// Writes `value` to `parameter` in `parameters`, logging the change or the rejection.
pub(crate) fn write_runtime_parameter(
    parameters: &mut ParameterSet,
    parameter: RuntimeParameter,
    value: ParameterValue,
) -> Result<ParameterValue, AccessError> {
    let entry = parameter.entry();
    let stored = match entry.check(value, parameters) {
        Ok(stored) => stored,
        Err(constraint) => {
            let error = AccessError::new(parameter, value, constraint);
            warn!(target: AUDIT, "Rejected runtime parameter write: {error}");
            return Err(error);
        }
    };

    let previous = entry.read(&parameters.interventions);
    (entry.set)(&mut parameters.interventions, stored);
    if previous == stored {
        trace!(target: AUDIT, "Runtime parameter {parameter} set to its current value {stored}");
    } else {
        info!(target: AUDIT, "Runtime parameter {parameter} changed from {previous} to {stored}");
    }
    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn table_is_indexed_by_parameter() {
        for parameter in RuntimeParameter::iter() {
            assert_eq!(parameter.entry().parameter, parameter);
        }
    }

    #[test]
    fn names_round_trip() {
        for parameter in RuntimeParameter::iter() {
            assert_eq!(RuntimeParameter::from_str(parameter.name()), Ok(parameter));
        }
        assert_eq!(RuntimeParameter::AppUsersFraction.name(), "app_users_fraction");
        assert_eq!(
            RuntimeParameter::QuarantineHouseholdContactsOnSymptoms.to_string(),
            "quarantine_household_contacts_on_symptoms"
        );
        assert!(RuntimeParameter::from_str("rng_seed").is_err());
    }

    #[test]
    fn table_reads_the_named_field() {
        let interventions = InterventionParameters {
            tracing_network_depth: 3,
            app_users_fraction: 0.4,
            quarantine_days: 5,
            ..InterventionParameters::default()
        };
        assert_eq!(
            RuntimeParameter::TracingNetworkDepth
                .entry()
                .read(&interventions),
            ParameterValue::Integer(3)
        );
        assert_eq!(
            RuntimeParameter::AppUsersFraction.entry().read(&interventions),
            ParameterValue::Real(0.4)
        );
        assert_eq!(
            RuntimeParameter::QuarantineDays.entry().read(&interventions),
            ParameterValue::Integer(5)
        );
    }

    #[test]
    fn flag_domain() {
        assert_eq!(Domain::Flag.check(1.into()), Ok(ParameterValue::Integer(1)));
        assert_eq!(
            Domain::Flag.check(2.into()),
            Err(Constraint::NotFlag { value: 2 })
        );
        assert_eq!(
            Domain::Flag.check(1.0.into()),
            Err(Constraint::NotInteger { value: 1.0 })
        );
    }

    #[test]
    fn fraction_domain_widens_integers() {
        assert_eq!(
            Domain::Fraction.check(1.into()),
            Ok(ParameterValue::Real(1.0))
        );
        assert_eq!(
            Domain::Fraction.check(0.25.into()),
            Ok(ParameterValue::Real(0.25))
        );
        assert_eq!(
            Domain::Fraction.check(2.into()),
            Err(Constraint::OutOfUnitInterval { value: 2.0 })
        );
        assert!(Domain::Fraction.check(f64::NAN.into()).is_err());
    }

    #[test]
    fn days_domain_bounds() {
        let domain = Domain::Days { max: 10 };
        assert!(domain.check(10.into()).is_ok());
        assert_eq!(
            domain.check(11.into()),
            Err(Constraint::AboveMaximum { value: 11, max: 10 })
        );
        assert_eq!(
            domain.check((-1).into()),
            Err(Constraint::Negative { value: -1.0 })
        );
        assert!(Domain::Depth
            .check(ParameterValue::Integer(i64::from(i32::MAX) + 1))
            .is_err());
    }

    #[test]
    fn domain_display() {
        assert_eq!(Domain::Flag.to_string(), "{0, 1}");
        assert_eq!(Domain::Fraction.to_string(), "[0, 1]");
        assert_eq!(Domain::Days { max: 10 }.to_string(), "[0, 10]");
        assert_eq!(
            RuntimeParameter::QuarantineDays.domain(),
            Domain::Days { max: 10 }
        );
    }

    #[test]
    fn write_returns_previous_value() {
        let mut parameters = ParameterSet::default();
        let previous = write_runtime_parameter(
            &mut parameters,
            RuntimeParameter::SelfQuarantineFraction,
            ParameterValue::Real(0.5),
        )
        .unwrap();
        assert_eq!(previous, ParameterValue::Real(0.0));
        assert_eq!(parameters.interventions.self_quarantine_fraction, 0.5);
    }

    #[test]
    fn rejected_write_keeps_value() {
        let mut parameters = ParameterSet::default();
        parameters.run.days_of_interactions = 5;
        let error = write_runtime_parameter(
            &mut parameters,
            RuntimeParameter::QuarantineDays,
            ParameterValue::Integer(6),
        )
        .unwrap_err();
        assert_eq!(error.parameter(), RuntimeParameter::QuarantineDays);
        assert_eq!(
            error.constraint(),
            &Constraint::ExceedsField {
                other: "run.days_of_interactions",
                value: 6,
                limit: 5
            }
        );
        assert_eq!(parameters.interventions.quarantine_days, 7);
    }
}
