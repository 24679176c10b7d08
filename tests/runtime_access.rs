use std::str::FromStr;

use ixa_epi_params::parameters::{
    Domain, ParameterSet, ParameterValue, RuntimeParameter, RuntimeParameterExt,
    ValidatedParameters, WorkNetwork,
};
use ixa_epi_params::prelude::Constraint;
use strum::IntoEnumIterator;

fn validated() -> ValidatedParameters {
    let mut parameters = ParameterSet::default();
    parameters
        .households
        .populate(2, 2, vec![1, 0, 1, 1])
        .expect("Failed to populate table");
    ValidatedParameters::new(parameters).expect("Baseline should validate")
}

fn in_domain(parameter: RuntimeParameter) -> Vec<ParameterValue> {
    match parameter.domain() {
        Domain::Flag => vec![1.into(), 0.into()],
        Domain::Days { max } => vec![0.into(), max.min(3).into(), 1.into()],
        Domain::Depth => vec![0.into(), 4.into()],
        Domain::Fraction => vec![0.0.into(), 1.0.into(), 0.35.into()],
    }
}

fn out_of_domain(parameter: RuntimeParameter) -> Vec<ParameterValue> {
    match parameter.domain() {
        Domain::Flag => vec![2.into(), (-1).into(), 0.5.into()],
        Domain::Days { max } => vec![(-1).into(), (max + 1).into(), 1.5.into()],
        Domain::Depth => vec![(-1).into(), 2.0.into()],
        Domain::Fraction => vec![(-0.1).into(), 1.2.into(), 2.into(), f64::NAN.into()],
    }
}

#[test]
fn write_then_read_returns_value() {
    let mut parameters = validated();
    for parameter in RuntimeParameter::iter() {
        for value in in_domain(parameter) {
            parameters
                .set_runtime_parameter(parameter, value)
                .unwrap_or_else(|e| panic!("{parameter} = {value} should be accepted: {e}"));
            assert_eq!(parameters.get_runtime_parameter(parameter), value);
        }
    }
}

#[test]
fn rejected_write_leaves_value_unchanged() {
    let mut parameters = validated();
    for parameter in RuntimeParameter::iter() {
        let before = parameters.get_runtime_parameter(parameter);
        for value in out_of_domain(parameter) {
            let error = parameters
                .set_runtime_parameter(parameter, value)
                .expect_err("out-of-domain write should fail");
            assert_eq!(error.parameter(), parameter);
            assert_eq!(parameters.get_runtime_parameter(parameter), before);
        }
    }
}

#[test]
fn rejected_write_leaves_other_parameters_unchanged() {
    let mut parameters = validated();
    let before = parameters.intervention_snapshot();
    let _ = parameters.set_runtime_parameter(RuntimeParameter::TracingNetworkDepth, -3);
    assert_eq!(parameters.intervention_snapshot(), before);
}

#[test]
fn lockdown_on_then_off() {
    let mut parameters = validated();
    parameters
        .set_runtime_parameter(RuntimeParameter::LockdownOn, 1)
        .unwrap();
    assert_eq!(
        parameters.get_runtime_parameter(RuntimeParameter::LockdownOn),
        ParameterValue::Integer(1)
    );
    let previous = parameters
        .set_runtime_parameter(RuntimeParameter::LockdownOn, 0)
        .unwrap();
    assert_eq!(previous, ParameterValue::Integer(1));
    assert_eq!(
        parameters.get_runtime_parameter(RuntimeParameter::LockdownOn),
        ParameterValue::Integer(0)
    );
}

#[test]
fn fraction_accepts_integer_bounds() {
    let mut parameters = validated();
    parameters
        .set_runtime_parameter(RuntimeParameter::SelfQuarantineFraction, 1)
        .unwrap();
    assert_eq!(
        parameters.get_runtime_parameter(RuntimeParameter::SelfQuarantineFraction),
        ParameterValue::Real(1.0)
    );
}

#[test]
fn flag_rejects_reals() {
    let mut parameters = validated();
    let error = parameters
        .set_runtime_parameter(RuntimeParameter::AppTurnedOn, 1.0)
        .unwrap_err();
    assert_eq!(error.constraint(), &Constraint::NotInteger { value: 1.0 });
}

#[test]
fn quarantine_days_bounded_by_days_of_interactions() {
    let mut parameters = ParameterSet::default();
    parameters.run.days_of_interactions = 7;
    parameters.households.populate(1, 1, vec![1]).unwrap();
    let mut parameters = ValidatedParameters::new(parameters).unwrap();

    assert!(parameters
        .set_runtime_parameter(RuntimeParameter::QuarantineDays, 7)
        .is_ok());
    let error = parameters
        .set_runtime_parameter(RuntimeParameter::QuarantineDays, 8)
        .unwrap_err();
    assert_eq!(
        error.constraint(),
        &Constraint::ExceedsField {
            other: "run.days_of_interactions",
            value: 8,
            limit: 7
        }
    );
    assert_eq!(
        parameters.get_runtime_parameter(RuntimeParameter::QuarantineDays),
        ParameterValue::Integer(7)
    );
}

#[test]
fn parameters_are_addressed_by_name() {
    let mut parameters = validated();
    let parameter = RuntimeParameter::from_str("quarantine_household_on_traced").unwrap();
    parameters.set_runtime_parameter(parameter, true).unwrap();
    assert_eq!(parameters.interventions.quarantine_household_on_traced, 1);

    // Static fields are not runtime parameters.
    assert!(RuntimeParameter::from_str("n_total").is_err());
    assert!(RuntimeParameter::from_str("days_of_interactions").is_err());
}

#[test]
fn workers_read_a_stable_snapshot() {
    let mut parameters = validated();
    parameters
        .set_runtime_parameter(RuntimeParameter::LockdownOn, 1)
        .unwrap();

    // A tick: workers share the parameters; no write can happen until they are done.
    let fractions: Vec<f64> = std::thread::scope(|scope| {
        let parameters = &parameters;
        let handles: Vec<_> = WorkNetwork::iter()
            .map(|network| {
                scope.spawn(move || {
                    let snapshot = parameters.intervention_snapshot();
                    assert!(snapshot.is_lockdown_on());
                    parameters.effective_daily_fraction_work(network)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });
    assert!(fractions.iter().all(|&fraction| fraction < 0.5));

    // Between ticks
    parameters
        .set_runtime_parameter(RuntimeParameter::LockdownOn, 0)
        .unwrap();
    assert_eq!(
        parameters.effective_daily_fraction_work(WorkNetwork::Working),
        0.5
    );
}
