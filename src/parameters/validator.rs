//! One-shot validation of a loaded [`ParameterSet`].
//!
//! Sections are checked in a fixed order (run control, network, disease, outcomes,
//! interventions, quarantine, lockdown, hospital, household table) and fields in declaration
//! order within a section, so the same bad input always reports the same first violation.
//! Validation never modifies the set.

use std::fmt::Display;

use strum::IntoEnumIterator;

use crate::error::{Constraint, ValidationError};
use crate::numeric::{is_derived_probability, is_probability};
use crate::parameters::hospital::{WardTable, WardWorkerTable};
use crate::parameters::outcomes::OutcomeProbabilities;
use crate::parameters::runtime::RuntimeParameter;
use crate::parameters::set::{
    DiseaseParameters, Distribution, HospitalParameters, LockdownParameters, NetworkParameters,
    OutcomeFractions, ParameterSet, QuarantineParameters, RunControl, MAX_DAILY_INTERACTIONS_KEPT,
};
use crate::parameters::types::AgeGroup;

type Check = Result<(), ValidationError>;

pub struct ParameterValidator;

impl ParameterValidator {
    /// Checks every static and cross-field invariant of `parameters`.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn validate(parameters: &ParameterSet) -> Result<(), ValidationError> {
        check_run(&parameters.run)?;
        check_network(&parameters.network)?;
        check_disease(&parameters.disease)?;
        check_outcomes(&parameters.outcomes)?;
        check_interventions(parameters)?;
        check_quarantine(&parameters.quarantine)?;
        check_lockdown(&parameters.lockdown)?;
        check_hospital(&parameters.hospital)?;
        parameters
            .households
            .ensure_populated()
            .map_err(Constraint::HouseholdTable)
            .at("households")
    }
}

/// Attaches a field name to a failed check.
trait AtField {
    fn at(self, field: &str) -> Check;
    fn at_index(self, field: &str, index: impl Display) -> Check;
}

impl AtField for Result<(), Constraint> {
    fn at(self, field: &str) -> Check {
        self.map_err(|constraint| ValidationError::new(field, constraint))
    }

    fn at_index(self, field: &str, index: impl Display) -> Check {
        self.map_err(|constraint| ValidationError::new(format!("{field}[{index}]"), constraint))
    }
}

#[allow(clippy::cast_precision_loss)]
fn non_negative(value: impl Into<i64>) -> Result<(), Constraint> {
    let value = value.into();
    if value < 0 {
        return Err(Constraint::Negative {
            value: value as f64,
        });
    }
    Ok(())
}

fn non_negative_real(value: f64) -> Result<(), Constraint> {
    if !value.is_finite() {
        return Err(Constraint::NotFinite);
    }
    if value < 0.0 {
        return Err(Constraint::Negative { value });
    }
    Ok(())
}

fn probability(value: f64) -> Result<(), Constraint> {
    if !is_probability(value) {
        return Err(Constraint::OutOfUnitInterval { value });
    }
    Ok(())
}

fn flag(value: i32) -> Result<(), Constraint> {
    match value {
        0 | 1 => Ok(()),
        _ => Err(Constraint::NotFlag {
            value: i64::from(value),
        }),
    }
}

fn at_most(value: i32, max: i32) -> Result<(), Constraint> {
    if value > max {
        return Err(Constraint::AboveMaximum {
            value: i64::from(value),
            max: i64::from(max),
        });
    }
    Ok(())
}

fn each<'a, I: Display>(
    field: &str,
    values: impl IntoIterator<Item = (I, &'a f64)>,
    check: fn(f64) -> Result<(), Constraint>,
) -> Check {
    for (index, &value) in values {
        check(value).at_index(field, index)?;
    }
    Ok(())
}

fn distribution(field: &str, distribution: &Distribution) -> Check {
    non_negative_real(distribution.mean).at(&format!("{field}.mean"))?;
    non_negative_real(distribution.sd).at(&format!("{field}.sd"))
}

/// A day marker is either "never" or a day that is not negative.
fn day(field: &str, day: Option<i32>) -> Check {
    match day {
        Some(day) => non_negative(day).at(field),
        None => Ok(()),
    }
}

fn ordering(on_field: &str, on: Option<i32>, off: Option<i32>) -> Check {
    match (on, off) {
        (Some(on), Some(off)) if on > off => {
            Err(ValidationError::new(on_field, Constraint::Ordering { on, off }))
        }
        _ => Ok(()),
    }
}

fn check_run(run: &RunControl) -> Check {
    non_negative(run.rng_seed).at("run.rng_seed")?;
    non_negative(run.param_id).at("run.param_id")?;
    non_negative(run.n_total).at("run.n_total")?;
    non_negative(run.days_of_interactions)
        .and_then(|()| at_most(run.days_of_interactions, MAX_DAILY_INTERACTIONS_KEPT))
        .at("run.days_of_interactions")?;
    non_negative(run.end_time).at("run.end_time")?;
    non_negative(run.n_seed_infection).at("run.n_seed_infection")?;
    flag(run.sys_write_individual).at("run.sys_write_individual")
}

fn check_network(network: &NetworkParameters) -> Check {
    each(
        "network.mean_random_interactions",
        network.mean_random_interactions.iter(),
        non_negative_real,
    )?;
    each(
        "network.sd_random_interactions",
        network.sd_random_interactions.iter(),
        non_negative_real,
    )?;
    each(
        "network.mean_work_interactions",
        network.mean_work_interactions.iter(),
        non_negative_real,
    )?;
    probability(network.daily_fraction_work).at("network.daily_fraction_work")?;
    probability(network.child_network_adults).at("network.child_network_adults")?;
    probability(network.elderly_network_adults).at("network.elderly_network_adults")?;
    each(
        "network.relative_transmission_by_type",
        network.relative_transmission_by_type.iter(),
        non_negative_real,
    )?;
    each(
        "network.relative_susceptibility",
        network.relative_susceptibility.iter(),
        non_negative_real,
    )?;
    each(
        "network.household_size",
        network.household_size.iter(),
        non_negative_real,
    )?;
    each(
        "network.population_group",
        network.population_group.iter(),
        non_negative_real,
    )?;
    each(
        "network.population_type",
        network.population_type.iter(),
        non_negative_real,
    )?;
    non_negative(network.quarantined_daily_interactions)
        .at("network.quarantined_daily_interactions")?;
    non_negative(network.hospitalised_daily_interactions)
        .at("network.hospitalised_daily_interactions")
}

fn check_disease(disease: &DiseaseParameters) -> Check {
    non_negative_real(disease.infectious_rate).at("disease.infectious_rate")?;
    distribution("disease.infectious_period", &disease.infectious_period)?;
    distribution("disease.time_to_symptoms", &disease.time_to_symptoms)?;
    distribution(
        "disease.asymptomatic_to_recovery",
        &disease.asymptomatic_to_recovery,
    )?;
    distribution("disease.time_to_recover", &disease.time_to_recover)?;
    distribution("disease.time_to_death", &disease.time_to_death)?;
    non_negative_real(disease.mean_time_to_hospital).at("disease.mean_time_to_hospital")?;
    non_negative_real(disease.mean_time_to_critical).at("disease.mean_time_to_critical")?;
    non_negative_real(disease.asymptomatic_infectious_factor)
        .at("disease.asymptomatic_infectious_factor")?;
    non_negative_real(disease.mild_infectious_factor).at("disease.mild_infectious_factor")?;
    probability(disease.seasonal_flu_rate).at("disease.seasonal_flu_rate")
}

fn check_outcomes(outcomes: &OutcomeFractions) -> Check {
    each(
        "outcomes.fraction_asymptomatic",
        outcomes.fraction_asymptomatic.iter(),
        probability,
    )?;
    each(
        "outcomes.mild_fraction",
        outcomes.mild_fraction.iter(),
        probability,
    )?;
    each(
        "outcomes.hospitalised_fraction",
        outcomes.hospitalised_fraction.iter(),
        probability,
    )?;
    each(
        "outcomes.critical_fraction",
        outcomes.critical_fraction.iter(),
        probability,
    )?;
    each(
        "outcomes.fatality_fraction",
        outcomes.fatality_fraction.iter(),
        probability,
    )?;

    for age_group in AgeGroup::iter() {
        let derived = OutcomeProbabilities::for_age_group(outcomes, age_group);
        for (stage, value) in derived.stages() {
            if !is_derived_probability(value) {
                return Err(ValidationError::new(
                    format!("outcomes[{age_group}]"),
                    Constraint::ConditionalProbability { stage, value },
                ));
            }
        }
    }
    Ok(())
}

/// The runtime parameters start out under the same rules a runtime write is held to.
fn check_interventions(parameters: &ParameterSet) -> Check {
    for parameter in RuntimeParameter::iter() {
        let entry = parameter.entry();
        entry
            .check(entry.read(&parameters.interventions), parameters)
            .map(|_| ())
            .at(&format!("interventions.{parameter}"))?;
    }
    Ok(())
}

fn check_quarantine(quarantine: &QuarantineParameters) -> Check {
    non_negative(quarantine.quarantine_length_self).at("quarantine.quarantine_length_self")?;
    non_negative(quarantine.quarantine_length_traced).at("quarantine.quarantine_length_traced")?;
    non_negative(quarantine.quarantine_length_positive)
        .at("quarantine.quarantine_length_positive")?;
    probability(quarantine.quarantine_dropout_self).at("quarantine.quarantine_dropout_self")?;
    probability(quarantine.quarantine_dropout_traced).at("quarantine.quarantine_dropout_traced")?;
    probability(quarantine.quarantine_dropout_positive)
        .at("quarantine.quarantine_dropout_positive")?;
    non_negative(quarantine.quarantine_smart_release_day)
        .at("quarantine.quarantine_smart_release_day")?;
    non_negative(quarantine.test_insensitive_period).at("quarantine.test_insensitive_period")?;
    flag(quarantine.trace_on_symptoms).at("quarantine.trace_on_symptoms")?;
    flag(quarantine.trace_on_positive).at("quarantine.trace_on_positive")
}

fn check_lockdown(lockdown: &LockdownParameters) -> Check {
    non_negative_real(lockdown.lockdown_work_network_multiplier)
        .at("lockdown.lockdown_work_network_multiplier")?;
    non_negative_real(lockdown.lockdown_random_network_multiplier)
        .at("lockdown.lockdown_random_network_multiplier")?;
    non_negative_real(lockdown.lockdown_house_interaction_multiplier)
        .at("lockdown.lockdown_house_interaction_multiplier")?;

    day("lockdown.lockdown_time_on", lockdown.lockdown_time_on)?;
    day("lockdown.lockdown_time_off", lockdown.lockdown_time_off)?;
    ordering(
        "lockdown.lockdown_time_on",
        lockdown.lockdown_time_on,
        lockdown.lockdown_time_off,
    )?;
    day(
        "lockdown.lockdown_elderly_time_on",
        lockdown.lockdown_elderly_time_on,
    )?;
    day(
        "lockdown.lockdown_elderly_time_off",
        lockdown.lockdown_elderly_time_off,
    )?;
    ordering(
        "lockdown.lockdown_elderly_time_on",
        lockdown.lockdown_elderly_time_on,
        lockdown.lockdown_elderly_time_off,
    )?;

    day(
        "lockdown.successive_lockdown_time_on",
        lockdown.successive_lockdown_time_on,
    )?;
    non_negative(lockdown.successive_lockdown_duration)
        .at("lockdown.successive_lockdown_duration")?;
    non_negative(lockdown.successive_lockdown_gap).at("lockdown.successive_lockdown_gap")?;
    if lockdown.successive_lockdown_time_on.is_some() && lockdown.successive_lockdown_duration == 0
    {
        return Err(ValidationError::new(
            "lockdown.successive_lockdown_duration",
            Constraint::NotPositive { value: 0 },
        ));
    }

    day(
        "lockdown.testing_symptoms_time_on",
        lockdown.testing_symptoms_time_on,
    )?;
    day(
        "lockdown.testing_symptoms_time_off",
        lockdown.testing_symptoms_time_off,
    )?;
    ordering(
        "lockdown.testing_symptoms_time_on",
        lockdown.testing_symptoms_time_on,
        lockdown.testing_symptoms_time_off,
    )?;
    day("lockdown.app_turn_on_time", lockdown.app_turn_on_time)
}

fn ward_table(field: &str, table: &WardTable) -> Check {
    for (ward, cell) in table.cells() {
        match cell {
            Some(value) => non_negative(value).at_index(field, ward)?,
            None => {
                return Err(ValidationError::new(
                    field,
                    Constraint::IncompleteArray {
                        index: format!("{field}[{ward}]"),
                    },
                ))
            }
        }
    }
    Ok(())
}

fn ward_worker_table(field: &str, table: &WardWorkerTable) -> Check {
    for (ward, worker, cell) in table.cells() {
        match cell {
            Some(value) => non_negative(value).at_index(field, format!("{ward}][{worker}"))?,
            None => {
                return Err(ValidationError::new(
                    field,
                    Constraint::IncompleteArray {
                        index: format!("{field}[{ward}][{worker}]"),
                    },
                ))
            }
        }
    }
    Ok(())
}

fn check_hospital(hospital: &HospitalParameters) -> Check {
    non_negative(hospital.n_hospitals).at("hospital.n_hospitals")?;
    non_negative(hospital.n_total_doctors).at("hospital.n_total_doctors")?;
    non_negative(hospital.n_total_nurses).at("hospital.n_total_nurses")?;
    ward_table("hospital.n_wards", &hospital.n_wards)?;
    ward_table("hospital.n_ward_beds", &hospital.n_ward_beds)?;
    ward_worker_table("hospital.n_hcw_per_ward", &hospital.n_hcw_per_ward)?;
    ward_worker_table(
        "hospital.n_patient_required_interactions",
        &hospital.n_patient_required_interactions,
    )?;
    non_negative(hospital.max_hcw_daily_interactions).at("hospital.max_hcw_daily_interactions")?;
    distribution("hospital.hospital_transition", &hospital.hospital_transition)?;
    non_negative_real(hospital.waiting_infectivity_modifier)
        .at("hospital.waiting_infectivity_modifier")?;
    non_negative_real(hospital.general_infectivity_modifier)
        .at("hospital.general_infectivity_modifier")?;
    non_negative_real(hospital.icu_infectivity_modifier).at("hospital.icu_infectivity_modifier")
}
