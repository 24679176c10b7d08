//! The aggregate parameter set.
//!
//! Fields are grouped by domain into sections. Each section is plain data that an external
//! loader fills through `serde`; nothing here knows about any file syntax. The defaults are a
//! complete baseline parameterisation that passes validation once the reference household table
//! has been populated.
//!
//! Lockdown and other on/off day markers are `Option<i32>`: `None` means "never".

use serde::{Deserialize, Serialize};

use crate::parameters::hospital::{WardTable, WardWorkerTable};
use crate::parameters::household::ReferenceHouseholdTable;
use crate::parameters::types::{
    ByAgeGroup, ByAgeType, ByHouseholdSize, ByInteractionType, ByWorkNetwork,
    RandomInteractionDistribution,
};

/// The maximum number of days of interactions the engine keeps for contact tracing.
pub const MAX_DAILY_INTERACTIONS_KEPT: i32 = 10;
/// The maximum wait, in days, for a test to be ordered or for its result to arrive.
pub const MAX_TEST_WAIT_DAYS: i32 = 10;

/// A mean and standard deviation pair. A standard deviation of zero describes a deterministic
/// duration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub mean: f64,
    pub sd: f64,
}

impl Distribution {
    #[must_use]
    pub fn new(mean: f64, sd: f64) -> Self {
        Distribution { mean, sd }
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.sd == 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunControl {
    pub rng_seed: i64,
    pub param_id: i64,
    /// Total number of people.
    pub n_total: i64,
    /// Number of days of interactions to keep.
    pub days_of_interactions: i32,
    /// Last simulated day.
    pub end_time: i32,
    /// Number of people seeded with the infection.
    pub n_seed_infection: i32,
    /// Whether the engine writes a per-individual output file (0/1).
    pub sys_write_individual: i32,
}

impl Default for RunControl {
    fn default() -> Self {
        RunControl {
            rng_seed: 1,
            param_id: 1,
            n_total: 250_000,
            days_of_interactions: 10,
            end_time: 200,
            n_seed_infection: 10,
            sys_write_individual: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub mean_random_interactions: ByAgeType<f64>,
    pub sd_random_interactions: ByAgeType<f64>,
    pub random_interaction_distribution: RandomInteractionDistribution,
    pub mean_work_interactions: ByWorkNetwork<f64>,
    /// Fraction of the regular work network met each day without social distancing.
    pub daily_fraction_work: f64,
    /// Fraction of adults in the child networks.
    pub child_network_adults: f64,
    /// Fraction of adults in the elderly networks.
    pub elderly_network_adults: f64,
    pub relative_transmission_by_type: ByInteractionType<f64>,
    pub relative_susceptibility: ByAgeGroup<f64>,
    /// Number of households of each size, in thousands.
    pub household_size: ByHouseholdSize<f64>,
    /// Population by age group, in millions.
    pub population_group: ByAgeGroup<f64>,
    /// Population by age type, in millions.
    pub population_type: ByAgeType<f64>,
    pub quarantined_daily_interactions: i32,
    pub hospitalised_daily_interactions: i32,
}

impl Default for NetworkParameters {
    fn default() -> Self {
        NetworkParameters {
            mean_random_interactions: ByAgeType::new([2.0, 4.0, 3.0]),
            sd_random_interactions: ByAgeType::new([2.0, 4.0, 3.0]),
            random_interaction_distribution: RandomInteractionDistribution::NegativeBinomial,
            mean_work_interactions: ByWorkNetwork::new([10.0, 10.0, 7.0, 3.0, 3.0]),
            daily_fraction_work: 0.5,
            child_network_adults: 0.2,
            elderly_network_adults: 0.2,
            relative_transmission_by_type: ByInteractionType::new([2.0, 1.0, 1.0]),
            relative_susceptibility: ByAgeGroup::new([
                0.71, 0.74, 0.79, 0.87, 0.98, 1.11, 1.26, 1.45, 1.66,
            ]),
            household_size: ByHouseholdSize::new([7452.0, 9936.0, 4416.0, 4140.0, 1104.0, 552.0]),
            population_group: ByAgeGroup::new([
                7.639, 7.152, 8.556, 8.901, 8.413, 8.963, 7.037, 5.408, 3.237,
            ]),
            population_type: ByAgeType::new([14.791, 41.870, 8.645]),
            quarantined_daily_interactions: 0,
            hospitalised_daily_interactions: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiseaseParameters {
    /// Mean total number of people infected by a mean person.
    pub infectious_rate: f64,
    pub infectious_period: Distribution,
    /// Time from infection to symptoms.
    pub time_to_symptoms: Distribution,
    pub asymptomatic_to_recovery: Distribution,
    /// Time to recover after hospital.
    pub time_to_recover: Distribution,
    /// Time to death after hospital.
    pub time_to_death: Distribution,
    /// Mean time from symptoms to hospital.
    pub mean_time_to_hospital: f64,
    /// Mean time from hospitalised to critical care.
    pub mean_time_to_critical: f64,
    pub asymptomatic_infectious_factor: f64,
    pub mild_infectious_factor: f64,
    pub seasonal_flu_rate: f64,
}

impl Default for DiseaseParameters {
    fn default() -> Self {
        DiseaseParameters {
            infectious_rate: 3.0,
            infectious_period: Distribution::new(5.5, 2.14),
            time_to_symptoms: Distribution::new(5.42, 2.7),
            asymptomatic_to_recovery: Distribution::new(15.0, 5.0),
            time_to_recover: Distribution::new(12.0, 5.0),
            time_to_death: Distribution::new(11.74, 8.79),
            mean_time_to_hospital: 5.14,
            mean_time_to_critical: 2.27,
            asymptomatic_infectious_factor: 0.33,
            mild_infectious_factor: 0.72,
            seasonal_flu_rate: 0.0001,
        }
    }
}

/// Age-stratified disease outcomes. `fraction_asymptomatic` and `mild_fraction` are fractions
/// of all infections; the remaining fractions are conditional on the previous stage (see
/// [`OutcomeProbabilities`](crate::parameters::OutcomeProbabilities)).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeFractions {
    pub fraction_asymptomatic: ByAgeGroup<f64>,
    pub mild_fraction: ByAgeGroup<f64>,
    /// Fraction of severe symptomatic cases requiring hospitalisation.
    pub hospitalised_fraction: ByAgeGroup<f64>,
    /// Fraction of hospitalised patients requiring critical care.
    pub critical_fraction: ByAgeGroup<f64>,
    /// Fraction of critical patients who die.
    pub fatality_fraction: ByAgeGroup<f64>,
}

impl Default for OutcomeFractions {
    fn default() -> Self {
        OutcomeFractions {
            fraction_asymptomatic: ByAgeGroup::splat(0.18),
            mild_fraction: ByAgeGroup::new([
                0.79, 0.79, 0.73, 0.73, 0.73, 0.59, 0.59, 0.59, 0.59,
            ]),
            hospitalised_fraction: ByAgeGroup::new([
                0.001, 0.006, 0.015, 0.069, 0.219, 0.279, 0.370, 0.391, 0.379,
            ]),
            critical_fraction: ByAgeGroup::new([
                0.050, 0.050, 0.050, 0.050, 0.063, 0.122, 0.274, 0.432, 0.709,
            ]),
            fatality_fraction: ByAgeGroup::new([
                0.33, 0.25, 0.5, 0.5, 0.5, 0.69, 0.65, 0.88, 1.0,
            ]),
        }
    }
}

/// The intervention parameters the simulation may change while it runs. They are read and
/// written through [`RuntimeParameterExt`](crate::parameters::RuntimeParameterExt) once the
/// parameter set has been validated; the values given here are the initial ones.
///
/// Flags are 0 or 1.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterventionParameters {
    pub test_on_symptoms: i32,
    pub test_on_traced: i32,
    pub quarantine_on_traced: i32,
    /// Proportion of interactions that are traceable even if both people use the app.
    pub traceable_interaction_fraction: f64,
    /// Number of layers of the interaction network traced recursively.
    pub tracing_network_depth: i32,
    pub allow_clinical_diagnosis: i32,
    pub quarantine_household_on_positive: i32,
    pub quarantine_household_on_symptoms: i32,
    pub quarantine_household_on_traced: i32,
    pub quarantine_household_contacts_on_positive: i32,
    pub quarantine_household_contacts_on_symptoms: i32,
    /// Number of days of previous contacts to quarantine.
    pub quarantine_days: i32,
    pub test_order_wait: i32,
    pub test_result_wait: i32,
    /// Fraction of people who self-quarantine on symptoms.
    pub self_quarantine_fraction: f64,
    pub lockdown_on: i32,
    pub lockdown_elderly_on: i32,
    pub app_turned_on: i32,
    pub app_users_fraction: f64,
}

impl Default for InterventionParameters {
    fn default() -> Self {
        InterventionParameters {
            test_on_symptoms: 0,
            test_on_traced: 0,
            quarantine_on_traced: 0,
            traceable_interaction_fraction: 0.8,
            tracing_network_depth: 0,
            allow_clinical_diagnosis: 1,
            quarantine_household_on_positive: 0,
            quarantine_household_on_symptoms: 0,
            quarantine_household_on_traced: 0,
            quarantine_household_contacts_on_positive: 0,
            quarantine_household_contacts_on_symptoms: 0,
            quarantine_days: 7,
            test_order_wait: 1,
            test_result_wait: 1,
            self_quarantine_fraction: 0.0,
            lockdown_on: 0,
            lockdown_elderly_on: 0,
            app_turned_on: 0,
            app_users_fraction: 0.85,
        }
    }
}

impl InterventionParameters {
    #[must_use]
    pub fn is_lockdown_on(&self) -> bool {
        self.lockdown_on == 1
    }

    #[must_use]
    pub fn is_lockdown_elderly_on(&self) -> bool {
        self.lockdown_elderly_on == 1
    }

    #[must_use]
    pub fn is_app_turned_on(&self) -> bool {
        self.app_turned_on == 1
    }
}

/// Quarantine parameters that stay fixed for the whole run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuarantineParameters {
    pub quarantine_length_self: i32,
    pub quarantine_length_traced: i32,
    pub quarantine_length_positive: i32,
    /// Daily dropout rates.
    pub quarantine_dropout_self: f64,
    pub quarantine_dropout_traced: f64,
    pub quarantine_dropout_positive: f64,
    /// Days until a traced person with no further contacts is released.
    pub quarantine_smart_release_day: i32,
    /// Days until a test is sensitive.
    pub test_insensitive_period: i32,
    pub trace_on_symptoms: i32,
    pub trace_on_positive: i32,
}

impl Default for QuarantineParameters {
    fn default() -> Self {
        QuarantineParameters {
            quarantine_length_self: 7,
            quarantine_length_traced: 14,
            quarantine_length_positive: 14,
            quarantine_dropout_self: 0.02,
            quarantine_dropout_traced: 0.04,
            quarantine_dropout_positive: 0.01,
            quarantine_smart_release_day: 0,
            test_insensitive_period: 3,
            trace_on_symptoms: 0,
            trace_on_positive: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LockdownParameters {
    pub lockdown_work_network_multiplier: f64,
    pub lockdown_random_network_multiplier: f64,
    pub lockdown_house_interaction_multiplier: f64,
    #[serde(default)]
    pub lockdown_time_on: Option<i32>,
    #[serde(default)]
    pub lockdown_time_off: Option<i32>,
    #[serde(default)]
    pub lockdown_elderly_time_on: Option<i32>,
    #[serde(default)]
    pub lockdown_elderly_time_off: Option<i32>,
    #[serde(default)]
    pub successive_lockdown_time_on: Option<i32>,
    pub successive_lockdown_duration: i32,
    pub successive_lockdown_gap: i32,
    #[serde(default)]
    pub testing_symptoms_time_on: Option<i32>,
    #[serde(default)]
    pub testing_symptoms_time_off: Option<i32>,
    /// Day after which the app is usable.
    #[serde(default)]
    pub app_turn_on_time: Option<i32>,
}

impl Default for LockdownParameters {
    fn default() -> Self {
        LockdownParameters {
            lockdown_work_network_multiplier: 0.29,
            lockdown_random_network_multiplier: 0.29,
            lockdown_house_interaction_multiplier: 1.5,
            lockdown_time_on: None,
            lockdown_time_off: None,
            lockdown_elderly_time_on: None,
            lockdown_elderly_time_off: None,
            successive_lockdown_time_on: None,
            successive_lockdown_duration: 0,
            successive_lockdown_gap: 0,
            testing_symptoms_time_on: None,
            testing_symptoms_time_off: None,
            app_turn_on_time: None,
        }
    }
}

/// Hospital resourcing. Ward tables default to empty when missing from the input so that an
/// incomplete input is reported by the validator instead of being filled with zeros.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HospitalParameters {
    pub n_hospitals: i32,
    pub n_total_doctors: i32,
    pub n_total_nurses: i32,
    #[serde(default)]
    pub n_wards: WardTable,
    #[serde(default)]
    pub n_ward_beds: WardTable,
    #[serde(default)]
    pub n_hcw_per_ward: WardWorkerTable,
    #[serde(default)]
    pub n_patient_required_interactions: WardWorkerTable,
    pub max_hcw_daily_interactions: i32,
    /// Time to move between hospital locations.
    pub hospital_transition: Distribution,
    pub waiting_infectivity_modifier: f64,
    pub general_infectivity_modifier: f64,
    pub icu_infectivity_modifier: f64,
}

impl Default for HospitalParameters {
    fn default() -> Self {
        HospitalParameters {
            n_hospitals: 1,
            n_total_doctors: 200,
            n_total_nurses: 600,
            n_wards: WardTable::filled([20, 10]),
            n_ward_beds: WardTable::filled([30, 10]),
            n_hcw_per_ward: WardWorkerTable::filled([[1, 4], [2, 6]]),
            n_patient_required_interactions: WardWorkerTable::filled([[2, 4], [4, 8]]),
            max_hcw_daily_interactions: 20,
            hospital_transition: Distribution::new(1.0, 0.5),
            waiting_infectivity_modifier: 1.0,
            general_infectivity_modifier: 0.5,
            icu_infectivity_modifier: 0.25,
        }
    }
}

/// Every static and dynamic parameter of a simulation run, plus the reference household table.
///
/// A `ParameterSet` is created and filled by a loader, checked once by
/// [`ParameterValidator`](crate::parameters::ParameterValidator), and then handed to
/// [`ValidatedParameters`](crate::parameters::ValidatedParameters), which becomes its single
/// owner for the rest of the run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub run: RunControl,
    pub network: NetworkParameters,
    pub disease: DiseaseParameters,
    pub outcomes: OutcomeFractions,
    pub interventions: InterventionParameters,
    pub quarantine: QuarantineParameters,
    pub lockdown: LockdownParameters,
    pub hospital: HospitalParameters,
    /// Populated separately by the household-demographics loader.
    #[serde(skip)]
    pub households: ReferenceHouseholdTable,
}

impl ParameterSet {
    /// Releases the reference household table. The rest of the set stays readable.
    pub fn release(&mut self) {
        self.households.release();
    }
}
