//! The parameter set of an epidemic simulation and the rules for changing it.
//!
//! A run goes through three stages:
//!
//! 1. A loader fills a [`ParameterSet`] (usually through `serde`) and populates its
//!    [`ReferenceHouseholdTable`].
//! 2. [`ValidatedParameters::new`] runs the [`ParameterValidator`] over the set. Any violation is
//!    fatal and the run does not start.
//! 3. While the simulation runs, the whitelisted [`RuntimeParameter`]s are read and written
//!    through [`RuntimeParameterExt`]. Everything else is read-only.
//!
//! At the end of the run [`ValidatedParameters::teardown`] releases the household table.

mod hospital;
mod household;
mod outcomes;
mod runtime;
mod set;
mod types;
mod validated;
mod validator;

pub use hospital::{WardTable, WardWorkerTable};
pub use household::ReferenceHouseholdTable;
pub use outcomes::OutcomeProbabilities;
pub use runtime::{
    Domain, FieldLimit, ParameterValue, RuntimeParameter, RuntimeParameterEntry,
    RuntimeParameterExt, RUNTIME_PARAMETER_TABLE,
};
pub use set::{
    DiseaseParameters, Distribution, HospitalParameters, InterventionParameters,
    LockdownParameters, NetworkParameters, OutcomeFractions, ParameterSet, QuarantineParameters,
    RunControl, MAX_DAILY_INTERACTIONS_KEPT, MAX_TEST_WAIT_DAYS,
};
pub use types::{
    AgeGroup, AgeType, ByAgeGroup, ByAgeType, ByHouseholdSize, ByInteractionType, ByWorkNetwork,
    HospitalWardType, HouseholdSize, InteractionType, RandomInteractionDistribution, WorkNetwork,
    WorkerType, N_AGE_GROUPS, N_AGE_TYPES, N_HOSPITAL_WARD_TYPES, N_HOUSEHOLD_MAX,
    N_INTERACTION_TYPES, N_WORKER_TYPES, N_WORK_NETWORKS,
};
pub use validated::ValidatedParameters;
pub use validator::ParameterValidator;
