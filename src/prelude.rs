pub use crate::error::{
    AccessError, Constraint, HouseholdTableError, ParamsError, ValidationError,
};
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::parameters::{
    AgeGroup, AgeType, InteractionType, InterventionParameters, OutcomeProbabilities,
    ParameterSet, ParameterValidator, ParameterValue, ReferenceHouseholdTable, RuntimeParameter,
    RuntimeParameterExt, ValidatedParameters, WorkNetwork,
};
pub use crate::schedule::{ChangePriority, InterventionSchedule, ScheduledChange};
pub use crate::{assert_almost_eq, define_indexed_array};
