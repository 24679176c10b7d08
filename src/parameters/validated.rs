//! The runtime handle to a parameter set that has passed validation.

use std::ops::Deref;

use crate::error::{AccessError, ValidationError};
use crate::log::{error, info, AuditTarget};
use crate::parameters::runtime::{
    write_runtime_parameter, ParameterValue, RuntimeParameter, RuntimeParameterExt,
};
use crate::parameters::set::{InterventionParameters, ParameterSet};
use crate::parameters::types::{AgeType, InteractionType, WorkNetwork};
use crate::parameters::validator::ParameterValidator;

const AUDIT: &str = AuditTarget::Validation.target();

/// A [`ParameterSet`] that passed [`ParameterValidator::validate`].
///
/// This is the only way to reach the runtime write path, so a simulation never runs on an
/// unchecked set. It dereferences to the underlying `ParameterSet` for reads, but there is no
/// mutable access: after validation the static fields are fixed and the runtime parameters can
/// only change through [`RuntimeParameterExt::set_runtime_parameter`], which keeps them in
/// their domains.
#[derive(Debug)]
pub struct ValidatedParameters {
    parameters: ParameterSet,
}

impl ValidatedParameters {
    /// Validates `parameters` and takes ownership of them.
    ///
    /// # Errors
    /// Returns the first violation found by [`ParameterValidator::validate`]. The run must not
    /// start.
    pub fn new(parameters: ParameterSet) -> Result<Self, ValidationError> {
        if let Err(e) = ParameterValidator::validate(&parameters) {
            error!(target: AUDIT, "Parameter set {} is invalid: {e}", parameters.run.param_id);
            return Err(e);
        }
        info!(target: AUDIT, "Validated parameter set {}", parameters.run.param_id);
        Ok(ValidatedParameters { parameters })
    }

    /// Gives back the parameter set. Changing it means validating it again.
    #[must_use]
    pub fn into_inner(self) -> ParameterSet {
        self.parameters
    }

    /// Ends the run's use of the parameters: releases the reference household table and drops
    /// the rest.
    pub fn teardown(mut self) {
        self.parameters.release();
        info!(target: AUDIT, "Released parameter set {}", self.parameters.run.param_id);
    }

    /// The fraction of a work network met each day, after any lockdown in force.
    #[must_use]
    pub fn effective_daily_fraction_work(&self, network: WorkNetwork) -> f64 {
        let interventions = &self.parameters.interventions;
        let base = self.parameters.network.daily_fraction_work;
        if interventions.is_lockdown_on()
            || (interventions.is_lockdown_elderly_on() && network.is_elderly())
        {
            base * self.parameters.lockdown.lockdown_work_network_multiplier
        } else {
            base
        }
    }

    /// The relative transmission of an interaction type, after any lockdown in force.
    #[must_use]
    pub fn effective_relative_transmission(&self, interaction: InteractionType) -> f64 {
        let base = self.parameters.network.relative_transmission_by_type[interaction];
        if interaction == InteractionType::Household
            && self.parameters.interventions.is_lockdown_on()
        {
            base * self.parameters.lockdown.lockdown_house_interaction_multiplier
        } else {
            base
        }
    }

    /// The factor applied to the daily random interactions of people of `age_type`.
    #[must_use]
    pub fn effective_random_interaction_multiplier(&self, age_type: AgeType) -> f64 {
        let interventions = &self.parameters.interventions;
        if interventions.is_lockdown_on()
            || (interventions.is_lockdown_elderly_on() && age_type == AgeType::Elderly)
        {
            self.parameters.lockdown.lockdown_random_network_multiplier
        } else {
            1.0
        }
    }
}

impl Deref for ValidatedParameters {
    type Target = ParameterSet;

    fn deref(&self) -> &ParameterSet {
        &self.parameters
    }
}

impl RuntimeParameterExt for ValidatedParameters {
    fn get_runtime_parameter(&self, parameter: RuntimeParameter) -> ParameterValue {
        parameter.entry().read(&self.parameters.interventions)
    }

    fn set_runtime_parameter(
        &mut self,
        parameter: RuntimeParameter,
        value: impl Into<ParameterValue>,
    ) -> Result<ParameterValue, AccessError> {
        write_runtime_parameter(&mut self.parameters, parameter, value.into())
    }

    fn intervention_snapshot(&self) -> InterventionParameters {
        self.parameters.interventions
    }
}
