//! Unconditional outcome probabilities derived from the age-stratified outcome fractions.
//!
//! An infection in age group `g` follows the chain
//!
//! ```text
//! infection -> asymptomatic                          a
//!           -> mild                                  m
//!           -> severe symptomatic                    s = 1 - a - m
//!                -> hospitalised                     s * h
//!                     -> critical                    s * h * c
//!                          -> death                  s * h * c * f
//! ```
//!
//! where `a`, `m`, `h`, `c` and `f` are the `fraction_asymptomatic`, `mild_fraction`,
//! `hospitalised_fraction`, `critical_fraction` and `fatality_fraction` for `g`. Every stage has
//! to be a probability; `ParameterValidator` checks each one with [`OutcomeProbabilities::stages`].

use crate::parameters::set::OutcomeFractions;
use crate::parameters::types::AgeGroup;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OutcomeProbabilities {
    pub asymptomatic: f64,
    pub mild: f64,
    pub severe: f64,
    pub hospitalised: f64,
    pub critical: f64,
    pub death: f64,
}

impl OutcomeProbabilities {
    #[must_use]
    pub fn for_age_group(fractions: &OutcomeFractions, age_group: AgeGroup) -> Self {
        let asymptomatic = fractions.fraction_asymptomatic[age_group];
        let mild = fractions.mild_fraction[age_group];
        let severe = 1.0 - asymptomatic - mild;
        let hospitalised = severe * fractions.hospitalised_fraction[age_group];
        let critical = hospitalised * fractions.critical_fraction[age_group];
        let death = critical * fractions.fatality_fraction[age_group];
        OutcomeProbabilities {
            asymptomatic,
            mild,
            severe,
            hospitalised,
            critical,
            death,
        }
    }

    /// The derived stages in chain order, labelled for error reporting.
    #[must_use]
    pub fn stages(&self) -> [(&'static str, f64); 6] {
        [
            ("asymptomatic", self.asymptomatic),
            ("mild", self.mild),
            ("severe symptoms", self.severe),
            ("hospitalisation", self.hospitalised),
            ("critical care", self.critical),
            ("death", self.death),
        ]
    }

    /// The probability of symptoms of any severity.
    #[must_use]
    pub fn symptomatic(&self) -> f64 {
        1.0 - self.asymptomatic
    }
}
