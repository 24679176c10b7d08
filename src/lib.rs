//! Validated, runtime-mutable parameters for agent-based epidemic simulations
//!
//! This crate is the configuration core of an epidemic model: it holds every static and
//! dynamic parameter for disease progression, network structure, interventions (quarantine,
//! testing, contact tracing, lockdowns) and hospital resourcing, and it controls how a running
//! simulation may change them.
//!
//! The lifecycle of a run is:
//! * A loader fills a [`ParameterSet`](parameters::ParameterSet), usually by deserializing it
//!   with `serde`, and populates its reference household table.
//! * [`ValidatedParameters::new`](parameters::ValidatedParameters::new) checks every static
//!   and cross-field invariant. An invalid set never reaches the simulation.
//! * Between ticks the simulation (or an [`InterventionSchedule`](schedule::InterventionSchedule))
//!   changes whitelisted [`RuntimeParameter`](parameters::RuntimeParameter)s through
//!   [`RuntimeParameterExt`](parameters::RuntimeParameterExt). Out-of-domain writes are
//!   rejected and leave the previous value in place.
//! * At the end of the run the household table is released.
//!
//! ```rust
//! use ixa_epi_params::prelude::*;
//!
//! let mut parameters = ParameterSet::default();
//! parameters.households.populate(1, 3, vec![1, 2, 0]).unwrap();
//! let mut parameters = ValidatedParameters::new(parameters).unwrap();
//!
//! parameters
//!     .set_runtime_parameter(RuntimeParameter::LockdownOn, 1)
//!     .unwrap();
//! assert!(parameters
//!     .set_runtime_parameter(RuntimeParameter::AppUsersFraction, 1.2)
//!     .is_err());
//! parameters.teardown();
//! ```
pub mod error;
pub mod hashing;
pub mod log;
pub mod numeric;
pub mod parameters;
pub mod prelude;
pub mod schedule;

mod macros;

pub use error::ParamsError;
pub use hashing::{HashMap, HashMapExt, HashSet, HashSetExt};
pub use crate::log::{debug, error, info, trace, warn};
