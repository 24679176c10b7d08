//! Audit logging for the parameter layer. This is a record of how parameters were checked and
//! changed, not simulation output.
//!
//! This module (re)exports the five logging macros: `error!`, `warn!`, `info!`, `debug!` and
//! `trace!`. Every record the crate emits goes to one of four [`AuditTarget`]s:
//!
//!  - [`AuditTarget::Validation`]: `error!` when a parameter set fails validation, `info!` when it
//!    passes or is torn down,
//!  - [`AuditTarget::Runtime`]: `warn!` when a runtime write is rejected, `info!` when a runtime
//!    parameter changes (with the old and new value), `trace!` for writes of the current value,
//!  - [`AuditTarget::Households`]: `debug!` on population and release of the household table,
//!  - [`AuditTarget::Schedule`]: `debug!` for each applied change, `warn!` for skipped ones.
//!
//! Logging is _disabled_ by default. [`set_log_level`] sets the level for everything;
//! [`set_audit_level`] overrides it for a single target.
//!
//! ```rust
//! use ixa_epi_params::log::{set_audit_level, set_log_level, AuditTarget, LevelFilter};
//!
//! // Quiet by default, but keep the trail of runtime parameter changes.
//! set_log_level(LevelFilter::Warn);
//! set_audit_level(AuditTarget::Runtime, LevelFilter::Info);
//! ```
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};

#[cfg(feature = "logging")]
use log4rs::Handle;
use std::sync::LazyLock;
use std::sync::{Mutex, MutexGuard};
use strum::{EnumCount, EnumIter, IntoEnumIterator};

static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// The log targets the crate writes its audit records to.
///
/// Targets sit under the crate name, so a host filtering on `ixa_epi_params` covers all of them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, EnumCount)]
pub enum AuditTarget {
    Validation,
    Runtime,
    Households,
    Schedule,
}

impl AuditTarget {
    /// The `target:` the crate's log macros use for this kind of record.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            AuditTarget::Validation => "ixa_epi_params::validation",
            AuditTarget::Runtime => "ixa_epi_params::runtime",
            AuditTarget::Households => "ixa_epi_params::households",
            AuditTarget::Schedule => "ixa_epi_params::schedule",
        }
    }
}

/// The global logging state. The public API is the free functions below, which lock the
/// singleton.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// Applies to every target without an override. `LevelFilter::Off` silences them.
    pub(in crate::log) global_log_level: LevelFilter,
    /// Per-target overrides, indexed by `AuditTarget as usize`.
    pub(in crate::log) audit_levels: [Option<LevelFilter>; AuditTarget::COUNT],

    #[cfg(feature = "logging")]
    /// Handle to the `log4rs` logger, if this crate installed it.
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: LevelFilter::Off,
            audit_levels: [None; AuditTarget::COUNT],

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    /// The levels in force, one per target.
    pub(in crate::log) fn target_levels(
        &self,
    ) -> impl Iterator<Item = (AuditTarget, LevelFilter)> + '_ {
        AuditTarget::iter().map(|target| {
            (
                target,
                self.audit_levels[target as usize].unwrap_or(self.global_log_level),
            )
        })
    }

    /// The most verbose level any target admits. Used as the `log` crate's max level when the
    /// records are left to a logger installed by the host.
    pub(in crate::log) fn max_level(&self) -> LevelFilter {
        self.target_levels()
            .map(|(_, level)| level)
            .fold(self.global_log_level, Ord::max)
    }
}

/// Turns on every log record. Equivalent to `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Turns off every log record that has no per-target override.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the level for every target without a per-target override.
pub fn set_log_level(level: LevelFilter) {
    let mut config = get_log_configuration();
    config.global_log_level = level;
    config.set_config();
}

/// Overrides the level for one audit target.
pub fn set_audit_level(target: AuditTarget, level: LevelFilter) {
    let mut config = get_log_configuration();
    if config.audit_levels[target as usize].replace(level) != Some(level) {
        config.set_config();
    }
}

/// Removes the override for `target`, so the global level applies to it again.
pub fn clear_audit_level(target: AuditTarget) {
    let mut config = get_log_configuration();
    if config.audit_levels[target as usize].take().is_some() {
        config.set_config();
    }
}

fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION.lock().expect("Mutex poisoned")
}

#[cfg(test)]
mod tests {
    use super::{
        clear_audit_level, get_log_configuration, set_audit_level, set_log_level, AuditTarget,
    };
    use log::{error, trace, LevelFilter};
    use std::sync::{LazyLock, Mutex};
    use strum::IntoEnumIterator;

    // Logging state is global.
    static TEST_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

    #[test]
    fn global_level_applies_to_every_target() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        set_log_level(LevelFilter::Error);
        {
            let config = get_log_configuration();
            assert!(config.target_levels().all(|(_, level)| level == LevelFilter::Error));
            error!(target: AuditTarget::Validation.target(), "emitted at error");
            trace!(target: AuditTarget::Validation.target(), "NOT EMITTED");
        }
        set_log_level(LevelFilter::Off);
        assert_eq!(get_log_configuration().max_level(), LevelFilter::Off);
    }

    #[test]
    fn audit_override_outlives_global_changes() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        set_log_level(LevelFilter::Warn);
        set_audit_level(AuditTarget::Runtime, LevelFilter::Info);
        set_log_level(LevelFilter::Error);
        {
            let config = get_log_configuration();
            let levels: Vec<_> = config.target_levels().collect();
            assert_eq!(
                levels,
                vec![
                    (AuditTarget::Validation, LevelFilter::Error),
                    (AuditTarget::Runtime, LevelFilter::Info),
                    (AuditTarget::Households, LevelFilter::Error),
                    (AuditTarget::Schedule, LevelFilter::Error),
                ]
            );
            assert_eq!(config.max_level(), LevelFilter::Info);
        }

        clear_audit_level(AuditTarget::Runtime);
        assert!(get_log_configuration().audit_levels.iter().all(Option::is_none));
        set_log_level(LevelFilter::Off);
    }

    #[test]
    fn targets_are_distinct_and_under_the_crate() {
        let targets: Vec<_> = AuditTarget::iter().map(AuditTarget::target).collect();
        for (i, target) in targets.iter().enumerate() {
            assert!(target.starts_with("ixa_epi_params::"));
            assert!(!targets[i + 1..].contains(target));
        }
    }
}
