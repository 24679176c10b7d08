use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::log::LogConfiguration;

const APPENDER: &str = "audit";
// Timestamp, level, audit target, message
const AUDIT_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l:<5})} [{t}] {m}{n}";

impl LogConfiguration {
    /// Installs or reconfigures the `log4rs` logger: one stderr appender shared by a logger per
    /// audit target. If the host installed its own logger first, only the `log` crate's max level
    /// is changed and the host decides where records go.
    pub(in crate::log) fn set_config(&mut self) {
        let appender = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(AUDIT_PATTERN)))
            .build();
        let loggers = self
            .target_levels()
            .map(|(target, level)| Logger::builder().build(target.target(), level));
        let config = Config::builder()
            .appender(Appender::builder().build(APPENDER, Box::new(appender)))
            .loggers(loggers)
            .build(Root::builder().appender(APPENDER).build(self.global_log_level));

        let config = match config {
            Ok(config) => config,
            // Appender and logger names are fixed.
            Err(e) => panic!("invalid audit log configuration: {e}"),
        };

        match self.root_handle {
            Some(ref handle) => handle.set_config(config),
            None => match log4rs::init_config(config) {
                Ok(handle) => self.root_handle = Some(handle),
                Err(_) => log::set_max_level(self.max_level()),
            },
        }
    }
}
