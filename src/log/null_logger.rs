/*!

Without the `logging` feature nothing is installed. The configuration only raises or lowers the
`log` crate's max level, which a logger installed by the host respects.

*/

use crate::log::LogConfiguration;

impl LogConfiguration {
    pub(in crate::log) fn set_config(&mut self) {
        log::set_max_level(self.max_level());
    }
}
