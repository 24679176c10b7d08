//! The reference household table.
//!
//! Each row describes the composition of one reference household (typically the number of
//! members in each age group) and the population builder samples rows from it. The table is
//! filled by the household-demographics loader and read later by a different collaborator, so
//! it tracks its lifecycle explicitly:
//!
//! ```text
//! Unpopulated --populate()--> Populated --release()--> Released
//! ```
//!
//! Rows are stored in a single contiguous row-major buffer; every access is bounds checked
//! against the row count fixed at population time.

use crate::error::HouseholdTableError;
use crate::log::{debug, warn, AuditTarget};

const AUDIT: &str = AuditTarget::Households.target();

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum TableState {
    #[default]
    Unpopulated,
    Populated {
        rows: usize,
        width: usize,
        data: Vec<u32>,
    },
    Released,
}

/// Row-major table of reference household compositions, owned by the
/// [`ParameterSet`](crate::parameters::ParameterSet).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceHouseholdTable {
    state: TableState,
}

impl ReferenceHouseholdTable {
    #[must_use]
    pub fn new() -> Self {
        ReferenceHouseholdTable::default()
    }

    /// Fills the table with `rows` rows of `width` entries taken from `data` in row-major
    /// order. May be called once; a second call fails and leaves the table untouched.
    pub fn populate(
        &mut self,
        rows: usize,
        width: usize,
        data: Vec<u32>,
    ) -> Result<(), HouseholdTableError> {
        match self.state {
            TableState::Unpopulated => {}
            TableState::Populated { .. } => return Err(HouseholdTableError::AlreadyPopulated),
            TableState::Released => return Err(HouseholdTableError::UseAfterRelease),
        }
        if rows == 0 || width == 0 {
            return Err(HouseholdTableError::InvalidShape { rows, width });
        }
        let expected = rows
            .checked_mul(width)
            .ok_or(HouseholdTableError::InvalidShape { rows, width })?;
        if data.len() != expected {
            return Err(HouseholdTableError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        debug!(target: AUDIT, "Populated reference household table with {rows} rows of width {width}");
        self.state = TableState::Populated { rows, width, data };
        Ok(())
    }

    /// Returns row `index`.
    pub fn row(&self, index: usize) -> Result<&[u32], HouseholdTableError> {
        let (rows, width, data) = self.populated()?;
        if index >= rows {
            return Err(HouseholdTableError::OutOfRange { index, rows });
        }
        let start = index * width;
        Ok(&data[start..start + width])
    }

    /// Total number of people in row `index`.
    pub fn row_total(&self, index: usize) -> Result<u64, HouseholdTableError> {
        Ok(self.row(index)?.iter().map(|&count| u64::from(count)).sum())
    }

    /// Iterates over all rows in order.
    pub fn rows(&self) -> Result<std::slice::ChunksExact<'_, u32>, HouseholdTableError> {
        let (_, width, data) = self.populated()?;
        Ok(data.chunks_exact(width))
    }

    /// The number of reference households.
    pub fn n_rows(&self) -> Result<usize, HouseholdTableError> {
        self.populated().map(|(rows, _, _)| rows)
    }

    pub fn width(&self) -> Result<usize, HouseholdTableError> {
        self.populated().map(|(_, width, _)| width)
    }

    #[must_use]
    pub fn is_populated(&self) -> bool {
        matches!(self.state, TableState::Populated { .. })
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.state == TableState::Released
    }

    /// Frees the table's storage. Any later access fails with
    /// [`HouseholdTableError::UseAfterRelease`].
    pub fn release(&mut self) {
        match std::mem::replace(&mut self.state, TableState::Released) {
            TableState::Populated { rows, .. } => {
                debug!(target: AUDIT, "Released reference household table of {rows} rows");
            }
            TableState::Unpopulated => {
                debug!(target: AUDIT, "Released reference household table that was never populated");
            }
            TableState::Released => warn!(target: AUDIT, "Reference household table released twice"),
        }
    }

    /// Checks that the table can be read, without reading it.
    pub fn ensure_populated(&self) -> Result<(), HouseholdTableError> {
        self.populated().map(|_| ())
    }

    fn populated(&self) -> Result<(usize, usize, &[u32]), HouseholdTableError> {
        match &self.state {
            TableState::Populated { rows, width, data } => {
                Ok((*rows, *width, data.as_slice()))
            }
            TableState::Unpopulated => Err(HouseholdTableError::Unpopulated),
            TableState::Released => Err(HouseholdTableError::UseAfterRelease),
        }
    }
}
