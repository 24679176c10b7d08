//! Hospital resourcing tables.
//!
//! The loader fills these cell by cell, so every cell starts out empty and the validator
//! rejects a table with any cell left unfilled. A missing cell is never read as zero.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::parameters::types::{
    HospitalWardType, WorkerType, N_HOSPITAL_WARD_TYPES, N_WORKER_TYPES,
};

/// One optional count per ward type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WardTable([Option<i32>; N_HOSPITAL_WARD_TYPES]);

impl WardTable {
    /// A table with every cell filled.
    #[must_use]
    pub fn filled(values: [i32; N_HOSPITAL_WARD_TYPES]) -> Self {
        WardTable(values.map(Some))
    }

    #[must_use]
    pub fn get(&self, ward: HospitalWardType) -> Option<i32> {
        self.0[ward as usize]
    }

    pub fn set(&mut self, ward: HospitalWardType, value: i32) {
        self.0[ward as usize] = Some(value);
    }

    pub fn clear(&mut self, ward: HospitalWardType) {
        self.0[ward as usize] = None;
    }

    pub fn cells(&self) -> impl Iterator<Item = (HospitalWardType, Option<i32>)> + '_ {
        HospitalWardType::iter().map(|ward| (ward, self.get(ward)))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }
}

/// One optional count per (ward type, worker type) pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WardWorkerTable([[Option<i32>; N_WORKER_TYPES]; N_HOSPITAL_WARD_TYPES]);

impl WardWorkerTable {
    /// A table with every cell filled; rows are ward types, columns worker types.
    #[must_use]
    pub fn filled(values: [[i32; N_WORKER_TYPES]; N_HOSPITAL_WARD_TYPES]) -> Self {
        WardWorkerTable(values.map(|row| row.map(Some)))
    }

    #[must_use]
    pub fn get(&self, ward: HospitalWardType, worker: WorkerType) -> Option<i32> {
        self.0[ward as usize][worker as usize]
    }

    pub fn set(&mut self, ward: HospitalWardType, worker: WorkerType, value: i32) {
        self.0[ward as usize][worker as usize] = Some(value);
    }

    pub fn clear(&mut self, ward: HospitalWardType, worker: WorkerType) {
        self.0[ward as usize][worker as usize] = None;
    }

    pub fn cells(
        &self,
    ) -> impl Iterator<Item = (HospitalWardType, WorkerType, Option<i32>)> + '_ {
        HospitalWardType::iter().flat_map(move |ward| {
            WorkerType::iter().map(move |worker| (ward, worker, self.get(ward, worker)))
        })
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.iter().flatten().all(Option::is_some)
    }

    /// The number of `worker`s needed to staff `n_wards` wards of each type in one hospital, or
    /// `None` if any cell involved is missing.
    #[must_use]
    pub fn required_staff(&self, worker: WorkerType, n_wards: &WardTable) -> Option<i64> {
        HospitalWardType::iter().try_fold(0_i64, |total, ward| {
            let per_ward = i64::from(self.get(ward, worker)?);
            let wards = i64::from(n_wards.get(ward)?);
            Some(total + per_ward * wards)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_empty() {
        let table = WardWorkerTable::default();
        assert!(!table.is_complete());
        assert!(table.cells().all(|(_, _, value)| value.is_none()));
        assert_eq!(table.cells().count(), N_HOSPITAL_WARD_TYPES * N_WORKER_TYPES);
    }

    #[test]
    fn partially_filled_table_is_incomplete() {
        let mut table = WardWorkerTable::default();
        table.set(HospitalWardType::General, WorkerType::Doctor, 1);
        table.set(HospitalWardType::General, WorkerType::Nurse, 4);
        table.set(HospitalWardType::Icu, WorkerType::Doctor, 2);
        assert!(!table.is_complete());

        table.set(HospitalWardType::Icu, WorkerType::Nurse, 6);
        assert!(table.is_complete());
    }

    #[test]
    fn required_staff_sums_over_wards() {
        let hcw = WardWorkerTable::filled([[1, 4], [2, 6]]);
        let wards = WardTable::filled([20, 10]);
        assert_eq!(hcw.required_staff(WorkerType::Doctor, &wards), Some(40));
        assert_eq!(hcw.required_staff(WorkerType::Nurse, &wards), Some(140));

        let mut partial = wards;
        partial.clear(HospitalWardType::Icu);
        assert_eq!(hcw.required_staff(WorkerType::Doctor, &partial), None);
    }

    #[test]
    fn null_cells_deserialize_as_missing() {
        let table: WardWorkerTable = serde_json::from_str("[[1, 4], [2, null]]").unwrap();
        assert_eq!(table.get(HospitalWardType::Icu, WorkerType::Nurse), None);
        assert_eq!(table.get(HospitalWardType::Icu, WorkerType::Doctor), Some(2));
    }
}
