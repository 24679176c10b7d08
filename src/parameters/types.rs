//! The fixed enumerations that stratify parameters, and the arrays indexed by them.
//!
//! Every stratified parameter is stored in an array type generated by
//! [`define_indexed_array!`](crate::define_indexed_array), so it can only be indexed by its own
//! enumeration and always has exactly one entry per variant.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use crate::define_indexed_array;

pub const N_AGE_GROUPS: usize = 9;
pub const N_AGE_TYPES: usize = 3;
pub const N_WORK_NETWORKS: usize = 5;
pub const N_INTERACTION_TYPES: usize = 3;
pub const N_HOUSEHOLD_MAX: usize = 6;
pub const N_HOSPITAL_WARD_TYPES: usize = 2;
pub const N_WORKER_TYPES: usize = 2;

/// Ten-year age bands.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Display,
)]
pub enum AgeGroup {
    #[strum(serialize = "age_0_9")]
    Age0To9,
    #[strum(serialize = "age_10_19")]
    Age10To19,
    #[strum(serialize = "age_20_29")]
    Age20To29,
    #[strum(serialize = "age_30_39")]
    Age30To39,
    #[strum(serialize = "age_40_49")]
    Age40To49,
    #[strum(serialize = "age_50_59")]
    Age50To59,
    #[strum(serialize = "age_60_69")]
    Age60To69,
    #[strum(serialize = "age_70_79")]
    Age70To79,
    #[strum(serialize = "age_80")]
    Age80Plus,
}

impl AgeGroup {
    /// The coarse age type used by the interaction networks.
    #[must_use]
    pub fn age_type(self) -> AgeType {
        match self {
            AgeGroup::Age0To9 | AgeGroup::Age10To19 => AgeType::Child,
            AgeGroup::Age70To79 | AgeGroup::Age80Plus => AgeType::Elderly,
            _ => AgeType::Adult,
        }
    }
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum AgeType {
    Child,
    Adult,
    Elderly,
}

/// The regular daily ("work") networks: schools for children, workplaces for adults and day
/// centres for the elderly.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum WorkNetwork {
    PrimarySchool,
    SecondarySchool,
    Working,
    Retired,
    Elderly,
}

impl WorkNetwork {
    /// Networks whose members are covered by an elderly-only lockdown.
    #[must_use]
    pub fn is_elderly(self) -> bool {
        matches!(self, WorkNetwork::Retired | WorkNetwork::Elderly)
    }
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum InteractionType {
    Household,
    Work,
    Random,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum HospitalWardType {
    General,
    Icu,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum WorkerType {
    Doctor,
    Nurse,
}

/// Household sizes from one person up to `N_HOUSEHOLD_MAX` people.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Display,
)]
pub enum HouseholdSize {
    #[strum(serialize = "size_1")]
    One,
    #[strum(serialize = "size_2")]
    Two,
    #[strum(serialize = "size_3")]
    Three,
    #[strum(serialize = "size_4")]
    Four,
    #[strum(serialize = "size_5")]
    Five,
    #[strum(serialize = "size_6")]
    SixOrMore,
}

/// The distribution each person's number of daily random interactions is drawn from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RandomInteractionDistribution {
    Fixed,
    #[default]
    NegativeBinomial,
}

define_indexed_array!(ByAgeGroup, AgeGroup, N_AGE_GROUPS);
define_indexed_array!(ByAgeType, AgeType, N_AGE_TYPES);
define_indexed_array!(ByWorkNetwork, WorkNetwork, N_WORK_NETWORKS);
define_indexed_array!(ByInteractionType, InteractionType, N_INTERACTION_TYPES);
define_indexed_array!(ByHouseholdSize, HouseholdSize, N_HOUSEHOLD_MAX);
