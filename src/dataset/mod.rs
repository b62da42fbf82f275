//! Indexable datasets for the NAS training loop.

pub mod aircraft;
pub mod index;
pub mod loader;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

pub use aircraft::{AircraftOptions, FgvcAircraft};
pub use index::{ClassIndex, IndexEntry, IndexedLabels, Sample, find_classes, make_dataset};
pub use loader::{Identity, ImageLoader, SampleLoader, Transform};

/// Random-access view over `(sample, target)` pairs.
pub trait Dataset {
    /// Loaded (and transformed) sample type.
    type Item;
    /// Label type after the target transform.
    type Target;

    /// Number of samples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the sample at `index` and apply the configured transforms.
    fn get(&self, index: usize) -> Result<(Self::Item, Self::Target), DatasetError>;
}

/// Named partition of FGVC-Aircraft.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Split {
    #[default]
    Train,
    Val,
    TrainVal,
    Test,
}

impl Split {
    pub const ALL: [Split; 4] = [Split::Train, Split::Val, Split::TrainVal, Split::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::TrainVal => "trainval",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = DatasetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|split| split.as_str() == value)
            .ok_or_else(|| DatasetError::InvalidSplit {
                value: value.to_string(),
                valid: join_names(Self::ALL.map(Split::as_str)),
            })
    }
}

impl TryFrom<String> for Split {
    type Error = DatasetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Label granularity of FGVC-Aircraft annotations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ClassType {
    #[default]
    Variant,
    Family,
    Manufacturer,
}

impl ClassType {
    pub const ALL: [ClassType; 3] = [
        ClassType::Variant,
        ClassType::Family,
        ClassType::Manufacturer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClassType::Variant => "variant",
            ClassType::Family => "family",
            ClassType::Manufacturer => "manufacturer",
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassType {
    type Err = DatasetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class_type| class_type.as_str() == value)
            .ok_or_else(|| DatasetError::InvalidClassType {
                value: value.to_string(),
                valid: join_names(Self::ALL.map(ClassType::as_str)),
            })
    }
}

impl TryFrom<String> for ClassType {
    type Error = DatasetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn join_names<const N: usize>(names: [&str; N]) -> String {
    names.join(", ")
}
