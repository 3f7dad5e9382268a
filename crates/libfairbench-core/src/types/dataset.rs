use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FairbenchError, Result};

/// Datasets the generated scripts know how to load through tempeh
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dataset {
    AdultUci,
    Compas,
    DiabetesSklearn,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::AdultUci, Dataset::Compas, Dataset::DiabetesSklearn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::AdultUci => "adult_uci",
            Dataset::Compas => "compas",
            Dataset::DiabetesSklearn => "diabetes_sklearn",
        }
    }

    /// Parse a dataset from its tempeh identifier
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim() {
            "adult_uci" => Ok(Dataset::AdultUci),
            "compas" => Ok(Dataset::Compas),
            "diabetes_sklearn" => Ok(Dataset::DiabetesSklearn),
            other => Err(FairbenchError::UnknownDataset(other.to_string())),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Dataset {
    type Error = FairbenchError;

    fn try_from(value: String) -> Result<Self> {
        Dataset::from_name(&value)
    }
}

impl From<Dataset> for String {
    fn from(value: Dataset) -> Self {
        value.as_str().to_string()
    }
}
