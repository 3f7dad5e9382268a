use std::path::PathBuf;

use thiserror::Error;

use crate::types::{DisparityMetric, Mitigator};

/// Main error type for matrix enumeration and script generation
#[derive(Debug, Error)]
pub enum FairbenchError {
    #[error("unsupported dataset: {0}")]
    UnknownDataset(String),

    #[error("unsupported estimator: {0}")]
    UnknownEstimator(String),

    #[error("unknown mitigation technique: {0}")]
    UnknownMitigator(String),

    #[error("unknown disparity metric: {0}")]
    UnknownMetric(String),

    #[error("disparity metric {metric} is not valid for mitigator {mitigator}")]
    InvalidPairing {
        mitigator: Mitigator,
        metric: DisparityMetric,
    },

    #[error("no disparity metrics declared for mitigator {0}")]
    UnmappedMitigator(Mitigator),

    #[error("failed to read metric template {path:?}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl FairbenchError {
    /// Whether this error comes from an inconsistent benchmark definition
    /// rather than from the environment.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            FairbenchError::UnknownDataset(_)
                | FairbenchError::UnknownEstimator(_)
                | FairbenchError::UnknownMitigator(_)
                | FairbenchError::UnknownMetric(_)
                | FairbenchError::InvalidPairing { .. }
                | FairbenchError::UnmappedMitigator(_)
                | FairbenchError::TomlParse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FairbenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors() {
        let toml_err = toml::from_str::<toml::Value>("datasets = [").unwrap_err();
        assert!(FairbenchError::from(toml_err).is_configuration_error());
        assert!(FairbenchError::UnknownMetric("parity".to_string()).is_configuration_error());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!FairbenchError::from(io).is_configuration_error());
    }
}
