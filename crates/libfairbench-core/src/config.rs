use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::{BenchmarkMatrix, MatrixConfig};
use crate::script::MetricTemplates;

/// File looked up in the working directory when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "fairbench.toml";

/// Harness settings stored in fairbench.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory generated scripts are written to
    pub script_dir: PathBuf,
    /// Interpreter for local runs and the package build
    pub python: String,
    /// Experiment remote runs are grouped under
    pub experiment_name: String,
    /// Checkout of the package under test
    pub package_dir: PathBuf,
    /// Distribution name used for the copied wheel
    pub package_name: String,
    /// Pip requirements for the remote environment (default: <package_dir>/requirements.txt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements_file: Option<PathBuf>,
    /// Directory with metric-logging templates (default: built-in templates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
    pub matrix: MatrixConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            script_dir: Path::new("perf").join("scripts"),
            python: "python".to_string(),
            experiment_name: "perftest".to_string(),
            package_dir: PathBuf::from("fairlearn"),
            package_name: "fairlearn".to_string(),
            requirements_file: None,
            template_dir: None,
            matrix: MatrixConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn requirements_file(&self) -> PathBuf {
        self.requirements_file
            .clone()
            .unwrap_or_else(|| self.package_dir.join("requirements.txt"))
    }

    /// Default matrix with the `[matrix]` overrides applied
    pub fn matrix(&self) -> BenchmarkMatrix {
        BenchmarkMatrix::default().with_overrides(&self.matrix)
    }

    pub fn metric_templates(&self) -> Result<MetricTemplates> {
        match self.template_dir {
            Some(ref dir) => MetricTemplates::load(dir),
            None => Ok(MetricTemplates::builtin()),
        }
    }
}

/// Load harness config from a file
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: HarnessConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load `path` if given, otherwise fairbench.toml from `dir` when present,
/// otherwise defaults
pub fn resolve_config(path: Option<&Path>, dir: &Path) -> Result<HarnessConfig> {
    if let Some(path) = path {
        return load_config(path);
    }
    let default_path = dir.join(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        load_config(&default_path)
    } else {
        Ok(HarnessConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dataset, Mitigator};
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.script_dir, Path::new("perf").join("scripts"));
        assert_eq!(config.requirements_file(), Path::new("fairlearn").join("requirements.txt"));
        assert_eq!(config.matrix(), BenchmarkMatrix::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
python = "python3"

[matrix]
datasets = ["compas"]
mitigators = ["ThresholdOptimizer"]
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.python, "python3");
        assert_eq!(config.experiment_name, "perftest");

        let matrix = config.matrix();
        assert_eq!(matrix.datasets, vec![Dataset::Compas]);
        assert_eq!(matrix.mitigators, vec![Mitigator::ThresholdOptimizer]);
    }

    #[test]
    fn test_resolve_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = resolve_config(None, dir.path()).unwrap();
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn test_resolve_reads_default_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "experiment_name = \"nightly\"\n").unwrap();
        let config = resolve_config(None, dir.path()).unwrap();
        assert_eq!(config.experiment_name, "nightly");
    }

    #[test]
    fn test_unknown_dataset_in_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[matrix]\ndatasets = [\"mnist\"]\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("mnist"));
    }
}
