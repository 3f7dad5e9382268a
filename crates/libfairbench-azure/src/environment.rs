//! Conda run environment for remote jobs

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Result;

pub const AZUREML_SDK: &str = "azureml-sdk";
pub const DEFAULT_PYTHON_VERSION: &str = "3.8";
pub const DEFAULT_DOCKER_IMAGE: &str = "mcr.microsoft.com/azureml/openmpi4.1.0-ubuntu20.04:latest";

/// Pip requirements, the SDK and optionally a private wheel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEnvironment {
    pub name: String,
    pub python_version: String,
    pub docker_image: String,
    pub pip_packages: Vec<String>,
    pub wheel: Option<PathBuf>,
}

/// Files written for one job by [`RunEnvironment::stage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEnvironment {
    pub conda_file: PathBuf,
    pub docker_image: String,
    /// Bare file name of the wheel inside the code directory
    pub wheel_file: Option<String>,
}

#[derive(Serialize)]
struct CondaSpec<'a> {
    name: &'a str,
    channels: Vec<&'a str>,
    dependencies: Vec<CondaDependency<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum CondaDependency<'a> {
    Package(String),
    Pip { pip: &'a [String] },
}

impl RunEnvironment {
    pub fn new(name: impl Into<String>, pip_packages: Vec<String>, wheel: Option<PathBuf>) -> Self {
        let mut pip_packages = pip_packages;
        if !pip_packages.iter().any(|p| p == AZUREML_SDK) {
            pip_packages.push(AZUREML_SDK.to_string());
        }
        Self {
            name: name.into(),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            docker_image: DEFAULT_DOCKER_IMAGE.to_string(),
            pip_packages,
            wheel,
        }
    }

    /// Read a pip requirements file, skipping blanks and comments
    pub fn from_requirements(name: impl Into<String>, requirements: &Path, wheel: Option<PathBuf>) -> Result<Self> {
        let text = std::fs::read_to_string(requirements)?;
        let packages = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        Ok(Self::new(name, packages, wheel))
    }

    pub fn conda_yaml(&self) -> Result<String> {
        let python = format!("python={}", self.python_version);
        let spec = CondaSpec {
            name: &self.name,
            channels: vec!["conda-forge"],
            dependencies: vec![
                CondaDependency::Package(python),
                CondaDependency::Package("pip".to_string()),
                CondaDependency::Pip {
                    pip: &self.pip_packages,
                },
            ],
        };
        Ok(serde_yaml::to_string(&spec)?)
    }

    /// Write the conda file and copy the wheel into `code_dir`
    pub fn stage(&self, code_dir: &Path, conda_file: &Path) -> Result<StagedEnvironment> {
        if let Some(parent) = conda_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(conda_file, self.conda_yaml()?)?;

        let wheel_file = match &self.wheel {
            Some(wheel) => {
                let file_name = wheel
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| {
                        std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            format!("wheel path has no file name: {}", wheel.display()),
                        )
                    })?;
                std::fs::create_dir_all(code_dir)?;
                std::fs::copy(wheel, code_dir.join(&file_name))?;
                info!("staged wheel {} in {}", file_name, code_dir.display());
                Some(file_name)
            }
            None => None,
        };

        Ok(StagedEnvironment {
            conda_file: conda_file.to_path_buf(),
            docker_image: self.docker_image.clone(),
            wheel_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_requirements_plus_sdk() {
        let dir = tempdir().unwrap();
        let req = dir.path().join("requirements.txt");
        std::fs::write(&req, "# pinned\nnumpy>=1.17\n\npandas\n").unwrap();

        let env = RunEnvironment::from_requirements("perf", &req, None).unwrap();
        assert_eq!(env.pip_packages, vec!["numpy>=1.17", "pandas", AZUREML_SDK]);
    }

    #[test]
    fn test_conda_yaml_shape() {
        let env = RunEnvironment::new("perf", vec!["numpy".to_string()], None);
        let yaml: serde_yaml::Value = serde_yaml::from_str(&env.conda_yaml().unwrap()).unwrap();

        assert_eq!(yaml["name"], "perf");
        let deps = yaml["dependencies"].as_sequence().unwrap();
        assert_eq!(deps[0], "python=3.8");
        assert_eq!(deps[1], "pip");
        let pip = deps[2]["pip"].as_sequence().unwrap();
        assert_eq!(pip.len(), 2);
        assert_eq!(pip[1], AZUREML_SDK);
    }

    #[test]
    fn test_stage_copies_wheel() {
        let dir = tempdir().unwrap();
        let wheel = dir.path().join("fairlearn-v1.000001-py3-none-any.whl");
        std::fs::write(&wheel, b"wheel").unwrap();
        let code_dir = dir.path().join("scripts");
        let conda = dir.path().join("jobs").join("conda.yml");

        let env = RunEnvironment::new("perf", Vec::new(), Some(wheel));
        let staged = env.stage(&code_dir, &conda).unwrap();

        assert!(conda.exists());
        assert_eq!(
            staged.wheel_file.as_deref(),
            Some("fairlearn-v1.000001-py3-none-any.whl")
        );
        assert_eq!(
            std::fs::read(code_dir.join("fairlearn-v1.000001-py3-none-any.whl")).unwrap(),
            b"wheel"
        );
    }
}
