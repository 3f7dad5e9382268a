//! Command job definition submitted with `az ml job create`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use libfairbench_core::BenchmarkConfiguration;

use crate::environment::StagedEnvironment;
use crate::error::Result;

pub const COMMAND_JOB_SCHEMA: &str = "https://azuremlschemas.azureedge.net/latest/commandJob.schema.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobEnvironment {
    pub image: String,
    pub conda_file: PathBuf,
}

/// A job running one generated script on the compute cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandJob {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub command: String,
    pub code: PathBuf,
    pub environment: JobEnvironment,
    pub compute: String,
    pub experiment_name: String,
    pub display_name: String,
    pub tags: BTreeMap<String, String>,
}

impl CommandJob {
    pub fn new(
        config: &BenchmarkConfiguration,
        script_name: &str,
        code_dir: &Path,
        environment: &StagedEnvironment,
        compute_name: &str,
        experiment_name: &str,
    ) -> Self {
        let command = match &environment.wheel_file {
            Some(wheel) => format!("pip install {} && python {}", wheel, script_name),
            None => format!("python {}", script_name),
        };

        Self {
            schema: COMMAND_JOB_SCHEMA.to_string(),
            job_type: "command".to_string(),
            command,
            code: code_dir.to_path_buf(),
            environment: JobEnvironment {
                image: environment.docker_image.clone(),
                conda_file: environment.conda_file.clone(),
            },
            compute: format!("azureml:{}", compute_name),
            experiment_name: experiment_name.to_string(),
            display_name: config.display_name(),
            tags: config
                .tags()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
