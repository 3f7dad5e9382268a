//! Workspace acquisition and job submission

use std::path::Path;

use tracing::info;

use crate::az::{args, CommandRunner};
use crate::config::{ComputeConfig, WorkspaceConfig};
use crate::error::{AzureError, Result};
use crate::job::CommandJob;

/// An authenticated workspace with a ready compute cluster
pub struct Workspace<R: CommandRunner> {
    config: WorkspaceConfig,
    compute: ComputeConfig,
    runner: R,
}

impl<R: CommandRunner> Workspace<R> {
    /// Log in and make sure the resource group, workspace and compute
    /// cluster exist. Existing resources are left untouched.
    pub fn acquire(config: WorkspaceConfig, compute: ComputeConfig, runner: R) -> Result<Self> {
        let ws = Self {
            config,
            compute,
            runner,
        };

        info!("logging in as service principal {}", ws.config.service_principal_id);
        ws.runner.az(&args(&[
            "login",
            "--service-principal",
            "-u",
            &ws.config.service_principal_id,
            "-p",
            &ws.config.service_principal_password,
            "--tenant",
            &ws.config.tenant_id,
            "--output",
            "none",
        ]))?;
        info!("logged in");

        info!("selecting subscription {}", ws.config.subscription_id);
        ws.runner
            .az(&args(&["account", "set", "--subscription", &ws.config.subscription_id]))?;
        info!("subscription selected");

        info!("ensuring resource group {}", ws.config.resource_group);
        ws.runner.az(&args(&[
            "group",
            "create",
            "--name",
            &ws.config.resource_group,
            "--location",
            &ws.config.location,
            "--output",
            "none",
        ]))?;
        info!("resource group {} ready", ws.config.resource_group);

        ws.ensure_workspace()?;
        ws.ensure_compute()?;
        Ok(ws)
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn compute(&self) -> &ComputeConfig {
        &self.compute
    }

    fn ensure_workspace(&self) -> Result<()> {
        let name = &self.config.workspace_name;
        let group = &self.config.resource_group;
        info!("looking up workspace {}", name);
        let show = self.runner.az(&args(&[
            "ml",
            "workspace",
            "show",
            "--name",
            name,
            "--resource-group",
            group,
            "--output",
            "none",
        ]));
        match show {
            Ok(_) => info!("found existing workspace {}", name),
            Err(AzureError::Command { .. }) => {
                info!("workspace {} not found, creating it", name);
                self.runner.az(&args(&[
                    "ml",
                    "workspace",
                    "create",
                    "--name",
                    name,
                    "--resource-group",
                    group,
                    "--location",
                    &self.config.location,
                    "--output",
                    "none",
                ]))?;
                info!("created workspace {}", name);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn ensure_compute(&self) -> Result<()> {
        let compute = &self.compute;
        info!("looking up compute target {}", compute.name);
        let show = self.runner.az(&self.scoped(&["ml", "compute", "show", "--name", &compute.name, "--output", "none"]));
        match show {
            Ok(_) => info!("found existing compute target {}", compute.name),
            Err(AzureError::Command { .. }) => {
                info!("compute target {} not found, creating it", compute.name);
                let min = compute.min_nodes.to_string();
                let max = compute.max_nodes.to_string();
                let idle = compute.idle_seconds_before_scaledown.to_string();
                self.runner.az(&self.scoped(&[
                    "ml",
                    "compute",
                    "create",
                    "--name",
                    &compute.name,
                    "--type",
                    "amlcompute",
                    "--size",
                    &compute.vm_size,
                    "--tier",
                    &compute.vm_priority,
                    "--min-instances",
                    &min,
                    "--max-instances",
                    &max,
                    "--idle-time-before-scale-down",
                    &idle,
                    "--output",
                    "none",
                ]))?;
                info!("created compute target {}", compute.name);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Write `job` to `job_file` and submit it. Returns the job name.
    pub fn submit(&self, job: &CommandJob, job_file: &Path) -> Result<String> {
        if let Some(parent) = job_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(job_file, job.to_yaml()?)?;

        let file = job_file.to_string_lossy();
        info!("submitting {} to experiment {}", job.display_name, job.experiment_name);
        let stdout = self.runner.az(&self.scoped(&[
            "ml", "job", "create", "--file", &file, "--query", "name", "--output", "tsv",
        ]))?;
        let job_name = stdout.trim().to_string();
        info!("submitted job {}", job_name);
        Ok(job_name)
    }

    /// `parts` followed by the resource group and workspace flags
    fn scoped(&self, parts: &[&str]) -> Vec<String> {
        let mut v = args(parts);
        v.extend(args(&[
            "--resource-group",
            &self.config.resource_group,
            "--workspace-name",
            &self.config.workspace_name,
        ]));
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::az::testing::RecordingAz;
    use crate::environment::StagedEnvironment;
    use libfairbench_core::BenchmarkConfiguration;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn config() -> WorkspaceConfig {
        WorkspaceConfig {
            tenant_id: "tenant".to_string(),
            service_principal_id: "sp-id".to_string(),
            service_principal_password: "hunter2".to_string(),
            subscription_id: "sub".to_string(),
            resource_group: "perf-rg".to_string(),
            workspace_name: "perf-ws".to_string(),
            location: "westus2".to_string(),
        }
    }

    #[test]
    fn test_acquire_existing_resources() {
        let ws = Workspace::acquire(config(), ComputeConfig::default(), RecordingAz::with_missing(&[])).unwrap();
        let calls = ws.runner.calls();

        assert_eq!(calls.len(), 5);
        assert!(calls[0].starts_with("login --service-principal -u sp-id -p ***"));
        assert_eq!(calls[1], "account set --subscription sub");
        assert!(calls[2].starts_with("group create --name perf-rg --location westus2"));
        assert!(calls[3].starts_with("ml workspace show --name perf-ws"));
        assert!(calls[4].starts_with("ml compute show --name cpu-cluster"));
        assert!(!calls.iter().any(|c| c.contains(" create --name perf-ws")));
        assert!(!calls.iter().any(|c| c.contains("hunter2")));
    }

    #[test]
    fn test_acquire_creates_missing_resources() {
        let runner = RecordingAz::with_missing(&["workspace", "compute"]);
        let ws = Workspace::acquire(config(), ComputeConfig::default(), runner).unwrap();
        let calls = ws.runner.calls();

        assert_eq!(calls.len(), 7);
        assert!(calls[4].starts_with("ml workspace create --name perf-ws --resource-group perf-rg --location westus2"));
        assert!(calls[6].starts_with("ml compute create --name cpu-cluster --type amlcompute --size STANDARD_DS2_V2"));
        assert!(calls[6].contains("--tier dedicated"));
        assert!(calls[6].contains("--min-instances 0 --max-instances 10"));
        assert!(calls[6].contains("--idle-time-before-scale-down 300"));
        assert!(calls[6].ends_with("--resource-group perf-rg --workspace-name perf-ws"));
    }

    #[test]
    fn test_submit_writes_job_and_returns_name() {
        let dir = tempdir().unwrap();
        let ws = Workspace::acquire(config(), ComputeConfig::default(), RecordingAz::with_missing(&[])).unwrap();
        let cfg = BenchmarkConfiguration::parse("compas", "SVC()", "GridSearch", "EqualizedOdds()").unwrap();
        let staged = StagedEnvironment {
            conda_file: PathBuf::from("conda.yml"),
            docker_image: "image".to_string(),
            wheel_file: None,
        };
        let job = CommandJob::new(&cfg, "7.py", dir.path(), &staged, "cpu-cluster", "perftest");
        let job_file = dir.path().join("jobs").join("7.yml");

        let name = ws.submit(&job, &job_file).unwrap();

        assert_eq!(name, "job-123");
        let written = std::fs::read_to_string(&job_file).unwrap();
        assert!(written.contains("experiment_name: perftest"));
        let last = ws.runner.calls().pop().unwrap();
        assert!(last.starts_with("ml job create --file"));
        assert!(last.contains("--query name --output tsv"));
    }
}
