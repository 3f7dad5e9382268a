//! Sequential execution of benchmark configurations

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{error, info};

use libfairbench_azure::{CommandJob, CommandRunner, StagedEnvironment, Workspace};
use libfairbench_core::{script_name, BenchmarkConfiguration, ExecutionTarget, GeneratedScript, ScriptGenerator};
use libfairbench_exec::{LocalRunner, RunReport};

use crate::error::{BenchError, Result};

/// Runs one generated script somewhere
pub trait Executor {
    fn target(&self) -> ExecutionTarget;

    /// Execute `script` and complete `report` with the outcome
    fn execute(&mut self, config: &BenchmarkConfiguration, script: &GeneratedScript, report: RunReport) -> Result<RunReport>;
}

/// Local subprocess execution, streaming script output to `out`
pub struct LocalExecutor<W: Write> {
    runner: LocalRunner,
    out: W,
}

impl<W: Write> LocalExecutor<W> {
    pub fn new(runner: LocalRunner, out: W) -> Self {
        Self { runner, out }
    }
}

impl<W: Write> Executor for LocalExecutor<W> {
    fn target(&self) -> ExecutionTarget {
        ExecutionTarget::Local
    }

    fn execute(&mut self, _config: &BenchmarkConfiguration, script: &GeneratedScript, report: RunReport) -> Result<RunReport> {
        let run = self.runner.run(&script.script_dir, &script.script_name, &mut self.out)?;
        Ok(report.succeeded(run))
    }
}

/// Job submission to an acquired workspace
pub struct RemoteExecutor<R: CommandRunner> {
    workspace: Workspace<R>,
    environment: StagedEnvironment,
    job_dir: PathBuf,
    experiment_name: String,
}

impl<R: CommandRunner> RemoteExecutor<R> {
    pub fn new(workspace: Workspace<R>, environment: StagedEnvironment, job_dir: PathBuf, experiment_name: String) -> Self {
        Self {
            workspace,
            environment,
            job_dir,
            experiment_name,
        }
    }
}

impl<R: CommandRunner> Executor for RemoteExecutor<R> {
    fn target(&self) -> ExecutionTarget {
        ExecutionTarget::Remote
    }

    fn execute(&mut self, config: &BenchmarkConfiguration, script: &GeneratedScript, report: RunReport) -> Result<RunReport> {
        let job = CommandJob::new(
            config,
            &script.script_name,
            &script.script_dir,
            &self.environment,
            &self.workspace.compute().name,
            &self.experiment_name,
        );
        let stem = script.script_name.trim_end_matches(".py");
        let job_file = self.job_dir.join(format!("{}.yml", stem));
        let job_name = self.workspace.submit(&job, &job_file)?;
        Ok(report.submitted(job_name))
    }
}

/// Job files live next to the script directory so they are not uploaded with it
pub fn job_dir(script_dir: &Path) -> PathBuf {
    match script_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join("jobs"),
        _ => PathBuf::from("jobs"),
    }
}

/// Reports for every configuration attempted, plus the first failure
pub struct DriverOutcome {
    pub reports: Vec<RunReport>,
    pub error: Option<BenchError>,
}

pub struct Driver<'a> {
    generator: &'a ScriptGenerator,
    script_dir: &'a Path,
    keep_going: bool,
}

impl<'a> Driver<'a> {
    pub fn new(generator: &'a ScriptGenerator, script_dir: &'a Path, keep_going: bool) -> Self {
        Self {
            generator,
            script_dir,
            keep_going,
        }
    }

    /// Generate and execute each configuration in order.
    ///
    /// Stops at the first failure unless `keep_going` is set.
    pub fn run<E: Executor>(&self, configs: &[BenchmarkConfiguration], executor: &mut E) -> DriverOutcome {
        let target = executor.target();
        let mut reports = Vec::with_capacity(configs.len());
        let mut first_error = None;

        for (i, config) in configs.iter().enumerate() {
            info!("[{}/{}] starting {}", i + 1, configs.len(), config);
            let name = script_name(&config.display_name());
            let report = RunReport::new(config, &name, target, Utc::now());

            let result = self
                .generator
                .generate(config, target, self.script_dir, &name)
                .map_err(BenchError::from)
                .and_then(|script| executor.execute(config, &script, report.clone()));

            match result {
                Ok(done) => {
                    info!("finished {}", config);
                    reports.push(done);
                }
                Err(e) => {
                    error!("{} failed: {}", config, e);
                    reports.push(report.failed(&e, process_exit_code(&e)));
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                    if !self.keep_going {
                        break;
                    }
                }
            }
        }

        DriverOutcome {
            reports,
            error: first_error,
        }
    }
}

fn process_exit_code(err: &BenchError) -> Option<i32> {
    match err {
        BenchError::Exec(e) => e.exit_code(),
        _ => None,
    }
}
