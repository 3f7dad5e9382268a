use std::io::Write;
use std::path::{Path, PathBuf};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;
use tracing::info;

use libfairbench_azure::{AzCli, ComputeConfig, RunEnvironment, Workspace, WorkspaceConfig};
use libfairbench_core::script::timing::{ESTIMATOR_FIT, MITIGATION};
use libfairbench_core::ExecutionTarget;
use libfairbench_exec::{write_reports, LocalRunner, RunReport, RunStatus};

use crate::cli::{Cli, MatrixFilter, RunArgs};
use crate::commands::build::build_wheel;
use crate::context::BenchContext;
use crate::driver::{job_dir, Driver, DriverOutcome, LocalExecutor, RemoteExecutor};
use crate::error::Result;
use crate::output::{output_success, print_human};

#[derive(Serialize)]
struct RunOutput {
    target: ExecutionTarget,
    total: usize,
    failed: usize,
    reports: Vec<RunReport>,
}

pub fn run(cli: &Cli, filter: &MatrixFilter, options: &RunArgs) -> Result<()> {
    let ctx = BenchContext::resolve(cli)?;
    let configs = ctx.configurations(filter)?;
    let generator = ctx.generator()?;
    let script_dir = absolute(&ctx.script_dir(options.script_dir.as_ref()))?;
    let driver = Driver::new(&generator, &script_dir, options.keep_going);

    let (target, outcome) = if options.remote {
        let mut executor = remote_executor(&ctx, options, &script_dir)?;
        (ExecutionTarget::Remote, driver.run(&configs, &mut executor))
    } else {
        let out: Box<dyn Write> = if cli.quiet {
            Box::new(std::io::sink())
        } else if cli.json {
            Box::new(std::io::stderr())
        } else {
            Box::new(std::io::stdout())
        };
        let mut executor = LocalExecutor::new(LocalRunner::new(&ctx.config.python), out);
        (ExecutionTarget::Local, driver.run(&configs, &mut executor))
    };

    let DriverOutcome { reports, error } = outcome;

    if let Some(path) = &options.json_report {
        write_reports(path, &reports)?;
        info!("wrote {} reports to {}", reports.len(), path.display());
    }

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    print_human(cli, &summary_table(&reports).to_string());
    print_human(cli, &outcome_line(reports.len(), failed, configs.len()));

    if let Some(e) = error {
        return Err(e);
    }

    output_success(
        cli,
        RunOutput {
            target,
            total: configs.len(),
            failed,
            reports,
        },
    );
    Ok(())
}

fn remote_executor(ctx: &BenchContext, options: &RunArgs, script_dir: &Path) -> Result<RemoteExecutor<AzCli>> {
    let workspace_config = WorkspaceConfig::from_env()?;
    let compute = ComputeConfig {
        name: options.compute_name.clone(),
        ..ComputeConfig::default()
    };

    let wheel = if options.no_build {
        None
    } else if let Some(wheel) = &options.wheel {
        Some(wheel.clone())
    } else {
        Some(build_wheel(ctx)?)
    };

    let workspace = Workspace::acquire(workspace_config, compute, AzCli::new())?;

    let environment = RunEnvironment::from_requirements(
        ctx.config.experiment_name.as_str(),
        &ctx.config.requirements_file(),
        wheel,
    )?;
    let jobs = job_dir(script_dir);
    let staged = environment.stage(script_dir, &jobs.join("conda.yml"))?;

    Ok(RemoteExecutor::new(
        workspace,
        staged,
        jobs,
        ctx.config.experiment_name.clone(),
    ))
}

/// Job files reference the code directory relative to themselves, so keep paths absolute
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn summary_table(reports: &[RunReport]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Configuration",
            "Script",
            "Status",
            "Estimator fit (s)",
            "Mitigation (s)",
            "Wall (s)",
        ]);

    for report in reports {
        let status = match &report.status {
            RunStatus::Succeeded => "ok".to_string(),
            RunStatus::Submitted { job_name } => format!("submitted {}", job_name),
            RunStatus::Failed { .. } => "failed".to_string(),
        };
        table.add_row(vec![
            Cell::new(&report.label),
            Cell::new(&report.script_name),
            Cell::new(status),
            Cell::new(seconds(report.metric(ESTIMATOR_FIT))),
            Cell::new(seconds(report.metric(MITIGATION))),
            Cell::new(seconds(report.duration_secs)),
        ]);
    }
    table
}

/// Configurations cut short by an early stop are counted as not attempted
fn outcome_line(attempted: usize, failed: usize, total: usize) -> String {
    let mut line = format!(
        "{} succeeded, {} failed, {} of {} configurations attempted",
        attempted - failed,
        failed,
        attempted,
        total
    );
    if attempted < total {
        line.push_str(&format!(" ({} not run)", total - attempted));
    }
    line
}

fn seconds(value: Option<f64>) -> String {
    value.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string())
}
