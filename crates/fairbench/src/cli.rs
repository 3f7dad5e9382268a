use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fairbench", about = "Performance benchmarks for fairness mitigation techniques", version)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress human-readable output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Harness config file (default: ./fairbench.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the benchmark configurations
    List {
        #[command(flatten)]
        filter: MatrixFilter,
    },

    /// Write benchmark scripts without running them
    Generate {
        #[command(flatten)]
        filter: MatrixFilter,

        /// Generate scripts for the remote run context
        #[arg(long)]
        remote: bool,

        /// Override the script directory
        #[arg(long)]
        script_dir: Option<PathBuf>,
    },

    /// Generate and execute benchmark scripts
    Run {
        #[command(flatten)]
        filter: MatrixFilter,

        #[command(flatten)]
        options: RunArgs,
    },

    /// Build the wheel of the package under test
    Build,
}

/// Restrict the matrix; each flag may repeat, omitted axes keep every value
#[derive(Args, Clone, Debug, Default)]
pub struct MatrixFilter {
    #[arg(long = "dataset")]
    pub datasets: Vec<String>,

    #[arg(long = "estimator")]
    pub estimators: Vec<String>,

    #[arg(long = "mitigator")]
    pub mitigators: Vec<String>,

    #[arg(long = "metric")]
    pub metrics: Vec<String>,
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Submit to the Azure ML workspace instead of running locally
    #[arg(long)]
    pub remote: bool,

    /// Continue after a failed configuration
    #[arg(long)]
    pub keep_going: bool,

    /// Write all run reports to this file as JSON
    #[arg(long)]
    pub json_report: Option<PathBuf>,

    /// Override the script directory
    #[arg(long)]
    pub script_dir: Option<PathBuf>,

    /// Use an existing wheel instead of building one (remote only)
    #[arg(long, conflicts_with = "no_build")]
    pub wheel: Option<PathBuf>,

    /// Submit without a private wheel (remote only)
    #[arg(long)]
    pub no_build: bool,

    /// Compute cluster name (remote only)
    #[arg(long, default_value = "cpu-cluster")]
    pub compute_name: String,
}
