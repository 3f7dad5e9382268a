mod cli;
mod commands;
mod context;
mod driver;
mod error;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use error::BenchError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries script output and JSON envelopes
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run_command(&cli) {
        output::output_error(&cli, &e);
        std::process::exit(e.exit_code());
    }
}

fn run_command(cli: &Cli) -> Result<(), BenchError> {
    match &cli.command {
        Command::List { filter } => commands::list::run(cli, filter),
        Command::Generate {
            filter,
            remote,
            script_dir,
        } => commands::generate::run(cli, filter, *remote, script_dir.as_ref()),
        Command::Run { filter, options } => commands::run::run(cli, filter, options),
        Command::Build => commands::build::run(cli),
    }
}
