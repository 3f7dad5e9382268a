use std::path::PathBuf;

use serde::Serialize;

use libfairbench_exec::PackageBuilder;

use crate::cli::Cli;
use crate::context::BenchContext;
use crate::error::Result;
use crate::output::{output_success, print_human};

#[derive(Serialize)]
struct BuildOutput {
    wheel: PathBuf,
}

pub fn run(cli: &Cli) -> Result<()> {
    let ctx = BenchContext::resolve(cli)?;
    let wheel = build_wheel(&ctx)?;
    print_human(cli, &format!("Built {}", wheel.display()));
    output_success(cli, BuildOutput { wheel });
    Ok(())
}

pub fn build_wheel(ctx: &BenchContext) -> Result<PathBuf> {
    let config = &ctx.config;
    let builder = PackageBuilder::new(&config.python, &config.package_dir, &config.package_name);
    Ok(builder.build()?)
}
