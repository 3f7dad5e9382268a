use std::path::PathBuf;

use serde::Serialize;

use libfairbench_core::{script_name, ExecutionTarget, GeneratedScript};

use crate::cli::{Cli, MatrixFilter};
use crate::context::BenchContext;
use crate::error::Result;
use crate::output::{output_success, print_human};

#[derive(Serialize)]
struct GenerateOutput {
    target: ExecutionTarget,
    script_dir: PathBuf,
    scripts: Vec<GeneratedScript>,
}

pub fn run(cli: &Cli, filter: &MatrixFilter, remote: bool, script_dir: Option<&PathBuf>) -> Result<()> {
    let ctx = BenchContext::resolve(cli)?;
    let configs = ctx.configurations(filter)?;
    let generator = ctx.generator()?;
    let script_dir = ctx.script_dir(script_dir);
    let target = if remote {
        ExecutionTarget::Remote
    } else {
        ExecutionTarget::Local
    };

    let mut scripts = Vec::with_capacity(configs.len());
    for config in &configs {
        let name = script_name(&config.display_name());
        let script = generator.generate(config, target, &script_dir, &name)?;
        print_human(cli, &format!("{}  {}", script.path.display(), config));
        scripts.push(script);
    }
    print_human(cli, &format!("Generated {} scripts in {}", scripts.len(), script_dir.display()));

    output_success(
        cli,
        GenerateOutput {
            target,
            script_dir,
            scripts,
        },
    );
    Ok(())
}
