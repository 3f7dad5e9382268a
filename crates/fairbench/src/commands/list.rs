use serde::Serialize;

use libfairbench_core::{script_name, BenchmarkConfiguration};

use crate::cli::{Cli, MatrixFilter};
use crate::context::BenchContext;
use crate::error::Result;
use crate::output::{output_success, print_human};

#[derive(Serialize)]
struct ConfigurationEntry {
    dataset: String,
    estimator: String,
    mitigator: String,
    disparity_metric: String,
    display_name: String,
    script_name: String,
}

impl From<&BenchmarkConfiguration> for ConfigurationEntry {
    fn from(config: &BenchmarkConfiguration) -> Self {
        let display_name = config.display_name();
        Self {
            dataset: config.dataset().as_str().to_string(),
            estimator: config.estimator().expression().to_string(),
            mitigator: config.mitigator().as_str().to_string(),
            disparity_metric: config.constraint_expression(),
            script_name: script_name(&display_name),
            display_name,
        }
    }
}

#[derive(Serialize)]
struct ListOutput {
    count: usize,
    configurations: Vec<ConfigurationEntry>,
}

pub fn run(cli: &Cli, filter: &MatrixFilter) -> Result<()> {
    let ctx = BenchContext::resolve(cli)?;
    let configs = ctx.configurations(filter)?;

    for config in &configs {
        print_human(cli, &config.label());
    }
    print_human(cli, &format!("{} configurations", configs.len()));

    output_success(
        cli,
        ListOutput {
            count: configs.len(),
            configurations: configs.iter().map(ConfigurationEntry::from).collect(),
        },
    );
    Ok(())
}
