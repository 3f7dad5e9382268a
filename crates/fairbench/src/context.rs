use std::path::PathBuf;

use libfairbench_core::config::resolve_config;
use libfairbench_core::{
    BenchmarkConfiguration, Dataset, DisparityMetric, Estimator, HarnessConfig, Mitigator, ScriptGenerator,
};

use crate::cli::{Cli, MatrixFilter};
use crate::error::Result;

/// Harness settings resolved for one invocation
pub struct BenchContext {
    pub config: HarnessConfig,
}

impl BenchContext {
    /// Load `--config`, else fairbench.toml in the working directory, else defaults
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = resolve_config(cli.config.as_deref(), &cwd)?;
        Ok(Self { config })
    }

    pub fn script_dir(&self, overridden: Option<&PathBuf>) -> PathBuf {
        overridden.cloned().unwrap_or_else(|| self.config.script_dir.clone())
    }

    pub fn generator(&self) -> Result<ScriptGenerator> {
        Ok(ScriptGenerator::new(self.config.metric_templates()?))
    }

    /// Configured matrix narrowed by the command line filters
    pub fn configurations(&self, filter: &MatrixFilter) -> Result<Vec<BenchmarkConfiguration>> {
        let datasets = parse_all(&filter.datasets, Dataset::from_name)?;
        let estimators = parse_all(&filter.estimators, Estimator::from_name)?;
        let mitigators = parse_all(&filter.mitigators, Mitigator::from_name)?;
        let metrics = parse_all(&filter.metrics, DisparityMetric::from_name)?;

        let mut configs = self
            .config
            .matrix()
            .filtered(&datasets, &estimators, &mitigators)
            .enumerate()?;
        if !metrics.is_empty() {
            configs.retain(|c| metrics.contains(&c.disparity_metric()));
        }
        Ok(configs)
    }
}

fn parse_all<T>(names: &[String], parse: fn(&str) -> libfairbench_core::Result<T>) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        out.push(parse(name)?);
    }
    Ok(out)
}
