//! Metric-logging snippets appended to generated scripts

use std::path::Path;

use crate::error::{FairbenchError, Result};
use crate::types::MitigatorFamily;

pub const POSTPROCESSING_TEMPLATE_FILE: &str = "metric_logging_script_postprocessing.txt";
pub const REDUCTION_TEMPLATE_FILE: &str = "metric_logging_script_expgrad_gridsearch.txt";

/// Header lines never copied into scripts
const HEADER_PREFIXES: [&str; 2] = ["# Copyright", "# Licensed under"];

/// Family-specific code appended after mitigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTemplates {
    postprocessing: String,
    reduction: String,
}

impl MetricTemplates {
    pub fn new(postprocessing: impl Into<String>, reduction: impl Into<String>) -> Self {
        Self {
            postprocessing: postprocessing.into(),
            reduction: reduction.into(),
        }
    }

    /// Templates shipped with the crate
    pub fn builtin() -> Self {
        Self::new(
            include_str!("../../templates/metric_logging_script_postprocessing.txt"),
            include_str!("../../templates/metric_logging_script_expgrad_gridsearch.txt"),
        )
    }

    /// Read both template files from a directory
    pub fn load(dir: &Path) -> Result<Self> {
        let read = |file_name: &str| {
            let path = dir.join(file_name);
            std::fs::read_to_string(&path).map_err(|source| FairbenchError::Template { path, source })
        };
        Ok(Self::new(
            read(POSTPROCESSING_TEMPLATE_FILE)?,
            read(REDUCTION_TEMPLATE_FILE)?,
        ))
    }

    /// Raw template text for a family
    pub fn raw(&self, family: MitigatorFamily) -> &str {
        match family {
            MitigatorFamily::PostProcessing => &self.postprocessing,
            MitigatorFamily::Reduction => &self.reduction,
        }
    }

    /// Template lines for a family, copyright header removed
    pub fn lines(&self, family: MitigatorFamily) -> Vec<String> {
        strip_header(self.raw(family))
    }
}

impl Default for MetricTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Split into lines, dropping copyright and licence notices
pub fn strip_header(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !HEADER_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
        })
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}
