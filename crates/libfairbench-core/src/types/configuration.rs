use std::fmt;

use serde::Serialize;

use super::{Dataset, DisparityMetric, Estimator, Mitigator};
use crate::error::Result;

/// One point of the benchmark matrix
///
/// Immutable once created. Construction rejects metrics the mitigator does
/// not accept, so every value in circulation is a valid pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BenchmarkConfiguration {
    dataset: Dataset,
    estimator: Estimator,
    mitigator: Mitigator,
    disparity_metric: DisparityMetric,
}

impl BenchmarkConfiguration {
    pub fn new(
        dataset: Dataset,
        estimator: Estimator,
        mitigator: Mitigator,
        disparity_metric: DisparityMetric,
    ) -> Result<Self> {
        mitigator.constraint_expression(disparity_metric)?;
        Ok(Self {
            dataset,
            estimator,
            mitigator,
            disparity_metric,
        })
    }

    /// Build from raw identifiers, e.g. command line arguments
    pub fn parse(dataset: &str, estimator: &str, mitigator: &str, disparity_metric: &str) -> Result<Self> {
        Self::new(
            Dataset::from_name(dataset)?,
            Estimator::from_name(estimator)?,
            Mitigator::from_name(mitigator)?,
            DisparityMetric::from_name(disparity_metric)?,
        )
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    pub fn estimator(&self) -> Estimator {
        self.estimator
    }

    pub fn mitigator(&self) -> Mitigator {
        self.mitigator
    }

    pub fn disparity_metric(&self) -> DisparityMetric {
        self.disparity_metric
    }

    /// The `constraints=` expression for this pairing
    pub fn constraint_expression(&self) -> String {
        self.mitigator.render_constraint(self.disparity_metric)
    }

    /// Field/value pairs attached to remote jobs and run reports
    pub fn tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("dataset", self.dataset.as_str().to_string()),
            ("estimator", self.estimator.expression().to_string()),
            ("mitigator", self.mitigator.as_str().to_string()),
            ("disparity_metric", self.constraint_expression()),
        ]
    }

    /// Human readable label
    pub fn label(&self) -> String {
        format!(
            "[dataset: {}, estimator: {}, mitigator: {}, disparity_metric: {}]",
            self.dataset.as_str(),
            self.estimator.expression(),
            self.mitigator.as_str(),
            self.constraint_expression()
        )
    }

    /// Test-case display name: the label without spaces
    pub fn display_name(&self) -> String {
        self.label().replace(' ', "")
    }
}

impl fmt::Display for BenchmarkConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
