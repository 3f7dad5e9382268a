//! Benchmark matrix enumeration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FairbenchError, Result};
use crate::types::{BenchmarkConfiguration, Dataset, DisparityMetric, Estimator, Mitigator};

/// The axes of the benchmark cross-product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkMatrix {
    pub datasets: Vec<Dataset>,
    pub estimators: Vec<Estimator>,
    pub mitigators: Vec<Mitigator>,
    /// Disparity metrics benchmarked per mitigator
    pub metrics: BTreeMap<Mitigator, Vec<DisparityMetric>>,
}

impl Default for BenchmarkMatrix {
    fn default() -> Self {
        Self {
            datasets: vec![Dataset::AdultUci, Dataset::Compas],
            estimators: Estimator::ALL.to_vec(),
            mitigators: Mitigator::ALL.to_vec(),
            metrics: default_metric_table(),
        }
    }
}

/// Each mitigator mapped to its declared metrics
pub fn default_metric_table() -> BTreeMap<Mitigator, Vec<DisparityMetric>> {
    Mitigator::ALL
        .into_iter()
        .map(|m| (m, m.default_metrics().to_vec()))
        .collect()
}

impl BenchmarkMatrix {
    /// Expand the matrix into configurations.
    ///
    /// Order is dataset, estimator, mitigator, metric (innermost), so script
    /// names derived from the configurations are stable between runs.
    pub fn enumerate(&self) -> Result<Vec<BenchmarkConfiguration>> {
        let mut configurations = Vec::new();

        for &dataset in &self.datasets {
            for &estimator in &self.estimators {
                for &mitigator in &self.mitigators {
                    let metrics = self.metrics_for(mitigator)?;
                    for &metric in metrics {
                        configurations.push(BenchmarkConfiguration::new(
                            dataset, estimator, mitigator, metric,
                        )?);
                    }
                }
            }
        }

        Ok(configurations)
    }

    /// Metrics declared for a mitigator; an unmapped mitigator is an error
    pub fn metrics_for(&self, mitigator: Mitigator) -> Result<&[DisparityMetric]> {
        match self.metrics.get(&mitigator) {
            Some(metrics) if !metrics.is_empty() => Ok(metrics),
            _ => Err(FairbenchError::UnmappedMitigator(mitigator)),
        }
    }

    /// Apply overrides from the harness config file
    pub fn with_overrides(mut self, overrides: &MatrixConfig) -> Self {
        if let Some(ref datasets) = overrides.datasets {
            self.datasets = datasets.clone();
        }
        if let Some(ref estimators) = overrides.estimators {
            self.estimators = estimators.clone();
        }
        if let Some(ref mitigators) = overrides.mitigators {
            self.mitigators = mitigators.clone();
        }
        for (mitigator, metrics) in &overrides.metrics {
            self.metrics.insert(*mitigator, metrics.clone());
        }
        self
    }

    /// Keep only the given values on each axis; empty filters keep everything
    pub fn filtered(
        mut self,
        datasets: &[Dataset],
        estimators: &[Estimator],
        mitigators: &[Mitigator],
    ) -> Self {
        if !datasets.is_empty() {
            self.datasets.retain(|d| datasets.contains(d));
        }
        if !estimators.is_empty() {
            self.estimators.retain(|e| estimators.contains(e));
        }
        if !mitigators.is_empty() {
            self.mitigators.retain(|m| mitigators.contains(m));
        }
        self
    }
}

/// `[matrix]` table of the harness config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<Dataset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimators: Option<Vec<Estimator>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigators: Option<Vec<Mitigator>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<Mitigator, Vec<DisparityMetric>>,
}
