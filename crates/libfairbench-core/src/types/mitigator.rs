use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FairbenchError, Result};

/// How a mitigator is constructed and what constraints it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigatorFamily {
    /// Wraps a pre-fitted estimator, constraints given by name
    PostProcessing,
    /// Refits an unfitted estimator, constraints given as moment objects
    Reduction,
}

impl MitigatorFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            MitigatorFamily::PostProcessing => "postprocessing",
            MitigatorFamily::Reduction => "reduction",
        }
    }
}

/// Fairness mitigation algorithms under benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mitigator {
    ThresholdOptimizer,
    ExponentiatedGradient,
    GridSearch,
}

impl Mitigator {
    pub const ALL: [Mitigator; 3] = [
        Mitigator::ThresholdOptimizer,
        Mitigator::ExponentiatedGradient,
        Mitigator::GridSearch,
    ];

    /// Python class name
    pub fn as_str(&self) -> &'static str {
        match self {
            Mitigator::ThresholdOptimizer => "ThresholdOptimizer",
            Mitigator::ExponentiatedGradient => "ExponentiatedGradient",
            Mitigator::GridSearch => "GridSearch",
        }
    }

    pub fn family(&self) -> MitigatorFamily {
        match self {
            Mitigator::ThresholdOptimizer => MitigatorFamily::PostProcessing,
            Mitigator::ExponentiatedGradient | Mitigator::GridSearch => MitigatorFamily::Reduction,
        }
    }

    /// Metrics benchmarked for this mitigator when nothing narrows the matrix
    pub fn default_metrics(&self) -> &'static [DisparityMetric] {
        match self.family() {
            MitigatorFamily::PostProcessing => &[
                DisparityMetric::EqualizedOdds,
                DisparityMetric::DemographicParity,
            ],
            MitigatorFamily::Reduction => &DisparityMetric::ALL,
        }
    }

    pub fn allows(&self, metric: DisparityMetric) -> bool {
        self.default_metrics().contains(&metric)
    }

    /// Python expression passed as `constraints=` to the mitigator
    pub fn constraint_expression(&self, metric: DisparityMetric) -> Result<String> {
        if !self.allows(metric) {
            return Err(FairbenchError::InvalidPairing {
                mitigator: *self,
                metric,
            });
        }
        Ok(self.render_constraint(metric))
    }

    pub(crate) fn render_constraint(&self, metric: DisparityMetric) -> String {
        match self.family() {
            MitigatorFamily::PostProcessing => format!("'{}'", metric.as_str()),
            MitigatorFamily::Reduction => format!("{}()", metric.moment_class()),
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        Mitigator::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| FairbenchError::UnknownMitigator(name.to_string()))
    }
}

impl fmt::Display for Mitigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Mitigator {
    type Error = FairbenchError;

    fn try_from(value: String) -> Result<Self> {
        Mitigator::from_name(&value)
    }
}

impl From<Mitigator> for String {
    fn from(value: Mitigator) -> Self {
        value.as_str().to_string()
    }
}

/// Disparity constraints a mitigator can be asked to satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DisparityMetric {
    EqualizedOdds,
    DemographicParity,
    ErrorRateParity,
    FalsePositiveRateParity,
    TruePositiveRateParity,
}

impl DisparityMetric {
    pub const ALL: [DisparityMetric; 5] = [
        DisparityMetric::EqualizedOdds,
        DisparityMetric::DemographicParity,
        DisparityMetric::ErrorRateParity,
        DisparityMetric::FalsePositiveRateParity,
        DisparityMetric::TruePositiveRateParity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisparityMetric::EqualizedOdds => "equalized_odds",
            DisparityMetric::DemographicParity => "demographic_parity",
            DisparityMetric::ErrorRateParity => "error_rate_parity",
            DisparityMetric::FalsePositiveRateParity => "false_positive_rate_parity",
            DisparityMetric::TruePositiveRateParity => "true_positive_rate_parity",
        }
    }

    /// fairlearn.reductions moment class
    pub fn moment_class(&self) -> &'static str {
        match self {
            DisparityMetric::EqualizedOdds => "EqualizedOdds",
            DisparityMetric::DemographicParity => "DemographicParity",
            DisparityMetric::ErrorRateParity => "ErrorRateParity",
            DisparityMetric::FalsePositiveRateParity => "FalsePositiveRateParity",
            DisparityMetric::TruePositiveRateParity => "TruePositiveRateParity",
        }
    }

    /// Accepts `equalized_odds`, `'equalized_odds'`, `EqualizedOdds` and
    /// `EqualizedOdds()`
    pub fn from_name(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let bare = trimmed
            .trim_matches('\'')
            .trim_matches('"')
            .trim_end_matches("()");
        DisparityMetric::ALL
            .into_iter()
            .find(|m| m.as_str() == bare || m.moment_class() == bare)
            .ok_or_else(|| FairbenchError::UnknownMetric(trimmed.to_string()))
    }
}

impl fmt::Display for DisparityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DisparityMetric {
    type Error = FairbenchError;

    fn try_from(value: String) -> Result<Self> {
        DisparityMetric::from_name(&value)
    }
}

impl From<DisparityMetric> for String {
    fn from(value: DisparityMetric) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families() {
        assert_eq!(Mitigator::ThresholdOptimizer.family(), MitigatorFamily::PostProcessing);
        assert_eq!(Mitigator::ExponentiatedGradient.family(), MitigatorFamily::Reduction);
        assert_eq!(Mitigator::GridSearch.family(), MitigatorFamily::Reduction);
    }

    #[test]
    fn test_postprocessing_constraints_are_strings() {
        let expr = Mitigator::ThresholdOptimizer
            .constraint_expression(DisparityMetric::EqualizedOdds)
            .unwrap();
        assert_eq!(expr, "'equalized_odds'");
    }

    #[test]
    fn test_reduction_constraints_are_moments() {
        let expr = Mitigator::GridSearch
            .constraint_expression(DisparityMetric::TruePositiveRateParity)
            .unwrap();
        assert_eq!(expr, "TruePositiveRateParity()");
    }

    #[test]
    fn test_threshold_optimizer_rejects_rate_parity() {
        let err = Mitigator::ThresholdOptimizer
            .constraint_expression(DisparityMetric::ErrorRateParity)
            .unwrap_err();
        assert!(matches!(err, FairbenchError::InvalidPairing { .. }));
    }

    #[test]
    fn test_metric_parse_forms() {
        for form in ["equalized_odds", "'equalized_odds'", "EqualizedOdds", "EqualizedOdds()"] {
            assert_eq!(DisparityMetric::from_name(form).unwrap(), DisparityMetric::EqualizedOdds);
        }
        assert!(DisparityMetric::from_name("BoundedGroupLoss()").is_err());
    }

    #[test]
    fn test_unknown_mitigator() {
        let err = Mitigator::from_name("CorrelationRemover").unwrap_err();
        assert!(err.to_string().contains("CorrelationRemover"));
    }
}
