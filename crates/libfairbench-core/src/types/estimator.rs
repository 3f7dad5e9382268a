use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FairbenchError, Result};

/// Base estimators, each standing for the scikit-learn construction
/// expression emitted into scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Estimator {
    Svc,
    DecisionTree,
}

impl Estimator {
    pub const ALL: [Estimator; 2] = [Estimator::Svc, Estimator::DecisionTree];

    /// Python expression constructing an unfitted estimator
    pub fn expression(&self) -> &'static str {
        match self {
            Estimator::Svc => "SVC()",
            Estimator::DecisionTree => "DecisionTreeClassifier()",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Estimator::Svc => "svc",
            Estimator::DecisionTree => "decision_tree",
        }
    }

    /// Parse from either the construction expression or the short name
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        Estimator::ALL
            .into_iter()
            .find(|e| e.expression() == name || e.short_name() == name)
            .ok_or_else(|| FairbenchError::UnknownEstimator(name.to_string()))
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expression())
    }
}

impl TryFrom<String> for Estimator {
    type Error = FairbenchError;

    fn try_from(value: String) -> Result<Self> {
        Estimator::from_name(&value)
    }
}

impl From<Estimator> for String {
    fn from(value: Estimator) -> Self {
        value.expression().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expression_and_short_name() {
        assert_eq!(Estimator::from_name("SVC()").unwrap(), Estimator::Svc);
        assert_eq!(Estimator::from_name("decision_tree").unwrap(), Estimator::DecisionTree);
        assert!(matches!(
            Estimator::from_name("LogisticRegression()"),
            Err(FairbenchError::UnknownEstimator(_))
        ));
    }
}
