//! Script sections, each rendered independently

use super::templates::MetricTemplates;
use super::timing::{TimedRegion, ESTIMATOR_FIT, MITIGATION};
use super::ExecutionTarget;
use crate::types::{BenchmarkConfiguration, Dataset, Estimator, MitigatorFamily};

/// Named slots of a benchmark script, in output order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTemplate {
    pub imports: Vec<String>,
    pub run_context: Vec<String>,
    pub dataset_setup: Vec<String>,
    pub estimator_fit: Vec<String>,
    pub mitigation: Vec<String>,
    pub additional_metrics: Vec<String>,
}

impl ScriptTemplate {
    pub fn for_configuration(
        config: &BenchmarkConfiguration,
        target: ExecutionTarget,
        templates: &MetricTemplates,
    ) -> Self {
        Self {
            imports: imports(target),
            run_context: run_context(target),
            dataset_setup: dataset_setup(config.dataset()),
            estimator_fit: estimator_fit(config.estimator()),
            mitigation: mitigation(config),
            additional_metrics: templates.lines(config.mitigator().family()),
        }
    }

    /// Join all slots into the final script text
    pub fn render(&self) -> String {
        let mut lines: Vec<&str> = Vec::new();
        lines.extend(self.imports.iter().map(String::as_str));
        lines.push("");
        for slot in [
            &self.run_context,
            &self.dataset_setup,
            &self.estimator_fit,
            &self.mitigation,
            &self.additional_metrics,
        ] {
            lines.extend(slot.iter().map(String::as_str));
        }
        lines.push("");
        lines.join("\n")
    }
}

pub fn imports(target: ExecutionTarget) -> Vec<String> {
    let mut lines: Vec<String> = [
        "from time import time",
        "from tempeh.configurations import datasets",
        "from fairlearn.postprocessing import ThresholdOptimizer",
        "from fairlearn.reductions import ExponentiatedGradient, GridSearch",
        "from fairlearn.reductions import DemographicParity, EqualizedOdds, ErrorRateParity, TruePositiveRateParity, FalsePositiveRateParity",
        "from sklearn.svm import SVC",
        "from sklearn.tree import DecisionTreeClassifier",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if target == ExecutionTarget::Remote {
        lines.push("from azureml.core.run import Run".to_string());
    }
    lines
}

/// `run` object the rest of the script logs through
pub fn run_context(target: ExecutionTarget) -> Vec<String> {
    let lines: &[&str] = match target {
        ExecutionTarget::Remote => &["run = Run.get_context()"],
        // Stand-in printing metrics to stdout
        ExecutionTarget::Local => &[
            "class Run:",
            "    def log(self, msg, *args):",
            "        print(msg, *args)",
            "    def log_list(self, msg, lst):",
            "        print(msg, *lst)",
            "run = Run()",
        ],
    };
    lines.iter().map(|s| s.to_string()).collect()
}

pub fn dataset_setup(dataset: Dataset) -> Vec<String> {
    let mut lines = vec![
        "print(\"Downloading dataset\")".to_string(),
        format!("dataset = datasets[\"{}\"]()", dataset.as_str()),
        "X_train, X_test = dataset.get_X()".to_string(),
        "y_train, y_test = dataset.get_y()".to_string(),
        "print(\"Done downloading dataset\")".to_string(),
    ];

    let sensitive: &[&str] = match dataset {
        // column 8 holds sex
        Dataset::AdultUci => &[
            "sensitive_features_train = X_train[:, 7]",
            "sensitive_features_test = X_test[:, 7]",
        ],
        // column 2 holds sex; features are scaled and labels are floats
        Dataset::DiabetesSklearn => &[
            "sensitive_features_train = X_train[:, 1].astype(str)",
            "sensitive_features_test = X_test[:, 1].astype(str)",
            "y_train = y_train.astype(int)",
            "y_test = y_test.astype(int)",
        ],
        Dataset::Compas => &[
            "sensitive_features_train, sensitive_features_test = dataset.get_sensitive_features(\"race\")",
            "y_train = y_train.astype(int)",
            "y_test = y_test.astype(int)",
        ],
    };
    lines.extend(sensitive.iter().map(|s| s.to_string()));
    lines
}

pub fn estimator_fit(estimator: Estimator) -> Vec<String> {
    TimedRegion::new(ESTIMATOR_FIT)
        .line(format!("estimator = {}", estimator.expression()))
        .line(format!("unconstrained_estimator = {}", estimator.expression()))
        .line("unconstrained_estimator.fit(X_train, y_train)")
        .render()
}

/// Construct and fit the mitigator inside the timed region, predict after it
pub fn mitigation(config: &BenchmarkConfiguration) -> Vec<String> {
    let mitigator = config.mitigator();
    let constraints = config.constraint_expression();

    let (construct, predict) = match mitigator.family() {
        MitigatorFamily::PostProcessing => (
            format!(
                "mitigator = {}(estimator=unconstrained_estimator, prefit=True, constraints={})",
                mitigator.as_str(),
                constraints
            ),
            "predictions = mitigator.predict(X_test, sensitive_features=sensitive_features_test, random_state=1)",
        ),
        MitigatorFamily::Reduction => (
            format!(
                "mitigator = {}(estimator=estimator, constraints={})",
                mitigator.as_str(),
                constraints
            ),
            "predictions = mitigator.predict(X_test)",
        ),
    };

    let mut lines = TimedRegion::new(MITIGATION)
        .line(construct)
        .line("mitigator.fit(X_train, y_train, sensitive_features=sensitive_features_train)")
        .render();
    lines.push(predict.to_string());
    lines
}
