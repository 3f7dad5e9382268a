//! Benchmark script generation
//!
//! A script is assembled from named sections (see [`sections::ScriptTemplate`]):
//! imports, run context, dataset setup, timed estimator fit, timed mitigation,
//! and a family-specific metric-logging snippet.

pub mod sections;
pub mod templates;
pub mod timing;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::types::BenchmarkConfiguration;
pub use sections::ScriptTemplate;
pub use templates::MetricTemplates;
pub use timing::TimedRegion;

/// Where the generated script will run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionTarget {
    /// Local subprocess; metrics are printed
    Local,
    /// Remote workspace; metrics go to the run context
    Remote,
}

/// A script written to disk
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedScript {
    pub script_name: String,
    pub script_dir: PathBuf,
    pub path: PathBuf,
    #[serde(skip)]
    pub contents: String,
}

/// Renders configurations into runnable scripts
#[derive(Debug, Clone, Default)]
pub struct ScriptGenerator {
    templates: MetricTemplates,
}

impl ScriptGenerator {
    pub fn new(templates: MetricTemplates) -> Self {
        Self { templates }
    }

    /// Script text for a configuration
    pub fn render(&self, config: &BenchmarkConfiguration, target: ExecutionTarget) -> String {
        ScriptTemplate::for_configuration(config, target, &self.templates).render()
    }

    /// Render and write `<script_dir>/<script_name>`, creating the directory
    pub fn generate(
        &self,
        config: &BenchmarkConfiguration,
        target: ExecutionTarget,
        script_dir: &Path,
        script_name: &str,
    ) -> Result<GeneratedScript> {
        let contents = self.render(config, target);
        debug!(config = %config, ?target, "rendered script");

        std::fs::create_dir_all(script_dir)?;
        let path = script_dir.join(script_name);
        std::fs::write(&path, &contents)?;
        info!("wrote script to {}", path.display());

        Ok(GeneratedScript {
            script_name: script_name.to_string(),
            script_dir: script_dir.to_path_buf(),
            path,
            contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FairbenchError;
    use crate::matrix::BenchmarkMatrix;
    use crate::types::{Dataset, DisparityMetric, Estimator, Mitigator};
    use tempfile::tempdir;

    fn adult_threshold() -> BenchmarkConfiguration {
        BenchmarkConfiguration::parse(
            "adult_uci",
            "DecisionTreeClassifier()",
            "ThresholdOptimizer",
            "'equalized_odds'",
        )
        .unwrap()
    }

    #[test]
    fn test_generate_writes_script() {
        let dir = tempdir().unwrap();
        let script_dir = dir.path().join("perf").join("scripts");
        let generator = ScriptGenerator::default();

        let script = generator
            .generate(&adult_threshold(), ExecutionTarget::Local, &script_dir, "123.py")
            .unwrap();

        assert_eq!(script.path, script_dir.join("123.py"));
        let on_disk = std::fs::read_to_string(&script.path).unwrap();
        assert_eq!(on_disk, script.contents);
        assert!(on_disk.contains("sensitive_features_train = X_train[:, 7]"));
        assert!(on_disk.contains(
            "mitigator = ThresholdOptimizer(estimator=unconstrained_estimator, prefit=True, constraints='equalized_odds')"
        ));
    }

    fn count_lines(text: &str, wanted: &str) -> usize {
        text.lines().filter(|l| l.trim() == wanted).count()
    }

    #[test]
    fn test_every_script_has_one_region_per_label() {
        let generator = ScriptGenerator::default();
        for config in BenchmarkMatrix::default().enumerate().unwrap() {
            for target in [ExecutionTarget::Local, ExecutionTarget::Remote] {
                let text = generator.render(&config, target);
                assert_eq!(text.matches("run.log(\"estimator_fit\"").count(), 1);
                assert_eq!(text.matches("run.log(\"mitigation\"").count(), 1);
                assert_eq!(count_lines(&text, "estimator_fit_start = time()"), 1);
                assert_eq!(count_lines(&text, "mitigation_start = time()"), 1);
            }
        }
    }

    #[test]
    fn test_copyright_never_reaches_script() {
        let generator = ScriptGenerator::default();
        for config in BenchmarkMatrix::default().enumerate().unwrap() {
            let text = generator.render(&config, ExecutionTarget::Remote);
            assert!(!text.contains("# Copyright"));
            assert!(!text.contains("# Licensed under"));
        }
    }

    #[test]
    fn test_targets_differ_only_in_prelude() {
        let generator = ScriptGenerator::default();
        let config = adult_threshold();
        let local = generator.render(&config, ExecutionTarget::Local);
        let remote = generator.render(&config, ExecutionTarget::Remote);

        let body = |text: &str| {
            let start = text.find("print(\"Downloading dataset\")").unwrap();
            text[start..].to_string()
        };
        assert_eq!(body(&local), body(&remote));
        assert!(remote.contains("run = Run.get_context()"));
        assert!(local.contains("run = Run()"));
    }

    #[test]
    fn test_family_specific_metrics_appended() {
        let templates = MetricTemplates::new("# Copyright x\npost_marker = 1", "red_marker = 1");
        let generator = ScriptGenerator::new(templates);

        let post = generator.render(&adult_threshold(), ExecutionTarget::Local);
        assert!(post.trim_end().ends_with("post_marker = 1"));
        assert!(!post.contains("red_marker"));

        let reduction = BenchmarkConfiguration::new(
            Dataset::Compas,
            Estimator::Svc,
            Mitigator::GridSearch,
            DisparityMetric::EqualizedOdds,
        )
        .unwrap();
        let red = generator.render(&reduction, ExecutionTarget::Local);
        assert!(red.trim_end().ends_with("red_marker = 1"));
    }

    #[test]
    fn test_unknown_identifiers_fail_before_writing() {
        let dir = tempdir().unwrap();
        let script_dir = dir.path().join("scripts");

        let result = BenchmarkConfiguration::parse("mnist", "SVC()", "GridSearch", "EqualizedOdds()")
            .and_then(|config| {
                ScriptGenerator::default().generate(&config, ExecutionTarget::Local, &script_dir, "1.py")
            });
        assert!(matches!(result, Err(FairbenchError::UnknownDataset(_))));

        let result = BenchmarkConfiguration::parse("compas", "SVC()", "AdversarialFairness", "EqualizedOdds()")
            .and_then(|config| {
                ScriptGenerator::default().generate(&config, ExecutionTarget::Local, &script_dir, "1.py")
            });
        assert!(matches!(result, Err(FairbenchError::UnknownMitigator(_))));

        assert!(!script_dir.exists());
    }
}
