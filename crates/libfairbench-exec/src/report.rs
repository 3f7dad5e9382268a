//! Per-configuration run reports

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use libfairbench_core::{BenchmarkConfiguration, ExecutionTarget};

use crate::error::Result;
use crate::local::ScriptRun;

/// Outcome of one benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// Ran locally to completion
    Succeeded,
    /// Handed to the remote workspace
    Submitted { job_name: String },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub label: String,
    pub tags: BTreeMap<String, String>,
    pub script_name: String,
    pub target: ExecutionTarget,
    pub started_at: DateTime<Utc>,
    #[serde(flatten)]
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, Vec<f64>>,
}

impl RunReport {
    pub fn new(
        config: &BenchmarkConfiguration,
        script_name: &str,
        target: ExecutionTarget,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            label: config.label(),
            tags: config
                .tags()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            script_name: script_name.to_string(),
            target,
            started_at,
            status: RunStatus::Succeeded,
            exit_code: None,
            duration_secs: None,
            metrics: BTreeMap::new(),
        }
    }

    pub fn succeeded(mut self, run: ScriptRun) -> Self {
        self.status = RunStatus::Succeeded;
        self.exit_code = run.exit_code;
        self.duration_secs = Some(run.duration.as_secs_f64());
        self.metrics = run.metrics;
        self
    }

    pub fn submitted(mut self, job_name: impl Into<String>) -> Self {
        self.status = RunStatus::Submitted {
            job_name: job_name.into(),
        };
        self
    }

    pub fn failed(mut self, error: impl ToString, exit_code: Option<i32>) -> Self {
        self.status = RunStatus::Failed {
            error: error.to_string(),
        };
        self.exit_code = exit_code;
        self
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, RunStatus::Failed { .. })
    }

    /// First value logged under a metric name
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).and_then(|v| v.first().copied())
    }
}

/// Write all reports as a pretty JSON array
pub fn write_reports(path: &Path, reports: &[RunReport]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn config() -> BenchmarkConfiguration {
        BenchmarkConfiguration::parse("compas", "SVC()", "GridSearch", "EqualizedOdds()").unwrap()
    }

    #[test]
    fn test_succeeded_report() {
        let mut metrics = BTreeMap::new();
        metrics.insert("mitigation".to_string(), vec![2.5]);
        let report = RunReport::new(&config(), "1.py", ExecutionTarget::Local, Utc::now()).succeeded(ScriptRun {
            exit_code: Some(0),
            duration: Duration::from_millis(1500),
            metrics,
        });

        assert!(!report.is_failure());
        assert_eq!(report.metric("mitigation"), Some(2.5));
        assert_eq!(report.duration_secs, Some(1.5));
        assert_eq!(report.tags.get("mitigator").map(String::as_str), Some("GridSearch"));
    }

    #[test]
    fn test_write_reports_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        let reports = vec![
            RunReport::new(&config(), "1.py", ExecutionTarget::Local, Utc::now()).failed("boom", Some(1)),
            RunReport::new(&config(), "2.py", ExecutionTarget::Remote, Utc::now()).submitted("job-1"),
        ];

        write_reports(&path, &reports).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["status"], "failed");
        assert_eq!(arr[0]["error"], "boom");
        assert_eq!(arr[0]["exit_code"], 1);
        assert_eq!(arr[1]["status"], "submitted");
        assert_eq!(arr[1]["job_name"], "job-1");
        assert_eq!(arr[1]["target"], "remote");
        assert_eq!(arr[1]["tags"]["disparity_metric"], "EqualizedOdds()");
    }
}
