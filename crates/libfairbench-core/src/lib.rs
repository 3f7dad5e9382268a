//! Core library for fairbench: the benchmark matrix of datasets, estimators,
//! mitigators and disparity metrics, and generation of the benchmark scripts
//! that exercise each configuration.

pub mod config;
pub mod error;
pub mod matrix;
pub mod naming;
pub mod script;
pub mod types;

pub use config::HarnessConfig;
pub use error::{FairbenchError, Result};
pub use matrix::BenchmarkMatrix;
pub use naming::script_name;
pub use script::{ExecutionTarget, GeneratedScript, MetricTemplates, ScriptGenerator};
pub use types::{BenchmarkConfiguration, Dataset, DisparityMetric, Estimator, Mitigator, MitigatorFamily};
