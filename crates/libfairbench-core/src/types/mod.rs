//! Closed identifier types for the benchmark matrix

pub mod configuration;
pub mod dataset;
pub mod estimator;
pub mod mitigator;

pub use configuration::BenchmarkConfiguration;
pub use dataset::Dataset;
pub use estimator::Estimator;
pub use mitigator::{DisparityMetric, Mitigator, MitigatorFamily};
