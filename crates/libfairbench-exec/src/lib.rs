//! Local execution for fairbench
//!
//! - running generated scripts as subprocesses and capturing their metrics
//! - per-configuration run reports
//! - building the wheel of the package under test

pub mod error;
pub mod local;
pub mod package;
pub mod report;

pub use error::{ExecError, Result};
pub use local::{parse_metric_line, LocalRunner, ScriptRun};
pub use package::PackageBuilder;
pub use report::{write_reports, RunReport, RunStatus};
