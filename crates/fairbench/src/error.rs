//! Error type for the fairbench binary

use libfairbench_azure::AzureError;
use libfairbench_core::FairbenchError;
use libfairbench_exec::ExecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error(transparent)]
    Core(#[from] FairbenchError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Azure(#[from] AzureError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Stable code for the JSON error envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            BenchError::Core(e) if e.is_configuration_error() => "invalid_config",
            BenchError::Core(FairbenchError::Template { .. }) => "invalid_config",
            BenchError::Core(_) => "io_error",
            BenchError::Exec(ExecError::BuildArtifact(_)) => "build_failed",
            BenchError::Exec(ExecError::Process { .. }) | BenchError::Exec(ExecError::Spawn { .. }) => {
                "process_failed"
            }
            BenchError::Exec(_) => "io_error",
            BenchError::Azure(AzureError::MissingEnv(_)) => "invalid_config",
            BenchError::Azure(_) => "remote_failed",
            BenchError::Io(_) => "io_error",
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self.error_code() {
            "invalid_config" => 2,
            "build_failed" => 3,
            "process_failed" => 4,
            "remote_failed" => 5,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
