//! Remote execution on Azure Machine Learning
//!
//! Credentials come from [`WorkspaceConfig`]; every call goes through the
//! `az` CLI behind [`CommandRunner`].

pub mod az;
pub mod config;
pub mod environment;
pub mod error;
pub mod job;
pub mod workspace;

pub use az::{redact_args, AzCli, CommandRunner};
pub use config::{ComputeConfig, WorkspaceConfig};
pub use environment::{RunEnvironment, StagedEnvironment};
pub use error::{AzureError, Result};
pub use job::CommandJob;
pub use workspace::Workspace;
