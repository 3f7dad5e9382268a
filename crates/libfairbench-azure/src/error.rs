use thiserror::Error;

/// Errors from the remote workspace path
#[derive(Debug, Error)]
pub enum AzureError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("`{command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AzureError>;
