//! Thin wrapper around the `az` command line (with the `ml` extension)

use std::process::Command;

use tracing::debug;

use crate::error::{AzureError, Result};

/// Something that can execute `az` invocations.
///
/// `args` excludes the program name. Returns captured stdout on success.
pub trait CommandRunner {
    fn az(&self, args: &[String]) -> Result<String>;
}

/// Runs the real `az` binary
#[derive(Debug, Clone)]
pub struct AzCli {
    program: String,
}

impl AzCli {
    pub fn new() -> Self {
        Self {
            program: "az".to_string(),
        }
    }

    /// Use a different executable, e.g. a wrapper script
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for AzCli {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for AzCli {
    fn az(&self, args: &[String]) -> Result<String> {
        let command = format!("{} {}", self.program, redact_args(args));
        debug!("running `{}`", command);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| AzureError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AzureError::Command {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Join arguments for display, masking the value after a password flag
pub fn redact_args(args: &[String]) -> String {
    let mut shown = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            shown.push("***");
            hide_next = false;
            continue;
        }
        hide_next = arg == "-p" || arg == "--password";
        shown.push(arg.as_str());
    }
    shown.join(" ")
}

/// Owned argument vector from string slices
pub(crate) fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// Records every call; `show` of a listed resource kind fails as if absent
    #[derive(Default)]
    pub struct RecordingAz {
        pub calls: RefCell<Vec<String>>,
        pub missing: Vec<&'static str>,
        pub job_name: String,
    }

    impl RecordingAz {
        pub fn with_missing(missing: &[&'static str]) -> Self {
            Self {
                missing: missing.to_vec(),
                job_name: "job-123".to_string(),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for RecordingAz {
        fn az(&self, args: &[String]) -> Result<String> {
            let line = redact_args(args);
            self.calls.borrow_mut().push(line.clone());

            if args.len() >= 3 && args[0] == "ml" && args[2] == "show" && self.missing.iter().any(|m| *m == args[1]) {
                return Err(AzureError::Command {
                    command: format!("az {}", line),
                    stderr: format!("{} not found", args[1]),
                });
            }
            if line.starts_with("ml job create") {
                return Ok(format!("{}\n", self.job_name));
            }
            Ok(String::new())
        }
    }
}
