//! Local subprocess execution of generated scripts

use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{ExecError, Result};

/// Result of a script that exited successfully
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRun {
    pub exit_code: Option<i32>,
    pub duration: Duration,
    /// Values printed by the script's stand-in run context
    pub metrics: BTreeMap<String, Vec<f64>>,
}

/// Runs generated scripts with a local interpreter
#[derive(Debug, Clone)]
pub struct LocalRunner {
    python: String,
}

impl LocalRunner {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    pub fn python(&self) -> &str {
        &self.python
    }

    /// Run `<python> <script_name>` inside `script_dir`.
    ///
    /// Each stdout line is forwarded to `out` as soon as it is read. Blocks
    /// until the process exits; a non-zero exit status is an error carrying
    /// the command and code.
    pub fn run<W: Write>(&self, script_dir: &Path, script_name: &str, out: &mut W) -> Result<ScriptRun> {
        let command = format!("{} {}", self.python, script_name);
        info!("running `{}` in {}", command, script_dir.display());

        let start = Instant::now();
        let mut child = Command::new(&self.python)
            .arg(script_name)
            .current_dir(script_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                command: command.clone(),
                source,
            })?;

        let mut metrics = BTreeMap::new();
        let forwarded = match child.stdout.take() {
            Some(stdout) => forward_output(stdout, out, &mut metrics),
            None => Ok(()),
        };

        // The pipe is closed by now, so the child cannot block on a full buffer
        let status = child.wait()?;
        if let Err(e) = forwarded {
            warn!("stopped forwarding output of `{}`: {}", command, e);
            return Err(e.into());
        }
        let duration = start.elapsed();
        debug!(?status, ?duration, "script finished");

        if !status.success() {
            return Err(ExecError::Process {
                command,
                code: status.code(),
            });
        }

        Ok(ScriptRun {
            exit_code: status.code(),
            duration,
            metrics,
        })
    }
}

/// Copy `stdout` to `out` line by line, collecting metric lines.
///
/// Bytes that are not UTF-8 are replaced rather than treated as an error.
fn forward_output<R: Read, W: Write>(stdout: R, out: &mut W, metrics: &mut BTreeMap<String, Vec<f64>>) -> io::Result<()> {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(|c| c == '\n' || c == '\r');
        writeln!(out, "{}", line)?;
        out.flush()?;
        if let Some((name, values)) = parse_metric_line(line) {
            metrics.insert(name, values);
        }
    }
}

/// Parse `<name> <number> [<number>...]` as printed by `run.log`/`run.log_list`.
///
/// Lines with any non-numeric value are ordinary output.
pub fn parse_metric_line(line: &str) -> Option<(String, Vec<f64>)> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let values = parts
        .map(|p| p.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    if values.is_empty() || name.parse::<f64>().is_ok() {
        return None;
    }
    Some((name.to_string(), values))
}
