//! Timing regions emitted into generated scripts

pub const ESTIMATOR_FIT: &str = "estimator_fit";
pub const MITIGATION: &str = "mitigation";

/// A block of script lines whose wall-clock time the script itself measures
/// and reports through `run.log(label, seconds)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedRegion {
    label: &'static str,
    body: Vec<String>,
}

impl TimedRegion {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            body: Vec::new(),
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Start timestamp, body, then the elapsed-time log call
    pub fn render(&self) -> Vec<String> {
        let start_var = format!("{}_start", self.label);
        let mut lines = Vec::with_capacity(self.body.len() + 2);
        lines.push(format!("{} = time()", start_var));
        lines.extend(self.body.iter().cloned());
        lines.push(log_call(self.label, &start_var));
        lines
    }
}

/// The `run.log` call that closes a region
pub fn log_call(label: &str, start_var: &str) -> String {
    format!("run.log(\"{}\", time() - {})", label, start_var)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_wraps_body() {
        let region = TimedRegion::new(MITIGATION).line("a = 1").line("b = 2");
        assert_eq!(region.label(), "mitigation");
        assert_eq!(
            region.render(),
            vec![
                "mitigation_start = time()".to_string(),
                "a = 1".to_string(),
                "b = 2".to_string(),
                "run.log(\"mitigation\", time() - mitigation_start)".to_string(),
            ]
        );
    }
}
