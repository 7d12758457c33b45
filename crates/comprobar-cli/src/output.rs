//! Report rendering and progress output

use std::time::Duration;

use comprobar::{ScenarioReport, StepStatus, SuiteReport};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Output format for run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Every suite report from one `run` invocation
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Per-suite reports, in run order
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    /// Whether every scenario in every suite passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.suites.iter().all(SuiteReport::all_passed)
    }

    /// Total passing scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.suites.iter().map(SuiteReport::passed_count).sum()
    }

    /// Total failing scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.suites.iter().map(SuiteReport::failed_count).sum()
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as plain text (for `--output` files)
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for suite in &self.suites {
            out.push_str(&format!(
                "suite {} ({}ms)\n",
                suite.suite_name, suite.duration_ms
            ));
            for scenario in &suite.scenarios {
                let verdict = if scenario.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  {verdict} {}\n", scenario.name));
                if let Some(step) = scenario.first_failure() {
                    out.push_str(&format!("    step: {}\n", step.name));
                    if let Some(failure) = &step.failure {
                        let label = if failure.verdict { "" } else { "harness error: " };
                        out.push_str(&format!("    {label}{}\n", failure.message));
                    }
                }
            }
        }
        out.push_str(&format!(
            "{} passed, {} failed\n",
            self.passed_count(),
            self.failed_count()
        ));
        out
    }
}

/// Terminal reporter for suite runs
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    use_color: bool,
    quiet: bool,
}

impl Reporter {
    /// Create a reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Show a spinner while a suite runs
    pub fn start_suite(&mut self, name: &str) {
        if self.quiet {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("running suite {name}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.progress_bar = Some(pb);
    }

    /// Clear the spinner and print the suite's scenario lines
    pub fn finish_suite(&mut self, report: &SuiteReport) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
        if !self.quiet {
            let header = format!("suite {} ({}ms)", report.suite_name, report.duration_ms);
            let _ = self.term.write_line(&if self.use_color {
                style(header).bold().to_string()
            } else {
                header
            });
        }
        for scenario in &report.scenarios {
            self.scenario_line(scenario);
        }
    }

    fn scenario_line(&self, scenario: &ScenarioReport) {
        if scenario.passed {
            if self.quiet {
                return;
            }
            let prefix = if self.use_color {
                style("✓").green().bold().to_string()
            } else {
                "PASS".to_string()
            };
            let _ = self
                .term
                .write_line(&format!("{prefix} {} ({}ms)", scenario.name, scenario.duration_ms));
            return;
        }

        // Failures print even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {}", scenario.name));

        if let Some(step) = scenario.first_failure() {
            let _ = self.term.write_line(&format!("    step: {}", step.name));
            if let Some(failure) = &step.failure {
                // A non-verdict failure means the harness broke, not the
                // site under test; label it so triage goes the right way.
                let label = if failure.verdict { "" } else { "harness error: " };
                let _ = self.term.write_line(&format!("    {label}{}", failure.message));
                if let (Some(expected), Some(observed)) = (&failure.expected, &failure.observed) {
                    let _ = self.term.write_line(&format!("    expected: {expected}"));
                    let _ = self.term.write_line(&format!("    observed: {observed}"));
                }
            }
        }
        let skipped = scenario
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Skipped)
            .count();
        if skipped > 0 {
            let _ = self.term.write_line(&format!("    ({skipped} later steps skipped)"));
        }
    }

    /// Print the final run summary
    pub fn summary(&self, report: &RunReport) {
        let passed = report.passed_count();
        let failed = report.failed_count();
        let line = format!("{passed} passed, {failed} failed");
        if report.all_passed() {
            if self.quiet {
                return;
            }
            let _ = self.term.write_line(&if self.use_color {
                style(line).green().to_string()
            } else {
                line
            });
        } else {
            let _ = self.term.write_line(&if self.use_color {
                style(line).red().bold().to_string()
            } else {
                line
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn passed_suite(name: &str) -> SuiteReport {
        SuiteReport {
            suite_name: name.to_string(),
            duration_ms: 10,
            scenarios: vec![],
        }
    }

    #[test]
    fn test_empty_run_passes() {
        let report = RunReport {
            suites: vec![passed_suite("cart"), passed_suite("contact")],
        };
        assert!(report.all_passed());
        assert_eq!(report.passed_count(), 0);
        assert_eq!(report.failed_count(), 0);
    }

    #[test]
    fn test_text_rendering_labels_harness_errors() {
        use comprobar::{StepFailure, StepReport};

        let report = RunReport {
            suites: vec![SuiteReport {
                suite_name: "cart".to_string(),
                duration_ms: 10,
                scenarios: vec![ScenarioReport {
                    name: "add single item".to_string(),
                    passed: false,
                    duration_ms: 5,
                    steps: vec![StepReport {
                        name: "open product page".to_string(),
                        status: StepStatus::Failed,
                        duration_ms: 5,
                        failure: Some(StepFailure {
                            message: "driver error: evaluate failed".to_string(),
                            expected: None,
                            observed: None,
                            verdict: false,
                        }),
                    }],
                }],
            }],
        };
        let text = report.to_text();
        assert!(text.contains("harness error: driver error: evaluate failed"));
    }

    #[test]
    fn test_json_rendering_includes_suite_names() {
        let report = RunReport {
            suites: vec![passed_suite("cart")],
        };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"suite_name\": \"cart\""));
    }

    #[test]
    fn test_reporter_survives_plain_output() {
        let mut reporter = Reporter::new(false, true);
        reporter.start_suite("cart");
        reporter.finish_suite(&passed_suite("cart"));
        reporter.summary(&RunReport {
            suites: vec![passed_suite("cart")],
        });
    }
}
