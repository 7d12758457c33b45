//! Suite execution behind the `run` command.
//!
//! Argument validation happens before any browser process is launched, so
//! a typo in `--suite` fails fast. One browser serves the whole run; each
//! scenario gets its own page through the session factory.

use std::time::Duration;

use comprobar::suites::SUITE_NAMES;
use comprobar::{SessionOptions, SiteConfig};

use crate::commands::RunArgs;
use crate::error::{CliError, CliResult};
use crate::output::{Reporter, RunReport};

/// Validated inputs for one `run` invocation
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Suites to run, in order
    pub suites: Vec<&'static str>,
    /// Site under test
    pub site: SiteConfig,
    /// Session wait configuration
    pub session_options: SessionOptions,
    /// Show the browser window
    pub headed: bool,
    /// Run scenarios concurrently
    pub parallel: bool,
    /// Keep the chromium sandbox enabled
    pub sandbox: bool,
}

impl RunPlan {
    /// Validate run arguments into a plan
    pub fn from_args(args: &RunArgs) -> CliResult<Self> {
        let suites = match args.suite.as_deref() {
            None => SUITE_NAMES.to_vec(),
            Some(name) => {
                let known = SUITE_NAMES
                    .iter()
                    .find(|s| **s == name)
                    .ok_or_else(|| {
                        CliError::invalid_argument(format!(
                            "unknown suite '{name}' (available: {})",
                            SUITE_NAMES.join(", ")
                        ))
                    })?;
                vec![*known]
            }
        };

        let mut session_options = SessionOptions::default();
        if let Some(ms) = args.timeout {
            if ms == 0 {
                return Err(CliError::invalid_argument("--timeout must be positive"));
            }
            session_options = session_options.with_action_timeout(Duration::from_millis(ms));
        }

        let site = match args.base_url.as_deref() {
            Some(url) if url.trim_end_matches('/').is_empty() => {
                return Err(CliError::invalid_argument("--base-url must not be empty"));
            }
            Some(url) => SiteConfig::with_base_url(url),
            None => SiteConfig::default(),
        };

        Ok(Self {
            suites,
            site,
            session_options,
            headed: args.headed,
            parallel: args.parallel,
            sandbox: !args.no_sandbox,
        })
    }
}

/// Run every suite in the plan against a shared browser
#[cfg(feature = "browser")]
pub async fn execute(plan: &RunPlan, reporter: &mut Reporter) -> CliResult<RunReport> {
    use std::sync::Arc;

    use comprobar::suites::suite_by_name;
    use comprobar::{BrowserOptions, ChromiumBrowser, ScenarioRunner, Session};
    use tracing::info;

    let mut browser_options = BrowserOptions::default().with_headless(!plan.headed);
    if !plan.sandbox {
        browser_options = browser_options.with_no_sandbox();
    }
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        browser_options = browser_options.with_chromium_path(path);
    }

    info!(headed = plan.headed, "launching browser");
    let browser = Arc::new(ChromiumBrowser::launch(browser_options).await?);

    let factory_browser = Arc::clone(&browser);
    let session_options = plan.session_options.clone();
    let runner = ScenarioRunner::new(move || {
        let browser = Arc::clone(&factory_browser);
        let options = session_options.clone();
        async move {
            let driver = browser.new_driver().await?;
            Ok(Session::with_options(driver, options))
        }
    })
    .parallel(plan.parallel);

    let mut suites = Vec::with_capacity(plan.suites.len());
    for name in &plan.suites {
        let Some(suite) = suite_by_name(name, &plan.site) else {
            // Names were validated against SUITE_NAMES in from_args
            continue;
        };
        reporter.start_suite(name);
        let report = runner.run_suite(suite).await;
        reporter.finish_suite(&report);
        suites.push(report);
    }

    browser.close().await?;
    Ok(RunReport { suites })
}

/// Stub for builds without browser support
#[cfg(not(feature = "browser"))]
pub async fn execute(_plan: &RunPlan, _reporter: &mut Reporter) -> CliResult<RunReport> {
    Err(CliError::config(
        "this build has no browser support; rebuild with --features browser",
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::FormatArg;

    fn args() -> RunArgs {
        RunArgs {
            suite: None,
            headed: false,
            timeout: None,
            base_url: None,
            parallel: false,
            no_sandbox: false,
            format: FormatArg::Text,
            output: None,
        }
    }

    #[test]
    fn test_default_plan_runs_all_suites() {
        let plan = RunPlan::from_args(&args()).unwrap();
        assert_eq!(plan.suites, SUITE_NAMES.to_vec());
        assert!(plan.sandbox);
        assert!(!plan.headed);
        assert!(plan.session_options.action_timeout.is_none());
    }

    #[test]
    fn test_single_suite_selection() {
        let mut run = args();
        run.suite = Some("contact".to_string());
        let plan = RunPlan::from_args(&run).unwrap();
        assert_eq!(plan.suites, vec!["contact"]);
    }

    #[test]
    fn test_unknown_suite_is_rejected() {
        let mut run = args();
        run.suite = Some("checkout".to_string());
        let err = RunPlan::from_args(&run).unwrap_err();
        assert!(err.to_string().contains("unknown suite 'checkout'"));
        assert!(err.to_string().contains("cart, contact"));
    }

    #[test]
    fn test_timeout_flows_into_session_options() {
        let mut run = args();
        run.timeout = Some(2500);
        let plan = RunPlan::from_args(&run).unwrap();
        assert_eq!(
            plan.session_options.action_timeout,
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut run = args();
        run.timeout = Some(0);
        assert!(RunPlan::from_args(&run).is_err());
    }

    #[test]
    fn test_base_url_overrides_site() {
        let mut run = args();
        run.base_url = Some("http://localhost:4200/".to_string());
        let plan = RunPlan::from_args(&run).unwrap();
        assert_eq!(plan.site.base_url, "http://localhost:4200");
    }
}
