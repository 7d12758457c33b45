//! Suite execution.
//!
//! The runner opens a fresh session per scenario through a caller-supplied
//! factory, so it works the same against a real browser or a mock driver.
//! Scenarios are independent; one failing scenario never stops the rest.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::result::{ComprobarError, ComprobarResult};
use crate::scenario::{Scenario, ScenarioReport, StepReport};
use crate::session::Session;

/// Boxed future yielding a fresh session
pub type SessionFuture = Pin<Box<dyn Future<Output = ComprobarResult<Session>> + Send + 'static>>;

/// Factory invoked once per scenario
pub type SessionFactory = Arc<dyn Fn() -> SessionFuture + Send + Sync>;

/// A named collection of scenarios
#[derive(Debug)]
pub struct Suite {
    name: String,
    scenarios: Vec<Scenario>,
}

impl Suite {
    /// Start an empty suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenarios: Vec::new(),
        }
    }

    /// Append a scenario
    #[must_use]
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Suite name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scenarios, in declaration order
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Number of scenarios
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the suite has no scenarios
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Runs suites, one fresh session per scenario
pub struct ScenarioRunner {
    factory: SessionFactory,
    parallel: bool,
}

impl std::fmt::Debug for ScenarioRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioRunner")
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl ScenarioRunner {
    /// Build a runner from a session factory
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ComprobarResult<Session>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || Box::pin(factory())),
            parallel: false,
        }
    }

    /// Run scenarios concurrently instead of in declaration order.
    /// Each scenario still gets its own session.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every scenario in the suite and collect a report
    pub async fn run_suite(&self, suite: Suite) -> SuiteReport {
        info!(suite = %suite.name, scenarios = suite.scenarios.len(), "suite start");
        let started = Instant::now();

        let reports = if self.parallel {
            self.run_parallel(suite.scenarios).await
        } else {
            self.run_sequential(suite.scenarios).await
        };

        let report = SuiteReport {
            suite_name: suite.name,
            duration_ms: started.elapsed().as_millis() as u64,
            scenarios: reports,
        };
        info!(
            suite = %report.suite_name,
            passed = report.passed_count(),
            failed = report.failed_count(),
            "suite finished"
        );
        report
    }

    async fn run_sequential(&self, scenarios: Vec<Scenario>) -> Vec<ScenarioReport> {
        let mut reports = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            reports.push(run_one(Arc::clone(&self.factory), scenario).await);
        }
        reports
    }

    async fn run_parallel(&self, scenarios: Vec<Scenario>) -> Vec<ScenarioReport> {
        let handles: Vec<_> = scenarios
            .into_iter()
            .map(|scenario| {
                let factory = Arc::clone(&self.factory);
                tokio::spawn(run_one(factory, scenario))
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(join_err) => {
                    warn!(%join_err, "scenario task panicked");
                    let err = ComprobarError::Session {
                        message: format!("scenario task panicked: {join_err}"),
                    };
                    reports.push(ScenarioReport::session_failure("<panicked>", &err));
                }
            }
        }
        reports
    }
}

async fn run_one(factory: SessionFactory, mut scenario: Scenario) -> ScenarioReport {
    let session = match factory().await {
        Ok(session) => Arc::new(session),
        Err(err) => {
            warn!(scenario = %scenario.name(), %err, "could not open session");
            return ScenarioReport::session_failure(scenario.name(), &err);
        }
    };

    let report = scenario.run(Arc::clone(&session)).await;
    if let Err(err) = session.close().await {
        warn!(scenario = %report.name, %err, "session close failed");
    }
    report
}

/// Report for a whole suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Suite name
    pub suite_name: String,
    /// Wall-clock time for the whole run
    pub duration_ms: u64,
    /// Per-scenario reports
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Whether every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(|s| s.passed)
    }

    /// Number of passing scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed).count()
    }

    /// Number of failing scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.scenarios.len() - self.passed_count()
    }

    /// Failing scenarios paired with their first failing step
    pub fn failures(&self) -> impl Iterator<Item = (&ScenarioReport, &StepReport)> {
        self.scenarios
            .iter()
            .filter(|s| !s.passed)
            .filter_map(|s| s.first_failure().map(|step| (s, step)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::locator::{Locator, Selector};
    use crate::session::SessionOptions;
    use std::time::Duration;

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new(|| async {
            let driver = MockDriver::new().with_element(
                &Selector::test_id("add-to-cart"),
                MockElement::text("Add to cart"),
            );
            Ok(Session::with_options(
                driver,
                SessionOptions::default().with_action_timeout(Duration::from_millis(50)),
            ))
        })
    }

    fn passing(name: &str) -> Scenario {
        Scenario::new(name).step("add to cart", |s: Arc<Session>| async move {
            s.click(&Locator::test_id("add-to-cart")).await
        })
    }

    fn failing(name: &str) -> Scenario {
        Scenario::new(name).step("click missing", |s: Arc<Session>| async move {
            s.click(&Locator::test_id("does-not-exist")).await
        })
    }

    #[tokio::test]
    async fn test_sequential_suite_reports_each_scenario() {
        let suite = Suite::new("cart")
            .scenario(passing("first"))
            .scenario(failing("second"))
            .scenario(passing("third"));

        let report = runner().run_suite(suite).await;
        assert_eq!(report.scenarios.len(), 3);
        assert!(!report.all_passed());
        assert_eq!(report.passed_count(), 2);
        assert_eq!(report.failed_count(), 1);

        let (scenario, step) = report.failures().next().unwrap();
        assert_eq!(scenario.name, "second");
        assert_eq!(step.name, "click missing");
    }

    #[tokio::test]
    async fn test_failing_scenario_does_not_stop_later_ones() {
        let suite = Suite::new("cart")
            .scenario(failing("first"))
            .scenario(passing("second"));

        let report = runner().run_suite(suite).await;
        assert!(!report.scenarios[0].passed);
        assert!(report.scenarios[1].passed);
    }

    #[tokio::test]
    async fn test_parallel_preserves_declaration_order() {
        let suite = Suite::new("cart")
            .scenario(passing("a"))
            .scenario(passing("b"))
            .scenario(passing("c"));

        let report = runner().parallel(true).run_suite(suite).await;
        let names: Vec<_> = report.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(report.all_passed());
    }

    #[tokio::test]
    async fn test_session_factory_failure_fails_the_scenario() {
        let runner = ScenarioRunner::new(|| async {
            Err(ComprobarError::BrowserNotFound)
        });
        let suite = Suite::new("cart").scenario(passing("only"));
        let report = runner.run_suite(suite).await;
        assert!(!report.all_passed());
        let (scenario, step) = report.failures().next().unwrap();
        assert_eq!(scenario.name, "only");
        assert_eq!(step.name, "open session");
    }

    #[tokio::test]
    async fn test_empty_suite_passes() {
        let report = runner().run_suite(Suite::new("empty")).await;
        assert!(report.all_passed());
        assert_eq!(report.passed_count(), 0);
    }
}
