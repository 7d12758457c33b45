//! Scenarios as named sequences of async steps.
//!
//! A scenario owns its steps but not a session; the runner hands each
//! scenario a fresh [`Session`] so browser state never leaks between
//! scenarios. A failing step fails the scenario and the remaining steps
//! are recorded as skipped.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info};

use crate::result::{ComprobarError, ComprobarResult};
use crate::session::Session;

/// Boxed future produced by one step invocation
pub type StepFuture = Pin<Box<dyn Future<Output = ComprobarResult<()>> + Send + 'static>>;

/// Type-erased step body
pub type StepFn = Box<dyn Fn(Arc<Session>) -> StepFuture + Send + Sync>;

/// One named step in a scenario
pub struct Step {
    name: String,
    run: StepFn,
}

impl Step {
    /// Step name as shown in reports
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// Lifecycle of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Declared but not yet handed to a runner
    NotStarted,
    /// Steps are executing
    Running,
    /// Every step passed
    Passed,
    /// A step failed; later steps were skipped
    Failed,
}

/// A named, ordered sequence of steps
#[derive(Debug)]
pub struct Scenario {
    name: String,
    steps: Vec<Step>,
    status: ScenarioStatus,
}

impl Scenario {
    /// Start an empty scenario
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            status: ScenarioStatus::NotStarted,
        }
    }

    /// Append a step
    #[must_use]
    pub fn step<F, Fut>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(Arc<Session>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ComprobarResult<()>> + Send + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            run: Box::new(move |session| Box::pin(body(session))),
        });
        self
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the scenario has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the steps, in order
    #[must_use]
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(Step::name).collect()
    }

    /// Where the scenario is in its lifecycle
    #[must_use]
    pub fn status(&self) -> ScenarioStatus {
        self.status
    }

    /// Run every step against the given session, stopping at the first
    /// failure
    pub async fn run(&mut self, session: Arc<Session>) -> ScenarioReport {
        info!(scenario = %self.name, steps = self.steps.len(), "scenario start");
        self.status = ScenarioStatus::Running;
        let started = Instant::now();
        let mut steps = Vec::with_capacity(self.steps.len());
        let mut failed = false;

        for step in &self.steps {
            if failed {
                steps.push(StepReport::skipped(&step.name));
                continue;
            }
            let step_started = Instant::now();
            let outcome = (step.run)(Arc::clone(&session)).await;
            let elapsed = step_started.elapsed().as_millis() as u64;
            match outcome {
                Ok(()) => steps.push(StepReport::passed(&step.name, elapsed)),
                Err(err) => {
                    error!(scenario = %self.name, step = %step.name, %err, "step failed");
                    steps.push(StepReport::failed(&step.name, elapsed, &err));
                    failed = true;
                }
            }
        }

        self.status = if failed {
            ScenarioStatus::Failed
        } else {
            ScenarioStatus::Passed
        };
        ScenarioReport {
            name: self.name.clone(),
            passed: !failed,
            duration_ms: started.elapsed().as_millis() as u64,
            steps,
        }
    }
}

/// Outcome of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step ran and returned `Ok`
    Passed,
    /// Step ran and returned an error
    Failed,
    /// Step never ran because an earlier step failed
    Skipped,
}

/// What a failing step reported
#[derive(Debug, Clone, Serialize)]
pub struct StepFailure {
    /// Rendered error message
    pub message: String,
    /// Expected value, when the failure carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Observed value, when the failure carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<String>,
    /// True when the failure is a test verdict, false when the harness
    /// itself broke (driver error, session launch, IO)
    pub verdict: bool,
}

impl StepFailure {
    fn from_error(err: &ComprobarError) -> Self {
        let (expected, observed) = match err.expected_observed() {
            Some((e, o)) => (Some(e.to_string()), Some(o.to_string())),
            None => (None, None),
        };
        Self {
            message: err.to_string(),
            expected,
            observed,
            verdict: err.is_verdict(),
        }
    }
}

/// Report for one step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Step name
    pub name: String,
    /// Outcome
    pub status: StepStatus,
    /// Wall-clock time spent in the step
    pub duration_ms: u64,
    /// Failure detail, present only for failed steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
}

impl StepReport {
    fn passed(name: &str, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Passed,
            duration_ms,
            failure: None,
        }
    }

    fn failed(name: &str, duration_ms: u64, err: &ComprobarError) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Failed,
            duration_ms,
            failure: Some(StepFailure::from_error(err)),
        }
    }

    fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Skipped,
            duration_ms: 0,
            failure: None,
        }
    }
}

/// Report for one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Whether every step passed
    pub passed: bool,
    /// Wall-clock time for the whole scenario
    pub duration_ms: u64,
    /// Per-step reports, in declaration order
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    /// Report used when the runner could not even open a session
    pub(crate) fn session_failure(name: &str, err: &ComprobarError) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            duration_ms: 0,
            steps: vec![StepReport::failed("open session", 0, err)],
        }
    }

    /// The first failing step, if any
    #[must_use]
    pub fn first_failure(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }
}
