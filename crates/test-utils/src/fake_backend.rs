use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use webapp_rebuild::errors::{RebuildError, Result, StepKind};
use webapp_rebuild::exec::{BuildBackend, BuildStep};

/// A fake build backend that:
/// - records which steps were "run"
/// - succeeds, unless a failure was scripted for that step kind.
#[derive(Clone, Default)]
pub struct FakeBackend {
    executed: Arc<Mutex<Vec<BuildStep>>>,
    fail_on: Option<StepKind>,
    tool_missing: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given step exit with code 1.
    pub fn failing_on(mut self, kind: StepKind) -> Self {
        self.fail_on = Some(kind);
        self
    }

    /// Pretend the tool is not installed.
    pub fn without_tool(mut self) -> Self {
        self.tool_missing = true;
        self
    }

    /// Steps run so far, in order.
    pub fn executed(&self) -> Vec<BuildStep> {
        self.executed.lock().unwrap().clone()
    }

    pub fn executed_kinds(&self) -> Vec<StepKind> {
        self.executed().iter().map(|s| s.kind).collect()
    }

    pub fn clear(&self) {
        self.executed.lock().unwrap().clear();
    }
}

impl BuildBackend for FakeBackend {
    fn run_step<'a>(
        &'a mut self,
        step: &'a BuildStep,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if self.tool_missing {
                return Err(RebuildError::ToolUnavailable {
                    tool: step.program.clone(),
                });
            }

            self.executed.lock().unwrap().push(step.clone());

            if self.fail_on == Some(step.kind) {
                return Err(RebuildError::BuildStepFailed {
                    step: step.kind,
                    code: Some(1),
                    output: format!("--- stderr ---\n{step} failed\n"),
                });
            }
            Ok(())
        })
    }
}
