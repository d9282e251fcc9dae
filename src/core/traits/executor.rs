use std::time::Duration;

use crate::core::domain::{CapturedOutput, TestCase};

#[mockall::automock]
#[async_trait::async_trait]
pub trait Executor: std::fmt::Debug + Send + Sync {
    async fn run(&self, case: &TestCase) -> Result<RunResult, RunError>;
}

#[derive(Clone, Debug)]
pub struct RunResult {
    /// Exit code, or `None` when the child was killed by a signal.
    pub status: Option<i32>,
    pub signal: Option<i32>,
    pub stdout: CapturedOutput,
    pub stderr: CapturedOutput,
    pub elapsed: Duration,
}

/// Compile errors abort the whole run; the other variants fail one test.
#[derive(Debug, Clone)]
pub enum RunError {
    TimedOut { result: RunResult },
    LaunchFailed { msg: String },
    CompilationFailed { diagnostics: String },
    CompilerUnavailable { msg: String },
}
