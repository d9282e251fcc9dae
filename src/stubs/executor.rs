use std::collections::HashMap;
use std::time::Duration;

use crate::core::{
    domain::TestCase,
    traits::executor::{Executor, RunError, RunResult},
};

/// Replays canned results, keyed by test name, after a per-test delay.
#[derive(Debug, Clone, Default)]
pub struct ExecutorStub {
    responses: HashMap<String, (Result<RunResult, RunError>, Duration)>,
}

impl ExecutorStub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, result: Result<RunResult, RunError>, delay: Duration) -> Self {
        self.responses.insert(name.to_string(), (result, delay));
        self
    }
}

#[async_trait::async_trait]
impl Executor for ExecutorStub {
    #[tracing::instrument]
    async fn run(&self, case: &TestCase) -> Result<RunResult, RunError> {
        let (result, delay) = self.responses.get(&case.name()).cloned().unwrap_or_else(|| {
            (
                Err(RunError::LaunchFailed {
                    msg: format!("no canned result for {}", case.name()),
                }),
                Duration::ZERO,
            )
        });

        tracing::debug!("Start execution: case={:?}, delay={:?}", case, delay);
        tokio::time::sleep(delay).await;
        tracing::debug!("Execution result: {:?}", result);

        result
    }
}
