use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::FuturesUnordered;
use tokio_stream::StreamExt;

use crate::core::{
    aggregator::ResultAggregator,
    domain::{ClassificationMode, ExecutionResult, ExitStatus, TestCase},
    errors::HarnessError,
    traits::{
        executor::{Executor, RunError, RunResult},
        reporter::Reporter,
    },
};

/// Launches every test at once and feeds completions to the aggregator as
/// they arrive, in whatever order the children finish.
///
/// A fatal executor error stops the run immediately. Dropping the pending
/// futures kills the children still in flight.
#[tracing::instrument(skip_all, fields(tests = cases.len()))]
pub async fn run_tests<R: Reporter>(
    cases: Vec<TestCase>,
    executor: Arc<dyn Executor>,
    mode: ClassificationMode,
    timeout: Duration,
    aggregator: &mut ResultAggregator<R>,
) -> Result<(), HarnessError> {
    let mut futures = create_test_futures(cases, &executor);

    // Nothing to wait for when the corpus is empty.
    aggregator.finish_if_done();

    while let Some((case, result)) = futures.next().await {
        if let Err(err) = &result {
            if let Some(fatal) = fatal_error(&case, err) {
                tracing::error!("Aborting run: {:?}", err);
                return Err(fatal);
            }
        }

        let result: ExecutionResult = (case, result).into();
        let verdict = mode.classify(&result, timeout);
        aggregator.record(result, verdict);
    }

    Ok(())
}

/// Creates one future per test. None of them starts before the set is polled,
/// and then they all run concurrently.
fn create_test_futures(
    cases: Vec<TestCase>,
    executor: &Arc<dyn Executor>,
) -> FuturesUnordered<impl Future<Output = (TestCase, Result<RunResult, RunError>)>> {
    let futures = FuturesUnordered::new();

    for case in cases {
        let executor = executor.clone();
        tracing::debug!("Dispatching {}", case.path.display());

        futures.push(async move {
            let result = executor.run(&case).await;
            (case, result)
        });
    }

    futures
}

/// Compilation problems invalidate the whole run, not just one test.
fn fatal_error(case: &TestCase, err: &RunError) -> Option<HarnessError> {
    match err {
        RunError::CompilationFailed { diagnostics } => Some(HarnessError::Compilation {
            test: case.name(),
            diagnostics: diagnostics.clone(),
        }),
        RunError::CompilerUnavailable { msg } => Some(HarnessError::CompilerUnavailable {
            test: case.name(),
            msg: msg.clone(),
        }),
        RunError::TimedOut { .. } | RunError::LaunchFailed { .. } => None,
    }
}

impl From<(TestCase, Result<RunResult, RunError>)> for ExecutionResult {
    fn from((case, result): (TestCase, Result<RunResult, RunError>)) -> Self {
        match result {
            Ok(result) => {
                let status = match (result.status, result.signal) {
                    (Some(code), _) => ExitStatus::Code(code),
                    (None, Some(signal)) => ExitStatus::Signal(signal),
                    (None, None) => ExitStatus::Code(-1),
                };
                ExecutionResult {
                    case,
                    status,
                    stdout: result.stdout,
                    stderr: result.stderr,
                    elapsed: result.elapsed,
                }
            }
            Err(RunError::TimedOut { result }) => ExecutionResult {
                case,
                status: ExitStatus::TimedOut,
                stdout: result.stdout,
                stderr: result.stderr,
                elapsed: result.elapsed,
            },
            Err(RunError::LaunchFailed { msg })
            | Err(RunError::CompilerUnavailable { msg })
            | Err(RunError::CompilationFailed { diagnostics: msg }) => ExecutionResult {
                case,
                status: ExitStatus::LaunchFailed { msg },
                stdout: Default::default(),
                stderr: Default::default(),
                elapsed: Duration::ZERO,
            },
        }
    }
}
