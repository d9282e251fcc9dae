use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{
    aggregator::ResultAggregator,
    discovery::discover,
    domain::{Configuration, FixtureKind},
    errors::HarnessError,
    pipeline::running::run_tests,
    reporter::{ConsoleReporter, exit_code},
    traits::{executor::Executor, reporter::Reporter},
};
use crate::native::{
    compiler::GccCompiler,
    executor::{NativeExecutor, ScriptExecutor},
};

/// Runs the whole corpus described by `config` and returns the process exit code.
///
/// Status lines go to `out` and `err`. Fatal errors are returned before any
/// summary is printed.
#[tracing::instrument(skip_all)]
pub async fn run<W: Write, E: Write>(
    config: &Configuration,
    out: W,
    err: E,
) -> Result<u8, HarnessError> {
    let cases = discover(config)?;
    let executor = build_executor(config)?;

    let mut reporter = ConsoleReporter::new(out, err, config.quiet, config.show_output);
    if config.files.is_empty() {
        reporter.found(cases.len());
    }

    let mut aggregator = ResultAggregator::new(cases.len(), subject(config), reporter);
    run_tests(
        cases,
        executor,
        config.mode,
        config.timeout,
        &mut aggregator,
    )
    .await?;

    Ok(aggregator.summary().map(exit_code).unwrap_or(1))
}

fn build_executor(config: &Configuration) -> Result<Arc<dyn Executor>, HarnessError> {
    let limits = config.execution_limits();
    match config.fixture {
        FixtureKind::Script => Ok(Arc::new(ScriptExecutor::new(
            &config.executable,
            &config.args_template,
            limits,
        ))),
        FixtureKind::Native => {
            let compiler = GccCompiler::new(&config.compiler).map_err(HarnessError::Workspace)?;
            Ok(Arc::new(NativeExecutor::new(Arc::new(compiler), limits)))
        }
    }
}

/// The program named in the summary line.
fn subject(config: &Configuration) -> PathBuf {
    match config.fixture {
        FixtureKind::Script => config.executable.clone(),
        FixtureKind::Native => config.compiler.clone(),
    }
}
