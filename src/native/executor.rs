use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::TEST_PLACEHOLDER;
use crate::core::{
    domain::{ExecutionLimits, TestCase},
    traits::{
        compiler::{CompileError, Compiler},
        executor::{Executor, RunError, RunResult},
    },
};
use crate::native::process::launch;

/// Hands each test script to the subject executable.
#[derive(Clone, Debug)]
pub struct ScriptExecutor {
    executable: PathBuf,
    args_template: String,
    limits: ExecutionLimits,
}

impl ScriptExecutor {
    pub fn new<T>(executable: T, args_template: &str, limits: ExecutionLimits) -> Self
    where
        T: AsRef<Path>,
    {
        ScriptExecutor {
            executable: executable.as_ref().into(),
            args_template: args_template.to_string(),
            limits,
        }
    }
}

/// Splits the template into words and substitutes the test path for the
/// placeholder in each of them.
pub fn build_args(template: &str, test_path: &Path) -> Vec<String> {
    let test_path = test_path.to_string_lossy();
    template
        .split_whitespace()
        .map(|word| word.replace(TEST_PLACEHOLDER, &test_path))
        .collect()
}

#[async_trait::async_trait]
impl Executor for ScriptExecutor {
    async fn run(&self, case: &TestCase) -> Result<RunResult, RunError> {
        let args = build_args(&self.args_template, &case.path);
        tracing::debug!("Running {} {:?}", self.executable.display(), args);
        launch(&self.executable, &args, &self.limits).await
    }
}

/// Compiles each C fixture, then runs the resulting binary without arguments.
#[derive(Clone, Debug)]
pub struct NativeExecutor {
    compiler: Arc<dyn Compiler>,
    limits: ExecutionLimits,
}

impl NativeExecutor {
    pub fn new(compiler: Arc<dyn Compiler>, limits: ExecutionLimits) -> Self {
        NativeExecutor { compiler, limits }
    }
}

#[async_trait::async_trait]
impl Executor for NativeExecutor {
    async fn run(&self, case: &TestCase) -> Result<RunResult, RunError> {
        let artifact = self
            .compiler
            .compile(&case.path)
            .await
            .map_err(|e| match e {
                CompileError::CompilationFailed { diagnostics } => {
                    RunError::CompilationFailed { diagnostics }
                }
                CompileError::Internal { msg } => RunError::CompilerUnavailable { msg },
            })?;

        launch(&artifact, &[], &self.limits).await
    }
}
