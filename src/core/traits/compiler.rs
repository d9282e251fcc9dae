use std::path::{Path, PathBuf};

#[mockall::automock]
#[async_trait::async_trait]
pub trait Compiler: std::fmt::Debug + Send + Sync {
    /// Compiles one native fixture and returns the path of the executable.
    async fn compile(&self, source: &Path) -> Result<PathBuf, CompileError>;
}

#[derive(Debug, Clone)]
pub enum CompileError {
    CompilationFailed { diagnostics: String },
    Internal { msg: String },
}
