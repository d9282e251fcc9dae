use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use uuid::Uuid;

use crate::core::traits::compiler::{CompileError, Compiler};

/// Compiles C fixtures with a gcc-compatible driver into a private temp dir.
#[derive(Debug)]
pub struct GccCompiler {
    compiler_path: PathBuf,
    temp_dir: PathBuf,
}

impl GccCompiler {
    pub fn new(compiler_path: impl AsRef<Path>) -> std::io::Result<Self> {
        let temp_dir = std::env::temp_dir()
            .join("corpus-runner")
            .join(format!("fixtures_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            compiler_path: compiler_path.as_ref().into(),
            temp_dir,
        })
    }
}

#[async_trait::async_trait]
impl Compiler for GccCompiler {
    #[tracing::instrument]
    async fn compile(&self, source: &Path) -> Result<PathBuf, CompileError> {
        let stem = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let artifact = self
            .temp_dir
            .join(format!("{}.{}.out", stem, Uuid::new_v4()));

        let output = Command::new(&self.compiler_path)
            .arg(source)
            .arg("-o")
            .arg(&artifact)
            .arg("-lm")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| CompileError::Internal {
                msg: format!("{}: {}", self.compiler_path.display(), e),
            })?;

        // Any diagnostic fails the fixture, warnings included.
        if !output.status.success() || !output.stderr.is_empty() {
            return Err(CompileError::CompilationFailed {
                diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        tracing::debug!("Compiled {} into {}", source.display(), artifact.display());
        Ok(artifact)
    }
}

impl Drop for GccCompiler {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}
