use std::path::PathBuf;

/// Errors that abort the whole run instead of failing a single test.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Cannot read test directory {}: {source}", dir.display())]
    Discovery {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error while attempting to compile {test}\n\n{diagnostics}")]
    Compilation { test: String, diagnostics: String },

    #[error("Cannot invoke compiler for {test}: {msg}")]
    CompilerUnavailable { test: String, msg: String },

    #[error("Cannot prepare fixture directory: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("Interrupted")]
    Interrupted,
}
