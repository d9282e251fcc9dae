use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub executable: PathBuf,
    pub args_template: String,
    pub timeout: Duration,
    pub quiet: bool,
    pub files: Vec<PathBuf>,
    pub dir: PathBuf,
    pub mode: ClassificationMode,
    pub fixture: FixtureKind,
    pub compiler: PathBuf,
    pub max_output_bytes: usize,
    pub show_output: bool,
}

impl Configuration {
    pub fn execution_limits(&self) -> ExecutionLimits {
        ExecutionLimits {
            time: self.timeout,
            output_bytes: self.max_output_bytes,
        }
    }
}

/// Per-test bounds enforced by the executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionLimits {
    pub time: Duration,
    /// Cap on bytes kept from each of stdout and stderr.
    pub output_bytes: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FixtureKind {
    /// Test scripts handed to the subject executable.
    #[default]
    Script,
    /// C sources compiled first and run directly.
    Native,
}

/// Pass/fail policy applied to a finished execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassificationMode {
    /// Fails on a bad exit status or any stderr output.
    #[default]
    StderrSensitive,
    /// Like `StderrSensitive`, but stdout must be silent too.
    Strict,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TestCase {
    pub path: PathBuf,
}

impl TestCase {
    pub fn new(path: impl AsRef<Path>) -> Self {
        TestCase {
            path: path.as_ref().into(),
        }
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Bytes read from one output stream of a child, up to a cap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub bytes: Vec<u8>,
    /// Total number of bytes the child wrote, kept or not.
    pub total_bytes: u64,
}

impl CapturedOutput {
    pub fn is_empty(&self) -> bool {
        self.total_bytes == 0
    }

    pub fn is_truncated(&self) -> bool {
        self.total_bytes > self.bytes.len() as u64
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl From<&str> for CapturedOutput {
    fn from(text: &str) -> Self {
        CapturedOutput {
            bytes: text.as_bytes().to_vec(),
            total_bytes: text.len() as u64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Code(i32),
    Signal(i32),
    TimedOut,
    LaunchFailed { msg: String },
}

#[derive(Clone, Debug)]
pub struct ExecutionResult {
    pub case: TestCase,
    pub status: ExitStatus,
    pub stdout: CapturedOutput,
    pub stderr: CapturedOutput,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(FailureReason),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    TimedOut { after: Duration },
    LaunchFailed { msg: String },
    Signaled(i32),
    ExitCode(i32),
    Stderr,
    Stdout,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::TimedOut { after } => {
                write!(f, "timed out after {}ms", after.as_millis())
            }
            FailureReason::LaunchFailed { msg } => write!(f, "failed to launch: {}", msg),
            FailureReason::Signaled(signal) => write!(f, "killed by signal {}", signal),
            FailureReason::ExitCode(code) => write!(f, "exited with status {}", code),
            FailureReason::Stderr => write!(f, "wrote to stderr"),
            FailureReason::Stdout => write!(f, "wrote to stdout"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub dispatched: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunStats {
    pub fn completed(&self) -> usize {
        self.passed + self.failed
    }

    pub fn is_done(&self) -> bool {
        self.completed() == self.dispatched
    }
}

/// What the reporter prints once every dispatched test completed.
#[derive(Clone, Debug)]
pub struct Summary {
    pub stats: RunStats,
    pub elapsed: Duration,
    pub executable: PathBuf,
}
