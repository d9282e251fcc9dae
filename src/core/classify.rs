use std::time::Duration;

use crate::core::domain::{ClassificationMode, ExecutionResult, ExitStatus, FailureReason, Verdict};

impl ClassificationMode {
    /// Scores a finished execution.
    ///
    /// `timeout` is only used to describe a watchdog kill.
    pub fn classify(&self, result: &ExecutionResult, timeout: Duration) -> Verdict {
        let reason = match &result.status {
            ExitStatus::TimedOut => Some(FailureReason::TimedOut { after: timeout }),
            ExitStatus::LaunchFailed { msg } => {
                Some(FailureReason::LaunchFailed { msg: msg.clone() })
            }
            ExitStatus::Signal(signal) => Some(FailureReason::Signaled(*signal)),
            ExitStatus::Code(code) if *code != 0 => Some(FailureReason::ExitCode(*code)),
            ExitStatus::Code(_) if !result.stderr.is_empty() => Some(FailureReason::Stderr),
            ExitStatus::Code(_) => match self {
                ClassificationMode::Strict if !result.stdout.is_empty() => {
                    Some(FailureReason::Stdout)
                }
                _ => None,
            },
        };

        match reason {
            Some(reason) => Verdict::Fail(reason),
            None => Verdict::Pass,
        }
    }
}
