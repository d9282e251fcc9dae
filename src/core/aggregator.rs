use std::path::PathBuf;
use std::time::Instant;

use crate::core::{
    domain::{ExecutionResult, RunStats, Summary, Verdict},
    traits::reporter::Reporter,
};

/// Counts completions and finishes the run exactly once.
///
/// Completions are handed in one at a time by the running loop, so a plain
/// flag is enough to guard the finish.
pub struct ResultAggregator<R: Reporter> {
    stats: RunStats,
    finished: Option<Summary>,
    started_at: Instant,
    executable: PathBuf,
    reporter: R,
}

impl<R: Reporter> ResultAggregator<R> {
    pub fn new(dispatched: usize, executable: PathBuf, reporter: R) -> Self {
        ResultAggregator {
            stats: RunStats {
                dispatched,
                ..RunStats::default()
            },
            finished: None,
            started_at: Instant::now(),
            executable,
            reporter,
        }
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.finished.as_ref()
    }

    pub fn record(&mut self, result: ExecutionResult, verdict: Verdict) {
        if self.finished.is_some() || self.stats.is_done() {
            tracing::warn!(
                "Ignoring completion of {} after all {} tests completed",
                result.case.name(),
                self.stats.dispatched
            );
            return;
        }

        if verdict.is_pass() {
            self.stats.passed += 1;
        } else {
            self.stats.failed += 1;
        }
        tracing::debug!(
            "Completed {}: {:?} ({}/{})",
            result.case.name(),
            verdict,
            self.stats.completed(),
            self.stats.dispatched
        );
        self.reporter.test_completed(&result, &verdict);

        self.finish_if_done();
    }

    /// Finishes the run when every dispatched test completed. Later calls do nothing.
    pub fn finish_if_done(&mut self) -> Option<&Summary> {
        if self.finished.is_none() && self.stats.is_done() {
            let summary = Summary {
                stats: self.stats,
                elapsed: self.started_at.elapsed(),
                executable: self.executable.clone(),
            };
            self.reporter.finish(&summary);
            self.finished = Some(summary);
        }
        self.finished.as_ref()
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }
}
