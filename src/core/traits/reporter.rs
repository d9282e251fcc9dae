use crate::core::domain::{ExecutionResult, Summary, Verdict};

#[mockall::automock]
pub trait Reporter {
    fn found(&mut self, count: usize);
    fn test_completed(&mut self, result: &ExecutionResult, verdict: &Verdict);
    fn finish(&mut self, summary: &Summary);
}
