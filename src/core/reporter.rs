use std::io::Write;

use crate::constants::{FAIL_MARK, PASS_MARK};
use crate::core::{
    domain::{CapturedOutput, ExecutionResult, Summary, Verdict},
    traits::reporter::Reporter,
};

/// Exit status handed back to the calling CI system.
pub fn exit_code(summary: &Summary) -> u8 {
    if summary.stats.failed == 0 { 0 } else { 1 }
}

/// Prints status lines as tests complete.
///
/// Passes and the summary go to `out`, failures and their stderr go to
/// `err`. Quiet mode hides everything except failures and the summary.
pub struct ConsoleReporter<W: Write, E: Write> {
    out: W,
    err: E,
    quiet: bool,
    show_output: bool,
}

impl<W: Write, E: Write> ConsoleReporter<W, E> {
    pub fn new(out: W, err: E, quiet: bool, show_output: bool) -> Self {
        ConsoleReporter {
            out,
            err,
            quiet,
            show_output,
        }
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn write_stream(dst: &mut impl Write, output: &CapturedOutput) {
        if output.is_empty() {
            return;
        }
        let text = output.text();
        let _ = write!(dst, "{}", text);
        if !text.ends_with('\n') {
            let _ = writeln!(dst);
        }
        if output.is_truncated() {
            let _ = writeln!(
                dst,
                "[output truncated, {} bytes written in total]",
                output.total_bytes
            );
        }
    }
}

impl<W: Write, E: Write> Reporter for ConsoleReporter<W, E> {
    fn found(&mut self, count: usize) {
        if !self.quiet {
            let _ = writeln!(self.out, "Found {} test files.\n", count);
        }
    }

    fn test_completed(&mut self, result: &ExecutionResult, verdict: &Verdict) {
        let name = result.case.name();
        match verdict {
            Verdict::Pass => {
                if !self.quiet {
                    let _ = writeln!(self.out, "{} {}", PASS_MARK, name);
                }
                if self.show_output {
                    Self::write_stream(&mut self.out, &result.stdout);
                }
            }
            Verdict::Fail(reason) => {
                let _ = writeln!(self.err, "{} {}: {}", FAIL_MARK, name, reason);
                Self::write_stream(&mut self.err, &result.stderr);
                if self.show_output {
                    Self::write_stream(&mut self.err, &result.stdout);
                }
            }
        }
    }

    fn finish(&mut self, summary: &Summary) {
        let _ = writeln!(
            self.out,
            "\n{} passed, {} failed ({}) {}ms",
            summary.stats.passed,
            summary.stats.failed,
            summary.executable.display(),
            summary.elapsed.as_millis()
        );
        let _ = self.out.flush();
        let _ = self.err.flush();
    }
}
