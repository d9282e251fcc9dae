use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::Stdio;

use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use tokio::io::AsyncRead;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, timeout};

use crate::constants::READER_GRACE_MS;
use crate::core::{
    domain::{CapturedOutput, ExecutionLimits},
    traits::executor::{RunError, RunResult},
};
use crate::native::capture::{BoundedBuffer, SharedBuffer, drain};

/// Runs `program` once under the watchdog and captures both output streams.
///
/// The child leads its own process group. On timeout the whole group is
/// killed, so helpers it spawned do not outlive the test.
#[tracing::instrument(skip(limits))]
pub async fn launch(
    program: &Path,
    args: &[String],
    limits: &ExecutionLimits,
) -> Result<RunResult, RunError> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true);

    let start_time = Instant::now();
    let mut child = cmd.spawn().map_err(|e| RunError::LaunchFailed {
        msg: format!("{}: {}", program.display(), e),
    })?;
    let pid = child.id();
    tracing::debug!("Spawned {} as pid {:?}", program.display(), pid);

    let stdout_reader = spawn_reader(child.stdout.take(), limits.output_bytes);
    let stderr_reader = spawn_reader(child.stderr.take(), limits.output_bytes);

    match timeout(limits.time, child.wait()).await {
        Ok(Ok(status)) => {
            let elapsed = start_time.elapsed();
            // Background helpers left in the group would hold the pipes open.
            kill_group(pid);
            Ok(RunResult {
                status: status.code(),
                signal: status.signal(),
                stdout: collect(stdout_reader).await,
                stderr: collect(stderr_reader).await,
                elapsed,
            })
        }
        Ok(Err(e)) => {
            kill_group(pid);
            Err(RunError::LaunchFailed {
                msg: format!("Failed to wait for {}: {}", program.display(), e),
            })
        }
        Err(_) => {
            tracing::debug!(
                "{} exceeded {}ms, killing process group",
                program.display(),
                limits.time.as_millis()
            );
            kill_group(pid);
            let _ = child.start_kill();
            let _ = child.wait().await;
            let elapsed = start_time.elapsed();

            Err(RunError::TimedOut {
                result: RunResult {
                    status: None,
                    signal: None,
                    stdout: collect(stdout_reader).await,
                    stderr: collect(stderr_reader).await,
                    elapsed,
                },
            })
        }
    }
}

struct StreamReader {
    task: JoinHandle<()>,
    buffer: SharedBuffer,
}

fn spawn_reader<R>(stream: Option<R>, cap: usize) -> StreamReader
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buffer = BoundedBuffer::shared(cap);
    let task = tokio::spawn({
        let buffer = buffer.clone();
        async move {
            if let Some(stream) = stream {
                drain(stream, buffer).await;
            }
        }
    });
    StreamReader { task, buffer }
}

/// Waits briefly for a reader to hit end of stream. A descendant that
/// escaped the process group can hold the pipe open, so stop reading after
/// the grace period and keep what arrived until then.
async fn collect(reader: StreamReader) -> CapturedOutput {
    let StreamReader { task, buffer } = reader;
    let abort = task.abort_handle();
    match timeout(Duration::from_millis(READER_GRACE_MS), task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("Output reader failed: {}", e),
        Err(_) => {
            abort.abort();
            tracing::warn!("Output stream still open after child exit, keeping what was read");
        }
    }
    buffer.lock().await.snapshot()
}

fn kill_group(pid: Option<u32>) {
    let Some(pid) = pid else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        tracing::debug!("killpg({}) failed: {}", pid, e);
    }
}
