use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Mutex;

use crate::constants::READ_CHUNK_BYTES;
use crate::core::domain::CapturedOutput;

/// Keeps the first `cap` bytes written to it and counts the rest.
#[derive(Debug)]
pub struct BoundedBuffer {
    bytes: Vec<u8>,
    cap: usize,
    total_bytes: u64,
}

/// Buffer shared between a reader task and whoever collects its output.
/// It outlives the task, so an aborted reader still leaves what it read.
pub type SharedBuffer = Arc<Mutex<BoundedBuffer>>;

impl BoundedBuffer {
    pub fn new(cap: usize) -> Self {
        BoundedBuffer {
            bytes: Vec::new(),
            cap,
            total_bytes: 0,
        }
    }

    pub fn shared(cap: usize) -> SharedBuffer {
        Arc::new(Mutex::new(Self::new(cap)))
    }

    pub fn write(&mut self, chunk: &[u8]) {
        self.total_bytes += chunk.len() as u64;
        let room = self.cap.saturating_sub(self.bytes.len());
        self.bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }

    pub fn snapshot(&self) -> CapturedOutput {
        CapturedOutput {
            bytes: self.bytes.clone(),
            total_bytes: self.total_bytes,
        }
    }
}

/// Drains `reader` to the end into `buffer`.
///
/// Reading never stops at the cap, so a chatty child cannot block on a
/// full pipe. A read error ends the capture with what was read so far.
pub async fn drain<R>(mut reader: R, buffer: SharedBuffer)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; READ_CHUNK_BYTES];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buffer.lock().await.write(&chunk[..n]),
            Err(e) => {
                tracing::debug!("Stopped reading child output: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_keeps_prefix_and_counts_everything() {
        let mut buffer = BoundedBuffer::new(5);
        buffer.write(b"abc");
        buffer.write(b"defgh");
        buffer.write(b"ij");

        let output = buffer.snapshot();
        assert_eq!(output.bytes, b"abcde");
        assert_eq!(output.total_bytes, 10);
        assert!(output.is_truncated());
    }

    #[test]
    fn test_zero_cap_keeps_nothing() {
        let mut buffer = BoundedBuffer::new(0);
        buffer.write(b"abc");

        let output = buffer.snapshot();
        assert!(output.bytes.is_empty());
        assert!(!output.is_empty());
    }

    #[tokio::test]
    async fn test_drain_reads_past_the_cap() {
        let data = vec![b'a'; 3 * READ_CHUNK_BYTES + 17];
        let buffer = BoundedBuffer::shared(100);

        drain(&data[..], buffer.clone()).await;

        let output = buffer.lock().await.snapshot();
        assert_eq!(output.bytes.len(), 100);
        assert_eq!(output.total_bytes, data.len() as u64);
    }

    #[tokio::test]
    async fn test_drain_empty_stream() {
        let buffer = BoundedBuffer::shared(100);

        drain(&b""[..], buffer.clone()).await;

        let output = buffer.lock().await.snapshot();
        assert!(output.is_empty());
        assert!(!output.is_truncated());
    }
}
