//! Line-by-line output capture shared by the stdout and stderr drain tasks.

use std::sync::{Arc, Mutex};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};

/// Maximum preview text retained in memory (64 KiB).
///
/// Once reached, further lines are dropped from the preview but still
/// written to the durable log file.
const PREVIEW_LIMIT: usize = 64 * 1024;

/// Maximum text captured per stream (10 MiB) to bound memory use against
/// extremely verbose analyzers.
const MAX_CAPTURE_BYTES: usize = 10 * 1024 * 1024;

/// Bounded in-memory buffer of process output lines.
///
/// Shared between the stdout and stderr drain tasks so error responses can
/// include a log excerpt without re-reading the log file. Appends are
/// guarded by a mutex; the two streams interleave at line granularity.
#[derive(Debug, Clone, Default)]
pub struct LogPreview {
    inner: Arc<Mutex<String>>,
}

impl LogPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line, unless the preview is already at capacity.
    pub fn push_line(&self, line: &str) {
        let mut buf = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if buf.len() < PREVIEW_LIMIT {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    /// Current preview contents.
    pub fn snapshot(&self) -> String {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Drain one output stream to completion.
///
/// Each line is appended to `log_file` with an immediate flush, so partial
/// output survives a crash or a timeout kill, then mirrored into the shared
/// preview. Returns the captured stream text, capped at
/// [`MAX_CAPTURE_BYTES`].
pub async fn pump_lines<R: AsyncRead + Unpin>(
    reader: R,
    mut log_file: Option<File>,
    preview: LogPreview,
    stream_name: &'static str,
) -> String {
    let mut captured = String::new();
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(f) = log_file.as_mut() {
                    let _ = f.write_all(line.as_bytes()).await;
                    let _ = f.write_all(b"\n").await;
                    let _ = f.flush().await;
                }
                preview.push_line(&line);
                if captured.len() < MAX_CAPTURE_BYTES {
                    captured.push_str(&line);
                    captured.push('\n');
                }
                tracing::debug!(stream = stream_name, "{line}");
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(
                    stream = stream_name,
                    error = %err,
                    "error while draining process output"
                );
                break;
            }
        }
    }
    captured
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_starts_empty() {
        assert_eq!(LogPreview::new().snapshot(), "");
    }

    #[test]
    fn preview_appends_lines() {
        let preview = LogPreview::new();
        preview.push_line("first");
        preview.push_line("second");
        assert_eq!(preview.snapshot(), "first\nsecond\n");
    }

    #[test]
    fn preview_drops_lines_past_the_cap() {
        let preview = LogPreview::new();
        let line = "x".repeat(1024);
        for _ in 0..100 {
            preview.push_line(&line);
        }
        let len = preview.snapshot().len();
        // One line may straddle the boundary, but nothing beyond it lands.
        assert!(len < PREVIEW_LIMIT + line.len() + 1);
        preview.push_line("dropped");
        assert_eq!(preview.snapshot().len(), len);
    }
}
