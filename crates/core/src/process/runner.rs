//! Spawn an external executable, drain its output, enforce a timeout.
//!
//! Non-zero exit codes and timeouts are reported as data in [`RunOutcome`];
//! the only hard failure from this module is an OS-level inability to start
//! the process. Callers decide what an unhappy exit means.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::fs::File;
use tokio::process::Command;

use super::capture::{pump_lines, LogPreview};

/// Bounded window for the drain tasks to flush remaining lines after the
/// child has exited or been killed.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// One external process invocation.
#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Executable path or name (resolved via PATH).
    pub program: String,
    /// Ordered argument list.
    pub args: Vec<String>,
    /// Per-run log file; each output line is appended as it arrives.
    pub log_path: Option<PathBuf>,
    /// Wall-clock budget before the process is force-killed.
    pub timeout: Duration,
}

/// How the process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Process exited on its own (`-1` if killed by a signal).
    Exited(i32),
    /// Wall-clock budget expired and the process was force-killed.
    TimedOut,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        matches!(self, RunStatus::Exited(0))
    }
}

/// Captured result of one invocation.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Full captured stdout text (capped per stream).
    pub stdout: String,
    /// Full captured stderr text (capped per stream).
    pub stderr: String,
    /// Bounded interleaved stdout/stderr head for error surfacing.
    pub preview: String,
    /// The log file lines were streamed to, if one was configured.
    pub log_path: Option<PathBuf>,
    /// Wall-clock duration of the invocation.
    pub duration: Duration,
}

/// Spawn the process described by `spec` and wait for it to finish.
///
/// stdout and stderr are drained concurrently on two tasks so the child can
/// never block on an unread pipe; both tasks append to the log file and the
/// shared preview as lines arrive. On timeout the child is killed and
/// [`RunStatus::TimedOut`] is returned; whatever output was already flushed
/// to the log file survives.
pub async fn run(spec: &RunSpec) -> std::io::Result<RunOutcome> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Both drain tasks get their own append-mode handle to the same file;
    // O_APPEND keeps line writes intact.
    let stdout_log = match &spec.log_path {
        Some(path) => Some(open_log(path).await?),
        None => None,
    };
    let stderr_log = match &spec.log_path {
        Some(path) => Some(open_log(path).await?),
        None => None,
    };

    let start = Instant::now();
    let mut child = cmd.spawn()?;

    let preview = LogPreview::new();
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let stdout_task = tokio::spawn({
        let preview = preview.clone();
        async move {
            match stdout_pipe {
                Some(pipe) => pump_lines(pipe, stdout_log, preview, "stdout").await,
                None => String::new(),
            }
        }
    });
    let stderr_task = tokio::spawn({
        let preview = preview.clone();
        async move {
            match stderr_pipe {
                Some(pipe) => pump_lines(pipe, stderr_log, preview, "stderr").await,
                None => String::new(),
            }
        }
    });

    let status = match tokio::time::timeout(spec.timeout, child.wait()).await {
        Ok(Ok(exit)) => RunStatus::Exited(exit.code().unwrap_or(-1)),
        Ok(Err(err)) => return Err(err),
        Err(_elapsed) => {
            tracing::warn!(
                program = %spec.program,
                timeout_secs = spec.timeout.as_secs(),
                "process exceeded its timeout, killing it"
            );
            let _ = child.start_kill();
            let _ = child.wait().await;
            RunStatus::TimedOut
        }
    };

    // Killing the child closes its pipes, so the drain tasks finish on
    // their own; the grace timeout only guards against a stuck pipe held
    // open by an orphaned grandchild.
    let stdout = match tokio::time::timeout(DRAIN_GRACE, stdout_task).await {
        Ok(Ok(text)) => text,
        _ => String::new(),
    };
    let stderr = match tokio::time::timeout(DRAIN_GRACE, stderr_task).await {
        Ok(Ok(text)) => text,
        _ => String::new(),
    };

    Ok(RunOutcome {
        status,
        stdout,
        stderr,
        preview: preview.snapshot(),
        log_path: spec.log_path.clone(),
        duration: start.elapsed(),
    })
}

/// Open (creating parents as needed) a log file in append mode.
async fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
}
