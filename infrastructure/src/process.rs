//! Child process helper shared by the command oracle and command tools

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Maximum captured output size (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("command not found: {0}")]
    NotFound(String),

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error talking to {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} timed out after {1}s")]
    Timeout(String, u64),
}

/// Captured result of one child process run
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Resolve `command` on PATH (or as a path)
pub fn locate(command: &str) -> Result<std::path::PathBuf, ProcessError> {
    which::which(command).map_err(|_| ProcessError::NotFound(command.to_string()))
}

/// Run `command args...`, writing `input` to stdin and capturing output.
///
/// The child is killed when `timeout` elapses.
pub async fn run_with_stdin(
    command: &str,
    args: &[String],
    input: &str,
    timeout: Duration,
) -> Result<ProcessOutput, ProcessError> {
    let program = locate(command)?;

    let mut child = Command::new(&program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let stdin = child.stdin.take();
    let bytes = input.as_bytes().to_vec();
    // Feed stdin while draining stdout so large inputs cannot deadlock
    let feed = async move {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&bytes).await?;
        }
        Ok::<(), std::io::Error>(())
    };

    let (fed, output) = tokio::time::timeout(timeout, async {
        tokio::join!(feed, child.wait_with_output())
    })
    .await
    .map_err(|_| ProcessError::Timeout(command.to_string(), timeout.as_secs()))?;

    let io_err = |source: std::io::Error| ProcessError::Io {
        command: command.to_string(),
        source,
    };
    if let Err(e) = fed {
        // The child may exit without reading its input
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            return Err(io_err(e));
        }
    }
    let output = output.map_err(io_err)?;

    Ok(ProcessOutput {
        exit_code: output.status.code(),
        stdout: truncate(String::from_utf8_lossy(&output.stdout).into_owned()),
        stderr: truncate(String::from_utf8_lossy(&output.stderr).into_owned()),
    })
}

fn truncate(mut text: String) -> String {
    if text.len() > MAX_OUTPUT_SIZE {
        let mut cut = MAX_OUTPUT_SIZE;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("\n... (output truncated)");
    }
    text
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stdin_is_piped_through() {
        let output = run_with_stdin("cat", &[], "hello", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(output.stdout, "hello");
        assert_eq!(output.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_missing_command() {
        let err = run_with_stdin("definitely-not-a-real-cmd-xyz", &[], "", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let err = run_with_stdin(
            "sleep",
            &["5".to_string()],
            "",
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProcessError::Timeout(_, _)));
    }
}
