//! External tool invocation
//!
//! One invocation = one subprocess: feed the input on stdin, collect
//! stdout and stderr to completion, report the exit code. Runs under
//! tokio so the interactive thread is never blocked on child I/O.

use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::SealError;

/// Result of one external-tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code; `None` if killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run `program` with `args`, writing `input` to its stdin and waiting
/// for it to exit, up to `timeout_secs`.
///
/// The input is secret material; it is never logged.
pub async fn run_tool(
    program: &str,
    args: &[String],
    input: &str,
    timeout_secs: u64,
) -> Result<ToolOutput, SealError> {
    debug!(program, ?args, "spawning tool");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SealError::Unexpected(format!("Failed to run {}: {}", program, e)))?;

    let stdin = child.stdin.take();

    // Feed stdin while collecting output so neither pipe can fill up and
    // stall the other; dropping the pipe gives the tool its EOF. A tool
    // that exits before draining stdin breaks the pipe mid-write; that is
    // not a failure, the exit status and stderr are
    let result = timeout(Duration::from_secs(timeout_secs), async {
        let feed = async {
            if let Some(mut pipe) = stdin {
                match pipe.write_all(input.as_bytes()).await {
                    Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok::<(), std::io::Error>(())
        };
        let (feed_result, wait_result) = tokio::join!(feed, child.wait_with_output());
        let output = wait_result?;
        feed_result?;
        Ok::<_, std::io::Error>(output)
    })
    .await;

    match result {
        Ok(Ok(output)) => {
            let tool_output = ToolOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            };
            debug!(code = ?tool_output.code, "tool exited");
            Ok(tool_output)
        }
        Ok(Err(e)) => Err(SealError::Unexpected(e.to_string())),
        Err(_) => Err(SealError::Tool {
            stderr: format!("{} timed out after {}s", program, timeout_secs),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let output = run_tool("sh", &["-c".to_string(), "cat".to_string()], "hello", 10)
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "hello");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn test_captures_stderr_on_failure() {
        let output = run_tool(
            "sh",
            &["-c".to_string(), "echo boom >&2; exit 3".to_string()],
            "",
            10,
        )
        .await
        .unwrap();
        assert!(!output.success());
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr.trim(), "boom");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = run_tool("sealedit-no-such-binary", &[], "", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SealError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_stderr_preserved_when_tool_ignores_stdin() {
        // A tool that fails fast never reads its stdin; the broken pipe
        // from feeding it must not mask its exit code and diagnostics
        let input = "x".repeat(1024 * 1024);
        let output = run_tool(
            "sh",
            &[
                "-c".to_string(),
                "echo real-diagnostic >&2; exit 3".to_string(),
            ],
            &input,
            10,
        )
        .await
        .unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr.trim(), "real-diagnostic");
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = run_tool("sh", &["-c".to_string(), "sleep 5".to_string()], "", 1)
            .await
            .unwrap_err();
        match err {
            SealError::Tool { stderr } => assert!(stderr.contains("timed out")),
            other => panic!("expected timeout error, got {:?}", other),
        }
    }
}
