//! Shell command execution.
//!
//! Every external step of an environment build goes through [`ShellRunner`].
//! Command lines are passed to `sh -c` verbatim, so a join command printed by
//! the hub can be run as-is. The child inherits the environment; stdout is
//! returned on success and stderr is surfaced on failure. No timeout is
//! applied here.

use std::future::Future;
use std::process::{Output, Stdio};

use crate::error::{ShellError, NO_ERROR_OUTPUT};

pub trait ShellRunner {
    /// Run `command` to completion, returning its stdout.
    fn run(&self, command: &str) -> impl Future<Output = Result<String, ShellError>> + Send;
}

impl<T: ShellRunner + Sync> ShellRunner for &T {
    fn run(&self, command: &str) -> impl Future<Output = Result<String, ShellError>> + Send {
        (**self).run(command)
    }
}

/// Runs commands through the system `sh`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl SystemShell {
    /// Synchronous variant of [`ShellRunner::run`]; blocks the calling thread.
    pub fn run_blocking(&self, command: &str) -> Result<String, ShellError> {
        tracing::debug!(command, "running (blocking)");
        let output = std::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ShellError::Spawn {
                command: command.to_string(),
                source,
            })?;
        into_result(command, output)
    }
}

impl ShellRunner for SystemShell {
    async fn run(&self, command: &str) -> Result<String, ShellError> {
        tracing::debug!(command, "running");
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ShellError::Spawn {
                command: command.to_string(),
                source,
            })?;
        into_result(command, output)
    }
}

fn into_result(command: &str, output: Output) -> Result<String, ShellError> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let err = ShellError::Failed {
        command: command.to_string(),
        code: output.status.code(),
        stderr: if stderr.is_empty() {
            NO_ERROR_OUTPUT.to_string()
        } else {
            stderr
        },
    };
    tracing::warn!(error = %err, "command failed");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stdout_is_returned_on_success() {
        let out = SystemShell.run("echo hello").await.unwrap();
        assert_eq!(out, "hello\n");
    }

    #[tokio::test]
    async fn stderr_is_surfaced_on_failure() {
        let err = SystemShell
            .run("echo 'cluster already exists' >&2; exit 3")
            .await
            .unwrap_err();
        let ShellError::Failed { code, stderr, .. } = err else {
            panic!("expected Failed, got {err:?}")
        };
        assert_eq!(code, Some(3));
        assert_eq!(stderr, "cluster already exists");
    }

    #[tokio::test]
    async fn empty_stderr_gets_a_marker() {
        let err = SystemShell.run("exit 1").await.unwrap_err();
        let ShellError::Failed { stderr, .. } = err else {
            panic!("expected Failed, got {err:?}")
        };
        assert_eq!(stderr, NO_ERROR_OUTPUT);
    }

    #[test]
    fn blocking_mode_matches_async_mode() {
        assert_eq!(SystemShell.run_blocking("printf ok").unwrap(), "ok");
        let err = SystemShell.run_blocking("false").unwrap_err();
        assert_eq!(err.command(), "false");
    }
}
