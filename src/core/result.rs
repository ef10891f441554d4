//! Outcome of one command execution

use crate::{
    core::command_line::preview,
    error::{Result, WrapperError},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Return code reported when the process was killed for exceeding its timeout
pub const TIMEOUT_RETURN_CODE: i32 = -9;

/// Return code reported when the process could not be started at all
pub const LAUNCH_FAILURE_RETURN_CODE: i32 = -127;

/// Return code reported when waiting on a started process failed
pub const WAIT_FAILURE_RETURN_CODE: i32 = -126;

/// How an execution attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The process ran and exited on its own (any exit code)
    Completed,
    /// The process was terminated after the timeout expired
    TimedOut,
    /// The process never started
    LaunchFailed,
    /// The process started but its exit status could not be collected
    WaitFailed,
}

/// Immutable record of one execution attempt
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    returncode: i32,
    stdout: String,
    stderr: String,
    command_line: Vec<String>,
    success: bool,
    execution_time: Option<Duration>,
    outcome: ExecutionOutcome,
    started_at: DateTime<Utc>,
}

impl CommandResult {
    pub(crate) fn completed(
        command_line: Vec<String>,
        returncode: i32,
        stdout: String,
        stderr: String,
        execution_time: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            success: returncode == 0,
            returncode,
            stdout,
            stderr,
            command_line,
            execution_time: Some(execution_time),
            outcome: ExecutionOutcome::Completed,
            started_at,
        }
    }

    pub(crate) fn timed_out(
        command_line: Vec<String>,
        stdout: String,
        mut stderr: String,
        timeout: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        if !stderr.is_empty() && !stderr.ends_with('\n') {
            stderr.push('\n');
        }
        stderr.push_str(&format!(
            "Command timed out after {:.3} seconds",
            timeout.as_secs_f64()
        ));

        Self {
            returncode: TIMEOUT_RETURN_CODE,
            stdout,
            stderr,
            command_line,
            success: false,
            execution_time: None,
            outcome: ExecutionOutcome::TimedOut,
            started_at,
        }
    }

    pub(crate) fn launch_failed(
        command_line: Vec<String>,
        error: &std::io::Error,
        started_at: DateTime<Utc>,
    ) -> Self {
        let program = command_line.first().cloned().unwrap_or_default();
        Self {
            returncode: LAUNCH_FAILURE_RETURN_CODE,
            stdout: String::new(),
            stderr: format!("Failed to execute {program}: {error}"),
            command_line,
            success: false,
            execution_time: None,
            outcome: ExecutionOutcome::LaunchFailed,
            started_at,
        }
    }

    pub(crate) fn wait_failed(
        command_line: Vec<String>,
        stdout: String,
        mut stderr: String,
        error: &std::io::Error,
        started_at: DateTime<Utc>,
    ) -> Self {
        let program = command_line.first().cloned().unwrap_or_default();
        if !stderr.is_empty() && !stderr.ends_with('\n') {
            stderr.push('\n');
        }
        stderr.push_str(&format!("Failed to wait for {program}: {error}"));

        Self {
            returncode: WAIT_FAILURE_RETURN_CODE,
            stdout,
            stderr,
            command_line,
            success: false,
            execution_time: None,
            outcome: ExecutionOutcome::WaitFailed,
            started_at,
        }
    }

    pub const fn returncode(&self) -> i32 {
        self.returncode
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// The exact token list that was executed
    pub fn command_line(&self) -> &[String] {
        &self.command_line
    }

    pub const fn success(&self) -> bool {
        self.success
    }

    /// Wall-clock time from launch to exit; `None` on timeout or launch failure
    pub const fn execution_time(&self) -> Option<Duration> {
        self.execution_time
    }

    pub const fn outcome(&self) -> ExecutionOutcome {
        self.outcome
    }

    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The command line as a shell-quoted string
    pub fn command_string(&self) -> String {
        preview(&self.command_line)
    }

    /// Turn a non-successful result into [`WrapperError::Process`]
    pub fn check(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        Err(WrapperError::process(
            self.command_string(),
            self.returncode,
            self.stdout,
            self.stderr,
        ))
    }
}
