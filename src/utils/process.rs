//! Process execution utilities
//!
//! Runs an assembled token list as a child process. Launch failures and
//! timeouts are reported through [`CommandResult`] rather than as errors.

use crate::{
    core::{command_line::preview, result::CommandResult},
    error::{Result, WrapperError},
};
use chrono::Utc;
use std::{
    collections::HashMap,
    io::{self, Read},
    path::PathBuf,
    process::{Child, Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};
use tracing::{debug, info, instrument, warn};

/// How often a process with a timeout is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Per-run execution settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Kill the process if it has not exited after this long
    pub timeout: Option<Duration>,
    /// Replace the child's environment entirely; `None` inherits ours
    pub env: Option<HashMap<String, String>>,
    /// Capture stdout/stderr instead of inheriting them
    pub capture_output: bool,
    /// Working directory; `None` uses the current one
    pub working_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            env: None,
            capture_output: true,
            working_dir: None,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Timeout in fractional seconds; fails unless positive and representable
    pub fn timeout_secs(self, seconds: f64) -> Result<Self> {
        Ok(self.timeout(timeout_from_secs(seconds)?))
    }

    #[must_use]
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    #[must_use]
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Convert a user-supplied number of seconds into a timeout
pub fn timeout_from_secs(seconds: f64) -> Result<Duration> {
    if seconds.is_nan() || seconds <= 0.0 {
        return Err(WrapperError::config(format!(
            "Timeout must be a positive number of seconds, got {seconds}"
        )));
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| {
        WrapperError::config(format!("Timeout of {seconds} seconds is out of range: {e}"))
    })
}

/// Runs one external process per call and waits for it
#[derive(Debug, Default)]
pub struct Executor {
    debug: bool,
}

impl Executor {
    /// Create a new executor
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Execute `tokens` (program first) and report the outcome.
    ///
    /// Never fails: a process that cannot be started or that exceeds its
    /// timeout yields an unsuccessful [`CommandResult`].
    #[instrument(skip(self, tokens, options), fields(program = tokens.first().map(String::as_str)))]
    pub fn execute(&self, tokens: &[String], options: &RunOptions) -> CommandResult {
        let command_line = tokens.to_vec();
        let started_at = Utc::now();

        let Some((program, args)) = tokens.split_first() else {
            let error = io::Error::new(io::ErrorKind::InvalidInput, "empty command line");
            return CommandResult::launch_failed(command_line, &error, started_at);
        };

        let cmd_str = preview(tokens);
        if self.debug {
            debug!("Running command: {}", cmd_str);
            if let Some(env) = &options.env {
                debug!("Environment variables: {:?}", env);
            }
            if let Some(dir) = &options.working_dir {
                debug!("Working directory: {}", dir.display());
            }
        } else {
            info!("+ {}", cmd_str);
        }

        let mut cmd = Command::new(program);
        cmd.args(args);

        if let Some(env) = &options.env {
            cmd.env_clear().envs(env);
        }
        if let Some(dir) = &options.working_dir {
            cmd.current_dir(dir);
        }

        if options.capture_output {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        if options.timeout.is_some() {
            isolate_process_group(&mut cmd);
        }

        let start = Instant::now();
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to launch {}: {}", program, e);
                return CommandResult::launch_failed(command_line, &e, started_at);
            }
        };

        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let waited = match options.timeout {
            Some(timeout) => wait_with_timeout(&mut child, timeout),
            None => child.wait().map(Some),
        };
        let elapsed = start.elapsed();

        // The readers only finish once the child is gone
        if let Err(e) = &waited {
            warn!("Failed to wait for {}: {}", program, e);
            terminate(&mut child);
        }

        let stdout = collect_output(stdout_reader);
        let stderr = collect_output(stderr_reader);

        match waited {
            Ok(Some(status)) => {
                let returncode = exit_code(status);
                debug!(
                    "Command finished: success={}, returncode={}, stdout_len={}, stderr_len={}, elapsed={:?}",
                    status.success(),
                    returncode,
                    stdout.len(),
                    stderr.len(),
                    elapsed
                );
                CommandResult::completed(command_line, returncode, stdout, stderr, elapsed, started_at)
            }
            Ok(None) => {
                let timeout = options.timeout.unwrap_or_default();
                warn!("Command timed out after {:?}: {}", timeout, cmd_str);
                CommandResult::timed_out(command_line, stdout, stderr, timeout, started_at)
            }
            Err(e) => CommandResult::wait_failed(command_line, stdout, stderr, &e, started_at),
        }
    }
}

/// Wait for exit, killing the process once `timeout` has elapsed.
///
/// Returns `Ok(None)` when the process was killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        let now = Instant::now();
        if now >= deadline {
            terminate(child);
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Start the child in its own process group so a timeout kill also reaches
/// any processes it spawned
#[cfg(unix)]
fn isolate_process_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn isolate_process_group(_cmd: &mut Command) {}

/// Kill the child (and its process group on Unix) and reap it
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        if let Ok(pid) = i32::try_from(child.id()) {
            // Negative PID targets the whole process group
            if let Err(e) = signal::kill(Pid::from_raw(-pid), Signal::SIGKILL) {
                debug!("Could not signal process group {}: {}", pid, e);
            }
        }
    }

    if let Err(e) = child.kill() {
        debug!("Could not kill process {}: {}", child.id(), e);
    }
    if let Err(e) = child.wait() {
        warn!("Failed to reap process {}: {}", child.id(), e);
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut stream: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = stream.read_to_end(&mut buf) {
            debug!("Error reading process output: {}", e);
        }
        buf
    })
}

fn collect_output(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .unwrap_or_else(|| -status.signal().unwrap_or(1))
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
