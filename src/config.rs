//! Configuration management for the wrapper
//!
//! Resolves the MMseqs2 binary and carries run defaults shared by all commands.

use crate::{
    cli::{Args, Command},
    error::{Result, WrapperError},
    utils::process::{RunOptions, timeout_from_secs},
};
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

/// Environment variable naming the MMseqs2 binary
pub const BINARY_ENV_VAR: &str = "MMSEQS_BINARY";

/// Executable name searched for on `PATH`
pub const DEFAULT_BINARY: &str = "mmseqs";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// MMseqs2 executable
    pub binary: PathBuf,
    /// Default timeout applied to every run
    pub timeout: Option<Duration>,
    /// Working directory for the child process
    pub working_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            binary: PathBuf::from(DEFAULT_BINARY),
            timeout: None,
            working_dir: None,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = Self {
            debug: args.debug,
            binary: resolve_binary(args.binary.as_deref()),
            working_dir: args.working_dir.clone(),
            ..Self::default()
        };

        if let Command::Createdb {
            timeout: Some(seconds),
            ..
        } = &args.command
        {
            config.timeout = Some(timeout_from_secs(*seconds)?);
        }

        config.validate()?;
        debug!("Using MMseqs2 binary: {}", config.binary.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.binary.as_os_str().is_empty() {
            return Err(WrapperError::config("MMseqs2 binary path is empty"));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(WrapperError::config("Timeout must be greater than zero"));
        }

        if let Some(dir) = &self.working_dir {
            if !dir.is_dir() {
                return Err(WrapperError::config(format!(
                    "Working directory not found: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Run options seeded from this configuration
    pub fn run_options(&self) -> RunOptions {
        let mut options = RunOptions::new();
        options.timeout = self.timeout;
        options.working_dir = self.working_dir.clone();
        options
    }
}

/// Pick the MMseqs2 binary: explicit path, then `MMSEQS_BINARY`, then the first
/// `mmseqs` on `PATH`, then the bare name.
pub fn resolve_binary(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(value) = env::var_os(BINARY_ENV_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(value);
    }

    env::var_os("PATH")
        .and_then(|paths| find_in_paths(env::split_paths(&paths), DEFAULT_BINARY))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY))
}

fn find_in_paths(dirs: impl Iterator<Item = PathBuf>, name: &str) -> Option<PathBuf> {
    dirs.map(|dir| dir.join(name)).find(|candidate| candidate.is_file())
}
