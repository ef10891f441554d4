//! # MMseqs2 Wrapper
//!
//! A typed front end for the MMseqs2 command-line tool. Each subcommand
//! declares its parameters once; caller bindings are validated against that
//! declaration, assembled into an exact argument list, and executed with
//! output capture and an optional timeout.
//!
//! ## Features
//!
//! - Declarative parameter descriptors with types, choices and defaults
//! - Fail-fast validation with precise, named errors
//! - Deterministic command lines and shell-quoted previews
//! - Subprocess execution with timeouts that never raise on process failure
//!
//! ## Example
//!
//! ```no_run
//! use mmseqs_wrapper::{commands::createdb_command, core::Bindings, utils::RunOptions};
//!
//! let mut cmd = createdb_command(
//!     "mmseqs",
//!     ["sequences.fasta"],
//!     "seqdb",
//!     Bindings::new().set("dbtype", 1),
//! )?;
//! println!("{}", cmd.preview());
//! let result = cmd.run(&RunOptions::new().timeout_secs(600.0)?)?;
//! println!("exit code: {}", result.returncode());
//! # Ok::<(), mmseqs_wrapper::error::WrapperError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
