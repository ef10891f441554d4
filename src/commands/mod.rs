//! Concrete MMseqs2 subcommands

pub mod createdb;

pub use createdb::{CreateDb, createdb, createdb_command};

use crate::{
    core::{command::registry_for, registry::ParameterRegistry},
    error::{Result, WrapperError},
};

/// Names of the subcommands this crate knows how to describe
pub const KNOWN_COMMANDS: &[&str] = &["createdb"];

/// Parameter registry for a known subcommand name
pub fn parameters_for(command: &str) -> Result<ParameterRegistry> {
    match command {
        "createdb" => registry_for(&CreateDb),
        other => Err(WrapperError::config(format!(
            "Unknown command '{other}', expected one of: {}",
            KNOWN_COMMANDS.join(", ")
        ))),
    }
}
