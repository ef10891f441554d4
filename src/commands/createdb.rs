//! `mmseqs createdb`: build a sequence database from FASTA files

use crate::{
    core::{
        bindings::Bindings,
        command::{Command, CommandDefinition},
        command_line::DefaultPolicy,
        parameter::ParameterDescriptor,
        registry::ParameterRegistry,
        result::CommandResult,
        value::{Value, ValueType},
    },
    error::Result,
    utils::process::RunOptions,
};
use std::path::PathBuf;

/// Parameter catalogue of `createdb`.
///
/// Values equal to their defaults are left off the command line so the tool
/// applies its own defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateDb;

impl CommandDefinition for CreateDb {
    fn command_name(&self) -> &str {
        "createdb"
    }

    fn init_parameters(&self, registry: &mut ParameterRegistry) -> Result<()> {
        registry.add(
            ParameterDescriptor::input_file("input_files")
                .positional()
                .multiple(true)
                .description("Input FASTA file(s)")
                .build()?,
        )?;
        registry.add(
            ParameterDescriptor::output_file("output_db")
                .positional()
                .description("Output database path prefix")
                .build()?,
        )?;
        registry.add(
            ParameterDescriptor::option("dbtype", ValueType::Integer)
                .description("Database type (0=auto-detect, 1=amino acid, 2=nucleotide)")
                .choices([0, 1, 2])
                .default(0)
                .build()?,
        )?;
        registry.add(
            ParameterDescriptor::option("shuffle", ValueType::Boolean)
                .description("Shuffle input database entries")
                .default(true)
                .build()?,
        )?;
        registry.add(
            ParameterDescriptor::option("createdb_mode", ValueType::Integer)
                .description("Database creation mode (0=copy data, 1=soft-link)")
                .choices([0, 1])
                .default(0)
                .build()?,
        )?;
        registry.add(
            ParameterDescriptor::option("id_offset", ValueType::Integer)
                .description("Numeric ID offset in index file")
                .default(0)
                .validator(|value: &Value| match value {
                    Value::Integer(n) if *n < 0 => Err(format!("must not be negative, got {n}")),
                    other => Ok(other.clone()),
                })
                .build()?,
        )?;
        registry.add(
            ParameterDescriptor::option("compressed", ValueType::Boolean)
                .description("Compress output files")
                .default(false)
                .build()?,
        )?;
        registry.add(
            ParameterDescriptor::option("v", ValueType::Integer)
                .description("Verbosity level (0=quiet, 1=+errors, 2=+warnings, 3=+info)")
                .choices([0, 1, 2, 3])
                .default(3)
                .build()?,
        )?;
        registry.add(
            ParameterDescriptor::option("write_lookup", ValueType::Boolean)
                .description("Create .lookup file mapping IDs to FASTA headers")
                .default(true)
                .build()?,
        )?;
        Ok(())
    }

    fn default_policy(&self) -> DefaultPolicy {
        DefaultPolicy::Omit
    }
}

/// Validate a `createdb` invocation without running it.
///
/// `extra` holds any of the optional parameters by name.
pub fn createdb_command<I, P>(
    executable: impl Into<PathBuf>,
    input_files: I,
    output_db: impl Into<PathBuf>,
    extra: Bindings,
) -> Result<Command<CreateDb>>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let inputs: Vec<PathBuf> = input_files.into_iter().map(Into::into).collect();
    let bindings = extra
        .set("input_files", inputs)
        .set("output_db", output_db.into());
    Command::new(CreateDb, executable, bindings)
}

/// Build and run `createdb` in one step
pub fn createdb<I, P>(
    executable: impl Into<PathBuf>,
    input_files: I,
    output_db: impl Into<PathBuf>,
    extra: Bindings,
    options: &RunOptions,
) -> Result<CommandResult>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    createdb_command(executable, input_files, output_db, extra)?.run(options)
}
