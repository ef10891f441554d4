//! Command implementations for the CLI

use crate::{
    cli::Command,
    commands::{createdb_command, parameters_for},
    config::Config,
    core::{bindings::Bindings, registry::ParameterSummary},
};
use anyhow::{Context, bail};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Execute the appropriate command based on CLI arguments
#[instrument(skip(config))]
pub fn execute_command(config: &Config, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Createdb {
            inputs,
            output_db,
            dbtype,
            no_shuffle,
            createdb_mode,
            id_offset,
            compressed,
            verbosity,
            no_write_lookup,
            dry_run,
            json,
            ..
        } => {
            let extra = Bindings::new()
                .set_opt("dbtype", *dbtype)
                .set("shuffle", !no_shuffle)
                .set_opt("createdb_mode", *createdb_mode)
                .set_opt("id_offset", *id_offset)
                .set("compressed", *compressed)
                .set_opt("v", *verbosity)
                .set("write_lookup", !no_write_lookup);
            execute_createdb_command(config, inputs, output_db, extra, *dry_run, *json)
        }
        Command::Params { command, json } => execute_params_command(command, *json),
    }
}

/// Execute the createdb command
#[instrument(skip(config, extra))]
fn execute_createdb_command(
    config: &Config,
    inputs: &[PathBuf],
    output_db: &Path,
    extra: Bindings,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut cmd = createdb_command(&config.binary, inputs, output_db, extra)
        .context("Invalid createdb arguments")?
        .with_debug(config.debug);

    if dry_run {
        println!("{}", cmd.preview());
        return Ok(());
    }

    info!("Creating database: {}", output_db.display());

    // Stream MMseqs2 output straight to the terminal unless it has to go into JSON
    let options = config.run_options().capture_output(json);
    let result = cmd.run(&options).context("Failed to run createdb")?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{rendered}");
    } else if !result.stderr().is_empty() && !options.capture_output {
        // Launch failures and timeouts still carry a captured message
        eprintln!("{}", result.stderr());
    }

    if !result.success() {
        bail!(
            "createdb failed with return code {}: {}",
            result.returncode(),
            result.command_string()
        );
    }

    info!("Database created successfully");
    Ok(())
}

/// Execute the params command
#[instrument]
fn execute_params_command(command: &str, json: bool) -> anyhow::Result<()> {
    let registry = parameters_for(command)?;
    let summaries = registry.summaries();

    if json {
        let rendered =
            serde_json::to_string_pretty(&summaries).context("Failed to serialize parameters")?;
        println!("{rendered}");
        return Ok(());
    }

    for summary in &summaries {
        println!("{}", format_summary(summary));
    }
    Ok(())
}

fn format_summary(summary: &ParameterSummary) -> String {
    let flag = if summary.flag.is_empty() {
        format!("<{}>", summary.name)
    } else {
        summary.flag.clone()
    };

    let mut line = format!("{flag:<20} {:<12} {}", summary.value_type, summary.description);
    if summary.required {
        line.push_str(" [required]");
    }
    if let Some(default) = &summary.default {
        line.push_str(&format!(" [default: {default}]"));
    }
    if let Some(choices) = &summary.choices {
        line.push_str(&format!(" [choices: {}]", choices.join(", ")));
    }
    line
}
