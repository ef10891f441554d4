//! Command-line argument parsing and validation

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MMseqs2 wrapper - validate and run MMseqs2 commands
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "mmseqs-wrapper")]
pub struct Args {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to the MMseqs2 binary (defaults to $MMSEQS_BINARY, then PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// Working directory for the MMseqs2 process
    #[arg(long = "working-dir", global = true, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an MMseqs2 database from FASTA file(s)
    Createdb {
        /// Input FASTA file(s)
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output database path prefix
        #[arg(required = true)]
        output_db: PathBuf,

        /// Database type (0=auto-detect, 1=amino acid, 2=nucleotide)
        #[arg(long)]
        dbtype: Option<i64>,

        /// Do not shuffle input database entries
        #[arg(long = "no-shuffle")]
        no_shuffle: bool,

        /// Database creation mode (0=copy data, 1=soft-link)
        #[arg(long = "createdb-mode")]
        createdb_mode: Option<i64>,

        /// Numeric ID offset in index file
        #[arg(long = "id-offset")]
        id_offset: Option<i64>,

        /// Compress output files
        #[arg(long)]
        compressed: bool,

        /// Verbosity level (0=quiet, 1=+errors, 2=+warnings, 3=+info)
        #[arg(short = 'v', long)]
        verbosity: Option<i64>,

        /// Do not write the .lookup file
        #[arg(long = "no-write-lookup")]
        no_write_lookup: bool,

        /// Kill MMseqs2 after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<f64>,

        /// Print the command line without running it
        #[arg(long = "dry-run")]
        dry_run: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the parameters a command accepts
    Params {
        /// Command name, e.g. createdb
        command: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
