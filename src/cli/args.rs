use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Retarget Messiah-dialect marshalled Python 2.7 bytecode to canonical
/// CPython 2.7 `.pyc` files.
#[derive(Debug, Parser)]
#[command(author, version, about = "Retarget Messiah-dialect .pyc files to canonical CPython 2.7", long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a `pyc-retarget.toml` configuration file; defaults to the
    /// standard search path (see `crate::config::ConfigLoader::load`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Retarget a single file.
    Retarget {
        /// Path to a Messiah-dialect marshalled input file.
        input: PathBuf,
        /// Path to write the canonical CPython 2.7 `.pyc` output to.
        output: PathBuf,
    },

    /// Retarget every file matched by a glob pattern.
    Batch {
        /// Glob pattern, e.g. `scripts/**/*.pyc`.
        pattern: String,

        /// Directory to write outputs into; defaults to next to each input
        /// file with the configured extension appended.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}
