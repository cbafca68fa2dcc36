//! # CLI Argument Definitions
//!
//! JSON documents are read from a file argument, or from stdin when the
//! argument is omitted or `-`. Results go to stdout; diagnostics to stderr.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "c3dp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Convert and compare Cloud3DP device configuration files")]
pub struct Cli {
    /// Settings file (defaults to an optional `c3dp.toml` in the working directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pub pretty: bool,

    /// Treat KEY as a fake-boolean before reading any input (repeatable)
    #[arg(short = 'b', long = "fakebool", global = true, value_name = "KEY")]
    pub fakebool: Vec<String>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Nested config tree to flat device JSON
    Flatten {
        /// Input file, `-` for stdin
        input: Option<PathBuf>,
    },
    /// Flat device JSON to a nested config tree
    Unflatten {
        /// Input file, `-` for stdin
        input: Option<PathBuf>,
    },
    /// Round-trip flat device JSON through the codec
    Normalize {
        /// Input file, `-` for stdin
        input: Option<PathBuf>,

        /// List the registered fake-boolean keys on stderr
        #[arg(long)]
        show_registry: bool,
    },
    /// Compare an edited tree against the device config and print the save request
    Diff {
        /// Flat JSON as reported by the device
        #[arg(long, value_name = "FILE")]
        baseline: PathBuf,

        /// Edited config tree
        #[arg(long, value_name = "FILE")]
        edited: PathBuf,

        /// The edited file is flat device JSON rather than a tree
        #[arg(long)]
        flat: bool,
    },
    /// Print the firmware's default settings
    Defaults {
        /// Print as a nested tree instead of flat device JSON
        #[arg(long)]
        tree: bool,
    },
}
