use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eventpipe")]
#[command(about = "Declarative stream-pipeline compiler for security event normalization", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile an asset definition and report any build error
    Validate {
        /// Asset definition file (JSON or YAML)
        file: PathBuf,
    },

    /// Compile an asset and drive NDJSON documents through it
    Run {
        /// Asset definition file (JSON or YAML)
        file: PathBuf,

        /// Read documents from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Emit per-operation trace lines to stderr
        #[arg(long)]
        trace: bool,
    },
}
