//! triad CLI — assemble, check, list, and run triad programs.
//!
//! Exit codes:
//! - 0–9: the program's own status (`run`)
//! - 1: the source or input file could not be read
//! - 2: bad command-line usage
//! - 32, 52–58: the error class of a load or runtime failure

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "triad")]
#[command(version, about = "Interpreter for the triad three-operand instruction language")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble, load, and execute a program
    Run {
        /// Source file
        source: PathBuf,

        /// File that READ takes lines from (defaults to standard input)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Assemble and load a program without running it
    Check {
        /// Source file
        source: PathBuf,
    },
    /// Print the loaded program with its execution positions
    Listing {
        /// Source file
        source: PathBuf,
    },
}

fn main() {
    let log_level = std::env::var("TRIAD_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Run { source, input } => commands::run(source, input.as_deref()),
        Command::Check { source } => commands::check(source),
        Command::Listing { source } => commands::listing(source),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
