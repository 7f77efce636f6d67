//! txkv CLI
//!
//! Command-line driver for the txkv transactional store.
//!
//! # Commands
//!
//! - `demo` - Replay the demonstration session
//! - `run` - Execute a command script from a file or stdin
//! - `version` - Show version information

mod commands;
mod error;
mod script;
mod session;

use clap::{Parser, Subcommand};
use commands::run::{OutputFormat, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Transactional in-memory key-value store.
#[derive(Parser)]
#[command(name = "txkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the demonstration session
    Demo,

    /// Execute a command script (BEGIN, PUT, GET, COMMIT, ROLLBACK, STATS)
    Run {
        /// Script file; reads stdin when omitted
        script: Option<PathBuf>,

        /// Stop at the first rejected operation
        #[arg(long)]
        fail_fast: bool,

        /// Print the committed state when the script ends
        #[arg(short, long)]
        dump: bool,

        /// Output format for the dump
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Demo => {
            commands::demo::run()?;
        }
        Commands::Run {
            script,
            fail_fast,
            dump,
            format,
        } => {
            let options = RunOptions {
                fail_fast,
                dump,
                format,
                echo: false,
            };
            commands::run::run(script.as_deref(), &options)?;
        }
        Commands::Version => {
            println!("txkv CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("txkv core v{}", txkv_core::VERSION);
        }
    }

    Ok(())
}
