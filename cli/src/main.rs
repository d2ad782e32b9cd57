//! # Pressure Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file is the main entry point for the Pressure CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the appropriate command handler
//!
//! ## Architecture
//!
//! - Each top-level command (`compress`, `decompress`, `formats`) is a variant
//!   of the `Commands` enum
//! - Commands are mapped to handler functions in their respective modules
//! - All errors are propagated to this level for consistent handling
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! pressure --help
//!
//! # Compress with increased verbosity
//! pressure -vv compress -f gzip src/ Cargo.toml
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level (`RUST_LOG` wins when set)
//! 3. Route to the command handler
//! 4. Print any error as `Error: <message>` and exit with status 1
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

// Declare the top-level modules of the CLI crate.
mod commands; // Command handlers (compress, decompress, formats)
mod common; // Archive engine and shared utilities
mod core; // Core infrastructure (errors, config)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "pressure",
    about = "Pressure: compress and decompress ZIP, TAR, GZIP, BZIP2 and Z archives",
    long_about = "Compress files and directories into archives and unpack them again.\n\
                  Multi-file gzip/bzip2 archives are bundled as TAR first (tar.gz, tar.bz2).",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Pack files and directories into an archive.
    #[command(alias = "c")]
    Compress(commands::compress::CompressArgs),
    /// Unpack an archive into a directory.
    #[command(alias = "d", alias = "x")]
    Decompress(commands::decompress::DecompressArgs),
    /// List supported formats.
    Formats(commands::formats::FormatsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Compress(args) => commands::compress::handle_compress(args).await,
        Commands::Decompress(args) => commands::decompress::handle_decompress(args).await,
        Commands::Formats(args) => commands::formats::handle_formats(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
