//! cpfverify CLI - expected artifacts and tree verification for CPF packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cpfverify=debug")
    } else {
        EnvFilter::new("cpfverify=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Configs(args) => commands::configs::execute(args),
        Commands::Expected(args) => commands::expected::execute(args),
        Commands::Verify(args) => commands::verify::execute(args),
        Commands::ArchiveName(args) => commands::archive_name::execute(args),
        Commands::Signature(args) => commands::signature::execute(args),
    }
}
