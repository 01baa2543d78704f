//! # rangeops CLI entry point
//!
//! Parses command-line arguments, loads the resolver configuration, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rangeops_cli::check::{run_check, CheckArgs};
use rangeops_cli::config::load_config;
use rangeops_cli::resolve::{run_resolve, ResolveArgs};

/// rangeops: organization access tooling.
///
/// Resolves which organizations a user can see and manage, and audits
/// organization snapshots for structural problems.
#[derive(Parser, Debug)]
#[command(name = "rangeops", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML resolver configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve one user's organization access view.
    Resolve(ResolveArgs),

    /// Audit a snapshot for duplicates, cycles, and dangling references.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Resolve(args) => run_resolve(args, &config),
        Commands::Check(args) => run_check(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
