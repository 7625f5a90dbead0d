//! offload CLI - command-line interface
//!
//! This binary provides a command-line interface to the offload library:
//! one-shot computations in either execution mode, a side-by-side mode
//! comparison, and config file management.

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod runner;

#[derive(Parser)]
#[command(name = "offload")]
#[command(version = offload::VERSION)]
#[command(about = "Offload CPU-bound Fibonacci computations to isolated execution units", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug-level logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compute one Fibonacci number
    Compute(commands::compute::ComputeArgs),
    /// Compare inline and isolated execution for the same input
    Bench(commands::bench::BenchArgs),
    /// Manage the configuration file
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Compute(args) => commands::compute::run(args, cli.debug).await,
        Command::Bench(args) => commands::bench::run(args, cli.debug).await,
        Command::Config(args) => commands::config::run(args),
    };

    if let Err(e) = result {
        e.exit();
    }
}
