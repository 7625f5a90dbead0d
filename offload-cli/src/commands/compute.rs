//! `offload compute` - compute one Fibonacci number.

use crate::error::CliError;
use crate::runner::CliRunner;
use clap::{Args, ValueEnum};
use offload::dispatcher::Outcome;
use offload::service::ComputeResponse;

/// Execution mode selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Block the handling context for the full computation
    Inline,
    /// Offload to an isolated execution unit
    Isolated,
}

/// Arguments for the compute command.
#[derive(Debug, Args)]
pub struct ComputeArgs {
    /// Input value (non-negative integer)
    #[arg(long)]
    pub n: u64,

    /// Execution mode
    #[arg(long, value_enum, default_value = "isolated")]
    pub mode: ModeArg,
}

/// Runs the compute command.
pub async fn run(args: ComputeArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("compute");

    let service = runner.start_service();
    let result = match args.mode {
        ModeArg::Inline => service.compute_inline(args.n).await,
        ModeArg::Isolated => service.compute_isolated(args.n).await,
    };
    service.shutdown().await;

    let response: ComputeResponse = result.map_err(CliError::Service)?;
    match response.outcome {
        Outcome::Success(value) => {
            println!("fibonacci({}) = {}", args.n, value);
            println!("  mode:     {:?}", args.mode);
            println!("  duration: {:.3}s", response.duration.as_secs_f64());
            Ok(())
        }
        Outcome::Failure(kind) => Err(CliError::Compute(kind)),
    }
}
