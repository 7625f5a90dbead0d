//! `offload bench` - compare inline and isolated execution.

use crate::error::CliError;
use crate::runner::CliRunner;
use clap::Args;
use offload::dispatcher::Outcome;
use offload::service::OffloadService;
use std::time::Duration;

/// Arguments for the bench command.
#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Input value to compute in both modes
    #[arg(long)]
    pub n: u64,

    /// Number of rounds per mode
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
    pub rounds: u32,
}

/// Runs the bench command.
pub async fn run(args: BenchArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("bench");

    let service = runner.start_service();
    let result = bench_both_modes(&service, args.n, args.rounds).await;
    service.shutdown().await;

    let (value, inline_avg, isolated_avg) = result?;

    println!("fibonacci({}) = {} ({} rounds per mode)", args.n, value, args.rounds);
    println!("  inline:   {:.3}s avg", inline_avg.as_secs_f64());
    println!("  isolated: {:.3}s avg", isolated_avg.as_secs_f64());
    println!();
    println!(
        "Both modes compute the same value; isolated mode keeps the \
         handling context free while it runs."
    );
    Ok(())
}

/// Times both modes and returns the computed value with per-mode averages.
async fn bench_both_modes(
    service: &OffloadService,
    n: u64,
    rounds: u32,
) -> Result<(u64, Duration, Duration), CliError> {
    let mut value = 0;
    let mut inline_total = Duration::ZERO;
    let mut isolated_total = Duration::ZERO;

    for _ in 0..rounds {
        let inline = service.compute_inline(n).await.map_err(CliError::Service)?;
        value = expect_value(inline.outcome)?;
        inline_total += inline.duration;

        let isolated = service
            .compute_isolated(n)
            .await
            .map_err(CliError::Service)?;
        let isolated_value = expect_value(isolated.outcome)?;
        debug_assert_eq!(value, isolated_value);
        isolated_total += isolated.duration;
    }

    Ok((value, inline_total / rounds, isolated_total / rounds))
}

/// Unwraps a successful outcome or maps the failure to a CLI error.
fn expect_value(outcome: Outcome) -> Result<u64, CliError> {
    match outcome {
        Outcome::Success(value) => Ok(value),
        Outcome::Failure(kind) => Err(CliError::Compute(kind)),
    }
}
