//! splaybench - compare splay-tree and LRU memoization on sample workloads

mod error;
mod fib;
mod range_sum;
mod report;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::fib::FibConfig;
use crate::range_sum::RangeSumConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print a JSON report instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time memoized Fibonacci through an unbounded LRU cache and a splay tree
    Fib(FibArgs),

    /// Run random range sums and updates with no cache, an LRU cache and a splay tree
    RangeSum(RangeSumArgs),
}

#[derive(Args, Debug)]
struct FibArgs {
    /// Exclusive upper bound of the sweep
    #[arg(long, default_value_t = 1000)]
    max: u64,

    /// Distance between sampled n
    #[arg(long, default_value_t = 50)]
    step: u64,

    /// Empty both memo tables before every sample
    #[arg(long)]
    cold: bool,
}

impl From<FibArgs> for FibConfig {
    fn from(args: FibArgs) -> Self {
        Self {
            max: args.max,
            step: args.step,
            cold: args.cold,
        }
    }
}

#[derive(Args, Debug)]
struct RangeSumArgs {
    /// Array length
    #[arg(long, default_value_t = 100_000)]
    len: usize,

    /// Number of queries
    #[arg(long, default_value_t = 50_000)]
    queries: usize,

    /// LRU cache capacity (number of ranges)
    #[arg(short, long, default_value_t = 1000)]
    capacity: usize,

    /// Probability that a query is a range sum rather than an update
    #[arg(long, default_value_t = 0.7)]
    range_ratio: f64,

    /// Array values are drawn from 1..=MAX_VALUE
    #[arg(long, default_value_t = 1000)]
    max_value: u64,

    /// Seed for a reproducible workload
    #[arg(long)]
    seed: Option<u64>,
}

impl From<RangeSumArgs> for RangeSumConfig {
    fn from(args: RangeSumArgs) -> Self {
        Self {
            len: args.len,
            queries: args.queries,
            capacity: args.capacity,
            range_ratio: args.range_ratio,
            max_value: args.max_value,
            seed: args.seed,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays a clean report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting splaybench v{}", env!("CARGO_PKG_VERSION"));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Fib(args) => {
            let config = FibConfig::from(args);
            let report = fib::run(&config).context("Fibonacci sweep failed")?;
            if cli.json {
                report::write_json(&report, &mut out)?;
            } else {
                report::write_fib_table(&report, &mut out)?;
            }
        }
        Command::RangeSum(args) => {
            let config = RangeSumConfig::from(args);
            let report = range_sum::run(&config).context("Range-sum workload failed")?;
            if cli.json {
                report::write_json(&report, &mut out)?;
            } else {
                report::write_range_sum_table(&report, &mut out)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fib_defaults_match_config() {
        let cli = Cli::try_parse_from(["splaybench", "fib"]).unwrap();
        let Command::Fib(args) = cli.command else {
            panic!("expected fib subcommand");
        };
        assert_eq!(FibConfig::from(args), FibConfig::default());
        assert!(!cli.json);
    }

    #[test]
    fn test_range_sum_flags() {
        let cli = Cli::try_parse_from([
            "splaybench",
            "range-sum",
            "--len",
            "500",
            "--capacity",
            "8",
            "--seed",
            "7",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);

        let Command::RangeSum(args) = cli.command else {
            panic!("expected range-sum subcommand");
        };
        let config = RangeSumConfig::from(args);
        assert_eq!(config.len, 500);
        assert_eq!(config.capacity, 8);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.queries, RangeSumConfig::default().queries);
    }
}
