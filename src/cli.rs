//! Command-line front end: `cat input.txt | stream-sampler <n>`.
//!
//! Reads standard input to exhaustion and prints the sample on standard output.

use std::io::{Read, Write};

use anyhow::Context;
use clap::Parser;

use crate::error::SampleError;
use crate::random::JavaRandom;
use crate::reservoir::Algorithm;
use crate::source::Utf8Chars;

pub const USAGE: &str = "StreamSampler Usage:\n\
===================\n\
cat abc.txt | stream-sampler n\n\
This samples \"n\" characters from the piped input";

const ARG_COUNT_MISMATCH: &str = "Too few or too many arguments passed";

#[derive(Debug, Parser)]
#[command(name = "stream-sampler")]
#[command(version)]
#[command(about = "Sample n characters uniformly from piped input", long_about = None)]
pub struct Cli {
    /// Number of characters to sample
    #[arg(value_name = "n", num_args = 0.., allow_negative_numbers = true)]
    pub args: Vec<String>,

    /// Sampling algorithm: exact, or skip (faster on large inputs)
    #[arg(short, long, default_value_t = Algorithm::Skip)]
    pub algorithm: Algorithm,

    /// Seed for reproducible output (random when omitted)
    #[arg(short, long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The requested sample size, validated.
    ///
    /// Exactly one positional argument is accepted.
    pub fn sample_size(&self) -> Result<usize, SampleError> {
        match self.args.as_slice() {
            [n] => parse_sample_size(n),
            _ => Err(SampleError::invalid(ARG_COUNT_MISMATCH)),
        }
    }

    /// Generator for this run: seeded when `--seed` is given, from entropy otherwise.
    pub fn rng(&self) -> JavaRandom {
        self.seed
            .map(JavaRandom::new)
            .unwrap_or_else(JavaRandom::from_entropy)
    }

    /// Default log filter for the verbosity flag.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Parse a sample size, rejecting anything that isn't a positive integer.
pub fn parse_sample_size(arg: &str) -> Result<usize, SampleError> {
    let n: i64 = arg
        .parse()
        .map_err(|_| SampleError::invalid(format!("Sample size is not a number: {arg:?}")))?;
    if n <= 0 {
        return Err(SampleError::invalid("Sample size must be positive"));
    }
    usize::try_from(n).map_err(|_| SampleError::invalid(format!("Sample size too large: {n}")))
}

/// Sample `input` per `cli` and write the result, newline-terminated, to `output`.
pub fn run<R: Read, W: Write>(cli: &Cli, input: R, output: &mut W) -> anyhow::Result<()> {
    let k = cli.sample_size()?;
    tracing::debug!(k, algorithm = %cli.algorithm, seeded = cli.seed.is_some(), "sampling");

    let sample = cli
        .algorithm
        .run(Utf8Chars::new(input), k, cli.rng())
        .context("sampling failed")?;
    tracing::info!(seen = sample.seen(), sampled = sample.len(), "done");

    writeln!(output, "{sample}").context("failed to write sample")?;
    output.flush().context("failed to write sample")?;
    Ok(())
}

/// User-facing text for an error returned by [`run`].
///
/// Argument problems are followed by the usage banner.
pub fn render_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SampleError>() {
        Some(e @ SampleError::InvalidArgument(_)) => format!("Error: {e}\n{USAGE}"),
        _ => format!("Error: {err:#}"),
    }
}
