use std::io;

use clap::Parser;
use stream_sampler::cli::{render_error, run, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli, io::stdin().lock(), &mut io::stdout().lock()) {
        eprintln!("{}", render_error(&e));
        std::process::exit(1);
    }
}
