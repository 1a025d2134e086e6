//! skillstack binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use skillstack::cli::{self, Cli};
use skillstack::prompt::StdinPrompter;

fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let opts = match args.into_options() {
        Ok(opts) => opts,
        Err(e) => fail(&e),
    };
    if let Err(e) = cli::execute(&opts, &mut StdinPrompter) {
        fail(&e);
    }
}

/// Install the tracing subscriber; RUST_LOG overrides the verbosity flag.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "skillstack=debug" } else { "skillstack=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the full error chain and exit non-zero.
fn fail(error: &anyhow::Error) -> ! {
    eprintln!("{} {error:#}", "error:".red().bold());
    std::process::exit(1);
}
