//! kwmark - A CLI keyword highlighter

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kwmark::cli::{self, Cli};

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    cli::run(cli)
}
