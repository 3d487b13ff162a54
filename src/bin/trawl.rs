//! Trawl CLI binary.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use trawl::cli::{args::TrawlArgs, commands::execute_command};

fn main() {
    let args = TrawlArgs::parse();

    // RUST_LOG wins when set; -v flags pick the default level otherwise.
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
