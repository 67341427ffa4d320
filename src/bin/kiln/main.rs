//! kiln CLI - embed assets and build the native binary

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod build;
mod cli;

use cli::Cli;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.is_verbose() {
            EnvFilter::new("kiln=debug")
        } else {
            EnvFilter::new("kiln=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    build::execute(cli)
}
