//! kiln-embed - print C byte-array declarations for files

use std::path::PathBuf;

use clap::Parser;

/// Print a generated C unit embedding each FILE as a byte array
#[derive(Parser)]
#[command(name = "kiln-embed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to embed
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    match kiln::embed::process(cli.files.as_slice()) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("error: {:#}", anyhow::Error::new(e));
            std::process::exit(1);
        }
    }
}
