//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kiln::util::shell::ColorChoice;

/// kiln - embed assets and build the native binary in one step
#[derive(Parser)]
#[command(name = "kiln")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Build options, in any order
    #[arg(value_enum)]
    pub options: Vec<BuildToken>,

    /// Echo the compiler command and show debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Color output: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Host platform to build for (defaults to the running OS)
    #[arg(long, env = "KILN_PLATFORM")]
    pub platform: Option<String>,

    /// Path to Kiln.toml
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Print the resolved configuration and command as JSON (no build)
    #[arg(long)]
    pub plan: bool,
}

/// Free-form build option words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuildToken {
    /// Unoptimized build with debug symbols (default is release)
    Debug,
    /// Echo the composed compiler command
    Verbose,
    /// Compile the bundled Lua interpreter instead of linking LuaJIT
    Nojit,
}

impl Cli {
    pub fn has(&self, token: BuildToken) -> bool {
        self.options.contains(&token)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.has(BuildToken::Verbose)
    }
}
