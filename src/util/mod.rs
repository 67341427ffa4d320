//! Shared utilities

pub mod config;
pub mod fs;
pub mod process;
pub mod shell;

pub use config::Settings;
pub use process::{Executor, ProcessBuilder, SystemExecutor};
pub use shell::Shell;
