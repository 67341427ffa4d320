//! High-level operations.

pub mod errors;
pub mod kiln_build;
pub mod temp_dir;

pub use errors::BuildError;
pub use kiln_build::{build, plan, BuildOptions, BuildPlan, BuildReport};
pub use temp_dir::TempSourceDir;
