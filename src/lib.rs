//! kiln - asset embedding and single-command native builds
//!
//! Two pieces do the real work:
//!
//! - [`embed`] turns files into C byte-array declarations.
//! - [`ops::kiln_build`] merges the build configuration for the host
//!   platform, writes the embedded units to a scratch directory, runs the
//!   compiler once and cleans up after it.

pub mod core;
pub mod embed;
pub mod ops;
pub mod util;

/// Test utilities and mocks for kiln unit tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{BuildConfig, BuildMode, CompileCommand, Platform, PlatformProfile};
pub use embed::{AssetFile, EmbedError, EmbedUnit};
pub use ops::errors::BuildError;
pub use ops::kiln_build::{build, BuildOptions, BuildReport};
pub use util::config::Settings;
