//! Build configuration model.
//!
//! Everything here is pure: platform classification, the merge pipeline
//! that produces a [`BuildConfig`], and the flattening of that config into
//! a [`CompileCommand`].

pub mod command;
pub mod config;
pub mod platform;

pub use command::CompileCommand;
pub use config::{BuildConfig, BuildMode, Variant};
pub use platform::{Platform, PlatformProfile, SdkFlags};
