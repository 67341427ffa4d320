//! Project settings for kiln.
//!
//! Settings come from an optional `Kiln.toml` in the project directory.
//! Every key has a built-in default, so a project with the stock layout
//! needs no file at all:
//!
//! ```toml
//! [build]
//! output = "bin/juno"
//! compiler = "gcc"
//! embed-dir = "src/embed"
//! temp-dir = ".tempsrc"
//! source = ["src/*.c", "src/lib/sera/*.c"]
//! flags = ["-Wall", "-Wextra"]
//! link = ["m"]
//!
//! [nojit]
//! marker = "lua"
//! fallback-source = ["src/lib/lua51/*.c"]
//!
//! [sdk]
//! helper = "sdl-config"
//! ```

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ops::errors::BuildError;

/// Name of the project settings file.
pub const SETTINGS_FILE: &str = "Kiln.toml";

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub build: BuildSettings,
    pub nojit: VariantSettings,
    pub sdk: SdkSettings,
}

/// Base build configuration shared by every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BuildSettings {
    /// Output binary, before any platform suffix
    pub output: PathBuf,
    /// Compiler executable
    pub compiler: String,
    /// Directory whose files are embedded
    pub embed_dir: PathBuf,
    /// Scratch directory for generated units; wiped on every run
    pub temp_dir: PathBuf,
    pub include: Vec<String>,
    /// Source globs, expanded by the shell
    pub source: Vec<String>,
    pub flags: Vec<String>,
    pub link: Vec<String>,
    pub define: Vec<String>,
    /// Raw text appended after everything else
    pub extra: String,
    /// Tool used to strip release binaries
    pub strip: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        let strings =
            |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };

        BuildSettings {
            output: PathBuf::from("bin/juno"),
            compiler: "gcc".to_string(),
            embed_dir: PathBuf::from("src/embed"),
            temp_dir: PathBuf::from(".tempsrc"),
            include: Vec::new(),
            source: strings(&[
                "src/*.c",
                "src/lib/sera/*.c",
                "src/lib/vec/*.c",
                "src/lib/stb_vorbis.c",
            ]),
            flags: strings(&["-Wall", "-Wextra", "--std=gnu99", "-fno-strict-aliasing"]),
            link: strings(&["m"]),
            define: Vec::new(),
            extra: String::new(),
            strip: "strip".to_string(),
        }
    }
}

/// The `nojit` runtime substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct VariantSettings {
    /// Link entries containing this token are dropped
    pub marker: String,
    pub fallback_source: Vec<String>,
}

impl Default for VariantSettings {
    fn default() -> Self {
        VariantSettings {
            marker: "lua".to_string(),
            fallback_source: vec!["src/lib/lua51/*.c".to_string()],
        }
    }
}

/// SDK configuration helper queried on macOS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SdkSettings {
    pub helper: String,
}

impl Default for SdkSettings {
    fn default() -> Self {
        SdkSettings {
            helper: "sdl-config".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(contents: &str, origin: &Path) -> Result<Self, BuildError> {
        let settings: Settings = toml::from_str(contents).map_err(|e| {
            BuildError::Configuration(format!("failed to parse {}: {}", origin.display(), e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| BuildError::fs("read", path, e))?;
        Self::parse(&contents, path)
    }

    /// Load the settings for a project.
    ///
    /// An explicit path must exist. Otherwise `Kiln.toml` in `root` is used
    /// when present, and the built-in defaults when not.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, BuildError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let path = root.join(SETTINGS_FILE);
        if path.is_file() {
            tracing::debug!("loading settings from {}", path.display());
            Self::load(&path)
        } else {
            tracing::debug!("no {} found, using defaults", SETTINGS_FILE);
            Ok(Settings::default())
        }
    }

    /// Reject settings that cannot produce a sensible build.
    pub fn validate(&self) -> Result<(), BuildError> {
        let build = &self.build;

        if build.compiler.trim().is_empty() {
            return Err(BuildError::Configuration(
                "`build.compiler` must not be empty".to_string(),
            ));
        }
        if build.output.as_os_str().is_empty() {
            return Err(BuildError::Configuration(
                "`build.output` must not be empty".to_string(),
            ));
        }
        // The temp dir is deleted recursively, so it has to name a real
        // subdirectory of the project.
        let scoped = build.temp_dir.is_relative()
            && build
                .temp_dir
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            && build
                .temp_dir
                .components()
                .any(|c| matches!(c, Component::Normal(_)));
        if !scoped {
            return Err(BuildError::Configuration(format!(
                "`build.temp-dir` must be a relative subdirectory of the project, got `{}`",
                build.temp_dir.display()
            )));
        }

        Ok(())
    }
}
