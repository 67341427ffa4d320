//! Flattening a [`BuildConfig`] into one compiler command line.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::core::config::BuildConfig;

/// A composed command line.
///
/// Each part is already shell text: source globs are left for the shell to
/// expand and pre-formatted SDK fragments are split by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileCommand {
    parts: Vec<String>,
}

impl CompileCommand {
    /// Compose `compiler -o output flags sources -I.. -l.. -D.. extra`.
    pub fn compose(config: &BuildConfig) -> Self {
        let mut parts = vec![
            config.compiler.clone(),
            "-o".to_string(),
            config.output.display().to_string(),
        ];

        parts.extend(config.flags.iter().cloned());
        parts.extend(config.source.iter().cloned());
        parts.extend(config.include.iter().map(|i| format!("-I{}", i)));
        parts.extend(config.link.iter().map(|l| format!("-l{}", l)));
        parts.extend(config.define.iter().map(|d| format!("-D{}", d)));
        if !config.extra.trim().is_empty() {
            parts.push(config.extra.trim().to_string());
        }

        parts.retain(|p| !p.is_empty());
        CompileCommand { parts }
    }

    /// The post-link strip step for an output binary.
    pub fn strip(tool: &str, output: &Path) -> Self {
        CompileCommand {
            parts: vec![tool.to_string(), output.display().to_string()],
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The full command as one line.
    pub fn line(&self) -> String {
        self.parts.join(" ")
    }
}

impl fmt::Display for CompileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line())
    }
}
