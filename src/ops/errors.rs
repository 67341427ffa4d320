//! Build pipeline error types.

use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::embed::EmbedError;

/// Error that aborts a build before or around the compiler invocation.
///
/// A compiler that runs and exits non-zero is not an error here; its status
/// is reported through [`BuildReport`](crate::ops::kiln_build::BuildReport).
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BuildError {
    #[error("failed to {action} `{}`", path.display())]
    #[diagnostic(code(kiln::fs))]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run `{command}`")]
    #[diagnostic(
        code(kiln::subprocess),
        help("check that the tool is installed and on PATH")
    )]
    Subprocess {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    #[diagnostic(code(kiln::config))]
    Configuration(String),

    #[error(transparent)]
    #[diagnostic(code(kiln::embed))]
    Embed(#[from] EmbedError),
}

impl BuildError {
    pub fn fs(action: &'static str, path: &Path, source: io::Error) -> Self {
        BuildError::Filesystem {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn subprocess(command: impl Into<String>, source: io::Error) -> Self {
        BuildError::Subprocess {
            command: command.into(),
            source,
        }
    }
}
