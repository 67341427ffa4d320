//! Asset embedding.
//!
//! Turns the raw bytes of a file into a C translation fragment: a comment
//! naming the file and a `static const char` array initialized with the
//! decimal value of every byte. The transform works on bytes, never on
//! decoded text, so any file (including ones with NUL bytes or invalid
//! UTF-8) round-trips exactly.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Banner placed at the top of every generated blob.
pub const BANNER: &str = "/* Automatically generated; do not edit */";

/// Suffix of the generated unit file for an asset.
pub const UNIT_SUFFIX: &str = ".h";

/// Line budget for the array literal, not counting braces.
pub const LINE_WIDTH: usize = 78;

/// Error while embedding assets.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("failed to read asset `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "assets `{}` and `{}` both map to symbol `{symbol}`",
        first.display(),
        second.display()
    )]
    SymbolCollision {
        symbol: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Derive a C identifier from a file path.
///
/// Only the base name is used. It is lowercased and every character outside
/// `[a-z0-9]` becomes `_`, so `gfx/Logo.BIN` yields `logo_bin`. A path
/// without a file name (`a/..`) uses its last normal component instead, and
/// one with no normal component at all is used whole.
pub fn sanitize(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let name = path
        .file_name()
        .or_else(|| {
            path.components().rev().find_map(|c| match c {
                Component::Normal(name) => Some(name),
                _ => None,
            })
        })
        .unwrap_or(path.as_os_str());

    name.to_string_lossy()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect()
}

/// Encode bytes as a brace-delimited list of decimal values.
///
/// Lines are filled greedily: a newline goes in front of any `value,` token
/// that would push the running line length past [`LINE_WIDTH`]. The trailing
/// comma is dropped before the closing brace.
pub fn encode(bytes: &[u8]) -> String {
    // Worst case is four characters per byte plus the occasional newline.
    let mut body = String::with_capacity(bytes.len() * 4 + bytes.len() / 19 + 2);
    let mut line = 0;

    for byte in bytes {
        let token = format!("{},", byte);
        if line + token.len() > LINE_WIDTH {
            body.push('\n');
            line = token.len();
        } else {
            line += token.len();
        }
        body.push_str(&token);
    }

    let body = body.trim_end_matches(',');
    format!("{{{}}}", body)
}

/// A file discovered for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    path: PathBuf,
    symbol: String,
}

impl AssetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let symbol = sanitize(&path);
        AssetFile { path, symbol }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The C identifier the asset is exposed under.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// File name of the generated unit, e.g. `logo_bin.h`.
    pub fn unit_name(&self) -> String {
        format!("{}{}", self.symbol, UNIT_SUFFIX)
    }

    /// Base name shown in the unit's header comment.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Read the asset and build its unit.
    pub fn load(&self) -> Result<EmbedUnit, EmbedError> {
        let bytes = fs::read(&self.path).map_err(|source| EmbedError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(EmbedUnit::new(self.display_name(), self.symbol.clone(), &bytes))
    }
}

/// One generated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedUnit {
    pub file_name: String,
    pub symbol: String,
    pub literal: String,
}

impl EmbedUnit {
    pub fn new(file_name: impl Into<String>, symbol: impl Into<String>, bytes: &[u8]) -> Self {
        EmbedUnit {
            file_name: file_name.into(),
            symbol: symbol.into(),
            literal: encode(bytes),
        }
    }
}

impl fmt::Display for EmbedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/* {} */\nstatic const char {}[] = \n{};",
            self.file_name, self.symbol, self.literal
        )
    }
}

/// Embed one or more files into a single generated blob.
///
/// All files are read before anything is returned; a single unreadable path
/// fails the whole call.
pub fn process<P: AsRef<Path>>(paths: &[P]) -> Result<String, EmbedError> {
    let units = paths
        .iter()
        .map(|p| AssetFile::new(p.as_ref()).load())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(render(&units))
}

/// Join units under the generated-file banner.
pub fn render(units: &[EmbedUnit]) -> String {
    let body = units
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{}\n\n{}", BANNER, body)
}

/// Fail if two assets would be declared under the same identifier.
pub fn check_unique_symbols(assets: &[AssetFile]) -> Result<(), EmbedError> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();

    for asset in assets {
        if let Some(first) = seen.insert(asset.symbol(), asset.path()) {
            return Err(EmbedError::SymbolCollision {
                symbol: asset.symbol().to_string(),
                first: first.to_path_buf(),
                second: asset.path().to_path_buf(),
            });
        }
    }

    Ok(())
}
