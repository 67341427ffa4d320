//! Host platform classification and per-platform build overrides.

use std::fmt;

use serde::Serialize;

/// The host platform family a build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    /// Anything unrecognized; gets no overrides.
    Other,
}

impl Platform {
    /// Classify a host identifier.
    ///
    /// Accepts both Rust-style names (`std::env::consts::OS`) and the
    /// `uname`-style names (`Linux`, `Darwin`, `Windows_NT`, `MINGW64_NT-...`).
    pub fn from_host(host: &str) -> Self {
        let host = host.trim().to_ascii_lowercase();

        if host.starts_with("windows") || host.starts_with("win32") || host.starts_with("mingw")
        {
            Platform::Windows
        } else if host == "linux" {
            Platform::Linux
        } else if host == "macos" || host == "darwin" {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        Self::from_host(std::env::consts::OS)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Other => "other",
        }
    }

    /// Whether this platform reads compile/link flags from an SDK helper.
    pub fn needs_sdk_flags(&self) -> bool {
        matches!(self, Platform::MacOs)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-formatted flags captured from an SDK configuration helper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdkFlags {
    /// Compile flags text, appended to the flag list as one entry.
    pub cflags: String,
    /// Link flags text, appended verbatim to the extra field.
    pub libs: String,
}

/// Additive overrides for one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    pub platform: Option<Platform>,
    pub output_suffix: String,
    pub link: Vec<String>,
    pub flags: Vec<String>,
    pub define: Vec<String>,
    pub extra: String,
}

impl PlatformProfile {
    /// Resolve the overrides for a platform.
    ///
    /// `sdk` is only consulted on platforms where [`Platform::needs_sdk_flags`]
    /// holds; empty helper output contributes nothing.
    pub fn resolve(platform: Platform, sdk: &SdkFlags) -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        match platform {
            Platform::Windows => PlatformProfile {
                platform: Some(platform),
                output_suffix: ".exe".to_string(),
                link: strings(&["mingw32", "lua51", "SDLmain", "SDL"]),
                flags: strings(&["-mwindows"]),
                ..Default::default()
            },
            Platform::Linux => PlatformProfile {
                platform: Some(platform),
                link: strings(&["luajit-5.1", "SDLmain", "SDL"]),
                ..Default::default()
            },
            Platform::MacOs => {
                let mut flags = strings(&["-pagezero_size 10000", "-image_base 100000000"]);
                let cflags = sdk.cflags.trim();
                if !cflags.is_empty() {
                    flags.push(cflags.to_string());
                }
                PlatformProfile {
                    platform: Some(platform),
                    link: strings(&["luajit-5.1"]),
                    flags,
                    define: strings(&["SR_MODE_ARGB"]),
                    extra: sdk.libs.trim().to_string(),
                    ..Default::default()
                }
            }
            Platform::Other => PlatformProfile::default(),
        }
    }
}
