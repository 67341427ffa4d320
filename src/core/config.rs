//! Resolved build configuration.
//!
//! A [`BuildConfig`] is assembled by a fixed pipeline of merge steps:
//! base settings, then the platform profile, then the build mode, then the
//! optional runtime variant. Every step consumes the previous value and
//! returns a new one, so the merge order is explicit at the call site.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::platform::PlatformProfile;
use crate::util::config::{BuildSettings, VariantSettings};

/// Debug or release build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Debug,
    #[default]
    Release,
}

impl BuildMode {
    /// Compiler flag the mode contributes.
    pub fn flag(&self) -> &'static str {
        match self {
            BuildMode::Debug => "-g",
            BuildMode::Release => "-O3",
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, BuildMode::Release)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substitution of a linked runtime library with bundled sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Link entries containing this token are dropped.
    pub marker: String,
    /// Source globs compiled in place of the dropped library.
    pub fallback_source: Vec<String>,
}

impl Variant {
    pub fn from_settings(settings: &VariantSettings) -> Self {
        Variant {
            marker: settings.marker.clone(),
            fallback_source: settings.fallback_source.clone(),
        }
    }

    fn removes(&self, lib: &str) -> bool {
        !self.marker.is_empty() && lib.contains(&self.marker)
    }
}

/// Everything needed to compose the compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    pub output: PathBuf,
    pub compiler: String,
    pub include: Vec<String>,
    pub source: Vec<String>,
    pub flags: Vec<String>,
    pub link: Vec<String>,
    pub define: Vec<String>,
    pub extra: String,
}

impl BuildConfig {
    /// Start from the project settings.
    ///
    /// The temp source directory always leads the include path so generated
    /// units resolve by name.
    pub fn base(settings: &BuildSettings) -> Self {
        let temp = settings.temp_dir.display().to_string();
        let mut include = vec![temp.clone()];
        include.extend(settings.include.iter().filter(|i| **i != temp).cloned());

        BuildConfig {
            output: settings.output.clone(),
            compiler: settings.compiler.clone(),
            include,
            source: settings.source.clone(),
            flags: settings.flags.clone(),
            link: settings.link.clone(),
            define: settings.define.clone(),
            extra: settings.extra.clone(),
        }
    }

    /// Apply a platform profile. Profiles only add.
    pub fn with_platform(mut self, profile: &PlatformProfile) -> Self {
        if !profile.output_suffix.is_empty() {
            let mut output = OsString::from(self.output);
            output.push(&profile.output_suffix);
            self.output = PathBuf::from(output);
        }

        self.link.extend(profile.link.iter().cloned());
        self.flags.extend(profile.flags.iter().cloned());
        self.define.extend(profile.define.iter().cloned());
        self.extra = join_extra(&self.extra, &profile.extra);
        self
    }

    /// Apply the debug/release flag.
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.flags.push(mode.flag().to_string());
        self
    }

    /// Apply the runtime variant, if selected.
    ///
    /// Matching link entries are removed before the fallback sources are
    /// added, so the surviving libraries keep their relative order.
    pub fn with_variant(mut self, variant: Option<&Variant>) -> Self {
        if let Some(variant) = variant {
            self.link.retain(|lib| !variant.removes(lib));
            self.source.extend(variant.fallback_source.iter().cloned());
        }
        self
    }

    /// Run the full merge pipeline.
    pub fn resolve(
        settings: &BuildSettings,
        profile: &PlatformProfile,
        mode: BuildMode,
        variant: Option<&Variant>,
    ) -> Self {
        BuildConfig::base(settings)
            .with_platform(profile)
            .with_mode(mode)
            .with_variant(variant)
    }
}

fn join_extra(base: &str, more: &str) -> String {
    match (base.is_empty(), more.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => more.to_string(),
        (false, false) => format!("{} {}", base, more),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{Platform, SdkFlags};
    use crate::util::config::Settings;

    fn linux() -> PlatformProfile {
        PlatformProfile::resolve(Platform::Linux, &SdkFlags::default())
    }

    fn nojit() -> Variant {
        Variant::from_settings(&Settings::default().nojit)
    }

    #[test]
    fn test_base_puts_temp_dir_on_include_path() {
        let settings = Settings::default();
        let config = BuildConfig::base(&settings.build);
        assert_eq!(config.include, vec![".tempsrc"]);
        assert_eq!(config.compiler, "gcc");
        assert_eq!(config.link, vec!["m"]);
    }

    #[test]
    fn test_base_does_not_duplicate_temp_include() {
        let mut settings = Settings::default();
        settings.build.include = vec!["include".into(), ".tempsrc".into()];
        let config = BuildConfig::base(&settings.build);
        assert_eq!(config.include, vec![".tempsrc", "include"]);
    }

    #[test]
    fn test_release_on_linux() {
        let settings = Settings::default();
        let config = BuildConfig::resolve(&settings.build, &linux(), BuildMode::Release, None);

        assert_eq!(config.link, vec!["m", "luajit-5.1", "SDLmain", "SDL"]);
        assert_eq!(config.flags.last().map(String::as_str), Some("-O3"));
        assert!(!config.flags.contains(&"-g".to_string()));
        assert_eq!(config.output, PathBuf::from("bin/juno"));
    }

    #[test]
    fn test_debug_mode_adds_symbols() {
        let settings = Settings::default();
        let config = BuildConfig::resolve(&settings.build, &linux(), BuildMode::Debug, None);
        assert!(config.flags.contains(&"-g".to_string()));
        assert!(!config.flags.contains(&"-O3".to_string()));
    }

    #[test]
    fn test_windows_suffix() {
        let settings = Settings::default();
        let profile = PlatformProfile::resolve(Platform::Windows, &SdkFlags::default());
        let config = BuildConfig::resolve(&settings.build, &profile, BuildMode::Release, None);
        assert_eq!(config.output, PathBuf::from("bin/juno.exe"));
        assert!(config.flags.contains(&"-mwindows".to_string()));
    }

    #[test]
    fn test_nojit_swaps_runtime() {
        let settings = Settings::default();
        let variant = nojit();
        let config =
            BuildConfig::resolve(&settings.build, &linux(), BuildMode::Release, Some(&variant));

        assert!(!config.link.iter().any(|l| l.contains("lua")));
        assert_eq!(config.link, vec!["m", "SDLmain", "SDL"]);
        assert!(config.source.contains(&"src/lib/lua51/*.c".to_string()));
    }

    #[test]
    fn test_nojit_on_windows_removes_lua51() {
        let settings = Settings::default();
        let profile = PlatformProfile::resolve(Platform::Windows, &SdkFlags::default());
        let variant = nojit();
        let config =
            BuildConfig::resolve(&settings.build, &profile, BuildMode::Release, Some(&variant));
        assert_eq!(config.link, vec!["m", "mingw32", "SDLmain", "SDL"]);
    }

    #[test]
    fn test_variant_removal_independent_of_unaffected_order() {
        let variant = Variant {
            marker: "lua".to_string(),
            fallback_source: vec!["lua/*.c".to_string()],
        };
        let orders = [
            vec!["m", "luajit", "SDL", "z"],
            vec!["z", "SDL", "m", "luajit"],
            vec!["luajit", "z", "m", "SDL"],
        ];

        let mut results = Vec::new();
        for order in orders {
            let mut settings = Settings::default();
            settings.build.link = order.iter().map(|s| s.to_string()).collect();
            let config = BuildConfig::base(&settings.build).with_variant(Some(&variant));
            let mut set = config.link.clone();
            set.sort();
            results.push(set);
        }

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(results[0], vec!["SDL", "m", "z"]);
    }

    #[test]
    fn test_empty_marker_removes_nothing() {
        let settings = Settings::default();
        let variant = Variant {
            marker: String::new(),
            fallback_source: Vec::new(),
        };
        let config = BuildConfig::resolve(&settings.build, &linux(), BuildMode::Debug, Some(&variant));
        assert_eq!(config.link.len(), 4);
    }

    #[test]
    fn test_macos_extra_is_appended() {
        let mut settings = Settings::default();
        settings.build.extra = "-framework OpenGL".to_string();
        let sdk = SdkFlags {
            cflags: "-I/sdl".to_string(),
            libs: "-lSDL".to_string(),
        };
        let profile = PlatformProfile::resolve(Platform::MacOs, &sdk);
        let config = BuildConfig::resolve(&settings.build, &profile, BuildMode::Release, None);

        assert_eq!(config.extra, "-framework OpenGL -lSDL");
        assert!(config.flags.contains(&"-I/sdl".to_string()));
        assert_eq!(config.define, vec!["SR_MODE_ARGB"]);
    }

    #[test]
    fn test_merge_does_not_touch_settings() {
        let settings = Settings::default();
        let before = settings.clone();
        let _ = BuildConfig::resolve(
            &settings.build,
            &linux(),
            BuildMode::Debug,
            Some(&nojit()),
        );
        assert_eq!(settings.build.link, before.build.link);
        assert_eq!(settings.build.source, before.build.source);
    }
}
