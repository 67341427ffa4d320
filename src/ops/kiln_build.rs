//! Implementation of `kiln`.
//!
//! One run goes through these steps in order, never looping back:
//!
//! 1. resolve the configuration (settings, platform, mode, variant)
//! 2. wipe and recreate the temp source directory, create the output directory
//! 3. discover assets and check their symbols are unique
//! 4. write one generated unit per asset
//! 5. compose and run the compiler command
//! 6. strip the binary after a successful release build
//! 7. remove the temp source directory
//!
//! Any failure in steps 2-5 aborts the run. The temp directory is a scoped
//! guard, so step 7 happens on every exit path. A failure in step 7 itself
//! is only a warning; the compiler's status stands.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::core::command::CompileCommand;
use crate::core::config::{BuildConfig, BuildMode, Variant};
use crate::core::platform::{Platform, PlatformProfile, SdkFlags};
use crate::embed::{self, AssetFile};
use crate::ops::errors::BuildError;
use crate::ops::temp_dir::TempSourceDir;
use crate::util::config::Settings;
use crate::util::fs::{ensure_dir, list_files};
use crate::util::process::{Executor, ProcessBuilder};
use crate::util::shell::{Shell, Status};

/// Options for a build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub mode: BuildMode,

    /// Echo the composed command before running it
    pub verbose: bool,

    /// Replace the linked JIT runtime with the bundled interpreter sources
    pub nojit: bool,

    /// Host platform whose profile is applied
    pub platform: Platform,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            mode: BuildMode::Release,
            verbose: false,
            nojit: false,
            platform: Platform::current(),
        }
    }
}

/// Outcome of a build that reached the compiler.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub mode: BuildMode,
    pub output: PathBuf,
    pub command: CompileCommand,
    /// Generated unit file names, in the order they were written
    pub units: Vec<String>,
    /// Compiler exit status
    pub status: i32,
    /// Whether the strip step ran and succeeded
    pub stripped: bool,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// The resolved configuration and command, without running anything.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub platform: Platform,
    pub mode: BuildMode,
    pub nojit: bool,
    pub config: BuildConfig,
    pub command: String,
    /// Location of the compiler on PATH, if it can be found
    pub compiler_path: Option<PathBuf>,
}

/// Capture compile and link flags from the SDK helper.
///
/// A helper that is missing or fails contributes nothing.
pub fn query_sdk_flags(
    root: &Path,
    helper: &str,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> SdkFlags {
    let mut query = |arg: &str| {
        let cmd = ProcessBuilder::new(helper).arg(arg).cwd(root);
        match exec.output(&cmd) {
            Ok(out) if out.success() => out.stdout.trim().to_string(),
            Ok(out) => {
                shell.warn(format!(
                    "`{}` exited with status {}; ignoring its output",
                    cmd.display_command(),
                    out.status
                ));
                String::new()
            }
            Err(e) => {
                shell.warn(format!("could not run `{}`: {}", cmd.display_command(), e));
                String::new()
            }
        }
    };

    SdkFlags {
        cflags: query("--cflags"),
        libs: query("--libs"),
    }
}

/// Merge settings, platform profile, mode and variant.
pub fn resolve_config(
    root: &Path,
    settings: &Settings,
    opts: &BuildOptions,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> BuildConfig {
    let sdk = if opts.platform.needs_sdk_flags() {
        query_sdk_flags(root, &settings.sdk.helper, exec, shell)
    } else {
        SdkFlags::default()
    };

    let profile = PlatformProfile::resolve(opts.platform, &sdk);
    let variant = opts.nojit.then(|| Variant::from_settings(&settings.nojit));

    tracing::debug!(
        "resolving {} build for {}{}",
        opts.mode,
        opts.platform,
        if opts.nojit { " (nojit)" } else { "" }
    );
    BuildConfig::resolve(&settings.build, &profile, opts.mode, variant.as_ref())
}

/// Resolve everything a build would run, touching nothing on disk.
pub fn plan(
    root: &Path,
    settings: &Settings,
    opts: &BuildOptions,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> BuildPlan {
    let config = resolve_config(root, settings, opts, exec, shell);
    let command = CompileCommand::compose(&config).line();
    let compiler_path = crate::util::process::find_executable(&config.compiler);

    BuildPlan {
        platform: opts.platform,
        mode: opts.mode,
        nojit: opts.nojit,
        config,
        command,
        compiler_path,
    }
}

/// List the assets in the embed directory and reject symbol collisions.
pub fn discover_assets(embed_dir: &Path) -> Result<Vec<AssetFile>, BuildError> {
    let files = list_files(embed_dir).map_err(|e| BuildError::fs("read directory", embed_dir, e))?;
    let assets: Vec<AssetFile> = files.into_iter().map(AssetFile::new).collect();
    embed::check_unique_symbols(&assets)?;
    Ok(assets)
}

/// Write one generated unit per asset into the temp directory.
fn write_units(
    assets: &[AssetFile],
    temp: &TempSourceDir,
    shell: &Shell,
) -> Result<Vec<String>, BuildError> {
    if !assets.is_empty() {
        shell.status(Status::Embedding, format!("{} asset(s)", assets.len()));
    }

    let mut units = Vec::with_capacity(assets.len());
    for asset in assets {
        let text = embed::process(&[asset.path()])?;
        let unit = asset.unit_name();
        let path = temp.path().join(&unit);

        std::fs::write(&path, text).map_err(|e| BuildError::fs("write", &path, e))?;
        tracing::debug!("embedded {} as {}", asset.path().display(), unit);
        units.push(unit);
    }

    Ok(units)
}

/// Run the full build pipeline in `root`.
///
/// Returns `Err` only when the pipeline itself fails; a compiler that runs
/// and fails is reported through [`BuildReport::status`].
pub fn build(
    root: &Path,
    settings: &Settings,
    opts: &BuildOptions,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> Result<BuildReport, BuildError> {
    let start = Instant::now();

    let config = resolve_config(root, settings, opts, exec, shell);
    shell.status(
        Status::Building,
        format!("{} ({})", config.output.display(), opts.mode),
    );

    let temp = TempSourceDir::acquire(root.join(&settings.build.temp_dir))?;
    if let Some(parent) = config.output.parent() {
        let out_dir = root.join(parent);
        ensure_dir(&out_dir).map_err(|e| BuildError::fs("create directory", &out_dir, e))?;
    }

    let assets = discover_assets(&root.join(&settings.build.embed_dir))?;
    let units = write_units(&assets, &temp, shell)?;

    let command = CompileCommand::compose(&config);
    if opts.verbose {
        shell.echo(command.line());
    }

    shell.status(Status::Compiling, config.output.display());
    let status = exec
        .status(&ProcessBuilder::shell(command.line()).cwd(root))
        .map_err(|e| BuildError::subprocess(command.line(), e))?;
    tracing::debug!("compiler exited with status {}", status);

    let stripped = if status == 0 && opts.mode.is_release() {
        strip(root, &settings.build.strip, &config.output, exec, shell)
    } else {
        false
    };

    if let Err(e) = temp.close() {
        shell.warn(e);
    }

    Ok(BuildReport {
        mode: opts.mode,
        output: config.output,
        command,
        units,
        status,
        stripped,
        elapsed: start.elapsed(),
    })
}

/// Strip debug symbols. Failure is reported and otherwise ignored.
fn strip(
    root: &Path,
    tool: &str,
    output: &Path,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> bool {
    let command = CompileCommand::strip(tool, output);
    shell.status(Status::Stripping, output.display());

    match exec.status(&ProcessBuilder::shell(command.line()).cwd(root)) {
        Ok(0) => true,
        Ok(code) => {
            shell.warn(format!("`{}` exited with status {}", command, code));
            false
        }
        Err(e) => {
            shell.warn(format!("could not run `{}`: {}", command, e));
            false
        }
    }
}
