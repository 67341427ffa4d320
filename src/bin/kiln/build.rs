//! The build command

use anyhow::{Context, Result};

use crate::cli::{BuildToken, Cli};
use kiln::core::{BuildMode, Platform};
use kiln::ops::kiln_build::{build, plan, BuildOptions};
use kiln::util::shell::{format_duration, Shell, Status};
use kiln::util::{Settings, SystemExecutor};
use kiln::BuildError;

/// Run a build and return the exit code for the process.
pub fn execute(cli: Cli) -> Result<i32> {
    let shell = Shell::from_flags(cli.quiet, cli.is_verbose(), cli.color);
    let root = std::env::current_dir().context("failed to determine current directory")?;

    let settings = match Settings::discover(&root, cli.manifest_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => return Ok(report_error(&shell, e)),
    };

    let opts = BuildOptions {
        mode: if cli.has(BuildToken::Debug) {
            BuildMode::Debug
        } else {
            BuildMode::Release
        },
        verbose: cli.is_verbose(),
        nojit: cli.has(BuildToken::Nojit),
        platform: cli
            .platform
            .as_deref()
            .map(Platform::from_host)
            .unwrap_or_else(Platform::current),
    };

    let mut exec = SystemExecutor;

    if cli.plan {
        let plan = plan(&root, &settings, &opts, &mut exec, &shell);
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(0);
    }

    match build(&root, &settings, &opts, &mut exec, &shell) {
        Ok(report) => {
            if report.success() {
                shell.status(
                    Status::Finished,
                    format!(
                        "`{}` ({}) in {}",
                        report.output.display(),
                        report.mode,
                        format_duration(report.elapsed)
                    ),
                );
            } else {
                shell.error("done with errors");
            }
            Ok(report.status)
        }
        Err(e) => Ok(report_error(&shell, e)),
    }
}

fn report_error(shell: &Shell, err: BuildError) -> i32 {
    eprintln!("{:?}", miette::Report::new(err));
    shell.error("done with errors");
    1
}
