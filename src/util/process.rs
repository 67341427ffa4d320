//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Run a command line through the platform shell.
    ///
    /// The shell expands globs and splits pre-formatted flag text.
    pub fn shell(line: impl Into<String>) -> Self {
        if cfg!(windows) {
            ProcessBuilder::new("cmd").arg("/C").arg(line.into())
        } else {
            ProcessBuilder::new("sh").arg("-c").arg(line.into())
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute with captured stdout/stderr and wait for completion.
    pub fn exec(&self) -> io::Result<ProcessOutput> {
        let output = self
            .build_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(ProcessOutput {
            status: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Execute with inherited stdio and return the exit code only.
    pub fn status(&self) -> io::Result<i32> {
        let status = self.build_command().status()?;
        Ok(exit_code(status))
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// A child killed by a signal has no code; treat it as a plain failure.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Capability to run external tools.
///
/// The build pipeline only talks to subprocesses through this trait so its
/// merge and compose logic can run against a scripted executor.
pub trait Executor {
    /// Run and capture output.
    fn output(&mut self, cmd: &ProcessBuilder) -> io::Result<ProcessOutput>;

    /// Run with stdout/stderr passed through, returning the exit code.
    fn status(&mut self, cmd: &ProcessBuilder) -> io::Result<i32>;
}

/// Executor backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn output(&mut self, cmd: &ProcessBuilder) -> io::Result<ProcessOutput> {
        tracing::debug!("running `{}`", cmd.display_command());
        cmd.exec()
    }

    fn status(&mut self, cmd: &ProcessBuilder) -> io::Result<i32> {
        tracing::debug!("running `{}`", cmd.display_command());
        cmd.status()
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
