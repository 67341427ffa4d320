//! Test utilities and mocks for kiln unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use kiln::test_support::{MockExecutor, MockProcessOutput};
//!
//! let mut exec = MockExecutor::new();
//! exec.expect_contains("sdl-config --cflags", MockProcessOutput::success("-I/sdl"));
//! exec.set_default(MockProcessOutput::success(""));
//! ```

pub mod fixtures;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use fixtures::*;

use crate::util::process::{Executor, ProcessBuilder, ProcessOutput};

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(mock: MockProcessOutput) -> Self {
        ProcessOutput {
            status: mock.status,
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::Contains(s) => cmd.contains(s.as_str()),
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    pub pattern: CommandPattern,
    pub output: MockProcessOutput,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    pub used: usize,
}

impl CommandExpectation {
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            times: None,
            used: 0,
        }
    }

    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

/// Files present in a watched directory when a command ran.
pub type DirSnapshot = BTreeMap<String, Vec<u8>>;

/// Scripted [`Executor`].
///
/// Records every command line it is asked to run. Commands with no matching
/// expectation and no default fail as if the program could not be spawned.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    default_output: Option<MockProcessOutput>,
    watched: Option<PathBuf>,
    snapshots: Vec<DirSnapshot>,
}

impl MockExecutor {
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// An executor where every command succeeds with empty output.
    pub fn succeeding() -> Self {
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(""));
        exec
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&mut self, substring: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ))
    }

    pub fn expect_pattern(&mut self, expectation: CommandExpectation) -> &mut Self {
        self.expectations.push(expectation);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    /// Snapshot the contents of `dir` every time a command runs.
    pub fn watch_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.watched = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Calls whose command line contains `needle`.
    pub fn calls_containing(&self, needle: &str) -> Vec<&str> {
        self.calls
            .iter()
            .filter(|c| c.contains(needle))
            .map(String::as_str)
            .collect()
    }

    /// One snapshot per recorded call, if a directory is watched.
    pub fn snapshots(&self) -> &[DirSnapshot] {
        &self.snapshots
    }

    fn run(&mut self, cmd: &ProcessBuilder) -> io::Result<MockProcessOutput> {
        let full_cmd = cmd.display_command();
        self.calls.push(full_cmd.clone());

        if let Some(ref dir) = self.watched {
            self.snapshots.push(snapshot(dir));
        }

        for exp in &mut self.expectations {
            if exp.pattern.matches(&full_cmd) && exp.available() {
                exp.used += 1;
                return Ok(exp.output.clone());
            }
        }

        if let Some(ref default) = self.default_output {
            return Ok(default.clone());
        }

        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("unexpected command: {}", full_cmd),
        ))
    }
}

impl Executor for MockExecutor {
    fn output(&mut self, cmd: &ProcessBuilder) -> io::Result<ProcessOutput> {
        self.run(cmd).map(Into::into)
    }

    fn status(&mut self, cmd: &ProcessBuilder) -> io::Result<i32> {
        self.run(cmd).map(|out| out.status)
    }
}

fn snapshot(dir: &Path) -> DirSnapshot {
    let mut files = DirSnapshot::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            if let Ok(bytes) = fs::read(entry.path()) {
                files.insert(entry.file_name().to_string_lossy().into_owned(), bytes);
            }
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_expectations() {
        let mut exec = MockExecutor::new();
        exec.expect("tool --version", MockProcessOutput::success("1.0"));
        exec.expect_pattern(
            CommandExpectation::new(
                CommandPattern::Contains("build".to_string()),
                MockProcessOutput::failure(2, "boom"),
            )
            .times(1),
        );

        let out = exec
            .output(&ProcessBuilder::new("tool").arg("--version"))
            .unwrap();
        assert_eq!(out.stdout, "1.0");

        let status = exec.status(&ProcessBuilder::new("tool").arg("build")).unwrap();
        assert_eq!(status, 2);

        // The `times(1)` expectation is used up.
        assert!(exec.status(&ProcessBuilder::new("tool").arg("build")).is_err());
        assert_eq!(exec.calls().len(), 3);
    }

    #[test]
    fn test_mock_executor_default() {
        let mut exec = MockExecutor::succeeding();
        assert_eq!(exec.status(&ProcessBuilder::new("anything")).unwrap(), 0);
        assert_eq!(exec.calls_containing("any"), vec!["anything"]);
    }
}
