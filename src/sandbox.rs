mod compile;
mod runner;
mod workspace;

pub use compile::{CompileUnit, CompiledProgram, apply_template};
pub use runner::ProcessRunner;
pub use workspace::Workspace;

use std::path::PathBuf;
use std::process::ExitStatus;

/// A fully resolved command line, ready to be spawned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Data written to the child's stdin. `None` leaves stdin closed.
    pub stdin: Option<String>,
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            stdin: None,
            working_dir: None,
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Everything captured from a process that ran to completion
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Human readable reason for a non-zero exit
    pub fn failure_message(&self) -> String {
        use std::os::unix::process::ExitStatusExt;

        if !self.stderr.trim().is_empty() {
            return self.stderr.clone();
        }
        match (self.status.code(), self.status.signal()) {
            (Some(code), _) => format!("Process exited with code {code}"),
            (None, Some(signal)) => format!("Process terminated by signal {signal}"),
            (None, None) => "Process exited abnormally".to_string(),
        }
    }
}
