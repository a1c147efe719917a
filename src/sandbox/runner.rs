use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{JudgeError, Result};

use super::{Invocation, ProcessOutput};

/// Spawns one process at a time under a wall clock limit
///
/// The runner carries no state besides its limit, so a single instance can be
/// shared by any number of concurrent judging tasks.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Runs the invocation and returns its stdout on a zero exit
    pub async fn run(&self, invocation: &Invocation) -> Result<String> {
        let output = self.execute(invocation).await?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(JudgeError::Runtime(output.failure_message()))
        }
    }

    /// Runs the invocation to completion, whatever its exit status
    ///
    /// Fails only if the process cannot be started or outlives the limit. A
    /// process that hits the limit is killed before this returns.
    pub async fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| JudgeError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        // Feed stdin from its own task so a child that never reads it cannot
        // block us while its output pipes fill up
        if let (Some(mut stdin), Some(data)) = (child.stdin.take(), invocation.stdin.clone()) {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(data.as_bytes()).await {
                    log::debug!("Child closed stdin early: {e}");
                }
                // stdin is dropped here, signalling EOF
            });
        }

        // Dropping the wait future on timeout drops the child, which kills it
        match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ProcessOutput {
                status: output.status,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            Ok(Err(source)) => Err(JudgeError::Spawn {
                program: invocation.program.clone(),
                source,
            }),
            Err(_) => {
                log::warn!(
                    "`{}` killed after exceeding {} ms",
                    invocation.program,
                    self.timeout.as_millis()
                );
                Err(JudgeError::Timeout(self.timeout.as_millis() as u64))
            }
        }
    }
}
