use std::collections::HashMap;
use std::path::Path;

use crate::error::{JudgeError, Result};

use super::{Invocation, ProcessRunner, Workspace};

/// Source text plus the recipe to build and launch it
///
/// Command templates may reference `%INPUT%` (source path), `%OUTPUT%`
/// (artifact path) and `%DIR%` (workspace directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileUnit {
    pub source_name: &'static str,
    pub artifact_name: &'static str,
    pub source: String,
    pub compile_command: Vec<String>,
    pub run_command: Vec<String>,
}

/// A successfully built submission, ready to be run once per test case
///
/// Owns the workspace holding the artifact; dropping the program removes it.
#[derive(Debug)]
pub struct CompiledProgram {
    workspace: Workspace,
    run: Invocation,
}

impl CompiledProgram {
    /// Writes the source into a fresh workspace and compiles it
    pub async fn build(unit: &CompileUnit, runner: &ProcessRunner) -> Result<Self> {
        let workspace = Workspace::acquire()?;
        let source_path = workspace.write_file(unit.source_name, &unit.source)?;
        let artifact_path = workspace.path().join(unit.artifact_name);
        let mapping = template_mapping(&source_path, &artifact_path, workspace.path());

        let compile = command_from_template(&unit.compile_command, &mapping)?
            .in_dir(workspace.path());
        log::debug!("Compiling {} with `{}`", unit.source_name, compile.program);

        // `workspace` is dropped on every early return below
        let output = match runner.execute(&compile).await {
            Ok(output) => output,
            Err(JudgeError::Timeout(ms)) => {
                return Err(JudgeError::Compilation(format!(
                    "Compiler did not finish within {ms} ms"
                )));
            }
            Err(e) => return Err(e),
        };

        if !output.status.success() {
            let diagnostics = if output.stderr.trim().is_empty() && !output.stdout.trim().is_empty()
            {
                output.stdout.clone()
            } else {
                output.failure_message()
            };
            return Err(JudgeError::Compilation(diagnostics));
        }

        let run = command_from_template(&unit.run_command, &mapping)?.in_dir(workspace.path());
        log::debug!("Compiled {} in {}", unit.source_name, workspace.path().display());

        Ok(Self { workspace, run })
    }

    /// Runs the artifact once with `stdin` as its input
    pub async fn run(&self, stdin: &str, runner: &ProcessRunner) -> Result<String> {
        runner.run(&self.run.clone().with_stdin(stdin)).await
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }
}

fn template_mapping(source: &Path, artifact: &Path, dir: &Path) -> HashMap<&'static str, String> {
    let mut mapping = HashMap::new();
    mapping.insert("%INPUT%", source.to_string_lossy().into_owned());
    mapping.insert("%OUTPUT%", artifact.to_string_lossy().into_owned());
    mapping.insert("%DIR%", dir.to_string_lossy().into_owned());
    mapping
}

fn command_from_template(
    template: &[String],
    mapping: &HashMap<&'static str, String>,
) -> Result<Invocation> {
    let mut parts = apply_template(template, mapping).into_iter();
    let program = parts
        .next()
        .ok_or_else(|| JudgeError::Compilation("Empty command template".to_string()))?;
    Ok(Invocation::new(program, parts))
}

/// Applies placeholder substitutions to every argument of a command template
pub fn apply_template<V: AsRef<str>>(
    cmd_template: &[String],
    mapping: &HashMap<&str, V>,
) -> Vec<String> {
    cmd_template
        .iter()
        .map(|s| {
            let mut t = s.clone();
            for (k, v) in mapping.iter() {
                t = t.replace(k, v.as_ref());
            }
            t
        })
        .collect()
}
