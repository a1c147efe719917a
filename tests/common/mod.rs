#![allow(dead_code)]

use std::path::Path;

use codejudge::language::{Language, LanguageAdapter, RunSpec};
use codejudge::sandbox::{CompileUnit, Invocation};

/// Runs the submission as a `sh -c` script with the test input in `$1`
///
/// Registered in place of a real language so judging logic can be tested
/// without any interpreter installed.
pub struct ShellAdapter(pub Language);

impl LanguageAdapter for ShellAdapter {
    fn language(&self) -> Language {
        self.0
    }

    fn prepare(&self, code: &str, input: &str) -> RunSpec {
        RunSpec::Inline(Invocation::new(
            "sh",
            ["-c", code, "submission", input].map(String::from),
        ))
    }
}

/// A compiled language whose "compiler" installs a shell script and records
/// every build in `build_log`
pub struct ShellCompiledAdapter {
    pub language: Language,
    pub build_log: String,
}

impl LanguageAdapter for ShellCompiledAdapter {
    fn language(&self) -> Language {
        self.language
    }

    fn prepare(&self, code: &str, input: &str) -> RunSpec {
        let compile = format!(
            "echo built >> {} && cp %INPUT% %OUTPUT% && chmod +x %OUTPUT%",
            self.build_log
        );
        RunSpec::Compiled {
            unit: CompileUnit {
                source_name: "main.sh",
                artifact_name: "main",
                source: format!("#!/bin/sh\n{code}\n"),
                compile_command: vec!["sh".to_string(), "-c".to_string(), compile],
                run_command: vec!["%OUTPUT%".to_string()],
            },
            stdin: input.to_string(),
        }
    }
}

pub fn has_tool(tool: &str) -> bool {
    std::process::Command::new(tool)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn line_count(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}
