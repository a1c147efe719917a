use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::language::{AdapterRegistry, RunSpec};
use crate::sandbox::{CompiledProgram, ProcessRunner};
use crate::submission::{ExecutionOutcome, ExecutionRequest, ExecutionResult, Judgement, TestCase};

use super::JudgeStrategy;

/// Judges submissions by running them on this host
///
/// Holds no per-submission state; concurrent calls each get their own
/// processes and, for compiled languages, their own workspace.
#[derive(Clone)]
pub struct LocalJudge {
    registry: Arc<AdapterRegistry>,
    runner: ProcessRunner,
}

impl LocalJudge {
    pub fn new(registry: Arc<AdapterRegistry>, runner: ProcessRunner) -> Self {
        Self { registry, runner }
    }

    /// Runs the test cases in order, stopping at the first execution error
    pub async fn judge_cases(&self, request: &ExecutionRequest) -> Judgement {
        let start = Instant::now();
        let mut judgement = Judgement::default();

        let adapter = match self.registry.get(request.language) {
            Ok(adapter) => adapter,
            Err(e) => {
                judgement.error = Some(e.to_string());
                judgement.elapsed = start.elapsed();
                return judgement;
            }
        };

        // Built on first use, then shared by the remaining cases
        let mut program: Option<CompiledProgram> = None;

        for (idx, case) in request.test_cases.iter().enumerate() {
            let spec = adapter.prepare(&request.code, &case.input);
            match self.run_one(spec, &mut program).await {
                Ok(output) => {
                    let outcome = check_output(case, output);
                    log::debug!(
                        "Test case {} of {}: {}",
                        idx + 1,
                        request.test_cases.len(),
                        if outcome.passed { "passed" } else { "failed" }
                    );
                    judgement.outcomes.push(outcome);
                }
                Err(e) => {
                    let message = e.to_string();
                    log::debug!("Test case {} aborted judging: {message}", idx + 1);
                    judgement.outcomes.push(ExecutionOutcome {
                        passed: false,
                        raw_output: String::new(),
                        error: Some(message.clone()),
                    });
                    judgement.error = Some(message);
                    break;
                }
            }
        }

        judgement.elapsed = start.elapsed();
        judgement
    }

    async fn run_one(&self, spec: RunSpec, program: &mut Option<CompiledProgram>) -> Result<String> {
        match spec {
            RunSpec::Inline(invocation) => self.runner.run(&invocation).await,
            RunSpec::Compiled { unit, stdin } => {
                let built = match program.take() {
                    Some(built) => built,
                    None => CompiledProgram::build(&unit, &self.runner).await?,
                };
                let output = built.run(&stdin, &self.runner).await;
                *program = Some(built);
                output
            }
        }
    }
}

impl JudgeStrategy for LocalJudge {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn judge(&self, request: &ExecutionRequest) -> Result<ExecutionResult> {
        let judgement = self.judge_cases(request).await;
        let result = ExecutionResult::from_judgement(request.test_cases.len(), &judgement);
        log::info!(
            "Local judging of {} submission: {}/{} passed in {} ms{}",
            request.language,
            result.passed_count,
            result.total_count,
            result.runtime,
            result
                .error
                .as_deref()
                .map(|e| format!(" (error: {})", e.lines().next().unwrap_or_default()))
                .unwrap_or_default()
        );
        Ok(result)
    }
}

/// Exact comparison after trimming surrounding whitespace on both sides
fn check_output(case: &TestCase, output: String) -> ExecutionOutcome {
    ExecutionOutcome {
        passed: output.trim() == case.expected.trim(),
        raw_output: output,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comparison_trims_both_sides() {
        let outcome = check_output(&TestCase::new("5", " 5 "), "5\n".to_string());
        assert!(outcome.passed);
        assert_eq!(outcome.raw_output, "5\n");
    }

    #[test]
    fn comparison_is_otherwise_exact() {
        assert!(!check_output(&TestCase::new("", "[0,1]"), "[0, 1]\n".to_string()).passed);
        assert!(!check_output(&TestCase::new("", "True"), "true\n".to_string()).passed);
    }
}
