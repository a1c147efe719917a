pub mod config;
pub mod error;
pub mod judge;
pub mod language;
pub mod sandbox;
pub mod submission;

pub use config::JudgeConfig;
pub use error::JudgeError;
pub use judge::{Judge, JudgeStrategy, LocalJudge, RemoteJudge, WithFallback};
pub use language::{AdapterRegistry, Language, LanguageAdapter, RunSpec};
pub use submission::{ExecutionOutcome, ExecutionRequest, ExecutionResult, TestCase};

/// Judges one submission with a judge configured from the environment
///
/// Reads `JUDGE_SERVER_URL`, `JUDGE_SERVER_TOKEN` and
/// `CODE_EXECUTION_TIMEOUT`. Always returns a well-formed result; every
/// failure ends up in its `error` field.
pub async fn execute_code(code: &str, language: &str, test_cases: &[TestCase]) -> ExecutionResult {
    Judge::new(&JudgeConfig::from_env())
        .execute_code(code, language, test_cases)
        .await
}
