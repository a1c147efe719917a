use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::language::Language;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected: String,
    #[serde(default)]
    pub is_public: bool,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected: expected.into(),
            is_public: true,
        }
    }

    pub fn hidden(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            is_public: false,
            ..Self::new(input, expected)
        }
    }
}

/// One submission as handed to a judging strategy.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub code: String,
    pub language: Language,
    pub test_cases: Vec<TestCase>,
}

/// The raw inbound shape: the language is still an unchecked string.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub code: String,
    pub language: String,
    pub test_cases: Vec<TestCase>,
}

/// Outcome of running a single test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub passed: bool,
    pub raw_output: String,
    pub error: Option<String>,
}

/// What the local judge observed while walking the test cases.
///
/// `outcomes` holds one entry per attempted case; when `error` is set the
/// last outcome is the case that failed and nothing after it was run.
#[derive(Debug, Default)]
pub struct Judgement {
    pub outcomes: Vec<ExecutionOutcome>,
    pub error: Option<String>,
    pub elapsed: Duration,
}

impl Judgement {
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub passed: bool,
    pub passed_count: usize,
    pub total_count: usize,
    /// Milliseconds
    pub runtime: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memory: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Aggregates a local judgement. `total_count` is the size of the
    /// submitted test suite, not the number of cases actually attempted.
    pub fn from_judgement(total_count: usize, judgement: &Judgement) -> Self {
        let passed_count = judgement.passed_count().min(total_count);
        Self {
            passed: judgement.error.is_none() && passed_count == total_count,
            passed_count,
            total_count,
            runtime: judgement.elapsed.as_millis() as u64,
            memory: None,
            error: judgement.error.clone(),
        }
    }

    /// A result for a submission that could not be judged at all.
    pub fn failure(total_count: usize, error: impl Into<String>) -> Self {
        Self {
            passed: false,
            passed_count: 0,
            total_count,
            runtime: 0,
            memory: None,
            error: Some(error.into()),
        }
    }
}
