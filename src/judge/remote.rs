//! Client for an external JudgeServer-compatible judging service.
//!
//! The server runs a standalone program per test case with the case input on
//! stdin, so submissions are sent wrapped in the stdin-driven harness of
//! their language rather than as bare user code.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::RemoteConfig;
use crate::error::{JudgeError, Result};
use crate::language::{CAdapter, CppAdapter, JavaAdapter, Language, PythonAdapter};
use crate::submission::{ExecutionRequest, ExecutionResult};

use super::JudgeStrategy;

pub const TOKEN_HEADER: &str = "X-Judge-Server-Token";

const MAX_CPU_TIME_MS: u64 = 1000;
const MAX_MEMORY_BYTES: u64 = 128 * 1024 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request to judge server failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("judge server responded with HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("judge server rejected the submission: {0}")]
    Rejected(String),

    #[error("unexpected judge server response: {0}")]
    Malformed(String),
}

/// Per-case result code reported by the judge server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteVerdict {
    WrongAnswer,
    Accepted,
    CpuTimeLimitExceeded,
    RealTimeLimitExceeded,
    MemoryLimitExceeded,
    RuntimeError,
    SystemError,
    Unknown(i32),
}

impl From<i32> for RemoteVerdict {
    fn from(code: i32) -> Self {
        match code {
            -1 => RemoteVerdict::WrongAnswer,
            0 => RemoteVerdict::Accepted,
            1 => RemoteVerdict::CpuTimeLimitExceeded,
            2 => RemoteVerdict::RealTimeLimitExceeded,
            3 => RemoteVerdict::MemoryLimitExceeded,
            4 => RemoteVerdict::RuntimeError,
            5 => RemoteVerdict::SystemError,
            other => RemoteVerdict::Unknown(other),
        }
    }
}

impl fmt::Display for RemoteVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteVerdict::WrongAnswer => f.write_str("Wrong Answer"),
            RemoteVerdict::Accepted => f.write_str("Accepted"),
            RemoteVerdict::CpuTimeLimitExceeded => f.write_str("CPU Time Limit Exceeded"),
            RemoteVerdict::RealTimeLimitExceeded => f.write_str("Real Time Limit Exceeded"),
            RemoteVerdict::MemoryLimitExceeded => f.write_str("Memory Limit Exceeded"),
            RemoteVerdict::RuntimeError => f.write_str("Runtime Error"),
            RemoteVerdict::SystemError => f.write_str("System Error"),
            RemoteVerdict::Unknown(code) => write!(f, "Unknown result code {code}"),
        }
    }
}

#[derive(Serialize, Debug)]
struct RemoteTestCase<'a> {
    input: &'a str,
    output: &'a str,
}

#[derive(Serialize, Debug)]
struct JudgePayload<'a> {
    src: String,
    language_config: Value,
    max_cpu_time: u64,
    max_memory: u64,
    test_case_id: Option<String>,
    test_case: Vec<RemoteTestCase<'a>>,
    action: &'static str,
}

#[derive(Deserialize, Debug)]
struct JudgeResponse {
    err: Option<String>,
    #[serde(default)]
    data: Value,
}

/// One entry of the `data` array in a successful response
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RemoteCaseResult {
    pub cpu_time: u64,
    pub real_time: u64,
    pub memory: u64,
    pub signal: i64,
    pub exit_code: i64,
    pub error: i64,
    pub result: i32,
    pub output: Option<String>,
}

impl RemoteCaseResult {
    pub fn verdict(&self) -> RemoteVerdict {
        RemoteVerdict::from(self.result)
    }
}

/// Delegates judging to a remote server over HTTP
pub struct RemoteJudge {
    client: reqwest::Client,
    base_url: String,
    token_digest: String,
}

impl RemoteJudge {
    pub fn new(config: &RemoteConfig) -> std::result::Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token_digest: token_digest(&config.token),
        })
    }

    async fn submit(
        &self,
        payload: &JudgePayload<'_>,
    ) -> std::result::Result<Vec<RemoteCaseResult>, RemoteError> {
        let response = self
            .client
            .post(format!("{}/judge", self.base_url))
            .header(TOKEN_HEADER, &self.token_digest)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body: JudgeResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        if let Some(err) = body.err {
            let detail = match &body.data {
                Value::String(s) => format!("{err}: {s}"),
                Value::Null => err,
                other => format!("{err}: {other}"),
            };
            return Err(RemoteError::Rejected(detail));
        }

        serde_json::from_value(body.data).map_err(|e| RemoteError::Malformed(e.to_string()))
    }
}

impl JudgeStrategy for RemoteJudge {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn judge(&self, request: &ExecutionRequest) -> Result<ExecutionResult> {
        // Fails before any network traffic for unconfigured languages
        let (language_config, src) = remote_program(request.language, &request.code)?;

        let payload = JudgePayload {
            src,
            language_config,
            max_cpu_time: MAX_CPU_TIME_MS,
            max_memory: MAX_MEMORY_BYTES,
            test_case_id: None,
            test_case: request
                .test_cases
                .iter()
                .map(|tc| RemoteTestCase {
                    input: &tc.input,
                    output: &tc.expected,
                })
                .collect(),
            action: "run_test_case",
        };

        log::debug!(
            "Submitting {} test cases to judge server at {}",
            request.test_cases.len(),
            self.base_url
        );
        let results = self.submit(&payload).await?;
        let result = aggregate(request.test_cases.len(), &results);
        log::info!(
            "Remote judging of {} submission: {}/{} passed, cpu time {} ms",
            request.language,
            result.passed_count,
            result.total_count,
            result.runtime
        );
        Ok(result)
    }
}

/// Folds per-case results into one aggregate for a suite of `total` cases
pub fn aggregate(total: usize, results: &[RemoteCaseResult]) -> ExecutionResult {
    let passed_count = results
        .iter()
        .filter(|r| r.verdict() == RemoteVerdict::Accepted)
        .count()
        .min(total);

    // Wrong answers are ordinary failures; everything else is worth reporting
    let error = results.iter().enumerate().find_map(|(idx, r)| {
        match r.verdict() {
            RemoteVerdict::Accepted | RemoteVerdict::WrongAnswer => None,
            verdict => Some(format!("{verdict} on test case {}", idx + 1)),
        }
    });

    ExecutionResult {
        passed: error.is_none() && passed_count == total,
        passed_count,
        total_count: total,
        runtime: results.iter().map(|r| r.cpu_time).sum(),
        memory: results.iter().map(|r| r.memory).max(),
        error,
    }
}

/// Hex encoded SHA-256 of the shared secret, as sent in [`TOKEN_HEADER`]
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

const DEFAULT_ENV: [&str; 3] = ["LANG=en_US.UTF-8", "LANGUAGE=en_US:en", "LC_ALL=en_US.UTF-8"];

/// The server-side language configuration and the program source to submit
fn remote_program(language: Language, code: &str) -> Result<(Value, String)> {
    match language {
        Language::C => Ok((
            json!({
                "compile": {
                    "src_name": "main.c",
                    "exe_name": "main",
                    "max_cpu_time": 3000,
                    "max_real_time": 5000,
                    "max_memory": 128 * 1024 * 1024,
                    "compile_command": "/usr/bin/gcc -DONLINE_JUDGE -O2 -w -fmax-errors=3 -std=c99 {src_path} -lm -o {exe_path}",
                },
                "run": {
                    "command": "{exe_path}",
                    "seccomp_rule": "c_cpp",
                    "env": DEFAULT_ENV,
                }
            }),
            CAdapter::source(code),
        )),
        Language::Cpp => Ok((
            json!({
                "compile": {
                    "src_name": "main.cpp",
                    "exe_name": "main",
                    "max_cpu_time": 3000,
                    "max_real_time": 5000,
                    "max_memory": 128 * 1024 * 1024,
                    "compile_command": "/usr/bin/g++ -DONLINE_JUDGE -O2 -w -fmax-errors=3 -std=c++17 {src_path} -lm -o {exe_path}",
                },
                "run": {
                    "command": "{exe_path}",
                    "seccomp_rule": "c_cpp",
                    "env": DEFAULT_ENV,
                }
            }),
            CppAdapter::source(code),
        )),
        Language::Java => Ok((
            json!({
                "compile": {
                    "src_name": "Main.java",
                    "exe_name": "Main",
                    "max_cpu_time": 3000,
                    "max_real_time": 5000,
                    "max_memory": -1,
                    "compile_command": "/usr/bin/javac {src_path} -d {exe_dir} -encoding UTF8",
                },
                "run": {
                    "command": "/usr/bin/java -cp {exe_dir} -XX:MaxRAM={max_memory}k -Dfile.encoding=UTF-8 -Djava.awt.headless=true Main",
                    "seccomp_rule": null,
                    "env": DEFAULT_ENV,
                    "memory_limit_check_only": 1,
                }
            }),
            JavaAdapter::source(code),
        )),
        Language::Python => Ok((
            json!({
                "run": {
                    "command": "/usr/bin/python3 {src_path}",
                    "seccomp_rule": "general",
                    "env": [DEFAULT_ENV[0], DEFAULT_ENV[1], DEFAULT_ENV[2], "PYTHONIOENCODING=utf-8"],
                }
            }),
            PythonAdapter::stdin_script(code),
        )),
        Language::JavaScript => Err(JudgeError::UnsupportedLanguage(format!(
            "{language} (no judge server configuration)"
        ))),
    }
}
