use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use crate::submission::Submission;

pub const JUDGE_SERVER_URL: &str = "JUDGE_SERVER_URL";
pub const JUDGE_SERVER_TOKEN: &str = "JUDGE_SERVER_TOKEN";
pub const CODE_EXECUTION_TIMEOUT: &str = "CODE_EXECUTION_TIMEOUT";

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_JUDGE_SERVER_TOKEN: &str = "change-this-token";

#[derive(Parser)]
#[command(name = "codejudge", version = "1.0", about, long_about = None)]
pub struct CliArgs {
    /// Path to a JSON submission `{code, language, testCases}`; stdin if omitted
    #[arg(long = "request", short = 'r')]
    pub request_path: Option<PathBuf>,

    /// Never contact the remote judge server, even if one is configured
    #[arg(long = "local-only", short = 'l', default_value_t = false)]
    pub local_only: bool,

    /// Per-process wall clock limit in milliseconds, overriding the environment
    #[arg(long = "timeout-ms", short = 't')]
    pub timeout_ms: Option<u64>,

    /// Pretty-print the resulting JSON
    #[arg(long = "pretty", short = 'p', default_value_t = false)]
    pub pretty: bool,
}

impl CliArgs {
    /// Builds the judge configuration: environment first, then CLI overrides
    pub fn to_config(&self) -> JudgeConfig {
        let mut config = JudgeConfig::from_env();
        if let Some(ms) = self.timeout_ms.filter(|ms| *ms > 0) {
            config.timeout = Duration::from_millis(ms);
        }
        if self.local_only {
            config.remote = None;
        }
        config
    }

    /// Loads the submission from the given file, or from stdin
    pub fn read_submission(&self) -> anyhow::Result<Submission> {
        let raw = match &self.request_path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request file {}", path.display()))?,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read request from stdin")?;
                buf
            }
        };
        serde_json::from_str(&raw).context("Failed to parse submission JSON")
    }
}

/// Connection details for an external judge server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub token: String,
}

/// Everything a judge instance needs, owned by that instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeConfig {
    /// Wall clock limit applied to every spawned process
    pub timeout: Duration,
    /// `None` means judging is purely local
    pub remote: Option<RemoteConfig>,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            remote: None,
        }
    }
}

impl JudgeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_ms = match lookup(CODE_EXECUTION_TIMEOUT) {
            None => DEFAULT_TIMEOUT_MS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    log::warn!(
                        "Ignoring invalid {CODE_EXECUTION_TIMEOUT}={raw:?}, using {DEFAULT_TIMEOUT_MS} ms"
                    );
                    DEFAULT_TIMEOUT_MS
                }
            },
        };

        let remote = lookup(JUDGE_SERVER_URL)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .map(|url| RemoteConfig {
                url,
                token: lookup(JUDGE_SERVER_TOKEN)
                    .unwrap_or_else(|| DEFAULT_JUDGE_SERVER_TOKEN.to_string()),
            });

        Self {
            timeout: Duration::from_millis(timeout_ms),
            remote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_with_ten_second_limit() {
        let config = JudgeConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, JudgeConfig::default());
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_all_recognized_variables() {
        let config = JudgeConfig::from_lookup(lookup_from(&[
            (JUDGE_SERVER_URL, "http://judge:12358/"),
            (JUDGE_SERVER_TOKEN, "secret"),
            (CODE_EXECUTION_TIMEOUT, "2500"),
        ]));
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(
            config.remote,
            Some(RemoteConfig {
                url: "http://judge:12358".to_string(),
                token: "secret".to_string(),
            })
        );
    }

    #[test]
    fn token_falls_back_to_default() {
        let config = JudgeConfig::from_lookup(lookup_from(&[(JUDGE_SERVER_URL, "http://judge")]));
        assert_eq!(config.remote.unwrap().token, DEFAULT_JUDGE_SERVER_TOKEN);
    }

    #[test]
    fn invalid_timeout_falls_back() {
        for raw in ["soon", "0", "-5"] {
            let config = JudgeConfig::from_lookup(lookup_from(&[(CODE_EXECUTION_TIMEOUT, raw)]));
            assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        }
    }

    #[test]
    fn blank_url_disables_remote() {
        let config = JudgeConfig::from_lookup(lookup_from(&[(JUDGE_SERVER_URL, "  ")]));
        assert!(config.remote.is_none());
    }

    #[test]
    fn cli_flags_override_environment() {
        let args = CliArgs::parse_from(["codejudge", "--local-only", "--timeout-ms", "750"]);
        let config = args.to_config();
        assert!(config.remote.is_none());
        assert_eq!(config.timeout, Duration::from_millis(750));
    }

    #[test]
    fn reads_submission_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{"code":"def solve(x): return x","language":"py","testCases":[{"input":"1","expected":"1"}]}"#,
        )
        .unwrap();
        let args = CliArgs::parse_from(["codejudge", "--request", path.to_str().unwrap()]);
        let submission = args.read_submission().unwrap();
        assert_eq!(submission.language, "py");
        assert_eq!(submission.test_cases.len(), 1);
    }
}
