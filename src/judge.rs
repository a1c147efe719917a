pub mod local;
pub mod remote;

pub use local::LocalJudge;
pub use remote::{RemoteError, RemoteJudge};

use std::future::Future;
use std::sync::Arc;

use crate::config::JudgeConfig;
use crate::error::Result;
use crate::language::{AdapterRegistry, Language};
use crate::sandbox::ProcessRunner;
use crate::submission::{ExecutionRequest, ExecutionResult, TestCase};

/// One way of turning a submission into an [`ExecutionResult`]
pub trait JudgeStrategy: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    fn judge(
        &self,
        request: &ExecutionRequest,
    ) -> impl Future<Output = Result<ExecutionResult>> + Send;
}

/// Tries `primary`, and on any error judges the same request with `secondary`
///
/// The primary's error is logged and discarded; callers only ever see the
/// secondary's answer in that case.
pub struct WithFallback<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> WithFallback<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: JudgeStrategy, S: JudgeStrategy> JudgeStrategy for WithFallback<P, S> {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    async fn judge(&self, request: &ExecutionRequest) -> Result<ExecutionResult> {
        match self.primary.judge(request).await {
            Ok(result) => Ok(result),
            Err(e) => {
                log::warn!(
                    "{} judge failed, falling back to {} judge: {e}",
                    self.primary.name(),
                    self.secondary.name()
                );
                self.secondary.judge(request).await
            }
        }
    }
}

/// Entry point used by callers: owns its configuration and never fails
pub enum Judge {
    Local(LocalJudge),
    Remote(WithFallback<RemoteJudge, LocalJudge>),
}

impl Judge {
    pub fn new(config: &JudgeConfig) -> Self {
        Self::with_registry(config, AdapterRegistry::with_defaults())
    }

    /// Builds a judge that runs local submissions through `registry`
    pub fn with_registry(config: &JudgeConfig, registry: AdapterRegistry) -> Self {
        let local = LocalJudge::new(Arc::new(registry), ProcessRunner::new(config.timeout));

        match &config.remote {
            None => Judge::Local(local),
            Some(remote) => match RemoteJudge::new(remote) {
                Ok(remote_judge) => {
                    log::info!("Judge server configured at {}", remote.url);
                    Judge::Remote(WithFallback::new(remote_judge, local))
                }
                Err(e) => {
                    log::warn!("Cannot set up judge server client, judging locally: {e}");
                    Judge::Local(local)
                }
            },
        }
    }

    /// Judges one submission whose language is still an unchecked string
    pub async fn execute_code(
        &self,
        code: &str,
        language: &str,
        test_cases: &[TestCase],
    ) -> ExecutionResult {
        let language = match language.parse::<Language>() {
            Ok(language) => language,
            Err(e) => {
                log::warn!("Rejected submission: {e}");
                return ExecutionResult::failure(test_cases.len(), e.to_string());
            }
        };

        self.execute(&ExecutionRequest {
            code: code.to_string(),
            language,
            test_cases: test_cases.to_vec(),
        })
        .await
    }

    pub async fn execute(&self, request: &ExecutionRequest) -> ExecutionResult {
        let outcome = match self {
            Judge::Local(judge) => judge.judge(request).await,
            Judge::Remote(judge) => judge.judge(request).await,
        };

        outcome.unwrap_or_else(|e| {
            log::error!("Judging failed: {e}");
            ExecutionResult::failure(request.test_cases.len(), e.to_string())
        })
    }
}
