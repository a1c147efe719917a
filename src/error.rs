use thiserror::Error;

use crate::judge::remote::RemoteError;

/// Everything that can stop a submission from being judged.
///
/// None of these escape [`crate::Judge::execute_code`]: they are folded into
/// the `error` field of a failing [`crate::ExecutionResult`].
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Message is the process stderr, or a generic exit description.
    #[error("{0}")]
    Runtime(String),

    #[error("Time limit exceeded: process ran longer than {0} ms")]
    Timeout(u64),

    #[error("Compilation failed:\n{0}")]
    Compilation(String),

    #[error("Workspace error: {0}")]
    Workspace(#[from] std::io::Error),

    #[error("Remote judge error: {0}")]
    Remote(#[from] RemoteError),
}

pub type Result<T> = std::result::Result<T, JudgeError>;
