//! Errors - エラー型と分類
//!
//! どのエラーもジョブ境界で「unavailable」に変換され、ポーリングは止まらない。

use std::path::PathBuf;

use thiserror::Error;

/// StatusError は 1 回の update で起こりうる失敗
#[derive(Debug, Error)]
pub enum StatusError {
    /// The control file does not exist (yet).
    #[error("control file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// The control file exists but `endTime` / `application` are not both usable.
    #[error("control file incomplete: {}", path.display())]
    ConfigIncomplete { path: PathBuf },

    /// The solver log is missing or unreadable.
    #[error("log unavailable: {}: {source}", path.display())]
    LogUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StatusError {
    /// Configuration problems mean the job is simply not ready yet.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            StatusError::ConfigNotFound { .. } | StatusError::ConfigIncomplete { .. }
        )
    }
}

/// SourceError はジョブ列挙（外部コマンド）の失敗
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}
