//! JobSource port - 監視対象ジョブの列挙
//!
//! # 実装
//! - **StaticSource**: コマンドライン引数のディレクトリ
//! - **QueueSource**: キューシステムの一覧コマンド（squeue など）

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::SourceError;

/// One job to monitor: its case directory and, if known, its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEntry {
    pub directory: PathBuf,
    pub process_id: Option<u32>,
}

impl JobEntry {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            process_id: None,
        }
    }

    pub fn with_process_id(directory: impl Into<PathBuf>, pid: u32) -> Self {
        Self {
            directory: directory.into(),
            process_id: Some(pid),
        }
    }
}

/// JobSource は各ポーリング周期で監視対象を返す
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn list(&self) -> Result<Vec<JobEntry>, SourceError>;
}
