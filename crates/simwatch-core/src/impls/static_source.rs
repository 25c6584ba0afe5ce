//! StaticSource - 固定のディレクトリ一覧

use async_trait::async_trait;

use crate::domain::SourceError;
use crate::ports::{JobEntry, JobSource};

/// StaticSource は起動時に与えられたジョブをそのまま返す
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<JobEntry>,
}

impl StaticSource {
    pub fn new(entries: Vec<JobEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl JobSource for StaticSource {
    async fn list(&self) -> Result<Vec<JobEntry>, SourceError> {
        Ok(self.entries.clone())
    }
}
