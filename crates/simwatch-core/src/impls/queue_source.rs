//! QueueSource - キューシステムからジョブを列挙
//!
//! 一覧コマンドの出力は 1 行 1 ジョブ、`<id>|<作業ディレクトリ>`（または空白区切り）の形式。

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::SourceError;
use crate::ports::{JobEntry, JobSource};

/// Default listing: the caller's Slurm jobs as `<jobid>|<workdir>`.
pub const DEFAULT_PROGRAM: &str = "squeue";
pub const DEFAULT_ARGS: &[&str] = &["--me", "--noheader", "--format=%i|%Z"];

/// QueueSource は外部コマンドを実行してジョブ一覧を得る
#[derive(Debug, Clone)]
pub struct QueueSource {
    program: String,
    args: Vec<String>,
}

impl QueueSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a whitespace-separated command line.
    ///
    /// Returns `None` for an empty command.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts.map(str::to_string).collect()))
    }

    pub fn slurm() -> Self {
        Self::new(
            DEFAULT_PROGRAM,
            DEFAULT_ARGS.iter().map(|a| a.to_string()).collect(),
        )
    }
}

impl Default for QueueSource {
    fn default() -> Self {
        Self::slurm()
    }
}

/// Parse `<id>|<directory>` or `<id> <directory>` lines; anything else is skipped.
pub fn parse_listing(output: &str) -> Vec<JobEntry> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (id, directory) = line.split_once(|c: char| c == '|' || c.is_whitespace())?;
            let pid = id.parse::<u32>().ok()?;
            let directory = directory.trim();
            if directory.is_empty() {
                return None;
            }
            Some(JobEntry::with_process_id(PathBuf::from(directory), pid))
        })
        .collect()
}

#[async_trait]
impl JobSource for QueueSource {
    async fn list(&self) -> Result<Vec<JobEntry>, SourceError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let entries = parse_listing(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(program = %self.program, jobs = entries.len(), "queue listed");
        Ok(entries)
    }
}
