//! State - ジョブのライフサイクル状態
//!
//! ログの末尾から推定される離散状態。

use serde::{Deserialize, Serialize};

/// JobState はログから推定したジョブの状態
///
/// # 状態遷移
/// - Unknown: ログは読めるが、マーカーがまだ見つからない
/// - Running: 進捗行が最新で、終了時刻に未到達
/// - Completed: 進捗行の時刻が endTime と一致
/// - Failed: 致命的エラーのマーカーが最新
/// - Cancelled: キャンセルのマーカーが最新
///
/// Every poll rebuilds the state from the log, so any state may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Running,
    Completed,
    Failed,
    Cancelled,
    Unknown,
}

impl JobState {
    /// Is this a terminal state (the solver will not write further progress)?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Cancelled
        )
    }

    /// Short code used in the status table.
    pub fn code(self) -> &'static str {
        match self {
            JobState::Running => "R",
            JobState::Completed => "CD",
            JobState::Failed => "F",
            JobState::Cancelled => "CA",
            JobState::Unknown => "UN",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobState::Running => "RUNNING",
            JobState::Completed => "COMPLETED",
            JobState::Failed => "FAILED",
            JobState::Cancelled => "CANCELLED",
            JobState::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
