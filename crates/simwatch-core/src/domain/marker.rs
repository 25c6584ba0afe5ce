//! Marker - ログ行の分類
//!
//! ログは構造化されていないので、既知の文字列パターンで行を分類する。
//! パターンはすべてここに集約する（散らばった文字列リテラルを避ける）。

use chrono::NaiveTime;

/// Substrings that report a fatal solver error.
const FATAL_SENTINELS: &[&str] = &["FOAM FATAL ERROR", "FOAM FATAL IO ERROR"];

/// Substring written when the job was cancelled from outside.
const CANCEL_SENTINEL: &str = "CANCELLED";

/// Keyword shared by progress lines (`Time = 0.5`) and duration lines
/// (`ExecutionTime = 1.2 s  ClockTime = 2 s`).
const PROGRESS_KEYWORD: &str = "Time = ";

/// Trailing token of a duration line.
const UNIT_SUFFIX: &str = "s";

/// TailMarker は末尾からの走査で意味を持つ行の種類
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TailMarker {
    /// 致命的エラーの報告
    FatalError,
    /// 外部からのキャンセル
    Cancelled,
    /// 進捗行（シミュレーション時刻）
    Progress(f64),
}

impl TailMarker {
    /// Classify one log line.
    ///
    /// Checked in order: fatal error, cancellation, progress. A progress line
    /// whose time token is not a number is malformed and yields `None`.
    pub fn classify(line: &str) -> Option<Self> {
        if FATAL_SENTINELS.iter().any(|s| line.contains(s)) {
            return Some(TailMarker::FatalError);
        }
        if line.contains(CANCEL_SENTINEL) {
            return Some(TailMarker::Cancelled);
        }
        if line.contains(PROGRESS_KEYWORD) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.last() == Some(&UNIT_SUFFIX) {
                return None;
            }
            return tokens
                .get(2)
                .and_then(|t| t.parse::<f64>().ok())
                .filter(|t| t.is_finite())
                .map(TailMarker::Progress);
        }
        None
    }
}

/// HeaderMarker はログ先頭のヘッダーブロックの行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMarker {
    /// `Date   : Jan 01 2024`
    Date,
    /// `Time   : 00:00:05`
    TimeOfDay,
    /// `PID    : 12345`
    ProcessId,
}

impl HeaderMarker {
    /// Priority order used when a line is checked.
    pub const ALL: [HeaderMarker; 3] = [
        HeaderMarker::Date,
        HeaderMarker::TimeOfDay,
        HeaderMarker::ProcessId,
    ];

    pub fn key(self) -> &'static str {
        match self {
            HeaderMarker::Date => "Date",
            HeaderMarker::TimeOfDay => "Time",
            HeaderMarker::ProcessId => "PID",
        }
    }

    /// Return the value of this marker on `line`, if the line carries it.
    pub fn value(self, line: &str) -> Option<&str> {
        let rest = line.trim_start().strip_prefix(self.key())?;
        let rest = rest.trim_start();
        let value = rest
            .strip_prefix(':')
            .or_else(|| rest.strip_prefix('='))?
            .trim();
        if value.is_empty() {
            return None;
        }
        match self {
            // progress lines share the key; only a clock value counts here
            HeaderMarker::TimeOfDay => NaiveTime::parse_from_str(value, "%H:%M:%S")
                .ok()
                .map(|_| value),
            HeaderMarker::ProcessId => value.split_whitespace().last(),
            HeaderMarker::Date => Some(value),
        }
    }

    /// First marker (in priority order) found on `line`.
    pub fn find(line: &str) -> Option<(HeaderMarker, &str)> {
        Self::ALL
            .iter()
            .find_map(|m| m.value(line).map(|v| (*m, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::fatal("--> FOAM FATAL ERROR: ", Some(TailMarker::FatalError))]
    #[case::fatal_io("--> FOAM FATAL IO ERROR: ", Some(TailMarker::FatalError))]
    #[case::cancelled("CANCELLED", Some(TailMarker::Cancelled))]
    #[case::slurm_cancel(
        "slurmstepd: error: *** JOB 42 ON node01 CANCELLED AT 2024-01-01T00:00:00 ***",
        Some(TailMarker::Cancelled)
    )]
    #[case::progress("Time = 50", Some(TailMarker::Progress(50.0)))]
    #[case::progress_fraction("Time = 0.0125", Some(TailMarker::Progress(0.0125)))]
    #[case::duration("ExecutionTime = 1.25 s  ClockTime = 2 s", None)]
    #[case::header_clock("Time = 00:00:05", None)]
    #[case::too_short("Time = ", None)]
    #[case::unrelated("Courant Number mean: 0.1 max: 0.5", None)]
    fn classifies_tail_lines(#[case] line: &str, #[case] expected: Option<TailMarker>) {
        assert_eq!(TailMarker::classify(line), expected);
    }

    #[test]
    fn fatal_error_wins_over_progress_on_same_line() {
        let line = "Time = 3 FOAM FATAL ERROR";
        assert_eq!(TailMarker::classify(line), Some(TailMarker::FatalError));
    }

    #[rstest]
    #[case::date("Date   : Jan 01 2024", Some((HeaderMarker::Date, "Jan 01 2024")))]
    #[case::time("Time   : 00:00:05", Some((HeaderMarker::TimeOfDay, "00:00:05")))]
    #[case::time_eq("Time = 00:00:05", Some((HeaderMarker::TimeOfDay, "00:00:05")))]
    #[case::pid("PID    : 12345", Some((HeaderMarker::ProcessId, "12345")))]
    #[case::progress_is_not_header("Time = 50", None)]
    #[case::empty_value("Date   :", None)]
    #[case::other("Host   : node01", None)]
    fn finds_header_markers(#[case] line: &str, #[case] expected: Option<(HeaderMarker, &str)>) {
        assert_eq!(HeaderMarker::find(line), expected);
    }
}
