//! ETA - 残り時間の推定と表示

use chrono::{DateTime, Utc};

/// Estimated remaining wall-clock time of a running job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Eta {
    remaining_secs: i64,
}

impl Eta {
    pub fn from_secs(remaining_secs: i64) -> Self {
        Self {
            remaining_secs: remaining_secs.max(0),
        }
    }

    /// Extrapolate linearly from the progress made since `start`.
    ///
    /// `total = elapsed / current_time * end_time`, `remaining = total - elapsed`.
    /// Returns `None` while no simulated time has passed yet.
    pub fn estimate(
        start: DateTime<Utc>,
        now: DateTime<Utc>,
        current_time: f64,
        end_time: f64,
    ) -> Option<Self> {
        if current_time <= 0.0 || !current_time.is_finite() {
            return None;
        }
        let elapsed = (now - start).num_milliseconds() as f64 / 1000.0;
        let total = elapsed / current_time * end_time;
        let remaining = total - elapsed;
        if !remaining.is_finite() {
            return None;
        }
        Some(Self::from_secs(remaining.trunc() as i64))
    }

    pub fn remaining_secs(&self) -> i64 {
        self.remaining_secs
    }
}

impl std::fmt::Display for Eta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rest = self.remaining_secs;
        let days = rest / 86_400;
        rest %= 86_400;
        let hours = rest / 3_600;
        rest %= 3_600;
        let minutes = rest / 60;
        let seconds = rest % 60;
        let unit = if days == 1 { "day" } else { "days" };
        write!(f, "{days} {unit} {hours:02}:{minutes:02}:{seconds:02}")
    }
}
