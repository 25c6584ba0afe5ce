//! Report - 表形式の出力
//!
//! 利用可能なジョブだけを 1 行ずつ描画する。

use std::fmt::Write;

use crate::domain::{Job, JobView};

/// Rightmost characters of the directory shown in the table.
pub const DIRECTORY_WIDTH: usize = 36;

/// Keep the last `width` characters of `s`.
fn rightmost(s: &str, width: usize) -> &str {
    let count = s.chars().count();
    if count <= width {
        return s;
    }
    let skip = count - width;
    let (idx, _) = s.char_indices().nth(skip).unwrap_or((0, ' '));
    &s[idx..]
}

fn format_time(t: Option<f64>) -> String {
    t.map(|t| format!("{t}")).unwrap_or_else(|| "-".into())
}

fn format_percent(p: Option<u8>) -> String {
    p.map(|p| format!("{p}%")).unwrap_or_else(|| "-".into())
}

/// Fixed-width table of all available jobs, with a header row.
pub fn render_table(jobs: &[Job]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>10}  {:<width$}  {:>12}  {:>5}  {:<2}  {}",
        "PID",
        "DIRECTORY",
        "TIME",
        "%",
        "ST",
        "ETA",
        width = DIRECTORY_WIDTH
    );
    for job in jobs {
        let Some(report) = job.report() else {
            continue;
        };
        let pid = job
            .process_id()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".into());
        let dir = job.directory().display().to_string();
        let line = format!(
            "{:>10}  {:<width$}  {:>12}  {:>5}  {:<2}  {}",
            pid,
            rightmost(&dir, DIRECTORY_WIDTH),
            format_time(job.current_time()),
            format_percent(job.percent_complete()),
            report.state.code(),
            job.eta(),
            width = DIRECTORY_WIDTH
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

/// JSON array of all available jobs.
pub fn render_json(jobs: &[Job]) -> serde_json::Result<String> {
    let views: Vec<JobView> = jobs.iter().filter_map(Job::view).collect();
    serde_json::to_string_pretty(&views)
}
