//! Job record and status snapshot.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::control::ControlSettings;
use crate::log::LogHeader;

use super::eta::Eta;
use super::state::JobState;

/// Simulated time reached and the derived completion percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub current_time: f64,
    pub percent_complete: u8,
}

impl Progress {
    /// `round(current / end * 100)`, clamped to 0..=100. Halves go to the even integer.
    pub fn new(current_time: f64, end_time: f64) -> Self {
        let percent = (current_time / end_time * 100.0)
            .round_ties_even()
            .clamp(0.0, 100.0);
        Self {
            current_time,
            percent_complete: percent as u8,
        }
    }
}

/// Result of one successful status read.
///
/// Invariant: `eta` is only ever set when `state == Running`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub state: JobState,
    pub progress: Option<Progress>,
    pub eta: Option<Eta>,
}

impl StatusReport {
    pub fn running(progress: Progress, eta: Option<Eta>) -> Self {
        Self {
            state: JobState::Running,
            progress: Some(progress),
            eta,
        }
    }

    pub fn completed(progress: Progress) -> Self {
        Self {
            state: JobState::Completed,
            progress: Some(progress),
            eta: None,
        }
    }

    pub fn without_progress(state: JobState) -> Self {
        Self {
            state,
            progress: None,
            eta: None,
        }
    }
}

/// Per-poll status, rebuilt from scratch on every update.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum JobStatus {
    /// Control file or log missing; the job is not shown.
    #[default]
    Unavailable,
    Available(StatusReport),
}

/// Job: one monitored case directory.
///
/// Design:
/// - `settings` and `header` are "known-once": filled lazily, then cached.
/// - `status` is recomputed on every poll (see `StatusEngine::update`).
#[derive(Debug, Clone)]
pub struct Job {
    directory: PathBuf,

    /// Process id supplied by whoever enumerated the job (queue listing).
    assigned_pid: Option<u32>,

    pub(crate) settings: Option<ControlSettings>,
    pub(crate) header: LogHeader,
    pub(crate) status: JobStatus,
}

impl Job {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            assigned_pid: None,
            settings: None,
            header: LogHeader::default(),
            status: JobStatus::Unavailable,
        }
    }

    pub fn with_process_id(directory: impl Into<PathBuf>, pid: u32) -> Self {
        let mut job = Self::new(directory);
        job.assigned_pid = Some(pid);
        job
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn process_id(&self) -> Option<u32> {
        self.assigned_pid.or(self.header.process_id)
    }

    pub(crate) fn assigned_process_id(&self) -> Option<u32> {
        self.assigned_pid
    }

    pub fn settings(&self) -> Option<&ControlSettings> {
        self.settings.as_ref()
    }

    pub fn end_time(&self) -> Option<f64> {
        self.settings.as_ref().map(|s| s.end_time)
    }

    pub fn application(&self) -> Option<&str> {
        self.settings.as_ref().map(|s| s.application.as_str())
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.settings.as_ref().map(|s| s.log_path(&self.directory))
    }

    pub fn start_timestamp(&self) -> Option<DateTime<Utc>> {
        self.header.start
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    pub fn report(&self) -> Option<&StatusReport> {
        match &self.status {
            JobStatus::Available(report) => Some(report),
            JobStatus::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.report().is_some()
    }

    pub fn state(&self) -> Option<JobState> {
        self.report().map(|r| r.state)
    }

    pub fn current_time(&self) -> Option<f64> {
        self.report().and_then(|r| r.progress).map(|p| p.current_time)
    }

    pub fn percent_complete(&self) -> Option<u8> {
        self.report()
            .and_then(|r| r.progress)
            .map(|p| p.percent_complete)
    }

    /// Formatted ETA; empty unless the job is running with a known start.
    pub fn eta(&self) -> String {
        self.report()
            .and_then(|r| r.eta)
            .map(|eta| eta.to_string())
            .unwrap_or_default()
    }

    /// Drop everything learned from the log and mark the job unavailable.
    ///
    /// The control settings and a queue-assigned pid are kept.
    pub(crate) fn mark_unavailable(&mut self) {
        self.header = LogHeader::default();
        self.status = JobStatus::Unavailable;
    }

    pub fn view(&self) -> Option<JobView> {
        let report = self.report()?;
        Some(JobView {
            directory: self.directory.display().to_string(),
            process_id: self.process_id(),
            state: report.state,
            current_time: report.progress.map(|p| p.current_time),
            percent_complete: report.progress.map(|p| p.percent_complete),
            end_time: self.end_time(),
            eta: self.eta(),
            eta_secs: report.eta.map(|e| e.remaining_secs()),
            started_at: self.header.start,
        })
    }
}

/// Serializable view of an available job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobView {
    pub directory: String,
    pub process_id: Option<u32>,
    pub state: JobState,
    pub current_time: Option<f64>,
    pub percent_complete: Option<u8>,
    pub end_time: Option<f64>,
    pub eta: String,
    pub eta_secs: Option<i64>,
    pub started_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_job_is_unavailable() {
        let job = Job::new("/scratch/case1");
        assert!(!job.is_available());
        assert_eq!(job.state(), None);
        assert_eq!(job.eta(), "");
        assert!(job.view().is_none());
    }

    #[test]
    fn assigned_pid_is_reported() {
        let job = Job::with_process_id("/scratch/case1", 77);
        assert_eq!(job.process_id(), Some(77));
    }

    #[rstest]
    #[case::half(50.0, 100.0, 50)]
    #[case::half_to_even_down(0.125, 1.0, 12)]
    #[case::half_to_even_up(0.375, 1.0, 38)]
    #[case::rounds_up(2.0, 3.0, 67)]
    #[case::rounds_down(1.0, 3.0, 33)]
    #[case::done(100.0, 100.0, 100)]
    #[case::overshoot(120.0, 100.0, 100)]
    fn percent_complete(#[case] current: f64, #[case] end: f64, #[case] expected: u8) {
        assert_eq!(Progress::new(current, end).percent_complete, expected);
    }

    #[test]
    fn mark_unavailable_keeps_assigned_pid() {
        let mut job = Job::with_process_id("/scratch/case1", 77);
        job.header.process_id = Some(1234);
        job.status = JobStatus::Available(StatusReport::without_progress(JobState::Failed));

        job.mark_unavailable();

        assert!(!job.is_available());
        assert_eq!(job.process_id(), Some(77));
        assert_eq!(job.header, LogHeader::default());
    }
}
