//! Status engine: infers progress, state and ETA of a job from its log.
//!
//! 1 回の `update` は次の順で進む:
//! 1. control file（未取得なら読む、以後キャッシュ）
//! 2. ログのヘッダー（開始時刻と PID、両方そろうまで読む）
//! 3. ログ末尾からの走査（最初に見つかったマーカーが最新）

use std::fs::File;
use std::io::BufReader;

use chrono::{DateTime, Utc};

use crate::control::{self, ControlSettings};
use crate::domain::{
    Eta, Job, JobState, JobStatus, Progress, StatusError, StatusReport, TailMarker,
};
use crate::log::{self, LogHeader};
use crate::ports::{Clock, SystemClock};

/// Bounds on the work done per update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Lines read from the top while looking for the header.
    pub header_lines: usize,
    /// Lines read back from the end while looking for a marker.
    pub tail_lines: usize,
    /// Bytes read back from the end while looking for a marker.
    pub tail_bytes: u64,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            header_lines: 200,
            tail_lines: 10_000,
            tail_bytes: 8 * 1024 * 1024,
        }
    }
}

/// StatusEngine は Job を 1 つずつ更新する
///
/// Holds no per-job state, so one engine can serve many jobs from many threads.
#[derive(Debug, Clone)]
pub struct StatusEngine<C = SystemClock> {
    clock: C,
    limits: ScanLimits,
}

impl StatusEngine<SystemClock> {
    pub fn new(limits: ScanLimits) -> Self {
        Self::with_clock(SystemClock, limits)
    }
}

impl<C: Clock> StatusEngine<C> {
    pub fn with_clock(clock: C, limits: ScanLimits) -> Self {
        Self { clock, limits }
    }

    /// Re-derive the job's status from the files on disk.
    ///
    /// Never fails: any error leaves the job `Unavailable` so the caller can
    /// keep polling.
    pub fn update(&self, job: &mut Job) {
        match self.refresh(job) {
            Ok(report) => job.status = JobStatus::Available(report),
            Err(err) => {
                if err.is_config() {
                    tracing::debug!(dir = %job.directory().display(), "job not ready: {err}");
                } else {
                    tracing::debug!(dir = %job.directory().display(), "job unavailable: {err}");
                }
                job.mark_unavailable();
            }
        }
    }

    /// Fallible core of `update`.
    pub fn refresh(&self, job: &mut Job) -> Result<StatusReport, StatusError> {
        let settings = match job.settings.clone() {
            Some(settings) => settings,
            None => {
                let settings = control::load_settings(job.directory())?;
                tracing::debug!(
                    dir = %job.directory().display(),
                    application = %settings.application,
                    end_time = settings.end_time,
                    "control file read"
                );
                job.settings = Some(settings.clone());
                settings
            }
        };

        let log_path = settings.log_path(job.directory());
        let mut file = File::open(&log_path).map_err(|source| StatusError::LogUnavailable {
            path: log_path.clone(),
            source,
        })?;
        let io_err = |source| StatusError::Io {
            path: log_path.clone(),
            source,
        };

        if !self.header_settled(job) {
            let header = log::scan_header(
                BufReader::new(&mut file),
                self.limits.header_lines,
                job.assigned_process_id(),
            )
            .map_err(io_err)?;
            merge_header(&mut job.header, header);
        }

        let marker = log::scan_tail(&mut file, self.limits.tail_lines, self.limits.tail_bytes)
            .map_err(io_err)?;
        Ok(self.classify(marker, &settings, job.header.start))
    }

    /// Header values still worth looking for?
    fn header_settled(&self, job: &Job) -> bool {
        job.header.start.is_some()
            && (job.header.process_id.is_some() || job.assigned_process_id().is_some())
    }

    fn classify(
        &self,
        marker: Option<TailMarker>,
        settings: &ControlSettings,
        start: Option<DateTime<Utc>>,
    ) -> StatusReport {
        match marker {
            Some(TailMarker::FatalError) => StatusReport::without_progress(JobState::Failed),
            Some(TailMarker::Cancelled) => StatusReport::without_progress(JobState::Cancelled),
            Some(TailMarker::Progress(current_time)) => {
                let progress = Progress::new(current_time, settings.end_time);
                if current_time == settings.end_time {
                    StatusReport::completed(progress)
                } else {
                    let eta = start.and_then(|start| {
                        Eta::estimate(start, self.clock.now(), current_time, settings.end_time)
                    });
                    StatusReport::running(progress, eta)
                }
            }
            None => StatusReport::without_progress(JobState::Unknown),
        }
    }
}

/// Keep values already known; fill the gaps from a fresh scan.
fn merge_header(known: &mut LogHeader, fresh: LogHeader) {
    if known.start.is_none() {
        known.start = fresh.start;
    }
    if known.process_id.is_none() {
        known.process_id = fresh.process_id;
    }
}
