use serde::{Deserialize, Serialize};

use crate::domain::{Job, JobState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub unknown: usize,
    pub unavailable: usize,
}

impl StatusCounts {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut counts = StatusCounts::default();
        for job in jobs {
            match job.state() {
                Some(JobState::Running) => counts.running += 1,
                Some(JobState::Completed) => counts.completed += 1,
                Some(JobState::Failed) => counts.failed += 1,
                Some(JobState::Cancelled) => counts.cancelled += 1,
                Some(JobState::Unknown) => counts.unknown += 1,
                None => counts.unavailable += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.running
            + self.completed
            + self.failed
            + self.cancelled
            + self.unknown
            + self.unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobStatus, StatusReport};

    #[test]
    fn counts_each_state() {
        let mut failed = Job::new("/a");
        failed.status = JobStatus::Available(StatusReport::without_progress(JobState::Failed));
        let gone = Job::new("/b");

        let counts = StatusCounts::from_jobs(&[failed, gone]);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.unavailable, 1);
        assert_eq!(counts.total(), 2);
    }
}
