//! Watchlist - 監視中のジョブ集合
//!
//! ポーリングをまたいで Job を保持し、キャッシュ（control file、ヘッダー）を再利用する。

use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::Job;
use crate::ports::JobEntry;

/// Ordered set of jobs keyed by directory.
#[derive(Debug, Default)]
pub struct Watchlist {
    jobs: Vec<Job>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<JobEntry>) -> Self {
        let mut list = Self::new();
        list.reconcile(entries);
        list
    }

    /// Match the list to `entries`.
    ///
    /// Jobs already tracked are kept (with their cached data), new ones are
    /// created, and jobs no longer listed are dropped. Order follows `entries`.
    /// A changed process id for the same directory starts a fresh job.
    pub fn reconcile(&mut self, entries: Vec<JobEntry>) {
        let mut known: HashMap<PathBuf, Job> = self
            .jobs
            .drain(..)
            .map(|job| (job.directory().to_path_buf(), job))
            .collect();

        for entry in entries {
            if self.jobs.iter().any(|j| j.directory() == entry.directory) {
                continue;
            }
            let job = match known.remove(&entry.directory) {
                Some(job) if entry.process_id.is_none() || job.process_id() == entry.process_id => {
                    job
                }
                _ => match entry.process_id {
                    Some(pid) => Job::with_process_id(entry.directory, pid),
                    None => Job::new(entry.directory),
                },
            };
            self.jobs.push(job);
        }

        if !known.is_empty() {
            tracing::debug!(dropped = known.len(), "jobs left the watchlist");
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.jobs)
    }

    pub(crate) fn restore(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogHeader;

    #[test]
    fn keeps_existing_jobs_and_their_cache() {
        let mut list = Watchlist::from_entries(vec![JobEntry::new("/a"), JobEntry::new("/b")]);
        list.jobs[0].header = LogHeader {
            start: None,
            process_id: Some(5),
        };

        list.reconcile(vec![JobEntry::new("/c"), JobEntry::new("/a")]);

        let dirs: Vec<_> = list.jobs().iter().map(|j| j.directory().to_path_buf()).collect();
        assert_eq!(dirs, vec![PathBuf::from("/c"), PathBuf::from("/a")]);
        assert_eq!(list.jobs()[1].process_id(), Some(5));
    }

    #[test]
    fn duplicate_directories_are_collapsed() {
        let list = Watchlist::from_entries(vec![JobEntry::new("/a"), JobEntry::new("/a")]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn new_process_id_starts_fresh_job() {
        let mut list = Watchlist::from_entries(vec![JobEntry::with_process_id("/a", 1)]);
        list.reconcile(vec![JobEntry::with_process_id("/a", 2)]);
        assert_eq!(list.jobs()[0].process_id(), Some(2));
    }

    #[test]
    fn empty_listing_clears() {
        let mut list = Watchlist::from_entries(vec![JobEntry::new("/a")]);
        list.reconcile(vec![]);
        assert!(list.is_empty());
    }
}
