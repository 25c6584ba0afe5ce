//! Poller - 全ジョブを並行に更新
//!
//! # 設計
//! - ファイル I/O はブロッキングなので spawn_blocking で実行
//! - 同時実行数は Semaphore で制限
//! - ジョブ同士は状態を共有しない（Job ごとに所有権を移して戻す）
//! - 更新中の panic はそのジョブだけを Unavailable にする

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::Job;
use crate::engine::StatusEngine;
use crate::ports::Clock;

use super::watchlist::Watchlist;

/// Poller は StatusEngine を複数ジョブに適用する
pub struct Poller<C> {
    engine: Arc<StatusEngine<C>>,
    permits: Arc<Semaphore>,
}

impl<C: Clock + 'static> Poller<C> {
    pub fn new(engine: StatusEngine<C>, workers: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Update every job once. Order is preserved.
    ///
    /// A panicking update leaves its job `Unavailable`; the other jobs are unaffected.
    pub async fn poll(&self, jobs: Vec<Job>) -> Vec<Job> {
        let mut handles = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            let engine = Arc::clone(&self.engine);
            // the semaphore is never closed
            let permit = Arc::clone(&self.permits).acquire_owned().await.ok();
            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| engine.update(&mut job)));
                if let Err(panic) = outcome {
                    tracing::warn!(
                        dir = %job.directory().display(),
                        "status update panicked: {}",
                        panic_message(panic.as_ref())
                    );
                    job.mark_unavailable();
                }
                job
            }));
        }

        let mut updated = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(job) => updated.push(job),
                // the job is listed again on the next reconcile
                Err(e) => tracing::error!("status worker lost: {e}"),
            }
        }
        updated
    }

    /// Poll all jobs of a watchlist in place.
    pub async fn poll_watchlist(&self, list: &mut Watchlist) {
        let jobs = list.take();
        let jobs = self.poll(jobs).await;
        list.restore(jobs);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload")
}
