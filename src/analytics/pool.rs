use std::future::Future;

use futures_util::stream::{self, StreamExt};
use log::warn;

pub(crate) const DEFAULT_MAX_WORKERS: usize = 8;

/// Bounded pool for running a group of independent async tasks.
///
/// At most `max_workers` tasks are in flight at once, and `run_group` joins
/// the whole group before returning. Completion order is unspecified.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    max_workers: usize,
}

impl WorkerPool {
    /// Creates a pool. A size of zero is bumped to one.
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Runs every task to completion with bounded concurrency. A task that
    /// panics is logged and its result dropped; the rest of the group is
    /// unaffected.
    pub async fn run_group<T, F>(&self, tasks: Vec<F>) -> Vec<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        stream::iter(tasks)
            .map(|task| async move { tokio::spawn(task).await })
            .buffer_unordered(self.max_workers)
            .filter_map(|joined| async move {
                match joined {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!("worker task did not complete: {e}");
                        None
                    }
                }
            })
            .collect()
            .await
    }
}
