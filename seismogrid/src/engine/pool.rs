//! Scoped worker pool for distributing independent tasks.
//!
//! The pool spawns scoped threads over a shared task queue; each worker
//! pops tasks until the queue drains. A failing task records the first
//! error without stopping the other workers, so every task still runs
//! and the caller sees the earliest failure afterwards.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;

use tracing::{debug, warn};

use crate::engine::EngineError;

/// Fixed-size pool of scoped worker threads.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool with the given number of workers.
    pub fn new(workers: usize) -> Result<Self, EngineError> {
        if workers == 0 {
            return Err(EngineError::InvalidArgument(
                "worker pools need at least one worker".to_string(),
            ));
        }
        Ok(Self { workers })
    }

    /// Number of workers the pool spawns.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs the handler over every task, spread across the workers.
    ///
    /// Tasks are handed out in order but may complete in any order.
    /// All tasks run even when one fails; the first failure, in
    /// completion order, is returned once the queue drains.
    pub fn run<T, F>(&self, tasks: Vec<T>, handler: F) -> Result<(), EngineError>
    where
        T: Send,
        F: Fn(T) -> Result<(), EngineError> + Send + Sync,
    {
        if tasks.is_empty() {
            return Ok(());
        }
        let spawned = self.workers.min(tasks.len());
        debug!(workers = spawned, tasks = tasks.len(), "distributing tasks");

        let queue = Mutex::new(VecDeque::from(tasks));
        let failure: Mutex<Option<EngineError>> = Mutex::new(None);

        let handler = &handler;
        let queue_ref = &queue;
        let failure_ref = &failure;
        thread::scope(|scope| -> Result<(), std::io::Error> {
            for index in 0..spawned {
                thread::Builder::new()
                    .name(format!("worker-{index}"))
                    .spawn_scoped(scope, move || loop {
                        let task = queue_ref
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .pop_front();
                        let Some(task) = task else {
                            break;
                        };
                        if let Err(error) = handler(task) {
                            warn!(%error, "task failed");
                            let mut slot = failure_ref
                                .lock()
                                .unwrap_or_else(|poisoned| poisoned.into_inner());
                            if slot.is_none() {
                                *slot = Some(error);
                            }
                        }
                    })?;
            }
            Ok(())
        })?;

        match failure
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
