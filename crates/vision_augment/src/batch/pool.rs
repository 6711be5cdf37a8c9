//! Worker pool for parallel batch augmentation.
//!
//! Tasks are routed to a specific worker over its own bounded channel, and
//! all workers report back over one shared output channel.
//!
//! ```text
//!            ┌── task_tx[0] ──> worker 0 ──┐
//! main ──────┼── task_tx[1] ──> worker 1 ──┼──> output_rx ──> main
//!            └── task_tx[n] ──> worker n ──┘
//! ```
//!
//! Workers exit once their task channel is closed; dropping the pool closes
//! every channel and joins the threads.

use super::seed::WORKER_ID;
use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::warn;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub(crate) struct WorkerPool<Task, Output> {
    workers: Vec<thread::JoinHandle<()>>,
    task_txs: Vec<Sender<Task>>,
    output_rx: Receiver<Output>,
}

impl<Task, Output> WorkerPool<Task, Output>
where
    Task: Send + 'static,
    Output: Send + 'static,
{
    /// Spawns `num_workers` threads running `worker_fn` on each task.
    ///
    /// `output_capacity` should cover every task submitted before results are
    /// drained; otherwise submission can block on full task queues while the
    /// workers block on a full output queue.
    pub(crate) fn new<F>(
        num_workers: usize,
        buffer_size: usize,
        output_capacity: usize,
        worker_fn: F,
    ) -> Result<Self>
    where
        F: Fn(Task) -> Output + Send + Sync + 'static,
    {
        if num_workers == 0 {
            return Err(anyhow!(
                "Cannot create WorkerPool with 0 workers. \
                Either set num_workers > 0 or use single-threaded mode."
            ));
        }
        if buffer_size == 0 {
            return Err(anyhow!(
                "Cannot create WorkerPool with buffer_size 0. \
                Buffer size must be > 0 to prevent deadlocks."
            ));
        }

        let (output_tx, output_rx) = bounded(output_capacity.max(1));
        let worker_fn = Arc::new(worker_fn);
        let mut workers = Vec::with_capacity(num_workers);
        let mut task_txs = Vec::with_capacity(num_workers);

        for worker_id in 0..num_workers {
            let (task_tx, task_rx) = bounded::<Task>(buffer_size);
            let output_tx = output_tx.clone();
            let worker_fn = Arc::clone(&worker_fn);

            let handle = thread::Builder::new()
                .name(format!("augment-worker-{}", worker_id))
                .spawn(move || {
                    WORKER_ID.with(|id| id.set(worker_id));
                    for task in task_rx {
                        if output_tx.send(worker_fn(task)).is_err() {
                            break; // receiver gone
                        }
                    }
                })
                .with_context(|| format!("Failed to spawn worker thread {}", worker_id))?;

            workers.push(handle);
            task_txs.push(task_tx);
        }

        Ok(Self {
            workers,
            task_txs,
            output_rx,
        })
    }

    pub(crate) fn num_workers(&self) -> usize {
        self.task_txs.len()
    }

    /// Sends a task to `worker % num_workers`.
    pub(crate) fn submit(&self, worker: usize, task: Task) -> Result<()> {
        let worker = worker % self.num_workers();
        self.task_txs[worker]
            .send(task)
            .map_err(|_| anyhow!("Worker {} stopped accepting tasks", worker))
    }

    pub(crate) fn recv(&self, timeout: Duration) -> Result<Output> {
        self.output_rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => {
                anyhow!("Timed out after {:?} waiting for augmentation workers", timeout)
            }
            RecvTimeoutError::Disconnected => anyhow!("All augmentation workers disconnected"),
        })
    }
}

impl<Task, Output> Drop for WorkerPool<Task, Output> {
    fn drop(&mut self) {
        // Closing the task channels ends each worker's loop.
        self.task_txs.clear();

        for (worker_id, worker) in self.workers.drain(..).enumerate() {
            if worker.join().is_err() {
                warn!("augment-worker-{} panicked before shutdown", worker_id);
            }
        }
    }
}
