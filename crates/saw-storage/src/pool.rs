//! Bounded worker pool for per-column I/O.
//!
//! Columns are independent: each task owns one column file end to end, so
//! the pool needs no shared state beyond the job and result channels. The
//! driver enqueues every job up front, then collects exactly one result per
//! job; the first failure wins and flips a cancel flag so idle workers stop
//! picking up further jobs. All worker threads are scoped and therefore
//! joined before this module returns, on success and failure alike.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::unbounded;
use tracing::debug;

use crate::error::{SawError, SawResult};

/// Runs one task per job on at most `pool_size` worker threads and returns
/// the task outputs in job order.
pub(crate) fn run_tasks<J, R, F>(
    pool_size: usize,
    label: &str,
    jobs: Vec<J>,
    task: F,
) -> SawResult<Vec<R>>
where
    J: Send,
    R: Send,
    F: Fn(J) -> SawResult<R> + Sync,
{
    let job_count = jobs.len();
    if job_count == 0 {
        return Ok(Vec::new());
    }
    let workers = pool_size.min(job_count);
    debug!(workers, jobs = job_count, label, "starting column worker pool");

    let cancelled = AtomicBool::new(false);
    let (job_tx, job_rx) = unbounded::<(usize, J)>();
    let (result_tx, result_rx) = unbounded::<(usize, SawResult<R>)>();
    for job in jobs.into_iter().enumerate() {
        // The channel is unbounded and both ends are alive; this cannot fail.
        if job_tx.send(job).is_err() {
            return Err(SawError::internal("job channel closed before dispatch"));
        }
    }
    drop(job_tx);

    thread::scope(|scope| {
        for n in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let task = &task;
            let cancelled = &cancelled;
            let spawned = thread::Builder::new()
                .name(format!("{label}-{n}"))
                .spawn_scoped(scope, move || {
                    while let Ok((index, job)) = job_rx.recv() {
                        if cancelled.load(Ordering::Acquire) {
                            break;
                        }
                        let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(job)))
                            .unwrap_or_else(|_| {
                                Err(SawError::internal("column task panicked"))
                            });
                        if result_tx.send((index, outcome)).is_err() {
                            break;
                        }
                    }
                });
            if let Err(e) = spawned {
                cancelled.store(true, Ordering::Release);
                return Err(SawError::from(e));
            }
        }
        drop(result_tx);

        let mut slots: Vec<Option<R>> = Vec::with_capacity(job_count);
        slots.resize_with(job_count, || None);
        for _ in 0..job_count {
            match result_rx.recv() {
                Ok((index, Ok(output))) => slots[index] = Some(output),
                Ok((_, Err(e))) => {
                    cancelled.store(true, Ordering::Release);
                    return Err(e);
                }
                // All workers are gone but results are still owed.
                Err(_) => return Err(SawError::Interrupted),
            }
        }

        let mut outputs = Vec::with_capacity(job_count);
        for slot in slots {
            match slot {
                Some(output) => outputs.push(output),
                None => return Err(SawError::internal("column task result missing")),
            }
        }
        Ok(outputs)
    })
}
