//! Time-limited inference: run a sampler on a worker thread and report the best available
//! estimate when a deadline passes.

use distribution::{SampledDistribution, SharedDistribution};
use util::{InferenceError, Result};

use crossbeam_channel::{bounded, RecvTimeoutError};

use std::thread;
use std::time::Duration;


/// The outcome of `run_time_limited`
#[derive(Debug)]
pub enum TimeLimitedResult<T> {

    /// The job finished within the time limit
    Completed(T),

    /// The deadline passed. Holds the normalized distribution accumulated so far, or `None` if
    /// sampling had not started.
    TimedOut(Option<SampledDistribution>)

}

impl<T> TimeLimitedResult<T> {

    pub fn is_completed(&self) -> bool {
        match *self {
            TimeLimitedResult::Completed(_) => true,
            TimeLimitedResult::TimedOut(_) => false
        }
    }

}


/// Run `job` on a new thread for at most `limit`.
///
/// The job must publish its samples through `handle` (see `Sampler::set_results_handle` and
/// `McSat::set_results_handle`). If the deadline passes first, the run is cancelled through the
/// handle and a snapshot of its distribution is returned. The worker thread stops at its next
/// step and is not joined.
///
/// # Errors
/// * any error returned by `job` within the time limit
/// * `InferenceError::General` if the worker thread panicked
pub fn run_time_limited<T, F>(job: F, handle: &SharedDistribution, limit: Duration) -> Result<TimeLimitedResult<T>>
    where F: FnOnce() -> Result<T> + Send + 'static,
          T: Send + 'static
{
    let (tx, rx) = bounded(1);

    thread::spawn(move || {
        // the receiver is gone if the controller already timed out
        let _ = tx.send(job());
    });

    match rx.recv_timeout(limit) {
        Ok(res) => res.map(TimeLimitedResult::Completed),
        Err(RecvTimeoutError::Timeout) => {
            handle.cancel();
            let snapshot = handle.poll().map(|mut dist| {
                dist.normalize();
                dist
            });

            info!(
                "Time limit of {:?} reached after {} samples",
                limit,
                snapshot.as_ref().map_or(0, |d| d.num_samples())
            );
            Ok(TimeLimitedResult::TimedOut(snapshot))
        },
        Err(RecvTimeoutError::Disconnected) => {
            Err(InferenceError::General(String::from("inference thread terminated without a result")))
        }
    }
}
