use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use catalog_logging::catalog_trace;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Coalesces bursts of calls into one delayed invocation.
///
/// Timers run on the Tokio clock of `runtime`, so a paused test runtime acts
/// as a virtual clock.
pub struct Debouncer {
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: Mutex::new(None),
        }
    }

    /// Runs `f` once `delay` has passed without another `schedule` or `cancel`.
    ///
    /// Any invocation still pending is dropped without running.
    pub fn schedule<F>(&self, f: F, delay: Duration)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
            catalog_trace!("debounce: rescheduled");
        }
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // No await after this point: once `f` starts it runs to completion.
            f();
        }));
    }

    /// Drops the pending invocation, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            previous.abort();
            catalog_trace!("debounce: cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
