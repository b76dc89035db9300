use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Owned, cancellable delayed task.
///
/// At most one task is pending. Each schedule hands the task a ticket; a task that
/// woke up just as it was replaced must check [`Debouncer::fire`] before acting.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    ticket: u64,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ticket: 0,
            pending: None,
        }
    }

    /// Replace any pending task with `task`, run after the delay.
    /// Must be called within a Tokio runtime.
    pub fn schedule<F, Fut>(&mut self, task: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let ticket = self.ticket;
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task(ticket).await;
        }));

        ticket
    }

    pub fn cancel(&mut self) {
        self.ticket = self.ticket.wrapping_add(1);
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Claim the pending slot for `ticket`. Returns false if the task was superseded.
    pub fn fire(&mut self, ticket: u64) -> bool {
        if self.ticket != ticket || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        self.ticket = self.ticket.wrapping_add(1);
        true
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
