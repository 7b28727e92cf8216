//! Trailing-edge debouncer for changing input.

use std::time::Duration;

use student_records_core::SEARCH_DEBOUNCE_MS;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Forwards a value only after no newer value has arrived for `delay`.
///
/// Every push restarts the timer and replaces the pending value, so bursts
/// collapse into their last element. Dropping the debouncer discards any
/// pending value; [`Debouncer::finish`] lets it settle first.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: Option<mpsc::UnboundedSender<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the debouncing task; settled values arrive on the returned receiver.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, input) = mpsc::unbounded_channel();
        let (output, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(delay, input, output));
        (Self { tx: Some(tx), task: Some(task) }, rx)
    }

    /// Debouncer with the search-input quiet period.
    #[must_use]
    pub fn for_search() -> (Self, mpsc::UnboundedReceiver<T>) {
        Self::new(Duration::from_millis(SEARCH_DEBOUNCE_MS))
    }

    /// Returns `false` once the debouncer has stopped.
    pub fn push(&self, value: T) -> bool {
        self.tx.as_ref().is_some_and(|tx| tx.send(value).is_ok())
    }

    /// Stops accepting input and waits for a pending value to settle and be emitted.
    pub async fn finish(mut self) {
        self.tx.take();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "debounce task ended abnormally");
            }
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run<T>(
    delay: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
) {
    while let Some(first) = input.recv().await {
        let mut latest = first;
        let mut deadline = Instant::now() + delay;
        loop {
            match tokio::time::timeout_at(deadline, input.recv()).await {
                Ok(Some(next)) => {
                    latest = next;
                    deadline = Instant::now() + delay;
                },
                Ok(None) => {
                    tokio::time::sleep_until(deadline).await;
                    let _ = output.send(latest);
                    return;
                },
                Err(_) => break,
            }
        }
        if output.send(latest).is_err() {
            return;
        }
    }
}
