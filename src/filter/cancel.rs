use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between the event loop and a
/// query worker thread.
///
/// Clones observe the same state: once any handle calls `cancel()`, every
/// handle reports `is_cancelled() == true`. The flag is advisory: a query
/// worker still sends its outcome, and the orchestrator drops it by
/// sequence number.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
