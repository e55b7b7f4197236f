//! View teardown signal.
//!
//! A [`TeardownToken`] is handed to [`crate::store::Store::subscribe`]; once
//! closed, the subscription stops yielding states even if the store keeps
//! publishing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Clone, Default)]
pub struct TeardownToken {
    closed: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl TeardownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the token. Later calls are no-ops.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Teardown signalled");
            self.notify.notify_waiters();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Resolve once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        // Register with Notify before reading the flag so a concurrent
        // close() cannot slip between the check and the await.
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_closed() {
            return;
        }
        notified.await;
    }
}
