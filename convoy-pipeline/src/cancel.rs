//! Cancellation token
//!
//! Explicit cancellation handle checked at the executor's phase
//! boundaries. The engine never installs process-wide signal handlers;
//! front ends wire their own signal source to a token (the demo CLI wires
//! Ctrl-C).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Clonable handle used to request that a running pipeline stop
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation
    ///
    /// Units already running finish normally; units not yet dispatched
    /// are never started.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
