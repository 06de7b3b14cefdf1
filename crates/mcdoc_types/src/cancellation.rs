//! Per-node cancellation (spec §5).
//!
//! A token is checked once before an [`crate::instantiate::instantiate`]
//! call descends into a node's children; observing it set yields
//! [`crate::InstantiatedKind::Cancelled`] immediately rather than a
//! diagnostic — the caller asked to stop, nothing failed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
