//! Cooperative cancellation for long-running queries.
//!
//! The engine is single-threaded and synchronous (spec section 5): a
//! query never suspends, it just periodically checks a flag a caller
//! may have flipped from another thread holding a clone of the token.
//! No async runtime is pulled in for this — a plain atomic flag is
//! enough for a loop to poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply-cloneable flag a caller can use to abort a long query.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that never reports cancelled; use where the caller
    /// doesn't plan to cancel.
    pub fn never() -> Self {
        Self::new()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_not_cancelled() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn cancel_is_observed_through_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
