//! Shutdown signal shared between a client and its receive thread.

use crate::error::TdError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One-way shutdown flag.
///
/// Clones share state; once triggered it never resets. The receive thread
/// polls it between `receive` calls and the dispatcher checks it before
/// registering a new waiter.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    triggered: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create an untriggered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger shutdown.
    ///
    /// Returns `true` only for the call that flipped the flag.
    pub fn trigger(&self) -> bool {
        !self.triggered.swap(true, Ordering::SeqCst)
    }

    /// Check if shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Fail with [`TdError::Closed`] once shutdown has been triggered.
    pub fn check(&self) -> Result<(), TdError> {
        if self.is_triggered() {
            Err(TdError::Closed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_signal_not_triggered() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_triggered());
        assert!(signal.check().is_ok());
    }

    #[test]
    fn test_trigger_reports_first_caller_only() {
        let signal = ShutdownSignal::new();
        assert!(signal.trigger());
        assert!(!signal.trigger());
        assert!(signal.is_triggered());
    }

    #[test]
    fn test_clone_shares_state() {
        let signal = ShutdownSignal::new();
        let observer = signal.clone();

        signal.trigger();

        assert!(observer.is_triggered());
        assert!(matches!(observer.check(), Err(TdError::Closed)));
    }
}
