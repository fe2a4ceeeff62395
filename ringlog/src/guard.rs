//! Interruptible exclusive lock
//!
//! One lock protects the whole device state. Waiting for it is the only
//! place an operation can block, so that is where interruption is honored:
//!
//! ```ignore
//! let interrupt = Interrupt::new();
//! let guard = lock.acquire(&interrupt).await?;   // Err(Interrupted) if fired while waiting
//! // ... critical section ...
//! // released when `guard` goes out of scope, on every path
//! ```
//!
//! An uncontended lock is taken even if the interrupt has already fired.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::debug;

use crate::error::{LogError, Result};

/// Cancellation token for lock waits
///
/// Clones share the same state. Firing it wakes every waiter that was
/// given this token (or a clone of it).
#[derive(Clone)]
pub struct Interrupt {
    tx: Arc<watch::Sender<bool>>,
}

impl Interrupt {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the interrupt
    pub fn interrupt(&self) {
        self.tx.send_replace(true);
    }

    /// Re-arm after an interrupt was handled
    pub fn clear(&self) {
        self.tx.send_replace(false);
    }

    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the interrupt is fired
    pub async fn interrupted(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = rx.wait_for(|&fired| fired).await;
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interrupt(fired={})", self.is_interrupted())
    }
}

/// Single lock over `T` whose acquisition can be interrupted
pub struct ExclusionGuard<T> {
    inner: Mutex<T>,
}

impl<T> ExclusionGuard<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Wait for the lock
    ///
    /// # Errors
    ///
    /// `LogError::Interrupted` if `interrupt` fires before the lock is
    /// obtained. The lock is not held in that case.
    pub async fn acquire(&self, interrupt: &Interrupt) -> Result<MutexGuard<'_, T>> {
        tokio::select! {
            biased;
            guard = self.inner.lock() => Ok(guard),
            () = interrupt.interrupted() => {
                debug!("lock wait interrupted");
                Err(LogError::Interrupted)
            }
        }
    }

    /// Take the lock only if nobody holds it
    #[must_use]
    pub fn try_acquire(&self) -> Option<MutexGuard<'_, T>> {
        self.inner.try_lock().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_and_release() {
        let lock = ExclusionGuard::new(0u32);
        let interrupt = Interrupt::new();
        {
            let mut guard = lock.acquire(&interrupt).await.unwrap();
            *guard += 1;
            assert!(lock.try_acquire().is_none());
        }
        assert_eq!(*lock.try_acquire().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_uncontended_lock_ignores_fired_interrupt() {
        let lock = ExclusionGuard::new(());
        let interrupt = Interrupt::new();
        interrupt.interrupt();
        assert!(lock.acquire(&interrupt).await.is_ok());
    }

    #[tokio::test]
    async fn test_interrupt_while_waiting() {
        let lock = Arc::new(ExclusionGuard::new(()));
        let held = lock.try_acquire().unwrap();

        let interrupt = Interrupt::new();
        let waiter = {
            let lock = Arc::clone(&lock);
            let interrupt = interrupt.clone();
            tokio::spawn(async move { lock.acquire(&interrupt).await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        interrupt.interrupt();
        let result = waiter.await.unwrap();
        assert_eq!(result, Err(LogError::Interrupted));

        // Interrupted waiter did not take the lock
        drop(held);
        assert!(lock.try_acquire().is_some());
    }

    #[tokio::test]
    async fn test_clear_rearms() {
        let interrupt = Interrupt::new();
        interrupt.interrupt();
        assert!(interrupt.is_interrupted());
        interrupt.clear();
        assert!(!interrupt.is_interrupted());
    }
}
