//! # Batch Lock Manager
//!
//! Serializes conflicting mutations to the same batches so concurrent
//! checkouts, receipts, and adjustments cannot race.
//!
//! ## Locking Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Batch Locking Protocol                         │
//! │                                                                 │
//! │  Checkout A needs batches {b2, b7}    Checkout B needs {b7, b2} │
//! │       │                                    │                    │
//! │       ▼                                    ▼                    │
//! │  sort ids ascending: [b2, b7]         sort ids: [b2, b7]        │
//! │       │                                    │                    │
//! │       ▼                                    ▼                    │
//! │  lock b2 ──► lock b7                  waits on b2               │
//! │       │                                    │                    │
//! │       ▼                                    │                    │
//! │  read batches, allocate, deduct            │                    │
//! │       │                                    │                    │
//! │       ▼                                    ▼                    │
//! │  drop guards ────────────────────────► lock b2, lock b7, ...    │
//! │                                                                 │
//! │  Both sides acquire in the same order, so no deadlock is        │
//! │  possible. One deadline covers the whole acquisition; blowing   │
//! │  it returns LockTimeout with nothing held.                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Per batch the mutation order is strictly serialized: a batch's
//! quantity is only ever read-then-written while its lock is held.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::{timeout, Instant};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

/// One async mutex per batch id, created on first use.
///
/// The slot table itself is guarded by a std mutex; it is only held for
/// the map lookup, never across an await point.
#[derive(Debug, Default)]
pub struct BatchLockManager {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// The guards for an acquired batch set. Dropping this releases every
/// lock.
#[derive(Debug)]
pub struct BatchLockSet {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl BatchLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock slot for a batch id, creating it on first use.
    fn slot(&self, batch_id: &str) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().expect("batch lock table poisoned");
        slots
            .entry(batch_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Acquires exclusive locks on every listed batch.
    ///
    /// Ids are deduplicated and acquired in ascending order, so two
    /// operations contending on overlapping sets always approach them
    /// in the same sequence. A single deadline of `wait` spans the
    /// whole acquisition.
    ///
    /// ## Errors
    /// `LedgerError::LockTimeout` if the deadline passes before every
    /// lock is held. Nothing stays locked on failure.
    pub async fn lock_set(
        &self,
        batch_ids: &[String],
        wait: Duration,
    ) -> LedgerResult<BatchLockSet> {
        let mut ids: Vec<&String> = batch_ids.iter().collect();
        ids.sort();
        ids.dedup();

        debug!(count = ids.len(), "Acquiring batch locks");

        let deadline = Instant::now() + wait;
        let mut guards = Vec::with_capacity(ids.len());

        for id in ids {
            let slot = self.slot(id);
            let remaining = deadline.saturating_duration_since(Instant::now());

            match timeout(remaining, slot.lock_owned()).await {
                Ok(guard) => guards.push(guard),
                Err(_) => {
                    // Guards acquired so far drop here, releasing them.
                    return Err(LedgerError::LockTimeout {
                        waited_ms: wait.as_millis() as u64,
                    });
                }
            }
        }

        Ok(BatchLockSet { _guards: guards })
    }

    /// Acquires the lock for a single batch.
    pub async fn lock_one(&self, batch_id: &str, wait: Duration) -> LedgerResult<BatchLockSet> {
        self.lock_set(&[batch_id.to_string()], wait).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let locks = BatchLockManager::new();

        let set = locks
            .lock_set(&ids(&["b1", "b2"]), Duration::from_millis(100))
            .await
            .unwrap();
        drop(set);

        // Released locks can be taken again.
        locks
            .lock_set(&ids(&["b1", "b2"]), Duration::from_millis(100))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_deduplicated() {
        let locks = BatchLockManager::new();

        // Without dedup the second acquisition of b1 would wait on the
        // first and trip the deadline.
        locks
            .lock_set(&ids(&["b1", "b1", "b1"]), Duration::from_millis(100))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_contended_lock_times_out() {
        let locks = Arc::new(BatchLockManager::new());

        let held = locks.lock_one("b1", Duration::from_millis(100)).await.unwrap();

        let err = locks
            .lock_set(&ids(&["b1", "b2"]), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::LockTimeout { waited_ms: 50 }));

        // The failed acquisition must not leave b2 locked.
        drop(held);
        locks
            .lock_set(&ids(&["b1", "b2"]), Duration::from_millis(100))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_waiter_proceeds_after_release() {
        let locks = Arc::new(BatchLockManager::new());

        let held = locks.lock_one("b1", Duration::from_millis(100)).await.unwrap();

        let locks2 = locks.clone();
        let waiter = tokio::spawn(async move {
            locks2.lock_one("b1", Duration::from_secs(2)).await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(held);

        waiter.await.unwrap().unwrap();
    }
}
