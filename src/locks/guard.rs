//! RAII lock guard implementation.

use super::key::LockKey;
use super::store::{DeleteOutcome, LockStore, StoreError};

/// RAII guard for a held lock record.
///
/// When dropped without [`LockGuard::release`], the record is deleted.
/// If deletion fails, a warning is logged but no panic occurs.
pub struct LockGuard<'a> {
    store: &'a dyn LockStore,

    key: LockKey,

    /// Whether the lock has been released manually.
    released: bool,
}

impl<'a> LockGuard<'a> {
    pub(super) fn new(store: &'a dyn LockStore, key: LockKey) -> Self {
        Self {
            store,
            key,
            released: false,
        }
    }

    /// The key this guard holds.
    pub fn key(&self) -> &LockKey {
        &self.key
    }

    /// Release the lock and report the store's answer.
    ///
    /// Deleting a record that is already gone counts as success.
    pub fn release(mut self) -> Result<DeleteOutcome, StoreError> {
        self.released = true;
        self.store.delete(&self.key.object_key())
    }
}

impl std::fmt::Debug for LockGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard")
            .field("key", &self.key)
            .field("released", &self.released)
            .finish()
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = self.store.delete(&self.key.object_key())
        {
            tracing::warn!(
                lock = %self.key,
                error = %e,
                "failed to release lock; it may now be orphaned"
            );
        }
    }
}
