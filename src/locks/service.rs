//! Acquire and release of one job's lock.

use super::guard::LockGuard;
use super::key::LockKey;
use super::metadata::LockMetadata;
use super::store::{CreateOutcome, DeleteOutcome, LockStore, StoreError};
use crate::error::{EnsureUniqueError, Result};
use crate::token::Token;

/// Outcome of [`ConcurrencyService::acquire`].
#[derive(Debug)]
pub enum Acquisition<'a> {
    /// This invocation now owns the lock.
    Acquired(LockGuard<'a>),
    /// Another invocation owns the lock. `holder` is its record, when readable.
    AlreadyLocked {
        key: LockKey,
        holder: Option<LockMetadata>,
    },
}

/// A lock record found in the store.
#[derive(Debug)]
pub struct LockRecord {
    pub key: LockKey,
    /// Parsed body; `None` if the body is not valid metadata.
    pub metadata: Option<LockMetadata>,
}

/// Composes a [`LockStore`] into per-token acquire/release.
pub struct ConcurrencyService {
    store: Box<dyn LockStore>,
    prefix: String,
}

impl ConcurrencyService {
    pub fn new(store: Box<dyn LockStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// The key a token maps to.
    pub fn key_for(&self, token: &Token) -> LockKey {
        LockKey::new(self.store.namespace(), self.prefix.clone(), token.clone())
    }

    /// Try to take the lock for `token` with a single conditional create.
    ///
    /// Contention is reported as [`Acquisition::AlreadyLocked`]; only
    /// infrastructure failures are errors.
    pub fn acquire(&self, token: &Token, command: &str) -> Result<Acquisition<'_>> {
        let key = self.key_for(token);
        let body = LockMetadata::new(token, command)
            .to_json()
            .map_err(|e| store_error(&key, StoreError::from(e)))?;

        tracing::debug!(lock = %key, "requesting conditional create");
        let outcome = self
            .store
            .create_if_absent(&key.object_key(), body)
            .map_err(|e| store_error(&key, e))?;

        match outcome {
            CreateOutcome::Created => {
                tracing::info!(lock = %key, "lock acquired");
                Ok(Acquisition::Acquired(LockGuard::new(self.store.as_ref(), key)))
            }
            CreateOutcome::AlreadyExists => {
                let holder = self.read_metadata(&key);
                Ok(Acquisition::AlreadyLocked { key, holder })
            }
        }
    }

    /// Release a held lock. Releasing an already-absent record succeeds.
    pub fn release(&self, guard: LockGuard<'_>) -> Result<()> {
        let key = guard.key().clone();
        match guard.release().map_err(|e| store_error(&key, e))? {
            DeleteOutcome::Deleted => tracing::debug!(lock = %key, "lock released"),
            DeleteOutcome::NotFound => {
                tracing::warn!(lock = %key, "lock record was already gone at release")
            }
        }
        Ok(())
    }

    /// Look up the record for `token` without modifying it.
    pub fn inspect(&self, token: &Token) -> Result<Option<LockRecord>> {
        let key = self.key_for(token);
        let body = self
            .store
            .read(&key.object_key())
            .map_err(|e| store_error(&key, e))?;

        Ok(body.map(|bytes| LockRecord {
            metadata: LockMetadata::from_slice(&bytes).ok(),
            key,
        }))
    }

    /// Delete the record for `token` regardless of who created it.
    ///
    /// Returns whether a record was present.
    pub fn clear(&self, token: &Token) -> Result<bool> {
        let key = self.key_for(token);
        let outcome = self
            .store
            .delete(&key.object_key())
            .map_err(|e| store_error(&key, e))?;
        Ok(outcome == DeleteOutcome::Deleted)
    }

    /// Best-effort read of the current holder, for diagnostics only.
    fn read_metadata(&self, key: &LockKey) -> Option<LockMetadata> {
        match self.store.read(&key.object_key()) {
            Ok(Some(bytes)) => LockMetadata::from_slice(&bytes).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(lock = %key, error = %e, "could not read lock holder");
                None
            }
        }
    }
}

fn store_error(key: &LockKey, source: StoreError) -> EnsureUniqueError {
    EnsureUniqueError::Store {
        namespace: key.namespace.clone(),
        key: key.object_key(),
        source,
    }
}
