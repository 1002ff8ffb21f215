//! The two atomic primitives a lock store must offer.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a conditional create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The object did not exist and now does.
    Created,
    /// Another writer got there first.
    AlreadyExists,
}

/// Result of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Infrastructure failure talking to a lock store.
///
/// Never used for contention; see [`CreateOutcome::AlreadyExists`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected the request or could not be reached.
    #[error("store request failed: {0}")]
    Backend(#[source] BoxError),

    /// The runtime driving the store client could not be started.
    #[error("failed to start store runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The lock record body could not be encoded.
    #[error("failed to encode lock record: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl StoreError {
    pub fn backend(err: impl Into<BoxError>) -> Self {
        StoreError::Backend(err.into())
    }
}

/// A store offering atomic create-if-absent and delete on string keys,
/// scoped to one namespace.
///
/// Implementations must make `create_if_absent` a single linearization point:
/// of any set of concurrent calls for one key, exactly one may observe
/// [`CreateOutcome::Created`].
pub trait LockStore: Send + Sync {
    /// The namespace (bucket, directory) this store writes into.
    fn namespace(&self) -> &str;

    /// Create `key` with `body` only if no object exists at `key`.
    fn create_if_absent(&self, key: &str, body: Vec<u8>) -> Result<CreateOutcome, StoreError>;

    /// Delete `key`. A missing key is not an error.
    fn delete(&self, key: &str) -> Result<DeleteOutcome, StoreError>;

    /// Read the body at `key`, if present.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}
