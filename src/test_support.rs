use crate::locks::{
    ConcurrencyService, CreateOutcome, DeleteOutcome, LockStore, ObjectStoreLockStore, StoreError,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

pub(crate) const TEST_NAMESPACE: &str = "test-bucket";
pub(crate) const TEST_PREFIX: &str = "ensure-unique/";

/// Service over a fresh in-memory store.
pub(crate) fn memory_service() -> ConcurrencyService {
    let store = ObjectStoreLockStore::in_memory(TEST_NAMESPACE).unwrap();
    ConcurrencyService::new(Box::new(store), TEST_PREFIX)
}

/// Which operations a [`FailingStore`] refuses.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FailOn {
    Create,
    Delete,
}

/// Store double that answers like an in-memory store except for the
/// operations it is told to fail, which return a permission error.
pub(crate) struct FailingStore {
    inner: ObjectStoreLockStore,
    fail_on: FailOn,
}

impl FailingStore {
    pub(crate) fn new(fail_on: FailOn) -> Self {
        Self {
            inner: ObjectStoreLockStore::in_memory(TEST_NAMESPACE).unwrap(),
            fail_on,
        }
    }
}

fn access_denied() -> StoreError {
    StoreError::backend(io::Error::new(
        io::ErrorKind::PermissionDenied,
        "access denied",
    ))
}

impl LockStore for FailingStore {
    fn namespace(&self) -> &str {
        self.inner.namespace()
    }

    fn create_if_absent(&self, key: &str, body: Vec<u8>) -> Result<CreateOutcome, StoreError> {
        match self.fail_on {
            FailOn::Create => Err(access_denied()),
            FailOn::Delete => self.inner.create_if_absent(key, body),
        }
    }

    fn delete(&self, key: &str) -> Result<DeleteOutcome, StoreError> {
        match self.fail_on {
            FailOn::Delete => Err(access_denied()),
            FailOn::Create => self.inner.delete(key),
        }
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.read(key)
    }
}
