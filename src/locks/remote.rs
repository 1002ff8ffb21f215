//! [`LockStore`] backed by an `object_store` client.
//!
//! Works with any `ObjectStore` that honours `PutMode::Create` atomically:
//! Amazon S3 (conditional writes via `If-None-Match`), the local filesystem,
//! and the in-memory store. The async client runs on a private current-thread
//! runtime; the rest of the tool stays synchronous.

use super::store::{CreateOutcome, DeleteOutcome, LockStore, StoreError};
use object_store::aws::{AmazonS3Builder, S3ConditionalPut};
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutMode, PutOptions, PutPayload};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Connection settings for an S3 namespace.
#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub allow_http: bool,
}

/// Lock store over any `object_store` backend.
pub struct ObjectStoreLockStore {
    namespace: String,
    store: Arc<dyn ObjectStore>,
    runtime: Runtime,
}

impl ObjectStoreLockStore {
    /// Wrap an existing object store.
    pub fn new(namespace: impl Into<String>, store: Arc<dyn ObjectStore>) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StoreError::Runtime)?;

        Ok(Self {
            namespace: namespace.into(),
            store,
            runtime,
        })
    }

    /// Amazon S3 (or an S3-compatible endpoint).
    ///
    /// Credentials and any setting not given here come from the standard
    /// `AWS_*` environment variables.
    pub fn s3(settings: &S3Settings) -> Result<Self, StoreError> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&settings.bucket)
            .with_conditional_put(S3ConditionalPut::ETagMatch)
            .with_allow_http(settings.allow_http);

        if let Some(region) = &settings.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let store = builder.build().map_err(StoreError::backend)?;
        Self::new(settings.bucket.clone(), Arc::new(store))
    }

    /// A directory on a filesystem shared by the participating hosts.
    ///
    /// The namespace becomes a subdirectory of `root` and is created if missing.
    pub fn local(root: &Path, namespace: &str) -> Result<Self, StoreError> {
        let dir = root.join(namespace);
        std::fs::create_dir_all(&dir).map_err(StoreError::backend)?;
        let store = LocalFileSystem::new_with_prefix(&dir).map_err(StoreError::backend)?;
        Self::new(namespace, Arc::new(store))
    }

    /// Process-local store. Offers no exclusion across processes.
    pub fn in_memory(namespace: &str) -> Result<Self, StoreError> {
        Self::new(namespace, Arc::new(InMemory::new()))
    }
}

/// Keys arrive already encoded, one segment per level; parse them verbatim
/// rather than re-splitting, which would collapse empty segments.
fn object_path(key: &str) -> Result<ObjectPath, StoreError> {
    ObjectPath::parse(key).map_err(StoreError::backend)
}

impl LockStore for ObjectStoreLockStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn create_if_absent(&self, key: &str, body: Vec<u8>) -> Result<CreateOutcome, StoreError> {
        let path = object_path(key)?;
        let opts = PutOptions::from(PutMode::Create);

        let result = self
            .runtime
            .block_on(self.store.put_opts(&path, PutPayload::from(body), opts));

        match result {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(object_store::Error::AlreadyExists { .. })
            | Err(object_store::Error::Precondition { .. }) => Ok(CreateOutcome::AlreadyExists),
            Err(e) => Err(StoreError::backend(e)),
        }
    }

    fn delete(&self, key: &str) -> Result<DeleteOutcome, StoreError> {
        let path = object_path(key)?;

        // S3 and the in-memory store report success for missing keys, so
        // presence is checked before deleting.
        self.runtime.block_on(async {
            match self.store.head(&path).await {
                Ok(_) => {}
                Err(object_store::Error::NotFound { .. }) => return Ok(DeleteOutcome::NotFound),
                Err(e) => return Err(StoreError::backend(e)),
            }

            match self.store.delete(&path).await {
                Ok(()) => Ok(DeleteOutcome::Deleted),
                Err(object_store::Error::NotFound { .. }) => Ok(DeleteOutcome::NotFound),
                Err(e) => Err(StoreError::backend(e)),
            }
        })
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = object_path(key)?;

        self.runtime.block_on(async {
            match self.store.get(&path).await {
                Ok(result) => {
                    let bytes = result.bytes().await.map_err(StoreError::backend)?;
                    Ok(Some(bytes.to_vec()))
                }
                Err(object_store::Error::NotFound { .. }) => Ok(None),
                Err(e) => Err(StoreError::backend(e)),
            }
        })
    }
}
