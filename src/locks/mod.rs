//! Locking subsystem for ensure-unique.
//!
//! A lock is a single object in a shared store. Presence means "locked",
//! absence means "free".
//!
//! # Lock Records
//!
//! Records live at `<prefix><token>` inside one namespace (an S3 bucket, a
//! directory, or an in-memory map). They are created with **create-if-absent**
//! semantics, so the store alone decides which of several racing invocations
//! wins. No client-side coordination exists.
//!
//! # Lock Metadata
//!
//! Each record body contains JSON metadata for operators:
//! - `token`: The execution token
//! - `command`: The protected command line
//! - `owner`: The owner of the lock (e.g., `user@HOST`)
//! - `pid`: The process ID (optional)
//! - `created_at`: RFC3339 timestamp
//!
//! Readers never depend on the body for correctness.
//!
//! # RAII Guards
//!
//! A successful acquire returns a [`LockGuard`]. The orchestrator releases it
//! explicitly so it can report the outcome; if the guard is dropped without
//! that (for example while unwinding), the drop handler deletes the record and
//! logs a warning on failure.

mod guard;
mod key;
mod metadata;
mod remote;
mod service;
mod store;


// Re-export public API
pub use guard::LockGuard;
pub use key::LockKey;
pub use metadata::LockMetadata;
pub use remote::{ObjectStoreLockStore, S3Settings};
pub use service::{Acquisition, ConcurrencyService, LockRecord};
pub use store::{CreateOutcome, DeleteOutcome, LockStore, StoreError};
