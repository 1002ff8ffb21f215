//! Error types for the ensure-unique CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Lock contention is deliberately absent: a busy lock is a normal outcome,
//! reported through `Acquisition::AlreadyLocked`, never through this type.

use crate::exit_codes;
use crate::locks::StoreError;
use thiserror::Error;

/// Main error type for ensure-unique operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum EnsureUniqueError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// The lock store could not be reached or refused the request.
    #[error("lock store failure for '{key}' in '{namespace}': {source}")]
    Store {
        namespace: String,
        key: String,
        #[source]
        source: StoreError,
    },

    /// The protected process could not be started.
    #[error("failed to start '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A lock maintenance command could not be carried out.
    #[error("{0}")]
    Lock(String),
}

impl EnsureUniqueError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            EnsureUniqueError::UserError(_) => exit_codes::USER_ERROR,
            EnsureUniqueError::Store { .. } => exit_codes::STORE_FAILURE,
            EnsureUniqueError::Launch { .. } => exit_codes::LAUNCH_FAILURE,
            EnsureUniqueError::Lock(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for ensure-unique operations.
pub type Result<T> = std::result::Result<T, EnsureUniqueError>;
