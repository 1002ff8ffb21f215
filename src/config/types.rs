//! Configuration types and defaults for ensure-unique.
//!
//! This module defines enums, constants, and default value functions
//! used by the Config struct.

use serde::{Deserialize, Serialize};

/// Name of the config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ensure-unique.yaml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ENSURE_UNIQUE_CONFIG";

/// Environment variables overriding individual settings.
pub const BUCKET_ENV: &str = "ENSURE_UNIQUE_BUCKET";
pub const PREFIX_ENV: &str = "ENSURE_UNIQUE_PREFIX";
pub const BACKEND_ENV: &str = "ENSURE_UNIQUE_BACKEND";
pub const RUNTIME_ENV: &str = "ENSURE_UNIQUE_RUNTIME";

/// Namespace used by the `file` and `memory` backends when no bucket is set.
pub const DEFAULT_NAMESPACE: &str = "ensure-unique";

/// Which store holds lock records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Amazon S3 or an S3-compatible service (default).
    #[default]
    S3,
    /// A directory, typically on a filesystem shared between hosts.
    File,
    /// Process-local memory. No exclusion across processes.
    Memory,
}

impl StoreBackend {
    /// Parse a backend from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "s3" => Some(Self::S3),
            "file" => Some(Self::File),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

// Default value functions for serde
pub(crate) fn default_prefix() -> String {
    "ensure-unique/".to_string()
}
pub(crate) fn default_runtime() -> String {
    "dotnet".to_string()
}
