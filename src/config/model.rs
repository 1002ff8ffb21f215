//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for ensure-unique.
///
/// This struct represents the contents of `ensure-unique.yaml`, after
/// environment and command-line overrides have been applied.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Store settings
    // =========================================================================
    /// Which store holds lock records.
    #[serde(default)]
    pub backend: StoreBackend,

    /// Namespace for lock records (the S3 bucket name). Required for `s3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Prefix prepended to the token to form the record key.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Root directory for the `file` backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    // =========================================================================
    // S3 connection settings
    // =========================================================================
    /// AWS region. Falls back to `AWS_REGION` / `AWS_DEFAULT_REGION`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Allow plain HTTP endpoints.
    #[serde(default)]
    pub allow_http: bool,

    // =========================================================================
    // Execution settings
    // =========================================================================
    /// Host program used to start managed-runtime targets.
    #[serde(default = "default_runtime")]
    pub runtime: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            bucket: None,
            prefix: default_prefix(),
            root: None,
            region: None,
            endpoint: None,
            allow_http: false,
            runtime: default_runtime(),
        }
    }
}
