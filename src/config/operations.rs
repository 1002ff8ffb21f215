//! Config loading, layering, validation, and store construction.

use super::model::Config;
use super::types::*;
use crate::error::{EnsureUniqueError, Result};
use crate::locks::{LockStore, ObjectStoreLockStore, S3Settings};
use std::path::{Path, PathBuf};

/// Values given on the command line, applied last.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            EnsureUniqueError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string. Does not validate; layering may still
    /// fill in required values.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            EnsureUniqueError::UserError(format!("failed to parse config YAML: {}", e))
        })
    }

    /// Build the effective config: defaults, then the config file, then the
    /// process environment, then `overrides`. The result is validated.
    pub fn resolve(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let env = |name: &str| std::env::var(name).ok();
        let cwd = std::env::current_dir().map_err(|e| {
            EnsureUniqueError::UserError(format!("failed to read working directory: {}", e))
        })?;
        Self::resolve_with(config_path, overrides, &env, &cwd)
    }

    pub(crate) fn resolve_with(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
        env: &dyn Fn(&str) -> Option<String>,
        cwd: &Path,
    ) -> Result<Self> {
        let mut config = match locate_config_file(config_path, env, cwd) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::load(&path)?
            }
            None => Self::default(),
        };

        config.apply_env(env)?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply `ENSURE_UNIQUE_*` variables. Empty values are ignored.
    pub fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        let get = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get(BACKEND_ENV) {
            self.backend = StoreBackend::from_str(&backend).ok_or_else(|| {
                EnsureUniqueError::UserError(format!(
                    "invalid {} '{}': expected one of s3, file, memory",
                    BACKEND_ENV, backend
                ))
            })?;
        }
        if let Some(bucket) = get(BUCKET_ENV) {
            self.bucket = Some(bucket);
        }
        if let Some(prefix) = get(PREFIX_ENV) {
            self.prefix = prefix;
        }
        if let Some(runtime) = get(RUNTIME_ENV) {
            self.runtime = runtime;
        }

        Ok(())
    }

    /// Apply command-line values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(bucket) = &overrides.bucket {
            self.bucket = Some(bucket.clone());
        }
        if let Some(prefix) = &overrides.prefix {
            self.prefix = prefix.clone();
        }
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - the `s3` backend needs a non-empty `bucket`
    /// - the `file` backend needs a `root`
    /// - `prefix` must not start with `/`
    /// - `runtime` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.backend == StoreBackend::S3
            && self.bucket.as_deref().is_none_or(|b| b.trim().is_empty())
        {
            return Err(EnsureUniqueError::UserError(format!(
                "config validation failed: no bucket configured for the s3 backend. \
                 Use --bucket, {} or 'bucket' in {}.",
                BUCKET_ENV, DEFAULT_CONFIG_FILE
            )));
        }

        if self.backend == StoreBackend::File && self.root.is_none() {
            return Err(EnsureUniqueError::UserError(
                "config validation failed: the file backend requires 'root'".to_string(),
            ));
        }

        if self.prefix.starts_with('/') {
            return Err(EnsureUniqueError::UserError(format!(
                "config validation failed: prefix must not start with '/' (found '{}'). Use '{}' instead.",
                self.prefix,
                self.prefix.trim_start_matches('/')
            )));
        }

        if self.runtime.trim().is_empty() {
            return Err(EnsureUniqueError::UserError(
                "config validation failed: runtime must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    /// The namespace lock records are written into.
    pub fn namespace(&self) -> &str {
        self.bucket.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Open the configured lock store.
    pub fn open_store(&self) -> Result<Box<dyn LockStore>> {
        let namespace = self.namespace();

        let store = match self.backend {
            StoreBackend::S3 => ObjectStoreLockStore::s3(&S3Settings {
                bucket: namespace.to_string(),
                region: self.region.clone(),
                endpoint: self.endpoint.clone(),
                allow_http: self.allow_http,
            }),
            StoreBackend::File => {
                let root = self.root.as_deref().ok_or_else(|| {
                    EnsureUniqueError::UserError(
                        "the file backend requires 'root'".to_string(),
                    )
                })?;
                ObjectStoreLockStore::local(root, namespace)
            }
            StoreBackend::Memory => {
                tracing::warn!("memory backend gives no exclusion across processes");
                ObjectStoreLockStore::in_memory(namespace)
            }
        };

        let store = store.map_err(|source| EnsureUniqueError::Store {
            namespace: namespace.to_string(),
            key: self.prefix.clone(),
            source,
        })?;
        Ok(Box::new(store))
    }
}

/// Pick the config file: explicit path, then `ENSURE_UNIQUE_CONFIG`, then
/// `ensure-unique.yaml` in `cwd` if it exists.
fn locate_config_file(
    explicit: Option<&Path>,
    env: &dyn Fn(&str) -> Option<String>,
    cwd: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env(CONFIG_ENV).filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }

    let default = cwd.join(DEFAULT_CONFIG_FILE);
    default.is_file().then_some(default)
}
