//! Configuration model for ensure-unique.
//!
//! This module defines the Config struct that represents `ensure-unique.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, layering of environment variables
//! and command-line flags over the file, and validation of the result.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use operations::ConfigOverrides;
pub use types::StoreBackend;
