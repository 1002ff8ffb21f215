//! Execution token derivation.
//!
//! The token names one logical job. By default it is the SHA-256 of the
//! invocation's canonical form, so re-running the same command with the same
//! arguments always maps to the same lock. An operator can instead pin the
//! token explicitly, which groups different commands under one lock or splits
//! identical ones apart.

use crate::invocation::Invocation;
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque identifier naming one logical job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the token for a run comes from. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Hash the invocation.
    Derived,
    /// Use the operator-supplied value verbatim.
    Fixed(String),
}

impl TokenSource {
    /// Build the source from an optional `--token` value.
    ///
    /// A blank override is treated as absent.
    pub fn from_override(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => TokenSource::Fixed(token),
            _ => TokenSource::Derived,
        }
    }

    /// Produce the token for `invocation`. Pure and infallible.
    pub fn generate(&self, invocation: &Invocation) -> Token {
        match self {
            TokenSource::Fixed(token) => Token::new(token.clone()),
            TokenSource::Derived => {
                let digest = Sha256::digest(invocation.canonical_bytes());
                let token = Token::new(hex::encode(digest));
                tracing::debug!(%token, command = %invocation, "derived execution token");
                token
            }
        }
    }
}
