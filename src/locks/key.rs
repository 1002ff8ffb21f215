//! Lock key derivation.

use crate::token::Token;
use object_store::path::{Path as ObjectPath, PathPart};
use std::fmt;

/// Address of one lock record: namespace plus `prefix + token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockKey {
    /// Bucket or directory holding the record.
    pub namespace: String,

    /// Key prefix shared by all records of this tool.
    pub prefix: String,

    /// The execution token.
    pub token: Token,
}

impl LockKey {
    pub fn new(namespace: impl Into<String>, prefix: impl Into<String>, token: Token) -> Self {
        Self {
            namespace: namespace.into(),
            prefix: prefix.into(),
            token,
        }
    }

    /// The key of the record inside its namespace.
    ///
    /// The token is always a single percent-encoded segment under the prefix,
    /// so with a fixed prefix this is injective in the token even when the
    /// token contains `/`.
    pub fn object_key(&self) -> String {
        ObjectPath::from(self.prefix.as_str())
            .child(PathPart::from(self.token.as_str()))
            .to_string()
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.object_key())
    }
}
