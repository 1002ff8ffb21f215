//! Description of the command a run protects.
//!
//! An [`Invocation`] is resolved once from the command line and is then used
//! twice: to derive the execution token and to start the process.

use std::fmt;
use std::path::PathBuf;

/// How the target is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A managed-runtime assembly, started through the runtime host
    /// (e.g. `dotnet app.dll`).
    DotNet,
    /// A native executable, started directly.
    Executable,
}

impl TargetKind {
    /// Stable tag used in the canonical form and in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::DotNet => "dotnet",
            TargetKind::Executable => "exe",
        }
    }
}

/// The fully-resolved command a run protects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// How the target is started.
    pub kind: TargetKind,
    /// Assembly or executable path, as given by the operator.
    pub target: PathBuf,
    /// Arguments passed to the target.
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(kind: TargetKind, target: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            args,
        }
    }

    /// Byte form hashed into the execution token.
    ///
    /// Components are NUL-terminated so moving text between the target and an
    /// argument (or between two arguments) always changes the bytes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let target = self.target.as_os_str().as_encoded_bytes();
        let mut bytes = Vec::with_capacity(
            self.kind.as_str().len()
                + target.len()
                + self.args.iter().map(|a| a.len() + 1).sum::<usize>()
                + 2,
        );

        for part in std::iter::once(self.kind.as_str().as_bytes())
            .chain(std::iter::once(target))
            .chain(self.args.iter().map(String::as_bytes))
        {
            bytes.extend_from_slice(part);
            bytes.push(0);
        }

        bytes
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.target.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
