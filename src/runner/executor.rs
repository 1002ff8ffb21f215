//! Protected process execution.
//!
//! Starts the target with inherited stdio, waits for it, and reports its exit
//! code. Failing to start is an error; a non-zero exit is a normal result.

use crate::error::{EnsureUniqueError, Result};
use crate::invocation::{Invocation, TargetKind};
use std::process::{Command, ExitStatus};

/// Runs an [`Invocation`] to completion.
pub trait ProcessExecutor {
    /// Start the process, wait for it, and return its exit code.
    fn execute(&self, invocation: &Invocation) -> Result<i32>;
}

/// Executor that spawns real OS processes.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    /// Host program for managed-runtime targets (e.g. `dotnet`).
    runtime: String,
}

impl SystemExecutor {
    pub fn new(runtime: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
        }
    }

    /// Build the OS command for an invocation.
    fn command(&self, invocation: &Invocation) -> Command {
        match invocation.kind {
            TargetKind::DotNet => {
                let mut command = Command::new(&self.runtime);
                command.arg(&invocation.target).args(&invocation.args);
                command
            }
            TargetKind::Executable => {
                let mut command = Command::new(&invocation.target);
                command.args(&invocation.args);
                command
            }
        }
    }

    fn program_name(&self, invocation: &Invocation) -> String {
        match invocation.kind {
            TargetKind::DotNet => self.runtime.clone(),
            TargetKind::Executable => invocation.target.display().to_string(),
        }
    }
}

impl ProcessExecutor for SystemExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<i32> {
        let mut command = self.command(invocation);

        tracing::debug!(command = %invocation, "starting protected process");
        let status = command.status().map_err(|source| EnsureUniqueError::Launch {
            program: self.program_name(invocation),
            source,
        })?;

        Ok(exit_code_of(status))
    }
}

/// Exit code of a finished process.
///
/// On Unix a signal-terminated child reports `128 + signal`, as shells do.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    crate::exit_codes::FAILURE
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(script: &str) -> Invocation {
        Invocation::new(
            TargetKind::Executable,
            "sh",
            vec!["-c".to_string(), script.to_string()],
        )
    }

    #[test]
    fn test_execute_returns_zero_on_success() {
        let executor = SystemExecutor::new("dotnet");
        let code = executor
            .execute(&Invocation::new(
                TargetKind::Executable,
                "echo",
                vec!["hello".to_string()],
            ))
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_execute_propagates_exit_code() {
        let executor = SystemExecutor::new("dotnet");
        assert_eq!(executor.execute(&sh("exit 3")).unwrap(), 3);
    }

    #[test]
    fn test_execute_reports_signal_as_128_plus_signal() {
        let executor = SystemExecutor::new("dotnet");
        assert_eq!(executor.execute(&sh("kill -9 $$")).unwrap(), 128 + 9);
    }

    #[test]
    fn test_missing_executable_is_launch_error() {
        let executor = SystemExecutor::new("dotnet");
        let err = executor
            .execute(&Invocation::new(
                TargetKind::Executable,
                "/nonexistent/ensure-unique-test-binary",
                Vec::new(),
            ))
            .unwrap_err();

        match err {
            EnsureUniqueError::Launch { program, .. } => {
                assert_eq!(program, "/nonexistent/ensure-unique-test-binary")
            }
            other => panic!("expected launch error, got {:?}", other),
        }
    }

    #[test]
    fn test_dotnet_target_runs_through_runtime_host() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out.txt");

        // `sh` stands in for the runtime host: it receives the target first.
        let executor = SystemExecutor::new("sh");
        let script = temp_dir.path().join("job.sh");
        std::fs::write(&script, "printf '%s' \"$1\" > \"$2\"\n").unwrap();

        let invocation = Invocation::new(
            TargetKind::DotNet,
            &script,
            vec!["from-host".to_string(), out.display().to_string()],
        );
        assert_eq!(executor.execute(&invocation).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "from-host");
    }

    #[test]
    fn test_missing_runtime_host_is_launch_error_naming_host() {
        let executor = SystemExecutor::new("/nonexistent/dotnet-host");
        let err = executor
            .execute(&Invocation::new(TargetKind::DotNet, "App.dll", Vec::new()))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dotnet-host"));
    }
}
