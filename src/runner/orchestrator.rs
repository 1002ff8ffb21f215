//! The run protocol: acquire, execute, always release.

use super::executor::ProcessExecutor;
use crate::error::Result;
use crate::invocation::Invocation;
use crate::locks::{Acquisition, ConcurrencyService};
use crate::token::Token;

/// Final result of one protected run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process ran and exited with this code.
    Completed { exit_code: i32 },
    /// Another invocation holds the lock; nothing was started.
    Skipped,
}

/// Run `invocation` under the lock named by `token`.
///
/// If the lock is busy the executor is never called. Once the lock is held
/// it is released on every path out of the executor; a release failure is
/// logged and never replaces the process's own result.
pub fn run(
    service: &ConcurrencyService,
    executor: &dyn ProcessExecutor,
    token: &Token,
    invocation: &Invocation,
) -> Result<RunOutcome> {
    let command = invocation.to_string();

    let guard = match service.acquire(token, &command)? {
        Acquisition::Acquired(guard) => guard,
        Acquisition::AlreadyLocked { key, holder } => {
            match holder {
                Some(holder) => tracing::warn!(
                    lock = %key,
                    owner = %holder.owner,
                    age = %holder.age_string(),
                    "already running, skipping"
                ),
                None => tracing::warn!(lock = %key, "already running, skipping"),
            }
            return Ok(RunOutcome::Skipped);
        }
    };

    let key = guard.key().clone();
    // A panic inside the executor unwinds through `guard`, whose drop releases.
    let result = executor.execute(invocation);

    if let Err(e) = service.release(guard) {
        tracing::error!(lock = %key, error = %e, "failed to release lock; it may now be orphaned");
    }

    let exit_code = result?;
    tracing::info!(lock = %key, exit_code, "protected process finished");
    Ok(RunOutcome::Completed { exit_code })
}
