//! Protected process execution.
//!
//! - `executor`: starts the target and waits for its exit code
//! - `orchestrator`: binds the lock's lifetime to the process's lifetime

mod executor;
mod orchestrator;

pub use executor::{ProcessExecutor, SystemExecutor};
pub use orchestrator::{RunOutcome, run};
