//! CLI argument parsing for ensure-unique.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::invocation::{Invocation, TargetKind};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Execute a program and ensure there are no concurrent executions.
///
/// A lock record named after the command (or after --token) is created in a
/// shared object store before the program starts and deleted when it exits.
/// If the record already exists the program is not started and the tool
/// exits with code 75.
#[derive(Parser, Debug)]
#[command(name = "ensure-unique")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Options accepted by every command.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this token instead of one derived from the command.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Bucket (namespace) holding lock records.
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// Prefix prepended to the token to form the lock key.
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Path to a config file (default: ./ensure-unique.yaml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands for ensure-unique.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a .NET assembly through the runtime host.
    Dotnet(TargetArgs),

    /// Run a native executable.
    Exe(TargetArgs),

    /// Print the token a run would use, without touching the store.
    Token(TokenCommand),

    /// Lock maintenance commands.
    ///
    /// Inspect or clear lock records, e.g. after a run was killed before it
    /// could release its lock.
    Lock(LockCommand),
}

/// Target and arguments of a protected run.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Assembly or executable to run.
    pub target: PathBuf,

    /// Arguments passed to the target verbatim.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl TargetArgs {
    pub fn into_invocation(self, kind: TargetKind) -> Invocation {
        Invocation::new(kind, self.target, self.args)
    }
}

/// Arguments for the `token` command.
#[derive(Parser, Debug)]
pub struct TokenCommand {
    #[command(subcommand)]
    pub target: TokenTarget,
}

/// Target kinds accepted by `token`.
#[derive(Subcommand, Debug)]
pub enum TokenTarget {
    /// Token for a .NET assembly run.
    Dotnet(TargetArgs),

    /// Token for a native executable run.
    Exe(TargetArgs),
}

impl TokenTarget {
    pub fn into_invocation(self) -> Invocation {
        match self {
            TokenTarget::Dotnet(args) => args.into_invocation(TargetKind::DotNet),
            TokenTarget::Exe(args) => args.into_invocation(TargetKind::Executable),
        }
    }
}

/// Lock subcommands.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Available lock actions.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// Show the lock record for a token.
    Show(LockShowArgs),

    /// Delete the lock record for a token.
    ///
    /// Requires --force flag to prevent accidental clearing.
    Clear(LockClearArgs),
}

/// Arguments for the `lock show` command.
#[derive(Parser, Debug)]
pub struct LockShowArgs {
    /// Token whose lock record should be shown.
    #[arg(value_name = "TOKEN")]
    pub name: String,
}

/// Arguments for the `lock clear` command.
#[derive(Parser, Debug)]
pub struct LockClearArgs {
    /// Token whose lock record should be deleted.
    #[arg(value_name = "TOKEN")]
    pub name: String,

    /// Force clearing the lock (required for safety).
    #[arg(long)]
    pub force: bool,
}
