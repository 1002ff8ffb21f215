//! Command implementations for ensure-unique.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations and turns each outcome into the process exit code.

use crate::cli::{Command, GlobalArgs, LockAction, LockClearArgs, LockShowArgs};
use crate::config::{Config, ConfigOverrides};
use crate::error::{EnsureUniqueError, Result};
use crate::exit_codes;
use crate::invocation::{Invocation, TargetKind};
use crate::locks::ConcurrencyService;
use crate::runner::{self, RunOutcome, SystemExecutor};
use crate::token::{Token, TokenSource};

/// Dispatch a command to its implementation.
///
/// Returns the exit code to report. Errors carry their own exit code.
pub fn dispatch(global: GlobalArgs, command: Command) -> Result<i32> {
    let tokens = TokenSource::from_override(global.token.clone());

    match command {
        Command::Dotnet(args) => cmd_run(&global, &tokens, args.into_invocation(TargetKind::DotNet)),
        Command::Exe(args) => {
            cmd_run(&global, &tokens, args.into_invocation(TargetKind::Executable))
        }
        Command::Token(cmd) => cmd_token(&tokens, cmd.target.into_invocation()),
        Command::Lock(lock_cmd) => match lock_cmd.action {
            LockAction::Show(args) => cmd_lock_show(&global, args),
            LockAction::Clear(args) => cmd_lock_clear(&global, args),
        },
    }
}

fn load_config(global: &GlobalArgs) -> Result<Config> {
    let overrides = ConfigOverrides {
        bucket: global.bucket.clone(),
        prefix: global.prefix.clone(),
    };
    Config::resolve(global.config.as_deref(), &overrides)
}

fn open_service(config: &Config) -> Result<ConcurrencyService> {
    Ok(ConcurrencyService::new(
        config.open_store()?,
        config.prefix.clone(),
    ))
}

fn cmd_run(global: &GlobalArgs, tokens: &TokenSource, invocation: Invocation) -> Result<i32> {
    let config = load_config(global)?;
    let service = open_service(&config)?;
    let executor = SystemExecutor::new(config.runtime.clone());
    let token = tokens.generate(&invocation);

    match runner::run(&service, &executor, &token, &invocation)? {
        RunOutcome::Completed { exit_code } => Ok(exit_code),
        RunOutcome::Skipped => {
            eprintln!(
                "Skipped: '{}' is already running (lock {}).",
                invocation,
                service.key_for(&token)
            );
            Ok(exit_codes::ALREADY_RUNNING)
        }
    }
}

fn cmd_token(tokens: &TokenSource, invocation: Invocation) -> Result<i32> {
    println!("{}", tokens.generate(&invocation));
    Ok(exit_codes::SUCCESS)
}

fn cmd_lock_show(global: &GlobalArgs, args: LockShowArgs) -> Result<i32> {
    let config = load_config(global)?;
    let service = open_service(&config)?;
    let token = Token::new(args.name);

    let Some(record) = service.inspect(&token)? else {
        println!("No lock for {}.", service.key_for(&token));
        return Ok(exit_codes::SUCCESS);
    };

    println!("Lock:       {}", record.key);
    match record.metadata {
        Some(meta) => {
            println!("Command:    {}", meta.command);
            println!("Owner:      {}", meta.owner);
            if let Some(pid) = meta.pid {
                println!("PID:        {}", pid);
            }
            println!("Created:    {} ({} ago)", meta.created_at.to_rfc3339(), meta.age_string());
        }
        None => println!("Metadata:   (unreadable)"),
    }

    Ok(exit_codes::SUCCESS)
}

fn cmd_lock_clear(global: &GlobalArgs, args: LockClearArgs) -> Result<i32> {
    if !args.force {
        return Err(EnsureUniqueError::Lock(format!(
            "refusing to clear lock '{}' without --force.\n\
             Clearing a lock held by a running job lets a second copy start.",
            args.name
        )));
    }

    let config = load_config(global)?;
    let service = open_service(&config)?;
    let token = Token::new(args.name);
    let key = service.key_for(&token);

    if !service.clear(&token)? {
        return Err(EnsureUniqueError::Lock(format!("no lock at {}", key)));
    }

    tracing::info!(lock = %key, "lock cleared by operator");
    println!("Cleared lock {}.", key);
    Ok(exit_codes::SUCCESS)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cli::TargetArgs;
    use tempfile::TempDir;

    /// Global args pointing at a file-backend config inside `temp_dir`.
    fn file_backend(temp_dir: &TempDir, token: Option<&str>) -> GlobalArgs {
        let config = temp_dir.path().join("ensure-unique.yaml");
        std::fs::write(
            &config,
            format!(
                "backend: file\nbucket: jobs\nroot: {}\n",
                temp_dir.path().join("store").display()
            ),
        )
        .unwrap();

        GlobalArgs {
            verbose: 0,
            quiet: false,
            token: token.map(str::to_string),
            bucket: None,
            prefix: None,
            config: Some(config),
        }
    }

    fn sh(script: &str) -> Command {
        Command::Exe(TargetArgs {
            target: "sh".into(),
            args: vec!["-c".to_string(), script.to_string()],
        })
    }

    fn lock_path(temp_dir: &TempDir, token: &str) -> std::path::PathBuf {
        temp_dir
            .path()
            .join("store")
            .join("jobs")
            .join("ensure-unique")
            .join(token)
    }

    #[test]
    fn run_propagates_exit_code_and_removes_lock() {
        let temp_dir = TempDir::new().unwrap();
        let global = file_backend(&temp_dir, Some("job"));

        assert_eq!(dispatch(global, sh("exit 3")).unwrap(), 3);
        assert!(!lock_path(&temp_dir, "job").exists());
    }

    #[test]
    fn run_sees_its_own_lock_while_running() {
        let temp_dir = TempDir::new().unwrap();
        let global = file_backend(&temp_dir, Some("job"));
        let lock = lock_path(&temp_dir, "job");

        let script = format!("test -f '{}'", lock.display());
        assert_eq!(dispatch(global, sh(&script)).unwrap(), 0);
        assert!(!lock.exists());
    }

    #[test]
    fn run_is_skipped_while_lock_is_held() {
        let temp_dir = TempDir::new().unwrap();
        let marker = temp_dir.path().join("ran");
        let lock = lock_path(&temp_dir, "job");
        std::fs::create_dir_all(lock.parent().unwrap()).unwrap();
        std::fs::write(&lock, "{}").unwrap();

        let global = file_backend(&temp_dir, Some("job"));
        let script = format!("touch '{}'", marker.display());

        assert_eq!(
            dispatch(global, sh(&script)).unwrap(),
            exit_codes::ALREADY_RUNNING
        );
        assert!(!marker.exists());
        assert_eq!(std::fs::read_to_string(&lock).unwrap(), "{}");
    }

    #[test]
    fn lock_clear_requires_force() {
        let temp_dir = TempDir::new().unwrap();
        let global = file_backend(&temp_dir, None);
        let command = Command::Lock(crate::cli::LockCommand {
            action: LockAction::Clear(LockClearArgs {
                name: "job".to_string(),
                force: false,
            }),
        });

        let err = dispatch(global, command).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::LOCK_FAILURE);
    }

    #[test]
    fn lock_clear_removes_orphaned_lock() {
        let temp_dir = TempDir::new().unwrap();
        let lock = lock_path(&temp_dir, "job");
        std::fs::create_dir_all(lock.parent().unwrap()).unwrap();
        std::fs::write(&lock, "{}").unwrap();

        let clear = || {
            Command::Lock(crate::cli::LockCommand {
                action: LockAction::Clear(LockClearArgs {
                    name: "job".to_string(),
                    force: true,
                }),
            })
        };

        assert_eq!(
            dispatch(file_backend(&temp_dir, None), clear()).unwrap(),
            exit_codes::SUCCESS
        );
        assert!(!lock.exists());

        let err = dispatch(file_backend(&temp_dir, None), clear()).unwrap_err();
        assert!(err.to_string().contains("no lock at"));
    }

    #[test]
    fn missing_program_is_launch_failure() {
        let temp_dir = TempDir::new().unwrap();
        let global = file_backend(&temp_dir, Some("job"));
        let command = Command::Exe(TargetArgs {
            target: "/nonexistent/ensure-unique-test-binary".into(),
            args: Vec::new(),
        });

        let err = dispatch(global, command).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::LAUNCH_FAILURE);
        assert!(!lock_path(&temp_dir, "job").exists());
    }

    #[test]
    fn missing_bucket_is_user_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("empty.yaml");
        std::fs::write(&config, "backend: s3\n").unwrap();
        let global = GlobalArgs {
            verbose: 0,
            quiet: false,
            token: None,
            bucket: None,
            prefix: None,
            config: Some(config),
        };

        let err = dispatch(global, sh("true")).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }
}
