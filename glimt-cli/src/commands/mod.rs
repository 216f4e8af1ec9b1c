//! CLI command implementations

pub mod comment;
pub mod demo;
pub mod feed;
pub mod friends;
pub mod logs;
pub mod post;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use glimt_core::services::{EntryPoint, LogEvent, LoggingService};
use glimt_core::GlimtContext;

/// Get the glimt directory from environment or default
pub fn get_glimt_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GLIMT_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".glimt")
    }
}

/// Get or create the glimt context
pub fn get_context() -> Result<GlimtContext> {
    let glimt_dir = get_glimt_dir();

    std::fs::create_dir_all(&glimt_dir)
        .with_context(|| format!("Failed to create glimt directory: {:?}", glimt_dir))?;

    GlimtContext::new(&glimt_dir).context("Failed to initialize glimt context")
}

/// Resolve the caller identity from --user or the GLIMT_USER environment
pub fn resolve_identity(cli_user: Option<String>) -> Option<String> {
    cli_user
        .or_else(|| std::env::var("GLIMT_USER").ok())
        .filter(|u| !u.trim().is_empty())
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let glimt_dir = get_glimt_dir();
    // Ensure directory exists
    std::fs::create_dir_all(&glimt_dir).ok()?;
    LoggingService::new(&glimt_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record a failed command run in the event log
pub fn log_failure(command: &str, user: Option<&str>, error: &anyhow::Error) {
    let logger = get_logger();
    let mut event = LogEvent::new("command_failed")
        .with_command(command)
        .with_error(error.to_string());
    if let Some(user) = user {
        event = event.with_user(user);
    }
    log_event(&logger, event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_failure_writes_error_event() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("GLIMT_DIR", dir.path());

        let error = anyhow::anyhow!("Not found: post 42");
        log_failure("post", Some("alice@example.com"), &error);

        std::env::remove_var("GLIMT_DIR");

        let service =
            LoggingService::new(dir.path(), EntryPoint::Cli, env!("CARGO_PKG_VERSION")).unwrap();
        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "command_failed");
        assert_eq!(errors[0].command.as_deref(), Some("post"));
        assert_eq!(errors[0].user_context.as_deref(), Some("alice@example.com"));
        assert_eq!(errors[0].error_message.as_deref(), Some("Not found: post 42"));
    }
}
