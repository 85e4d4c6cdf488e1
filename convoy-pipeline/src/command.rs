//! Process invocation
//!
//! Thin wrapper over `std::process::Command` used for command-line work
//! units. Shell strings go through `sh -c`; argument vectors run the
//! program directly. Spawn failures are folded into a failed outcome so
//! callers only ever look at one success flag.

use std::process::Command;
use tracing::debug;

/// A command line ready to run
pub struct CommandInvocation {
    program: String,
    args: Vec<String>,
}

impl CommandInvocation {
    /// Builds an invocation that parses `command` through `sh -c`
    pub fn shell(command: impl Into<String>) -> Self {
        Self {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), command.into()],
        }
    }

    /// Builds an invocation from an argument vector, no shell involved
    pub fn args(argv: Vec<String>) -> Self {
        let mut argv = argv.into_iter();
        let program = argv.next().unwrap_or_default();
        Self {
            program,
            args: argv.collect(),
        }
    }

    /// Runs the command to completion, capturing stdout and stderr
    pub fn run(&self) -> CommandOutcome {
        if self.program.is_empty() {
            return CommandOutcome::spawn_failure("empty command line".to_string());
        }

        let mut command = Command::new(&self.program);
        for arg in &self.args {
            command.arg(arg);
        }

        match command.output() {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                debug!(
                    program = %self.program,
                    success = output.status.success(),
                    "command finished"
                );

                CommandOutcome {
                    stdout,
                    stderr,
                    success: output.status.success(),
                }
            }
            Err(error) => CommandOutcome::spawn_failure(format!(
                "failed to run '{}': {}",
                self.program, error
            )),
        }
    }
}

/// Captured output and success flag of a finished command
pub struct CommandOutcome {
    stdout: String,
    stderr: String,
    success: bool,
}

impl CommandOutcome {
    fn spawn_failure(message: String) -> Self {
        Self {
            stdout: String::new(),
            stderr: message,
            success: false,
        }
    }

    pub fn output(&self) -> &str {
        &self.stdout
    }

    pub fn error_output(&self) -> &str {
        &self.stderr
    }

    pub fn is_successful(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_invocation() {
        let outcome = CommandInvocation::shell("echo hi").run();
        assert!(outcome.is_successful());
        assert!(outcome.output().contains("hi"));
    }

    #[test]
    fn test_argv_invocation() {
        let outcome =
            CommandInvocation::args(vec!["echo".to_string(), "hello".to_string()]).run();
        assert!(outcome.is_successful());
        assert!(outcome.output().contains("hello"));
    }

    #[test]
    fn test_nonzero_exit_is_unsuccessful() {
        let outcome = CommandInvocation::shell("exit 7").run();
        assert!(!outcome.is_successful());
    }

    #[test]
    fn test_spawn_failure_becomes_failed_outcome() {
        let outcome =
            CommandInvocation::args(vec!["definitely-not-a-real-binary-xyz".to_string()]).run();
        assert!(!outcome.is_successful());
        assert!(outcome.error_output().contains("failed to run"));
    }

    #[test]
    fn test_empty_command_line() {
        let outcome = CommandInvocation::args(vec![]).run();
        assert!(!outcome.is_successful());
    }
}
