//! Work units
//!
//! A unit is one schedulable job: either callable work that receives the
//! unit mutably so it can steer its own status and message bags, or a
//! command line executed through the process-invocation primitive.

use convoy_core::domain::result::ExecutionResult;
use convoy_core::domain::unit::{UnitSnapshot, UnitStatus};
use uuid::Uuid;

use crate::command::CommandInvocation;

/// The work a unit performs when it runs
pub enum UnitWork {
    /// Callable work; receives the unit so it can mutate status and bags
    Callable(Box<dyn FnOnce(&mut WorkUnit) -> anyhow::Result<bool> + Send>),
    /// A command line parsed through a shell
    Shell(String),
    /// A command given as an argument vector, no shell parsing
    Args(Vec<String>),
}

/// One schedulable job tracked by the pipeline
pub struct WorkUnit {
    id: Uuid,
    label: Option<String>,
    work: Option<UnitWork>,
    status: UnitStatus,
    output: Option<String>,
    error_messages: Vec<String>,
    warning_messages: Vec<String>,
}

impl WorkUnit {
    /// Creates a unit from callable work
    ///
    /// The callable may call [`succeed`](Self::succeed),
    /// [`warn`](Self::warn), [`fail`](Self::fail),
    /// [`add_warning`](Self::add_warning) and
    /// [`add_error`](Self::add_error) on the unit while it runs. Returning
    /// `Ok(false)` or `Err(..)` fails the unit.
    pub fn call<F>(work: F) -> Self
    where
        F: FnOnce(&mut WorkUnit) -> anyhow::Result<bool> + Send + 'static,
    {
        Self::new(UnitWork::Callable(Box::new(work)))
    }

    /// Creates a unit that runs a command line through a shell
    pub fn shell(command: impl Into<String>) -> Self {
        Self::new(UnitWork::Shell(command.into()))
    }

    /// Creates a unit that runs an argument vector without shell parsing
    pub fn command<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(UnitWork::Args(args.into_iter().map(Into::into).collect()))
    }

    fn new(work: UnitWork) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: None,
            work: Some(work),
            status: UnitStatus::Waiting,
            output: None,
            error_messages: Vec::new(),
            warning_messages: Vec::new(),
        }
    }

    /// Sets the label displayed in the terminal
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Marks the unit as succeeded; ignored once a terminal status is set
    pub fn succeed(&mut self) {
        self.set_status(UnitStatus::Success);
    }

    /// Marks the unit as finished with warnings
    pub fn warn(&mut self) {
        self.set_status(UnitStatus::Warning);
    }

    /// Marks the unit as failed
    pub fn fail(&mut self) {
        self.set_status(UnitStatus::Failed);
    }

    /// Records a warning message
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warning_messages.push(message.into());
    }

    /// Records an error message
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.error_messages.push(message.into());
    }

    /// Stores captured output, trimmed of surrounding whitespace
    pub fn set_output(&mut self, output: impl Into<String>) {
        self.output = Some(output.into().trim().to_string());
    }

    // First terminal status wins; later calls are ignored.
    fn set_status(&mut self, status: UnitStatus) {
        if self.status.is_finished() {
            return;
        }
        self.status = status;
    }

    /// Serializable view of the unit's current state
    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            label: self.label.clone(),
            status: self.status,
            output: self.output.clone(),
            error_messages: self.error_messages.clone(),
            warning_messages: self.warning_messages.clone(),
        }
    }

    /// Runs the unit to completion and returns its result
    ///
    /// Faults raised by callable work are captured into the error bag and
    /// force the failed status; they never escape this call.
    pub fn run(&mut self) -> ExecutionResult {
        self.set_status(UnitStatus::Running);

        match self.work.take() {
            Some(UnitWork::Callable(work)) => match work(self) {
                Ok(result) => self.apply_callable_outcome(result),
                Err(error) => {
                    self.add_error(error.to_string());
                    self.set_status(UnitStatus::Failed);
                }
            },
            Some(UnitWork::Shell(command)) => {
                self.run_invocation(CommandInvocation::shell(command));
            }
            Some(UnitWork::Args(args)) => {
                self.run_invocation(CommandInvocation::args(args));
            }
            None => {}
        }

        ExecutionResult::from_snapshot(self.snapshot())
    }

    // Outcome rule for callable work: an explicit terminal status set by
    // the work itself stands; otherwise a false return or a non-empty
    // error bag fails the unit, a non-empty warning bag downgrades it to
    // a warning, and everything else succeeds.
    fn apply_callable_outcome(&mut self, result: bool) {
        if self.status.is_finished() {
            return;
        }

        if !result || !self.error_messages.is_empty() {
            self.set_status(UnitStatus::Failed);
        } else if !self.warning_messages.is_empty() {
            self.set_status(UnitStatus::Warning);
        } else {
            self.set_status(UnitStatus::Success);
        }
    }

    // Command-line work trusts the invocation's own success flag; the
    // message bags are not consulted.
    fn run_invocation(&mut self, invocation: CommandInvocation) {
        let outcome = invocation.run();

        self.set_output(outcome.output());

        if outcome.is_successful() {
            self.set_status(UnitStatus::Success);
        } else {
            self.add_error(outcome.error_output().trim().to_string());
            self.set_status(UnitStatus::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_clean_callable_succeeds() {
        let mut unit = WorkUnit::call(|_| Ok(true)).label("clean");
        let result = unit.run();
        assert_eq!(result.status(), UnitStatus::Success);
        assert_eq!(result.exit_code(), Some(0));
    }

    #[test]
    fn test_false_return_fails() {
        let mut unit = WorkUnit::call(|_| Ok(false));
        assert!(unit.run().failed());
    }

    #[test]
    fn test_fault_is_captured_as_error_message() {
        let mut unit = WorkUnit::call(|_| Err(anyhow!("disk on fire")));
        let result = unit.run();
        assert!(result.failed());
        assert!(result.contains_in_error_output("disk on fire"));
    }

    #[test]
    fn test_error_bag_fails_even_on_true_return() {
        let mut unit = WorkUnit::call(|unit| {
            unit.add_error("some error");
            Ok(true)
        });
        let result = unit.run();
        assert!(result.failed());
        assert_eq!(result.exit_code(), Some(1));
    }

    #[test]
    fn test_warning_bag_downgrades_to_warning() {
        let mut unit = WorkUnit::call(|unit| {
            unit.add_warning("some warning");
            Ok(true)
        });
        let result = unit.run();
        assert!(result.successful());
        assert!(result.successful_with_warnings());
        assert_eq!(result.exit_code(), Some(0));
    }

    #[test]
    fn test_error_bag_outranks_warning_bag() {
        let mut unit = WorkUnit::call(|unit| {
            unit.add_warning("minor");
            unit.add_error("major");
            Ok(true)
        });
        assert!(unit.run().failed());
    }

    #[test]
    fn test_explicit_status_calls() {
        let mut unit = WorkUnit::call(|unit| {
            unit.fail();
            Ok(true)
        });
        assert!(unit.run().failed());

        let mut unit = WorkUnit::call(|unit| {
            unit.warn();
            Ok(true)
        });
        assert!(unit.run().successful_with_warnings());

        let mut unit = WorkUnit::call(|unit| {
            unit.succeed();
            Ok(false)
        });
        assert!(unit.run().successful());
    }

    #[test]
    fn test_first_terminal_status_wins() {
        let mut unit = WorkUnit::call(|unit| {
            unit.succeed();
            unit.fail();
            unit.warn();
            Ok(true)
        });
        assert_eq!(unit.run().status(), UnitStatus::Success);
    }

    #[test]
    fn test_shell_command_captures_output() {
        let mut unit = WorkUnit::shell("echo hi");
        let result = unit.run();
        assert!(result.successful());
        assert!(result.contains_in_output("hi"));
    }

    #[test]
    fn test_argv_command_captures_output() {
        let mut unit = WorkUnit::command(["echo", "hello"]);
        let result = unit.run();
        assert!(result.successful());
        assert!(result.contains_in_output("hello"));
    }

    #[test]
    fn test_failing_command_records_stderr() {
        let mut unit = WorkUnit::shell("echo oops >&2; exit 3");
        let result = unit.run();
        assert!(result.failed());
        assert!(result.contains_in_error_output("oops"));
    }

    #[test]
    fn test_missing_program_fails() {
        let mut unit = WorkUnit::command(["definitely-not-a-real-binary-xyz"]);
        assert!(unit.run().failed());
    }

    #[test]
    fn test_output_is_trimmed() {
        let mut unit = WorkUnit::shell("printf '  padded  \\n'");
        assert_eq!(unit.run().output(), Some("padded"));
    }

    #[test]
    fn test_label_builder() {
        let unit = WorkUnit::call(|_| Ok(true)).label("Task 1");
        assert_eq!(unit.snapshot().label(), "Task 1");
    }
}
