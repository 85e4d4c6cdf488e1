//! Execution results
//!
//! An `ExecutionResult` wraps the snapshot a unit produced when it
//! finished running. It owns the snapshot outright, so later mutation of
//! the unit can never change a result already handed to the caller.

use crate::domain::unit::{UnitSnapshot, UnitStatus};
use crate::error::PipelineError;

/// Immutable result of one executed work unit
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    snapshot: UnitSnapshot,
}

impl ExecutionResult {
    pub fn from_snapshot(snapshot: UnitSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &UnitSnapshot {
        &self.snapshot
    }

    /// Display label of the underlying unit
    pub fn label(&self) -> String {
        self.snapshot.label()
    }

    pub fn status(&self) -> UnitStatus {
        self.snapshot.status
    }

    /// Whether the unit finished in `Success` or `Warning`
    pub fn successful(&self) -> bool {
        matches!(
            self.snapshot.status,
            UnitStatus::Success | UnitStatus::Warning
        )
    }

    /// Whether the unit finished in `Warning` exactly
    pub fn successful_with_warnings(&self) -> bool {
        self.snapshot.status == UnitStatus::Warning
    }

    pub fn failed(&self) -> bool {
        self.snapshot.status == UnitStatus::Failed
    }

    /// 0 for `Success`/`Warning`, 1 for `Failed`, `None` otherwise
    pub fn exit_code(&self) -> Option<i32> {
        match self.snapshot.status {
            UnitStatus::Success | UnitStatus::Warning => Some(0),
            UnitStatus::Failed => Some(1),
            UnitStatus::Waiting | UnitStatus::Running => None,
        }
    }

    pub fn output(&self) -> Option<&str> {
        self.snapshot.output.as_deref()
    }

    pub fn contains_in_output(&self, text: &str) -> bool {
        self.output().is_some_and(|output| output.contains(text))
    }

    pub fn error_messages(&self) -> &[String] {
        &self.snapshot.error_messages
    }

    pub fn warning_messages(&self) -> &[String] {
        &self.snapshot.warning_messages
    }

    /// All recorded error messages joined by newlines
    pub fn error_output(&self) -> String {
        self.snapshot.error_messages.join("\n")
    }

    /// All recorded warning messages joined by newlines
    pub fn warning_output(&self) -> String {
        self.snapshot.warning_messages.join("\n")
    }

    pub fn contains_in_error_output(&self, text: &str) -> bool {
        self.error_output().contains(text)
    }

    pub fn contains_in_warning_output(&self, text: &str) -> bool {
        self.warning_output().contains(text)
    }

    /// Returns the result unchanged unless the unit failed
    ///
    /// This assertion is caller opt-in; the engine never raises it on its
    /// own.
    pub fn ensure_successful(self) -> Result<Self, PipelineError> {
        self.ensure_successful_with(|_| {})
    }

    /// Like [`ensure_successful`](Self::ensure_successful), invoking
    /// `on_failure` with the result before raising
    pub fn ensure_successful_with<F>(self, on_failure: F) -> Result<Self, PipelineError>
    where
        F: FnOnce(&Self),
    {
        if !self.failed() {
            return Ok(self);
        }

        on_failure(&self);

        Err(PipelineError::unit_failed(
            self.label(),
            self.snapshot.error_messages.clone(),
        ))
    }

    /// Applies [`ensure_successful`](Self::ensure_successful) only when
    /// `condition` holds
    pub fn ensure_if(self, condition: bool) -> Result<Self, PipelineError> {
        if condition {
            self.ensure_successful()
        } else {
            Ok(self)
        }
    }

    /// Like [`ensure_if`](Self::ensure_if), invoking `on_failure` with the
    /// result before raising
    pub fn ensure_if_with<F>(self, condition: bool, on_failure: F) -> Result<Self, PipelineError>
    where
        F: FnOnce(&Self),
    {
        if condition {
            self.ensure_successful_with(on_failure)
        } else {
            Ok(self)
        }
    }
}
