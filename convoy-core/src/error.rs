//! Error types for the Convoy workspace

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A unit finished failed and the caller asserted on its result
    #[error("unit '{label}' failed")]
    UnitFailed {
        /// Display label of the failed unit
        label: String,
        /// Error messages the unit recorded
        errors: Vec<String>,
    },

    /// The progress store could not grow enough to hold a snapshot
    #[error("progress store exceeded its capacity limit of {limit} bytes")]
    CapacityExceeded {
        /// The configured hard ceiling in bytes
        limit: usize,
    },

    /// The store mutex was poisoned by a panicking holder
    #[error("progress store lock poisoned")]
    LockPoisoned,

    /// The run was cancelled before every unit was dispatched
    #[error("pipeline interrupted")]
    Interrupted,

    /// Snapshot (de)serialization at the store boundary failed
    #[error("failed to encode unit snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing progress frames to the terminal failed
    #[error("terminal io error: {0}")]
    Io(#[from] std::io::Error),

    /// The worker pool lost a result it should have produced
    #[error("pipeline runtime error: {0}")]
    Runtime(String),
}

impl PipelineError {
    /// Create a unit-failed error from a label and its error bag
    pub fn unit_failed(label: impl Into<String>, errors: Vec<String>) -> Self {
        Self::UnitFailed {
            label: label.into(),
            errors,
        }
    }

    /// Check if this error came from a cancelled run
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Check if this error came from the store hitting its ceiling
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PipelineError::unit_failed("build", vec!["linker exploded".to_string()]);
        assert_eq!(error.to_string(), "unit 'build' failed");

        let error = PipelineError::CapacityExceeded { limit: 128_000_000 };
        assert!(error.to_string().contains("128000000"));
        assert!(error.is_capacity_exceeded());
    }

    #[test]
    fn test_interrupted_predicate() {
        assert!(PipelineError::Interrupted.is_interrupted());
        assert!(!PipelineError::LockPoisoned.is_interrupted());
    }
}
