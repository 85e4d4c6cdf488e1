//! Unit status and snapshot types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Execution status of a single work unit
///
/// Statuses only move forward: `Waiting → Running` and then exactly one
/// of the three terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStatus {
    Waiting,
    Running,
    Success,
    Warning,
    Failed,
}

impl UnitStatus {
    /// Whether the unit has reached a terminal status
    pub fn is_finished(&self) -> bool {
        !matches!(self, UnitStatus::Waiting | UnitStatus::Running)
    }
}

/// Serializable view of a work unit at a point in time
///
/// This is the value that workers publish into the progress store and the
/// render loop reads back. It carries only displayable and
/// result-relevant fields; the unit's callable work never survives the
/// round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: Uuid,
    pub label: Option<String>,
    pub status: UnitStatus,
    pub output: Option<String>,
    pub error_messages: Vec<String>,
    pub warning_messages: Vec<String>,
}

impl UnitSnapshot {
    /// Display label, synthesized from the id when none was set
    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("Unit {}", &self.id.to_string()[..8]),
        }
    }
}
