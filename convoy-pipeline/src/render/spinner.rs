//! Default spinner theme
//!
//! One line per unit: a distinct glyph for each terminal status and an
//! animated braille spinner while the unit is waiting or running.

use colored::Colorize;
use convoy_core::domain::unit::{UnitSnapshot, UnitStatus};

use crate::render::Renderer;

/// The frames of the spinner
const FRAMES: [char; 8] = ['⠂', '⠒', '⠐', '⠰', '⠠', '⠤', '⠄', '⠆'];

/// The frame to render when the list is only drawn once
const STATIC_FRAME: char = '⠶';

/// Default renderer
#[derive(Debug, Default)]
pub struct SpinnerRenderer;

impl SpinnerRenderer {
    pub fn new() -> Self {
        Self
    }

    fn line(unit: &UnitSnapshot, frame: char) -> String {
        match unit.status {
            UnitStatus::Success => format!("  {} {}", "✔".green(), unit.label()),
            UnitStatus::Warning => format!("  {} {}", "⚠".yellow(), unit.label()),
            UnitStatus::Failed => format!("  {} {}", "✖".red(), unit.label()),
            UnitStatus::Waiting | UnitStatus::Running => {
                format!("  {} {}", frame.to_string().cyan(), unit.label())
            }
        }
    }
}

impl Renderer for SpinnerRenderer {
    fn render(&self, units: &[UnitSnapshot], frame_count: usize) -> Vec<String> {
        let frame = FRAMES[frame_count % FRAMES.len()];
        units.iter().map(|unit| Self::line(unit, frame)).collect()
    }

    fn render_static(&self, units: &[UnitSnapshot]) -> Vec<String> {
        units
            .iter()
            .map(|unit| Self::line(unit, STATIC_FRAME))
            .collect()
    }
}
