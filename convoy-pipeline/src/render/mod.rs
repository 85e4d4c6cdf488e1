//! Live progress rendering
//!
//! The renderer contract consumed by the executor, the default spinner
//! theme, and the terminal view that owns cursor state and in-place
//! redraws.

pub mod spinner;
pub mod view;

use convoy_core::domain::unit::UnitSnapshot;

/// Produces one display line per unit
///
/// The executor calls `render` at a bounded interval while units are in
/// flight and exactly once more after every unit finishes; `frame_count`
/// selects the animation frame. `render_static` is the one-shot view used
/// when no animation loop runs.
pub trait Renderer: Send + Sync {
    fn render(&self, units: &[UnitSnapshot], frame_count: usize) -> Vec<String>;

    fn render_static(&self, units: &[UnitSnapshot]) -> Vec<String>;
}
