//! Terminal view
//!
//! Owns cursor visibility and in-place redraw of the unit list. The
//! cursor is hidden on creation and restored on drop, so every exit path
//! unwinds the terminal exactly once.

use std::io::{self, Write};

use crossterm::{cursor, execute, terminal};

/// Redraws a block of lines in place on stdout
pub struct TerminalView {
    lines_drawn: u16,
}

impl TerminalView {
    pub fn new() -> io::Result<Self> {
        execute!(io::stdout(), cursor::Hide)?;
        Ok(Self { lines_drawn: 0 })
    }

    /// Draws the frame, replacing whatever this view drew previously
    pub fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        let mut stdout = io::stdout();

        if self.lines_drawn > 0 {
            execute!(stdout, cursor::MoveUp(self.lines_drawn))?;
        }

        for line in lines {
            execute!(stdout, terminal::Clear(terminal::ClearType::CurrentLine))?;
            writeln!(stdout, "{line}")?;
        }

        stdout.flush()?;
        self.lines_drawn = lines.len() as u16;
        Ok(())
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show);
    }
}
