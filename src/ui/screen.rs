//! In-place redraw of a bounded region of lines.

use crate::{
    error::Result,
    ui::{
        console::Output,
        text::{last_line_column, line_count},
    },
};
use crossterm::{
    cursor::{MoveDown, MoveToColumn, MoveUp},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::Write;

/// Erases the `count` rows ending at the cursor row and leaves the cursor at
/// column 0 of the topmost erased row.
pub fn erase_lines<W: Write + ?Sized>(w: &mut W, count: usize) -> std::io::Result<()> {
    for row in 0..count {
        w.queue(Clear(ClearType::CurrentLine))?;
        if row + 1 < count {
            w.queue(MoveUp(1))?;
        }
    }
    if count > 0 {
        w.queue(MoveToColumn(0))?;
    }
    Ok(())
}

/// Tracks what a prompt last drew so the next frame can replace it.
pub struct Screen {
    output: Output,
    /// Rows drawn by the last render, bottom content included.
    height: usize,
    /// Rows of bottom content below the cursor.
    below_cursor: usize,
}

impl Screen {
    pub fn new(output: Output) -> Self {
        Self { output, height: 0, below_cursor: 0 }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Replaces the previous frame with `content`, plus optional `bottom`
    /// lines (hints, errors) drawn beneath it. The cursor is left at the end
    /// of `content`.
    pub fn render(&mut self, content: &str, bottom: Option<&str>) -> Result<()> {
        let output = self.output.clone();
        let width = output.width();
        let mut w = output.lock();
        self.clean(&mut *w)?;

        output.write_text(&mut *w, content)?;
        self.height = line_count(content, width);
        self.below_cursor = 0;

        if let Some(bottom) = bottom.filter(|b| !b.is_empty()) {
            output.write_text(&mut *w, "\n")?;
            output.write_text(&mut *w, bottom)?;
            let rows = line_count(bottom, width);
            w.queue(MoveUp(rows as u16))?;
            w.queue(MoveToColumn(last_line_column(content, width)))?;
            self.height += rows;
            self.below_cursor = rows;
        }
        w.flush()?;
        Ok(())
    }

    /// Moves past the last frame so the next output starts on a fresh line.
    pub fn done(&mut self) -> Result<()> {
        let mut w = self.output.lock();
        if self.below_cursor > 0 {
            w.queue(MoveDown(self.below_cursor as u16))?;
        }
        self.output.write_text(&mut *w, "\n")?;
        w.flush()?;
        self.height = 0;
        self.below_cursor = 0;
        Ok(())
    }

    fn clean<W: Write + ?Sized>(&mut self, w: &mut W) -> Result<()> {
        if self.height == 0 {
            return Ok(());
        }
        if self.below_cursor > 0 {
            w.queue(MoveDown(self.below_cursor as u16))?;
        }
        erase_lines(w, self.height)?;
        self.height = 0;
        self.below_cursor = 0;
        Ok(())
    }
}
