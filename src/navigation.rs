// navigation.rs

use crate::buffer::LineBuffer;
use crate::error::{HistoryError, Result};
use crate::history::{Command, HistoryStore};

impl HistoryStore {
    /// Moves back one entry, loading it into `current` with the point at the
    /// end. Leaving the live line stages its text as an entry so `next` can
    /// come back to it.
    pub fn previous<B: LineBuffer + ?Sized>(&mut self, current: &mut B) {
        self.last_command = Command::PreviousHistory;
        if self.cursor == self.entries.len() {
            // staged directly, bypassing add_history's dedup
            self.entries.push(current.line_text());
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            current.set_line(&self.entries[self.cursor]);
            current.move_to_end();
        }
    }

    pub fn next<B: LineBuffer + ?Sized>(&mut self, current: &mut B) {
        self.last_command = Command::NextHistory;
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            current.set_line(&self.entries[self.cursor]);
        }
    }

    pub fn beginning<B: LineBuffer + ?Sized>(&mut self, current: &mut B) {
        self.last_command = Command::BeginningOfHistory;
        self.cursor = 0;
        if let Some(first) = self.entries.first() {
            current.set_line(first);
        }
    }

    pub fn end<B: LineBuffer + ?Sized>(&mut self, current: &mut B) -> Result<()> {
        self.last_command = Command::EndOfHistory;
        self.cursor = self.entries.len();
        let last = self.entries.last().ok_or(HistoryError::EmptyHistory)?;
        current.set_line(last);
        Ok(())
    }
}
