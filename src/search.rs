// search.rs

use crate::buffer::{LineBuffer, TextLine};
use crate::history::{Command, HistoryStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self, index: usize) -> Option<usize> {
        match self {
            Direction::Forward => index.checked_add(1),
            Direction::Backward => index.checked_sub(1),
        }
    }
}

impl HistoryStore {
    /// Incremental search toward the oldest entry. Repeating the previous
    /// reverse search with the same term steps past the current match first.
    pub fn reverse_search(&mut self, term: &str, start: Option<usize>) -> String {
        let mut start = start.unwrap_or(self.cursor).min(self.entries.len());
        if self.repeats(Command::ReverseSearch, term) && start > 0 {
            start -= 1;
        }
        self.last_command = Command::ReverseSearch;
        self.any_search(term, start, Direction::Backward)
    }

    /// Incremental search toward the newest entry.
    pub fn forward_search(&mut self, term: &str, start: Option<usize>) -> String {
        let last = self.entries.len().saturating_sub(1);
        let mut start = start.unwrap_or(self.cursor).min(last);
        if self.repeats(Command::ForwardSearch, term) && start < last {
            start += 1;
        }
        self.last_command = Command::ForwardSearch;
        self.any_search(term, start, Direction::Forward)
    }

    /// Non-incremental search for entries that start with the text before
    /// the point of `partial`, moving toward the newest entry.
    pub fn history_search_forward<B: LineBuffer + ?Sized>(&mut self, partial: &B) -> TextLine {
        let result = self.prefix_search(Direction::Forward, partial);
        self.last_command = Command::HistorySearchForward;
        result
    }

    /// Like `history_search_forward`, moving toward the oldest entry.
    pub fn history_search_backward<B: LineBuffer + ?Sized>(&mut self, partial: &B) -> TextLine {
        let result = self.prefix_search(Direction::Backward, partial);
        self.last_command = Command::HistorySearchBackward;
        result
    }

    fn repeats(&self, command: Command, term: &str) -> bool {
        self.last_command == command && self.last_search_term == term
    }

    /// Scans from `start` (inclusive) for the first entry containing `term`.
    /// Without a match the cursor settles on `start`.
    fn any_search(&mut self, term: &str, start: usize, direction: Direction) -> String {
        let len = self.entries.len();
        let contains = |&i: &usize| self.entries[i].contains(term);
        let found = match direction {
            Direction::Backward => match len.checked_sub(1) {
                Some(last) => (0..=start.min(last)).rev().find(contains),
                None => None,
            },
            Direction::Forward => (start..len).find(contains),
        };
        self.last_search_term = term.to_owned();
        self.cursor = found.unwrap_or(start).min(len);
        self.entries.get(self.cursor).cloned().unwrap_or_default()
    }

    fn prefix_search<B: LineBuffer + ?Sized>(&mut self, direction: Direction, partial: &B) -> TextLine {
        let text = partial.line_text();
        let point = partial.point();
        // a repeated search keeps the query frozen; the buffer may already
        // hold an earlier match
        if !self.last_command.is_prefix_search() {
            self.prefix_query = partial.text_before_point();
        }
        if self.entries.is_empty() {
            return TextLine::new(text, point);
        }

        let len = self.entries.len();
        let mut next = direction.step(self.cursor);
        while let Some(index) = next.filter(|&i| i < len) {
            let candidate = &self.entries[index];
            if self.prefix_query.is_empty() {
                self.cursor = index;
                return TextLine::at_end(candidate.as_str());
            }
            if candidate.starts_with(&self.prefix_query) && *candidate != text {
                self.cursor = index;
                return TextLine::new(candidate.as_str(), point);
            }
            next = direction.step(index);
        }

        if self.prefix_query.is_empty() && direction == Direction::Forward {
            self.cursor = len;
            return TextLine::default();
        }
        TextLine::new(text, point)
    }
}
