// history.rs

use std::ops::Index;

use bytes::BytesMut;

use crate::config::{Encoding, HistoryConfig, HistoryTarget};
use crate::error::{HistoryError, Result};

/// The last history command issued, used to tell a repeated search from a
/// fresh one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Command {
    #[default]
    Other,
    PreviousHistory,
    NextHistory,
    BeginningOfHistory,
    EndOfHistory,
    ReverseSearch,
    ForwardSearch,
    HistorySearchForward,
    HistorySearchBackward,
}

impl Command {
    pub fn is_prefix_search(self) -> bool {
        matches!(
            self,
            Command::HistorySearchForward | Command::HistorySearchBackward
        )
    }
}

/// Ordered record of previously entered lines.
///
/// `cursor` ranges over `0..=len()`, where `len()` is the live line that has
/// not been committed yet.
#[derive(Debug)]
pub struct HistoryStore {
    pub(crate) entries: Vec<String>,
    pub(crate) max_length: i64,
    pub(crate) cursor: usize,
    pub(crate) last_search_term: String,
    pub(crate) prefix_query: String,
    pub(crate) last_command: Command,
    pub(crate) target: HistoryTarget,
    pub(crate) encoding: Encoding,
    pub(crate) memory: BytesMut,
}

impl HistoryStore {
    /// Creates a store from `seed`, or from the configured target when the
    /// seed is empty.
    pub fn new(config: HistoryConfig, seed: Vec<String>) -> Result<Self> {
        let target = config.resolve_target()?;
        let mut store = Self {
            entries: seed,
            max_length: config.max_length,
            cursor: 0,
            last_search_term: String::new(),
            prefix_query: String::new(),
            last_command: Command::Other,
            target,
            encoding: config.encoding,
            memory: BytesMut::new(),
        };
        if store.entries.is_empty() {
            store.read_history_file(None, None)?;
        }
        store.cursor = store.entries.len();
        Ok(store)
    }

    pub fn open(config: HistoryConfig) -> Result<Self> {
        Self::new(config, Vec::new())
    }

    /// Appends `line` unless it is empty or repeats the newest entry.
    pub fn add_history(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if self.entries.last().is_some_and(|last| last == line) {
            return;
        }
        self.entries.push(line.to_owned());
    }

    /// Empties the in-memory list. The persisted file is left alone.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zero-based, unlike readline's historical 1-based numbering.
    pub fn get(&self, index: usize) -> Result<&str> {
        self.entries
            .get(index)
            .map(String::as_str)
            .ok_or(HistoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub fn set(&mut self, index: usize, line: impl Into<String>) -> Result<()> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(HistoryError::IndexOutOfRange { index, len })?;
        *slot = line.into();
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<String> {
        if index >= self.entries.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.cursor = self.cursor.min(self.entries.len());
        Ok(removed)
    }

    /// Inserts before `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, line: impl Into<String>) -> Result<()> {
        if index > self.entries.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.entries.insert(index, line.into());
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Puts the cursor back on the live line, as after accepting input.
    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    /// Maximum number of entries written to the history file.
    pub fn max_length(&self) -> i64 {
        self.max_length
    }

    /// A negative length disables truncation on write.
    pub fn set_max_length(&mut self, max_length: i64) {
        self.max_length = max_length;
    }

    pub fn target(&self) -> &HistoryTarget {
        &self.target
    }

    pub fn last_command(&self) -> Command {
        self.last_command
    }

    pub fn last_search_term(&self) -> &str {
        &self.last_search_term
    }

    /// Records a command the line editor ran outside the store, which ends
    /// any search in progress.
    pub fn note_command(&mut self, command: Command) {
        self.last_command = command;
    }

    /// Newest entry starting with `prefix`. Leaves the cursor alone.
    pub fn latest_with_prefix(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|line| line.starts_with(prefix))
            .map(String::as_str)
    }
}

impl PartialEq for HistoryStore {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Index<usize> for HistoryStore {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a HistoryStore {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
pub(crate) fn memory_store(seed: &[&str]) -> HistoryStore {
    HistoryStore {
        entries: seed.iter().map(|s| s.to_string()).collect(),
        max_length: crate::config::DEFAULT_MAX_LENGTH,
        cursor: seed.len(),
        last_search_term: String::new(),
        prefix_query: String::new(),
        last_command: Command::Other,
        target: HistoryTarget::Memory,
        encoding: Encoding::Utf8,
        memory: BytesMut::new(),
    }
}
