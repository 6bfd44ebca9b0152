// hint.rs

use std::cell::RefCell;
use std::rc::Rc;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use linehistory::HistoryStore;

/// Suggests the rest of the newest history entry that starts with the typed
/// line.
pub struct HistoryHinter {
    store: Rc<RefCell<HistoryStore>>,
}

impl HistoryHinter {
    pub fn new(store: Rc<RefCell<HistoryStore>>) -> Self {
        Self { store }
    }
}

fn suffix_hint(store: &HistoryStore, line: &str, pos: usize) -> Option<String> {
    if line.is_empty() || pos < line.len() {
        return None;
    }
    store
        .latest_with_prefix(line)
        .filter(|entry| entry.len() > line.len())
        .map(|entry| entry[line.len()..].to_string())
}

impl Completer for HistoryHinter {
    type Candidate = Pair;
    fn complete(&self, _line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>), ReadlineError> {
        Ok((pos, Vec::new()))
    }
}

impl Hinter for HistoryHinter {
    type Hint = String;
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        suffix_hint(&self.store.borrow(), line, pos)
    }
}

impl Highlighter for HistoryHinter {}

impl Validator for HistoryHinter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for HistoryHinter {}
