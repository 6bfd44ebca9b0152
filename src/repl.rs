// repl.rs

use std::cell::RefCell;
use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use tracing::{debug, warn};

use linehistory::{HistoryConfig, HistoryStore};

use crate::builtins::{Flow, Shell};
use crate::hint::HistoryHinter;

/// Reads lines until `exit` or end of input, then writes the history back.
/// Returns the exit code.
pub fn start_repl(config: HistoryConfig) -> anyhow::Result<i32> {
    let store = Rc::new(RefCell::new(HistoryStore::open(config)?));
    debug!(entries = store.borrow().len(), sink = ?store.borrow().target(), "history loaded");

    let rl_config = Config::builder().completion_type(CompletionType::List).build();
    let mut rl: Editor<HistoryHinter, DefaultHistory> = Editor::with_config(rl_config)?;
    rl.set_helper(Some(HistoryHinter::new(store.clone())));
    for entry in store.borrow().iter() {
        rl.add_history_entry(entry.as_str())?;
    }

    let mut shell = Shell::new(store.clone());
    let mut stdout = std::io::stdout();
    let code = loop {
        match rl.readline("$ ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                match shell.run_line(&line, &mut stdout) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Exit(code)) => break code,
                    Err(e) => eprintln!("{:#}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break 0,
            Err(err) => {
                warn!(error = %err, "readline failed");
                break 1;
            }
        }
    };

    // the session owns persistence; the store never writes on its own
    store.borrow_mut().write_history_file(None)?;
    Ok(code)
}
