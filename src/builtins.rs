// builtins.rs

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context};
use itertools::Itertools;
use tracing::debug;

use linehistory::{Command, HistoryStore};

use crate::util::write_listing;

const USAGE: &str =
    "history: usage: history [-c] [-d offset] [n] or history -awr [filename] or history -s term";

#[derive(Debug)]
pub enum Flow {
    Continue,
    Exit(i32),
}

pub struct Shell {
    store: Rc<RefCell<HistoryStore>>,
    // `history -a` target -> entry count at its last append
    appended: HashMap<Option<PathBuf>, usize>,
}

impl Shell {
    pub fn new(store: Rc<RefCell<HistoryStore>>) -> Self {
        Self {
            store,
            appended: HashMap::new(),
        }
    }

    /// Runs one input line, then commits it to history.
    pub fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> anyhow::Result<Flow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };
        let result = match command {
            "exit" => Ok(Flow::Exit(
                args.first().and_then(|s| s.parse().ok()).unwrap_or(0),
            )),
            "echo" => {
                writeln!(out, "{}", args.iter().join(" "))?;
                Ok(Flow::Continue)
            }
            "history" => self.history(args, out).map(|()| Flow::Continue),
            _ => run_external(command, args, out).map(|()| Flow::Continue),
        };
        self.commit(line, command == "history" && args.first() == Some(&"-s"));
        result
    }

    fn commit(&mut self, line: &str, searching: bool) {
        let mut store = self.store.borrow_mut();
        store.add_history(line.trim());
        // a repeated `history -s` keeps stepping back from the last match
        if !searching {
            store.note_command(Command::Other);
            store.reset_cursor();
        }
    }

    fn history<W: Write>(&mut self, args: &[&str], out: &mut W) -> anyhow::Result<()> {
        let mut store = self.store.borrow_mut();
        match args {
            [] => write_listing(out, store.iter().map(String::as_str).enumerate())?,
            ["-c"] => {
                store.clear();
                self.appended.values_mut().for_each(|mark| *mark = 0);
            }
            ["-d", index] => {
                let index: usize = index
                    .parse()
                    .with_context(|| format!("history: {index}: history position out of range"))?;
                store.delete(index)?;
                // entries after `index` shifted down by one
                self.appended
                    .values_mut()
                    .filter(|mark| **mark > index)
                    .for_each(|mark| *mark -= 1);
            }
            ["-r", file @ ..] => store.read_history_file(target(file)?, None)?,
            ["-w", file @ ..] => store.write_history_file(target(file)?)?,
            ["-a", file @ ..] => {
                let path = target(file)?;
                let key = path.map(Path::to_path_buf);
                let since = self.appended.get(&key).copied().unwrap_or(0);
                let fresh = store.len().saturating_sub(since);
                store.append_history_file(fresh as i64, path)?;
                debug!(appended = fresh, "history -a");
                self.appended.insert(key, store.len());
            }
            ["-s", term @ ..] if !term.is_empty() => {
                let found = store.reverse_search(&term.join(" "), None);
                writeln!(out, "{found}")?;
            }
            ["-s"] => bail!(USAGE),
            [count] => {
                let Ok(count) = count.parse::<usize>() else {
                    bail!("history: {count}: numeric argument required");
                };
                let skip = store.len().saturating_sub(count);
                write_listing(out, store.iter().map(String::as_str).enumerate().skip(skip))?;
            }
            _ => bail!(USAGE),
        }
        Ok(())
    }
}

fn target<'a>(file: &[&'a str]) -> anyhow::Result<Option<&'a Path>> {
    match file {
        [] => Ok(None),
        [path] => Ok(Some(Path::new(*path))),
        _ => bail!("history: too many arguments"),
    }
}

fn run_external<W: Write>(command: &str, args: &[&str], out: &mut W) -> anyhow::Result<()> {
    match std::process::Command::new(command).args(args).status() {
        Ok(status) => debug!(command, ?status, "external command finished"),
        Err(e) if e.kind() == ErrorKind::NotFound => writeln!(out, "{}: command not found", command)?,
        Err(e) => writeln!(out, "{}: {}", command, e)?,
    }
    Ok(())
}
