// persist.rs

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use bytes::BufMut;
use tracing::{debug, warn};

use crate::config::{Encoding, HistoryTarget};
use crate::error::{HistoryError, Result};
use crate::history::HistoryStore;

const MEMORY_LABEL: &str = "<memory>";

#[derive(Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Truncate,
    Append,
}

impl HistoryStore {
    /// Loads a history file line by line through `add_history`.
    ///
    /// Permission and decode errors propagate. Any other I/O failure is
    /// logged and leaves the store as it was.
    pub fn read_history_file(
        &mut self,
        path: Option<&Path>,
        encoding: Option<Encoding>,
    ) -> Result<()> {
        let encoding = encoding.unwrap_or(self.encoding);
        let records = match self.resolve(path) {
            Some(path) => match File::open(&path) {
                Ok(file) => read_records(BufReader::new(file), encoding, &path)?,
                Err(e) => return degrade(e, &path, "read"),
            },
            None => read_records(&self.memory[..], encoding, Path::new(MEMORY_LABEL))?,
        };
        debug!(records = records.len(), "read history");
        for record in &records {
            self.add_history(record);
        }
        Ok(())
    }

    /// Overwrites the target with the last `max_length` entries.
    pub fn write_history_file(&mut self, path: Option<&Path>) -> Result<()> {
        let start = tail_start(self.entries.len(), self.max_length);
        self.persist(path, start, WriteMode::Truncate)
    }

    /// Appends the last `n` entries to the target without touching what is
    /// already there. This is the only write that is safe to issue from
    /// several sessions sharing one file.
    pub fn append_history_file(&mut self, n: i64, path: Option<&Path>) -> Result<()> {
        let start = if n <= 0 {
            self.entries.len()
        } else {
            tail_start(self.entries.len(), n)
        };
        self.persist(path, start, WriteMode::Append)
    }

    /// With `full`, writes every entry first, then always finishes with the
    /// bounded tail of `write_history_file` on the same target.
    pub fn flush(&mut self, path: Option<&Path>, full: bool) -> Result<()> {
        if full {
            self.persist(path, 0, WriteMode::Truncate)?;
        }
        self.write_history_file(path)
    }

    fn resolve(&self, path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => match &self.target {
                HistoryTarget::File(path) => Some(path.clone()),
                HistoryTarget::Memory => None,
            },
        }
    }

    fn persist(&mut self, path: Option<&Path>, start: usize, mode: WriteMode) -> Result<()> {
        let lines = &self.entries[start..];
        match self.resolve(path) {
            Some(path) => {
                let file = match mode {
                    WriteMode::Truncate => File::create(&path),
                    WriteMode::Append => OpenOptions::new().create(true).append(true).open(&path),
                };
                let file = match file {
                    Ok(file) => file,
                    Err(e) => return degrade(e, &path, "write"),
                };
                let mut writer = BufWriter::new(file);
                if let Err(e) = write_records(&mut writer, lines).and_then(|()| writer.flush()) {
                    return degrade(e, &path, "write");
                }
                debug!(path = %path.display(), records = lines.len(), append = mode == WriteMode::Append, "wrote history");
            }
            None => {
                if mode == WriteMode::Truncate {
                    self.memory.clear();
                }
                for line in lines {
                    self.memory.put_slice(line.as_bytes());
                    self.memory.put_u8(b'\n');
                }
            }
        }
        Ok(())
    }
}

fn tail_start(len: usize, n: i64) -> usize {
    match usize::try_from(n) {
        Ok(n) => len.saturating_sub(n),
        Err(_) => 0,
    }
}

fn read_records<R: BufRead>(mut reader: R, encoding: Encoding, origin: &Path) -> Result<Vec<String>> {
    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => line += 1,
            Err(e) => {
                degrade(e, origin, "read")?;
                break;
            }
        }
        let record = trim_separator(&buf);
        let text = encoding.decode(record).ok_or_else(|| HistoryError::Decode {
            path: origin.to_path_buf(),
            line,
            encoding,
        })?;
        records.push(text);
    }
    Ok(records)
}

fn trim_separator(record: &[u8]) -> &[u8] {
    let record = record.strip_suffix(b"\n").unwrap_or(record);
    record.strip_suffix(b"\r").unwrap_or(record)
}

fn write_records<W: Write>(writer: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn degrade(e: io::Error, path: &Path, action: &str) -> Result<()> {
    if e.kind() == ErrorKind::PermissionDenied {
        return Err(HistoryError::PermissionDenied {
            path: path.to_path_buf(),
            source: e,
        });
    }
    warn!(path = %path.display(), error = %e, "history {action} failed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::memory_store;

    fn memory_text(h: &HistoryStore) -> &str {
        std::str::from_utf8(&h.memory).unwrap()
    }

    #[test]
    fn write_keeps_bounded_tail() {
        let mut h = memory_store(&["a", "b", "c", "d"]);
        h.set_max_length(2);
        h.write_history_file(None).unwrap();
        assert_eq!(memory_text(&h), "c\nd\n");
    }

    #[test]
    fn negative_length_never_truncates() {
        let mut h = memory_store(&["a", "b", "c"]);
        h.set_max_length(-1);
        h.write_history_file(None).unwrap();
        assert_eq!(memory_text(&h), "a\nb\nc\n");
    }

    #[test]
    fn write_overwrites() {
        let mut h = memory_store(&["a", "b"]);
        h.write_history_file(None).unwrap();
        h.write_history_file(None).unwrap();
        assert_eq!(memory_text(&h), "a\nb\n");
    }

    #[test]
    fn append_windows_concatenate() {
        let mut h = memory_store(&["a", "b", "c"]);
        h.append_history_file(1, None).unwrap();
        h.add_history("d");
        h.add_history("e");
        h.append_history_file(2, None).unwrap();
        assert_eq!(memory_text(&h), "c\nd\ne\n");
    }

    #[test]
    fn append_clamps_window() {
        let mut h = memory_store(&["a", "b"]);
        h.append_history_file(0, None).unwrap();
        h.append_history_file(-3, None).unwrap();
        assert_eq!(memory_text(&h), "");
        h.append_history_file(10, None).unwrap();
        assert_eq!(memory_text(&h), "a\nb\n");
    }

    #[test]
    fn flush_full_ends_with_bounded_tail() {
        let mut h = memory_store(&["a", "b", "c"]);
        h.set_max_length(1);
        h.flush(None, true).unwrap();
        assert_eq!(memory_text(&h), "c\n");
    }

    #[test]
    fn flush_without_full_matches_write() {
        let mut flushed = memory_store(&["a", "b", "c"]);
        let mut written = memory_store(&["a", "b", "c"]);
        flushed.set_max_length(2);
        written.set_max_length(2);
        flushed.flush(None, false).unwrap();
        written.write_history_file(None).unwrap();
        assert_eq!(memory_text(&flushed), memory_text(&written));
        assert_eq!(memory_text(&flushed), "b\nc\n");
    }

    #[test]
    fn memory_round_trip() {
        let mut h = memory_store(&["ls", "pwd"]);
        h.write_history_file(None).unwrap();
        h.clear();
        h.read_history_file(None, None).unwrap();
        assert_eq!(h.entries(), ["ls", "pwd"]);
    }

    #[test]
    fn read_trims_separators_and_applies_add_rules() {
        let records = read_records(&b"ls\r\nls\n\npwd"[..], Encoding::Utf8, Path::new("t")).unwrap();
        assert_eq!(records, ["ls", "ls", "", "pwd"]);

        let mut h = memory_store(&[]);
        h.memory.put_slice(b"ls\r\nls\n\npwd");
        h.read_history_file(None, None).unwrap();
        assert_eq!(h.entries(), ["ls", "pwd"]);
    }

    #[test]
    fn decode_failure_propagates() {
        let mut h = memory_store(&[]);
        h.memory.put_slice(b"ok\n\xff\xfe\n");
        let err = h.read_history_file(None, None).unwrap_err();
        assert!(matches!(err, HistoryError::Decode { line: 2, .. }));
        assert!(h.is_empty());

        h.read_history_file(None, Some(Encoding::Latin1)).unwrap();
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn missing_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = memory_store(&["kept"]);
        h.read_history_file(Some(dir.path().join("absent").as_path()), None).unwrap();
        assert_eq!(h.entries(), ["kept"]);
    }

    #[test]
    fn tail_start_bounds() {
        assert_eq!(tail_start(5, 2), 3);
        assert_eq!(tail_start(5, 9), 0);
        assert_eq!(tail_start(5, -1), 0);
        assert_eq!(tail_start(5, 0), 5);
    }
}
