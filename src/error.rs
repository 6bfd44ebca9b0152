// error.rs

use std::path::PathBuf;

use thiserror::Error;

use crate::config::Encoding;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// History content that cannot be decoded is surfaced, never dropped.
    #[error("{}: line {line} is not valid {encoding}", path.display())]
    Decode {
        path: PathBuf,
        line: usize,
        encoding: Encoding,
    },

    #[error("index {index} out of range for history of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("history is empty")]
    EmptyHistory,
}

pub type Result<T, E = HistoryError> = std::result::Result<T, E>;
