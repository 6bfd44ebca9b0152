// config.rs

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{HistoryError, Result};

pub const DEFAULT_MAX_LENGTH: i64 = 100;
pub const DEFAULT_FILE_NAME: &str = ".linehistory";

/// Text encoding of a history file on read. Writes are always UTF-8.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Ascii,
}

impl Encoding {
    /// Decodes one record, or `None` if the bytes are invalid for this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            Encoding::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
            Encoding::Ascii => "ascii",
        })
    }
}

/// Where persistence calls go when no explicit path is given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryTarget {
    File(PathBuf),
    /// Used when no usable home directory exists.
    Memory,
}

impl HistoryTarget {
    pub fn path(&self) -> Option<&Path> {
        match self {
            HistoryTarget::File(path) => Some(path),
            HistoryTarget::Memory => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HistoryConfig {
    /// Entries kept when writing; negative means unbounded.
    pub max_length: i64,
    pub path: Option<PathBuf>,
    pub encoding: Encoding,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            path: None,
            encoding: Encoding::Utf8,
        }
    }
}

impl HistoryConfig {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Resolves the default persistence target once.
    ///
    /// An explicit path always wins. Otherwise the history file lives in the
    /// home directory; a permission error while inspecting it is fatal, while a
    /// missing home directory or any other OS error falls back to memory.
    pub fn resolve_target(&self) -> Result<HistoryTarget> {
        if let Some(path) = &self.path {
            return Ok(HistoryTarget::File(path.clone()));
        }
        let Some(home) = dirs::home_dir() else {
            warn!("no home directory, keeping history in memory");
            return Ok(HistoryTarget::Memory);
        };
        match std::fs::metadata(&home) {
            Ok(_) => {
                let path = home.join(DEFAULT_FILE_NAME);
                debug!(path = %path.display(), "resolved default history file");
                Ok(HistoryTarget::File(path))
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(HistoryError::PermissionDenied { path: home, source: e })
            }
            Err(e) => {
                warn!(home = %home.display(), error = %e, "home directory unusable, keeping history in memory");
                Ok(HistoryTarget::Memory)
            }
        }
    }
}
