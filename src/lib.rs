// lib.rs

pub mod buffer;
pub mod config;
pub mod error;
pub mod history;
pub mod navigation;
pub mod persist;
pub mod search;

pub use buffer::{LineBuffer, TextLine};
pub use config::{Encoding, HistoryConfig, HistoryTarget};
pub use error::HistoryError;
pub use history::{Command, HistoryStore};
pub use search::Direction;
