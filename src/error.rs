//! Error type shared by storage, import/export and configuration.
//!
//! The scheduler itself never fails; everything that touches the outside
//! world returns [`Result`].

use crate::config::ConfigError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Flashcard {0} not found")]
    NotFound(Uuid),

    /// Box levels outside 1-5 are rejected before they are stored.
    #[error("Invalid box level {0}, expected 1 to 5")]
    InvalidBoxLevel(u8),

    #[error("Corrupt flashcard record: {0}")]
    CorruptRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;
