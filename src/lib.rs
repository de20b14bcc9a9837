pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use config::Config;
pub use database::{CardRepository, InMemoryCardRepository, SqliteCardRepository};
pub use error::{Error, Result};
pub use models::{Flashcard, IntervalTable, ReviewSession, ReviewStats};
