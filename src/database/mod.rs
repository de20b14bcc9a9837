pub mod memory;
pub mod repository;
pub mod sqlite;

pub use memory::InMemoryCardRepository;
pub use repository::{CardRepository, validate_box_level};
pub use sqlite::SqliteCardRepository;
