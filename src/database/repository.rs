//! Persistence boundary for flashcards.
//!
//! The scheduler hands back plain [`Flashcard`] values; implementations of
//! [`CardRepository`] store them. Box levels are validated here, on the way
//! in, so the scheduler never has to.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::Flashcard;

pub trait CardRepository {
    /// All cards, in insertion order.
    fn load_all(&self) -> Result<Vec<Flashcard>>;

    fn find(&self, id: Uuid) -> Result<Option<Flashcard>>;

    /// Inserts the card or replaces the stored card with the same id.
    fn save(&mut self, card: &Flashcard) -> Result<()>;

    /// Replaces the whole collection. Nothing is written if any card is invalid.
    fn save_all(&mut self, cards: &[Flashcard]) -> Result<()>;

    fn delete(&mut self, id: Uuid) -> Result<()>;
}

pub fn validate_box_level(card: &Flashcard) -> Result<()> {
    if card.has_valid_box_level() {
        Ok(())
    } else {
        Err(Error::InvalidBoxLevel(card.box_level))
    }
}
