//! Vector-backed repository, used for tests and throwaway sessions.
use tracing::debug;
use uuid::Uuid;

use super::repository::{CardRepository, validate_box_level};
use crate::error::{Error, Result};
use crate::models::Flashcard;

#[derive(Clone, Debug, Default)]
pub struct InMemoryCardRepository {
    cards: Vec<Flashcard>,
}

impl InMemoryCardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Flashcard>) -> Result<Self> {
        let mut repository = Self::new();
        repository.save_all(&cards)?;
        Ok(repository)
    }
}

impl CardRepository for InMemoryCardRepository {
    fn load_all(&self) -> Result<Vec<Flashcard>> {
        Ok(self.cards.clone())
    }

    fn find(&self, id: Uuid) -> Result<Option<Flashcard>> {
        Ok(self.cards.iter().find(|card| card.id == id).cloned())
    }

    fn save(&mut self, card: &Flashcard) -> Result<()> {
        validate_box_level(card)?;
        match self.cards.iter_mut().find(|stored| stored.id == card.id) {
            Some(stored) => *stored = card.clone(),
            None => self.cards.push(card.clone()),
        }
        debug!(id = %card.id, box_level = card.box_level, "saved flashcard");
        Ok(())
    }

    fn save_all(&mut self, cards: &[Flashcard]) -> Result<()> {
        cards.iter().try_for_each(validate_box_level)?;

        // Repeated ids collapse the way an upsert does: first position, last content.
        let mut replacement: Vec<Flashcard> = Vec::with_capacity(cards.len());
        for card in cards {
            match replacement.iter_mut().find(|stored| stored.id == card.id) {
                Some(stored) => *stored = card.clone(),
                None => replacement.push(card.clone()),
            }
        }
        debug!(count = replacement.len(), "replaced flashcards");
        self.cards = replacement;
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        let before = self.cards.len();
        self.cards.retain(|card| card.id != id);
        if self.cards.len() == before {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }
}
