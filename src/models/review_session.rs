//! Review session over the cards that are due.
//! Walks the queue one card at a time, applying the Leitner rules and
//! persisting each result before moving on.

use chrono::{DateTime, TimeZone};
use tracing::{debug, info};

use super::Flashcard;
use super::leitner::apply_review_outcome;
use super::selection::due_cards;
use crate::database::CardRepository;
use crate::error::Result;

/// One pass over the due cards. Every card is answered exactly once; cards
/// answered wrong go back to box 1 and are due again tomorrow.
pub struct ReviewSession {
    queue: Vec<Flashcard>,
    current_index: usize,
    pub show_answer: bool,
    correct_count: usize,
    incorrect_count: usize,
}

impl ReviewSession {
    /// Queues every card due at `now`, keeping the collection's order.
    pub fn start<Tz: TimeZone>(cards: &[Flashcard], now: &DateTime<Tz>) -> Self {
        let queue: Vec<Flashcard> = due_cards(cards, now).into_iter().cloned().collect();
        info!(due = queue.len(), total = cards.len(), "starting review session");

        Self {
            queue,
            current_index: 0,
            show_answer: false,
            correct_count: 0,
            incorrect_count: 0,
        }
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.queue.get(self.current_index)
    }

    pub fn reveal_answer(&mut self) {
        self.show_answer = true;
    }

    /// Applies the outcome to the current card, saves it, then advances.
    ///
    /// Returns the updated card, or `None` once the session is over. If the
    /// save fails the session stays on the same card so it can be retried.
    pub fn answer_current_card<R, Tz>(
        &mut self,
        was_correct: bool,
        now: &DateTime<Tz>,
        repository: &mut R,
    ) -> Result<Option<Flashcard>>
    where
        R: CardRepository + ?Sized,
        Tz: TimeZone,
    {
        let Some(card) = self.current_card() else {
            return Ok(None);
        };

        let updated = apply_review_outcome(card, was_correct, now);
        repository.save(&updated)?;
        debug!(id = %updated.id, was_correct, box_level = updated.box_level, "recorded review");

        if was_correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
        }
        self.queue[self.current_index] = updated.clone();
        self.current_index += 1;
        self.show_answer = false;

        if self.is_completed() {
            info!(
                correct = self.correct_count,
                incorrect = self.incorrect_count,
                "review session finished"
            );
        }

        Ok(Some(updated))
    }

    /// An empty queue counts as completed: there is nothing to review.
    pub fn is_completed(&self) -> bool {
        self.current_index >= self.queue.len()
    }

    /// One-based position of the current card.
    pub fn position(&self) -> usize {
        (self.current_index + 1).min(self.queue.len())
    }

    pub fn total_count(&self) -> usize {
        self.queue.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.queue.len() - self.current_index.min(self.queue.len())
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn incorrect_count(&self) -> usize {
        self.incorrect_count
    }

    /// Cards as they stand after this session, including their new schedule.
    pub fn reviewed_cards(&self) -> &[Flashcard] {
        &self.queue[..self.current_index.min(self.queue.len())]
    }

    pub fn progress_message(&self) -> String {
        if self.queue.is_empty() {
            "No cards due for review".to_string()
        } else if self.is_completed() {
            format!(
                "Done: {} correct, {} to relearn",
                self.correct_count, self.incorrect_count
            )
        } else {
            format!("Card {} of {}", self.position(), self.total_count())
        }
    }
}
