//! Picking cards out of a collection: what is due, what sits in a given box.
use chrono::{DateTime, TimeZone};

use super::Flashcard;
use super::leitner::{MAX_BOX, MIN_BOX};

/// Which part of the collection the card list shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardFilter {
    #[default]
    All,
    Due,
    Box(u8),
}

impl CardFilter {
    /// All, Due, then one entry per box.
    pub fn choices() -> impl Iterator<Item = CardFilter> {
        [CardFilter::All, CardFilter::Due]
            .into_iter()
            .chain((MIN_BOX..=MAX_BOX).map(CardFilter::Box))
    }

    pub fn label(&self) -> String {
        match self {
            CardFilter::All => "All".to_string(),
            CardFilter::Due => "Due".to_string(),
            CardFilter::Box(level) => format!("Box {}", level),
        }
    }
}

/// Cards whose next review date is at or before `now`, in input order.
pub fn due_cards<'a, Tz: TimeZone>(cards: &'a [Flashcard], now: &DateTime<Tz>) -> Vec<&'a Flashcard> {
    cards.iter().filter(|card| card.is_due(now)).collect()
}

pub fn cards_in_box(cards: &[Flashcard], box_level: u8) -> Vec<&Flashcard> {
    cards.iter().filter(|card| card.box_level == box_level).collect()
}

/// Applies `filter`, then keeps cards whose question, answer or a tag
/// contains `query`, ignoring case. A blank query keeps everything.
pub fn filter_cards<'a, Tz: TimeZone>(
    cards: &'a [Flashcard],
    filter: CardFilter,
    query: &str,
    now: &DateTime<Tz>,
) -> Vec<&'a Flashcard> {
    let selected = match filter {
        CardFilter::All => cards.iter().collect(),
        CardFilter::Due => due_cards(cards, now),
        CardFilter::Box(level) => cards_in_box(cards, level),
    };

    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return selected;
    }
    selected
        .into_iter()
        .filter(|card| matches_query(card, &query))
        .collect()
}

fn matches_query(card: &Flashcard, query: &str) -> bool {
    card.question.to_lowercase().contains(query)
        || card.answer.to_lowercase().contains(query)
        || card.tags.iter().any(|tag| tag.to_lowercase().contains(query))
}
