//! Summary numbers for a card collection: per-box counts, due count, mastery.
use chrono::{DateTime, TimeZone, Utc};

use super::Flashcard;
use super::clock::sub_calendar_days;
use super::leitner::{MAX_BOX, MIN_BOX};

/// Window used for "reviewed recently".
const RECENT_REVIEW_DAYS: u32 = 7;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewStats {
    /// Cards per box, index 0 is box 1. Cards with an invalid level are not
    /// counted here but still count towards `total_cards`.
    pub by_box: [usize; 5],
    pub total_cards: usize,
    pub total_due: usize,
    pub total_reviewed: usize,
    pub reviewed_last_seven_days: usize,
    /// Share of cards in boxes 4 and 5, rounded to a whole percent.
    pub mastery_percentage: u8,
}

impl ReviewStats {
    pub fn compute<Tz: TimeZone>(cards: &[Flashcard], now: &DateTime<Tz>) -> Self {
        let recent_cutoff = sub_calendar_days(now, RECENT_REVIEW_DAYS).with_timezone(&Utc);
        let mut stats = Self {
            total_cards: cards.len(),
            ..Self::default()
        };

        for card in cards {
            if (MIN_BOX..=MAX_BOX).contains(&card.box_level) {
                stats.by_box[usize::from(card.box_level - MIN_BOX)] += 1;
            }
            if card.is_due(now) {
                stats.total_due += 1;
            }
            if let Some(reviewed_at) = card.last_reviewed_at {
                stats.total_reviewed += 1;
                if reviewed_at >= recent_cutoff {
                    stats.reviewed_last_seven_days += 1;
                }
            }
        }

        stats.mastery_percentage = mastery_percentage(stats.by_box[3] + stats.by_box[4], stats.total_cards);
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.total_cards == 0
    }
}

/// Rounds half up, like a typical percentage display.
fn mastery_percentage(mastered: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (mastered * 200 + total) / (total * 2);
    u8::try_from(percent.min(100)).unwrap_or(100)
}
