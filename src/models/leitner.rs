//! Leitner box spaced repetition.
//!
//! Every card sits in one of five boxes. The box decides how long to wait
//! before the next review:
//! - a correct answer moves the card up one box, capped at box 5
//! - an incorrect answer sends the card straight back to box 1
//! - the next review date is "now" plus the new box's interval, in calendar days
//!
//! Everything here is pure. "Now" is always passed in and nothing is persisted.

use chrono::{DateTime, TimeZone, Utc};

use super::Flashcard;
use super::clock::add_calendar_days;

pub const MIN_BOX: u8 = 1;
pub const MAX_BOX: u8 = 5;

/// Days to wait before the next review, indexed by box level minus one.
pub const LEITNER_BOX_INTERVALS: [u32; 5] = [1, 2, 5, 8, 14];

/// Used for any level outside 1-5 so a corrupt record can't break a review.
const FALLBACK_INTERVAL_DAYS: u32 = 1;

/// Maps box levels to review intervals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalTable {
    days: [u32; 5],
}

impl IntervalTable {
    pub const LEITNER: Self = Self::new(LEITNER_BOX_INTERVALS);

    pub const fn new(days: [u32; 5]) -> Self {
        Self { days }
    }

    pub fn days(&self) -> [u32; 5] {
        self.days
    }

    /// Interval for `level`, or one day if the level is out of range.
    pub fn interval_for_box(&self, level: u8) -> u32 {
        match level {
            MIN_BOX..=MAX_BOX => self.days[usize::from(level - MIN_BOX)],
            _ => FALLBACK_INTERVAL_DAYS,
        }
    }

    pub fn next_review_date<Tz: TimeZone>(&self, box_level: u8, now: &DateTime<Tz>) -> DateTime<Tz> {
        add_calendar_days(now, self.interval_for_box(box_level))
    }

    /// Returns the card after one review. Box level, next review date and
    /// last review time all change together.
    pub fn apply_review_outcome<Tz: TimeZone>(
        &self,
        card: &Flashcard,
        was_correct: bool,
        now: &DateTime<Tz>,
    ) -> Flashcard {
        let box_level = next_box_level(card.box_level, was_correct);

        Flashcard {
            box_level,
            next_review_date: self.next_review_date(box_level, now).with_timezone(&Utc),
            last_reviewed_at: Some(now.with_timezone(&Utc)),
            ..card.clone()
        }
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self::LEITNER
    }
}

/// Box transition: correct promotes by one up to [`MAX_BOX`], incorrect
/// resets to [`MIN_BOX`] whatever the previous level was.
pub fn next_box_level(current: u8, was_correct: bool) -> u8 {
    if was_correct {
        current.saturating_add(1).clamp(MIN_BOX, MAX_BOX)
    } else {
        MIN_BOX
    }
}

pub fn interval_for_box(level: u8) -> u32 {
    IntervalTable::LEITNER.interval_for_box(level)
}

pub fn next_review_date<Tz: TimeZone>(box_level: u8, now: &DateTime<Tz>) -> DateTime<Tz> {
    IntervalTable::LEITNER.next_review_date(box_level, now)
}

pub fn apply_review_outcome<Tz: TimeZone>(
    card: &Flashcard,
    was_correct: bool,
    now: &DateTime<Tz>,
) -> Flashcard {
    IntervalTable::LEITNER.apply_review_outcome(card, was_correct, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use chrono_tz::Europe::Paris;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn card_in_box(level: u8) -> Flashcard {
        let mut card = Flashcard::new("Mitochondria?", "Powerhouse of the cell", &t0());
        card.box_level = level;
        card
    }

    #[test]
    fn test_interval_table_values() {
        assert_eq!(interval_for_box(1), 1);
        assert_eq!(interval_for_box(2), 2);
        assert_eq!(interval_for_box(3), 5);
        assert_eq!(interval_for_box(4), 8);
        assert_eq!(interval_for_box(5), 14);
    }

    #[test]
    fn test_out_of_range_falls_back_to_one_day() {
        assert_eq!(interval_for_box(0), 1);
        assert_eq!(interval_for_box(6), 1);
        assert_eq!(interval_for_box(u8::MAX), 1);
    }

    #[test]
    fn test_next_review_date_per_box() {
        for (level, days) in [(1, 1), (2, 2), (3, 5), (4, 8), (5, 14)] {
            assert_eq!(next_review_date(level, &t0()) - t0(), Duration::days(days));
        }
    }

    #[test]
    fn test_correct_promotes_and_caps() {
        for level in 1..=5u8 {
            let next = apply_review_outcome(&card_in_box(level), true, &t0());
            assert_eq!(next.box_level, (level + 1).min(5));
        }
    }

    #[test]
    fn test_incorrect_resets_to_box_one() {
        for level in 1..=5u8 {
            let next = apply_review_outcome(&card_in_box(level), false, &t0());
            assert_eq!(next.box_level, 1);
            assert_eq!(next.next_review_date, t0() + Duration::days(1));
        }
    }

    #[test]
    fn test_fields_updated_together() {
        let card = card_in_box(3);
        let now = t0() + Duration::hours(5);
        let next = apply_review_outcome(&card, true, &now);

        assert_eq!(next.box_level, 4);
        assert_eq!(next.last_reviewed_at, Some(now));
        // Interval follows the new box (8 days), not the old one (5 days).
        assert_eq!(next.next_review_date, now + Duration::days(8));
        assert_eq!(next.id, card.id);
        assert_eq!(next.created_at, card.created_at);
        assert_eq!(card.box_level, 3);
    }

    #[test]
    fn test_corrupt_level_stays_total() {
        let next = apply_review_outcome(&card_in_box(0), true, &t0());
        assert_eq!(next.box_level, 1);

        let next = apply_review_outcome(&card_in_box(u8::MAX), true, &t0());
        assert_eq!(next.box_level, 5);
    }

    #[test]
    fn test_review_dates_keep_wall_clock_time_across_dst() {
        let before_spring = Paris.with_ymd_and_hms(2024, 3, 29, 9, 0, 0).unwrap();
        assert_eq!(
            next_review_date(3, &before_spring),
            Paris.with_ymd_and_hms(2024, 4, 3, 9, 0, 0).unwrap()
        );

        let before_autumn = Paris.with_ymd_and_hms(2024, 10, 26, 9, 0, 0).unwrap();
        let reviewed = apply_review_outcome(&card_in_box(4), false, &before_autumn);
        assert_eq!(reviewed.box_level, 1);
        assert_eq!(
            reviewed.next_review_date,
            Paris.with_ymd_and_hms(2024, 10, 27, 9, 0, 0).unwrap().with_timezone(&Utc)
        );
    }

    #[test]
    fn test_custom_table() {
        let table = IntervalTable::new([1, 3, 7, 15, 30]);
        let next = table.apply_review_outcome(&card_in_box(4), true, &t0());
        assert_eq!(next.next_review_date, t0() + Duration::days(30));
        assert_eq!(table.interval_for_box(9), 1);
        assert_eq!(IntervalTable::default(), IntervalTable::LEITNER);
        assert_eq!(IntervalTable::LEITNER.days(), LEITNER_BOX_INTERVALS);
        assert_eq!(table.days()[4], 30);
    }
}
