//! Flashcard is a question/answer pair plus its place in the Leitner schedule.
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::leitner::{MAX_BOX, MIN_BOX};

/// A single card. Field names serialize in camelCase so stored JSON matches
/// the format the capture pipeline writes.
///
/// Treat values as immutable: schedule changes go through
/// [`apply_review_outcome`](super::leitner::apply_review_outcome), which
/// returns a new card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub box_level: u8,
    pub next_review_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_content_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Flashcard {
    /// New cards start in box 1 and are due immediately.
    pub fn new<Tz: TimeZone>(
        question: impl Into<String>,
        answer: impl Into<String>,
        now: &DateTime<Tz>,
    ) -> Self {
        let now = now.with_timezone(&Utc);
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
            box_level: MIN_BOX,
            next_review_date: now,
            created_at: now,
            last_reviewed_at: None,
            source_content_id: None,
            tags: Vec::new(),
        }
    }

    pub fn with_source(mut self, source_content_id: Uuid) -> Self {
        self.source_content_id = Some(source_content_id);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Copy with new text; the schedule is left alone.
    pub fn with_content(&self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            ..self.clone()
        }
    }

    pub fn is_due<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.next_review_date <= now.with_timezone(&Utc)
    }

    pub fn has_valid_box_level(&self) -> bool {
        (MIN_BOX..=MAX_BOX).contains(&self.box_level)
    }
}
