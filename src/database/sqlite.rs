//! SQLite storage for flashcards.
//!
//! One `flashcards` table holds every card. Timestamps are stored as Unix
//! milliseconds, ids as hyphenated UUID text and tags as a JSON array.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::repository::{CardRepository, validate_box_level};
use crate::error::{Error, Result};
use crate::models::Flashcard;
use crate::models::leitner::{MAX_BOX, MIN_BOX};

const SELECT_COLUMNS: &str = "SELECT id, question, answer, box_level, next_review_date, created_at,
        last_reviewed_at, source_content_id, tags
     FROM flashcards";

const UPSERT: &str = "INSERT INTO flashcards
        (id, question, answer, box_level, next_review_date, created_at,
         last_reviewed_at, source_content_id, tags)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
     ON CONFLICT(id) DO UPDATE SET
        question = excluded.question,
        answer = excluded.answer,
        box_level = excluded.box_level,
        next_review_date = excluded.next_review_date,
        last_reviewed_at = excluded.last_reviewed_at,
        source_content_id = excluded.source_content_id,
        tags = excluded.tags";

pub struct SqliteCardRepository {
    conn: Connection,
}

impl SqliteCardRepository {
    /// Opens (or creates) the database file and makes sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened flashcard database");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS flashcards (
            id TEXT PRIMARY KEY,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            box_level INTEGER NOT NULL DEFAULT 1,
            next_review_date INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            last_reviewed_at INTEGER,
            source_content_id TEXT,
            tags TEXT NOT NULL DEFAULT '[]'
        )",
        (),
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_flashcards_next_review_date
         ON flashcards (next_review_date)",
        (),
    )?;

    Ok(())
}

fn upsert(conn: &Connection, card: &Flashcard) -> Result<()> {
    let tags = serde_json::to_string(&card.tags)?;
    conn.execute(
        UPSERT,
        params![
            card.id.to_string(),
            card.question,
            card.answer,
            card.box_level,
            card.next_review_date.timestamp_millis(),
            card.created_at.timestamp_millis(),
            card.last_reviewed_at.map(|at| at.timestamp_millis()),
            card.source_content_id.map(|id| id.to_string()),
            tags,
        ],
    )?;
    Ok(())
}

/// Raw column values, converted to a [`Flashcard`] outside the rusqlite
/// row callback so conversion failures surface as [`Error::CorruptRecord`].
struct CardRow {
    id: String,
    question: String,
    answer: String,
    box_level: i64,
    next_review_date: i64,
    created_at: i64,
    last_reviewed_at: Option<i64>,
    source_content_id: Option<String>,
    tags: String,
}

impl CardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            box_level: row.get(3)?,
            next_review_date: row.get(4)?,
            created_at: row.get(5)?,
            last_reviewed_at: row.get(6)?,
            source_content_id: row.get(7)?,
            tags: row.get(8)?,
        })
    }

    fn into_flashcard(self) -> Result<Flashcard> {
        let id = parse_uuid(&self.id)?;
        let box_level = u8::try_from(self.box_level).map_err(|_| {
            Error::CorruptRecord(format!("card {} has box level {}", id, self.box_level))
        })?;
        // Kept as-is; the scheduler falls back to a one-day interval.
        if !(MIN_BOX..=MAX_BOX).contains(&box_level) {
            warn!(%id, box_level, "loaded flashcard with out-of-range box level");
        }

        Ok(Flashcard {
            id,
            question: self.question,
            answer: self.answer,
            box_level,
            next_review_date: from_millis(self.next_review_date, "next_review_date")?,
            created_at: from_millis(self.created_at, "created_at")?,
            last_reviewed_at: self
                .last_reviewed_at
                .map(|millis| from_millis(millis, "last_reviewed_at"))
                .transpose()?,
            source_content_id: self.source_content_id.as_deref().map(parse_uuid).transpose()?,
            tags: serde_json::from_str(&self.tags)?,
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::CorruptRecord(format!("invalid id '{}': {}", value, e)))
}

fn from_millis(millis: i64, column: &str) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| Error::CorruptRecord(format!("{} out of range: {}", column, millis)))
}

impl CardRepository for SqliteCardRepository {
    fn load_all(&self) -> Result<Vec<Flashcard>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY rowid", SELECT_COLUMNS))?;
        let rows = stmt
            .query_map([], CardRow::from_row)?
            .collect::<rusqlite::Result<Vec<CardRow>>>()?;

        rows.into_iter().map(CardRow::into_flashcard).collect()
    }

    fn find(&self, id: Uuid) -> Result<Option<Flashcard>> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id.to_string()],
                CardRow::from_row,
            )
            .optional()?;

        row.map(CardRow::into_flashcard).transpose()
    }

    fn save(&mut self, card: &Flashcard) -> Result<()> {
        validate_box_level(card)?;
        upsert(&self.conn, card)?;
        debug!(id = %card.id, box_level = card.box_level, "saved flashcard");
        Ok(())
    }

    fn save_all(&mut self, cards: &[Flashcard]) -> Result<()> {
        cards.iter().try_for_each(validate_box_level)?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM flashcards", ())?;
        for card in cards {
            upsert(&tx, card)?;
        }
        tx.commit()?;

        debug!(count = cards.len(), "replaced all flashcards");
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM flashcards WHERE id = ?1", params![id.to_string()])?;
        if deleted == 0 {
            return Err(Error::NotFound(id));
        }
        debug!(%id, "deleted flashcard");
        Ok(())
    }
}
