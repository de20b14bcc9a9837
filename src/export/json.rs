//! JSON import/export for flashcards.
//! Cards are written as a pretty-printed JSON array, schedule included, so a
//! backup restores every card to the same box and review date.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use tracing::info;

use crate::database::{CardRepository, validate_box_level};
use crate::error::Result;
use crate::models::Flashcard;

/// Outcome of merging imported cards into a repository.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Cards whose id was already stored. They are left untouched.
    pub skipped: usize,
}

pub fn export_cards_to_path(cards: &[Flashcard], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json_string = serde_json::to_string_pretty(cards)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    info!(count = cards.len(), path = %path.display(), "exported flashcards");
    Ok(())
}

/// Reads cards from a JSON file. Fails on missing files, malformed JSON and
/// cards with a box level outside 1-5.
pub fn import_cards(path: impl AsRef<Path>) -> Result<Vec<Flashcard>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let cards: Vec<Flashcard> = serde_json::from_reader(BufReader::new(file))?;

    cards.iter().try_for_each(validate_box_level)?;

    info!(count = cards.len(), path = %path.display(), "read flashcards from file");
    Ok(cards)
}

/// Adds imported cards that the repository doesn't already hold.
pub fn merge_into_repository<R>(repository: &mut R, cards: &[Flashcard]) -> Result<ImportSummary>
where
    R: CardRepository + ?Sized,
{
    let mut summary = ImportSummary::default();
    for card in cards {
        if repository.find(card.id)?.is_some() {
            summary.skipped += 1;
        } else {
            repository.save(card)?;
            summary.imported += 1;
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryCardRepository;
    use crate::error::Error;
    use crate::models::apply_review_outcome;
    use chrono::{DateTime, TimeZone, Utc};
    use std::fs;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 8, 10, 0, 0).unwrap()
    }

    fn create_test_cards() -> Vec<Flashcard> {
        let photosynthesis = Flashcard::new("Photosynthesis output?", "Glucose and oxygen", &t0());
        vec![
            apply_review_outcome(&photosynthesis, true, &t0()),
            Flashcard::new("Newton's second law", "F = ma", &t0()).with_tags(["physics"]),
        ]
    }

    #[test]
    fn test_export_cards_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");

        export_cards_to_path(&create_test_cards(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"boxLevel\": 2"));
        assert!(written.contains("Newton's second law"));
    }

    #[test]
    fn test_import_cards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        let json_content = r#"[
  {
    "id": "0b9f1c52-51f8-4c56-b3a2-2f8c7b2d5e10",
    "question": "test question",
    "answer": "test answer",
    "boxLevel": 4,
    "nextReviewDate": "2024-01-16T10:00:00Z",
    "createdAt": "2024-01-01T10:00:00Z",
    "lastReviewedAt": "2024-01-08T10:00:00Z"
  }
]"#;
        fs::write(&path, json_content).unwrap();

        let cards = import_cards(&path).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "test question");
        assert_eq!(cards[0].box_level, 4);
        assert_eq!(cards[0].last_reviewed_at, Some(t0()));
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.json");
        let original = create_test_cards();

        export_cards_to_path(&original, &path).unwrap();
        assert_eq!(import_cards(&path).unwrap(), original);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_cards("nonexistent_file_xyz123.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_cards(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_import_rejects_bad_box_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_level.json");
        let mut card = Flashcard::new("q", "a", &t0());
        card.box_level = 9;
        export_cards_to_path(&[card], &path).unwrap();

        assert!(matches!(import_cards(&path), Err(Error::InvalidBoxLevel(9))));
    }

    #[test]
    fn test_merge_skips_known_ids() {
        let cards = create_test_cards();
        let mut repo = InMemoryCardRepository::with_cards(vec![cards[0].clone()]).unwrap();

        let summary = merge_into_repository(&mut repo, &cards).unwrap();

        assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });
        assert_eq!(repo.load_all().unwrap(), cards);
    }
}
