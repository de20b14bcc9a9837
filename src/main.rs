mod app;

use app::CardifyApp;
use cardify::{CardRepository, Config, Flashcard, SqliteCardRepository};
use chrono::Local;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut repository = SqliteCardRepository::open(&config.database_path)?;

    if config.seed_sample_cards && repository.load_all()?.is_empty() {
        seed_sample_cards(&mut repository)?;
    }

    let cards = repository.load_all()?;
    info!(count = cards.len(), "loaded flashcards");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Cardify",
        options,
        Box::new(move |_cc| Ok(Box::new(CardifyApp::new(repository, cards)))),
    )?;

    Ok(())
}

fn seed_sample_cards(repository: &mut SqliteCardRepository) -> cardify::Result<()> {
    let now = Local::now();
    let samples = [
        ("What does the mitochondria produce?", "ATP, the cell's energy currency"),
        ("State Newton's second law", "Force equals mass times acceleration (F = ma)"),
        ("Which gas do plants absorb for photosynthesis?", "Carbon dioxide"),
    ];

    let cards: Vec<Flashcard> = samples
        .into_iter()
        .map(|(question, answer)| Flashcard::new(question, answer, &now))
        .collect();
    repository.save_all(&cards)?;

    info!(count = cards.len(), "seeded sample flashcards");
    Ok(())
}
