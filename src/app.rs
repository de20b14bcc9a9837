//! Desktop review UI.
//! Shows progress per box, manages cards, and runs review sessions over due cards.

use cardify::database::{CardRepository, SqliteCardRepository};
use cardify::export::json::{export_cards_to_path, import_cards, merge_into_repository};
use cardify::models::clock::{Clock, SimulatedClock, relative_day_label};
use cardify::models::{CardFilter, Flashcard, IntervalTable, ReviewSession, ReviewStats, filter_cards};
use chrono::{DateTime, Local, Utc};
use eframe::egui;
use tracing::error;
use uuid::Uuid;

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    Review,
}

/// Text being edited for an existing card
struct CardEdit {
    id: Uuid,
    question: String,
    answer: String,
}

/// Main application state
pub struct CardifyApp {
    repository: SqliteCardRepository,
    clock: SimulatedClock,
    cards: Vec<Flashcard>,

    current_screen: AppScreen,
    review_session: Option<ReviewSession>,

    new_question: String,
    new_answer: String,
    new_tags: String,

    list_filter: CardFilter,
    search_query: String,
    editing: Option<CardEdit>,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    show_result_dialog: bool,
    result_message: String,
}

fn plural_days(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Formats a stored timestamp as a local YYYY-MM-DD string
fn format_date(time: DateTime<Utc>) -> String {
    let local: DateTime<Local> = time.with_timezone(&Local);
    local.format("%Y-%m-%d").to_string()
}

impl eframe::App for CardifyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Review => self.render_review_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_result_dialog {
            egui::Window::new("Cardify")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl CardifyApp {
    pub fn new(repository: SqliteCardRepository, cards: Vec<Flashcard>) -> Self {
        Self {
            repository,
            clock: SimulatedClock::new(),
            cards,
            current_screen: AppScreen::default(),
            review_session: None,
            new_question: String::new(),
            new_answer: String::new(),
            new_tags: String::new(),
            list_filter: CardFilter::default(),
            search_query: String::new(),
            editing: None,
            show_confirmation_dialog: false,
            allowed_to_close: false,
            show_result_dialog: false,
            result_message: String::new(),
        }
    }

    /// Renders the main screen: stats, card creation and the card list
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        let now = self.clock.now();
        let stats = ReviewStats::compute(&self.cards, &now);

        // We store actions to execute after UI rendering to avoid borrowing conflicts
        let mut action_next_day = false;
        let mut action_back_to_today = false;
        let mut action_export = false;
        let mut action_import = false;
        let mut action_review = false;
        let mut action_add = false;
        let mut action_delete: Option<Uuid> = None;
        let mut action_edit: Option<Uuid> = None;
        let mut action_save_edit = false;
        let mut action_cancel_edit = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(now.format("%Y-%m-%d").to_string());
                if self.clock.offset_days() > 0 {
                    ui.label(format!("(+{} days)", self.clock.offset_days()));
                }
                if ui.button("Next Day").clicked() {
                    action_next_day = true;
                }
                if self.clock.offset_days() > 0 && ui.button("Back to today").clicked() {
                    action_back_to_today = true;
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Export Cards").clicked() {
                    action_export = true;
                }
                if ui.button("Import Cards").clicked() {
                    action_import = true;
                }
            });
            ui.separator();

            ui.heading("Progress");
            if stats.is_empty() {
                ui.label("No flashcards yet. Add one below to get started.");
            } else {
                ui.label(format!(
                    "{} cards, {} due, {}% mastered",
                    stats.total_cards, stats.total_due, stats.mastery_percentage
                ));
                ui.horizontal(|ui| {
                    let intervals = IntervalTable::LEITNER.days();
                    for (i, (count, days)) in stats.by_box.iter().zip(intervals).enumerate() {
                        ui.label(format!("Box {}: {} (every {})", i + 1, count, plural_days(days)));
                    }
                });
                ui.label(format!(
                    "Reviewed in the last 7 days: {} (ever: {})",
                    stats.reviewed_last_seven_days, stats.total_reviewed
                ));
            }

            let review_button = egui::Button::new(format!("Review ({} due)", stats.total_due));
            if ui.add_enabled(stats.total_due > 0, review_button).clicked() {
                action_review = true;
            }
            ui.separator();

            ui.heading("New Flashcard");
            ui.horizontal(|ui| {
                ui.label("Question:");
                ui.text_edit_singleline(&mut self.new_question);
            });
            ui.horizontal(|ui| {
                ui.label("Answer:");
                ui.text_edit_singleline(&mut self.new_answer);
            });
            ui.horizontal(|ui| {
                ui.label("Tags:");
                ui.text_edit_singleline(&mut self.new_tags);
            });
            if ui.button("Add Flashcard").clicked() {
                action_add = true;
            }
            ui.separator();

            let shown = filter_cards(&self.cards, self.list_filter, &self.search_query, &now);
            ui.heading(format!("Flashcards ({} of {})", shown.len(), self.cards.len()));
            ui.horizontal(|ui| {
                for filter in CardFilter::choices() {
                    if ui.selectable_label(self.list_filter == filter, filter.label()).clicked() {
                        self.list_filter = filter;
                    }
                }
            });
            ui.horizontal(|ui| {
                ui.label("Search:");
                ui.text_edit_singleline(&mut self.search_query);
            });
            egui::ScrollArea::vertical()
                .id_source("flashcards_list")
                .show(ui, |ui| {
                    if shown.is_empty() {
                        ui.label("No flashcards match.");
                    }
                    for card in shown {
                        ui.group(|ui| {
                            ui.label(format!("Q: {}", card.question));
                            ui.label(format!("A: {}", card.answer));
                            if !card.tags.is_empty() {
                                ui.label(format!("Tags: {}", card.tags.join(", ")));
                            }
                            ui.horizontal(|ui| {
                                ui.label(format!(
                                    "Box {}, next review {} ({})",
                                    card.box_level,
                                    format_date(card.next_review_date),
                                    relative_day_label(&card.next_review_date, &now)
                                ));
                                if ui.button("Edit").clicked() {
                                    action_edit = Some(card.id);
                                }
                                if ui.button("Delete").clicked() {
                                    action_delete = Some(card.id);
                                }
                            });
                        });
                    }
                });
        });

        if let Some(edit) = &mut self.editing {
            egui::Window::new("Edit Flashcard")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Question:");
                        ui.text_edit_singleline(&mut edit.question);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Answer:");
                        ui.text_edit_singleline(&mut edit.answer);
                    });
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            action_cancel_edit = true;
                        }
                        if ui.button("Save").clicked() {
                            action_save_edit = true;
                        }
                    });
                });
        }

        // Execute deferred actions
        if action_next_day {
            self.clock.advance_day();
        }
        if action_back_to_today {
            self.clock.reset();
        }
        if action_export {
            self.handle_export();
        }
        if action_import {
            self.handle_import();
        }
        if action_review {
            self.start_review_session();
        }
        if action_add {
            self.add_card();
        }
        if let Some(id) = action_delete {
            self.delete_card(id);
        }
        if let Some(id) = action_edit {
            self.begin_edit(id);
        }
        if action_cancel_edit {
            self.editing = None;
        }
        if action_save_edit {
            self.save_edit();
        }
    }

    /// Renders the review screen: question, reveal, then correct/incorrect
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        let mut action_reveal = false;
        let mut action_answer: Option<bool> = None;
        let mut action_back = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.review_session else {
                action_back = true;
                return;
            };

            ui.heading("Review");
            ui.label(session.progress_message());
            if !session.is_completed() {
                ui.label(format!("{} left in this session", session.remaining_count()));
            }
            ui.add_space(20.0);

            if session.is_completed() {
                ui.heading("All done!");
                ui.label("No more cards are due. Come back tomorrow.");
                ui.add_space(10.0);
                let now = self.clock.now();
                egui::ScrollArea::vertical()
                    .id_source("reviewed_list")
                    .max_height(300.0)
                    .show(ui, |ui| {
                        for card in session.reviewed_cards() {
                            ui.label(format!(
                                "{}: box {}, next review {}",
                                card.question,
                                card.box_level,
                                relative_day_label(&card.next_review_date, &now)
                            ));
                        }
                    });
                ui.add_space(20.0);
                if ui.button("Back to Main Screen").clicked() {
                    action_back = true;
                }
                return;
            }

            if let Some(card) = session.current_card() {
                ui.group(|ui| {
                    ui.set_min_height(200.0);
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.label(format!("Box {}", card.box_level));

                        ui.heading("Question:");
                        ui.label(&card.question);

                        ui.add_space(20.0);

                        if session.show_answer {
                            ui.heading("Answer:");
                            ui.label(&card.answer);
                        } else {
                            ui.label("(Click 'Show Answer' to reveal)");
                        }

                        ui.add_space(20.0);
                    });
                });

                ui.add_space(20.0);

                if session.show_answer {
                    ui.label("Did you get it right?");
                    ui.horizontal(|ui| {
                        if ui.button("Incorrect").clicked() {
                            action_answer = Some(false);
                        }
                        if ui.button("Correct").clicked() {
                            action_answer = Some(true);
                        }
                    });
                } else if ui.button("Show Answer").clicked() {
                    action_reveal = true;
                }
            }

            ui.add_space(20.0);

            if ui.button("Back to Main Screen").clicked() {
                action_back = true;
            }
        });

        if action_reveal {
            if let Some(session) = &mut self.review_session {
                session.reveal_answer();
            }
        }
        if let Some(was_correct) = action_answer {
            self.record_answer(was_correct);
        }
        if action_back {
            self.current_screen = AppScreen::Main;
            self.review_session = None;
        }
    }

    /// Starts a review session with the cards due now
    fn start_review_session(&mut self) {
        let session = ReviewSession::start(&self.cards, &self.clock.now());
        if session.is_completed() {
            self.report("Nothing to review right now.");
            return;
        }
        self.review_session = Some(session);
        self.current_screen = AppScreen::Review;
    }

    fn record_answer(&mut self, was_correct: bool) {
        let now = self.clock.now();
        let Some(session) = self.review_session.as_mut() else {
            return;
        };

        match session.answer_current_card(was_correct, &now, &mut self.repository) {
            Ok(Some(updated)) => {
                if let Some(card) = self.cards.iter_mut().find(|card| card.id == updated.id) {
                    *card = updated;
                }
            }
            Ok(None) => {}
            Err(e) => self.report_error("Could not save review result", &e),
        }
    }

    fn add_card(&mut self) {
        let question = self.new_question.trim();
        let answer = self.new_answer.trim();
        if question.is_empty() || answer.is_empty() {
            self.report("Both a question and an answer are required.");
            return;
        }

        let tags = self
            .new_tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty());
        let card = Flashcard::new(question, answer, &self.clock.now()).with_tags(tags);

        match self.repository.save(&card) {
            Ok(()) => {
                self.cards.push(card);
                self.new_question.clear();
                self.new_answer.clear();
                self.new_tags.clear();
            }
            Err(e) => self.report_error("Could not save flashcard", &e),
        }
    }

    fn begin_edit(&mut self, id: Uuid) {
        if let Some(card) = self.cards.iter().find(|card| card.id == id) {
            self.editing = Some(CardEdit {
                id,
                question: card.question.clone(),
                answer: card.answer.clone(),
            });
        }
    }

    /// Saves edited text; box level and review dates are kept
    fn save_edit(&mut self) {
        let Some(edit) = self.editing.take() else {
            return;
        };
        let question = edit.question.trim();
        let answer = edit.answer.trim();
        if question.is_empty() || answer.is_empty() {
            self.report("Both a question and an answer are required.");
            self.editing = Some(edit);
            return;
        }

        let Some(position) = self.cards.iter().position(|card| card.id == edit.id) else {
            return;
        };
        let updated = self.cards[position].with_content(question, answer);

        match self.repository.save(&updated) {
            Ok(()) => self.cards[position] = updated,
            Err(e) => {
                self.report_error("Could not save flashcard", &e);
                self.editing = Some(edit);
            }
        }
    }

    fn delete_card(&mut self, id: Uuid) {
        match self.repository.delete(id) {
            Ok(()) => self.cards.retain(|card| card.id != id),
            Err(e) => self.report_error("Could not delete flashcard", &e),
        }
    }

    /// Handles card export to a JSON file
    fn handle_export(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("flashcards.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        match export_cards_to_path(&self.cards, &path) {
            Ok(()) => self.report(format!("Exported {} flashcards.", self.cards.len())),
            Err(e) => self.report_error("Export failed", &e),
        }
    }

    /// Handles card import from a JSON file, skipping cards already stored
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let summary = match import_cards(&path)
            .and_then(|cards| merge_into_repository(&mut self.repository, &cards))
        {
            Ok(summary) => summary,
            Err(e) => {
                self.report_error("Import failed", &e);
                return;
            }
        };

        match self.repository.load_all() {
            Ok(cards) => {
                self.cards = cards;
                self.report(format!(
                    "Imported {} flashcards ({} already present).",
                    summary.imported, summary.skipped
                ));
            }
            Err(e) => self.report_error("Could not reload flashcards", &e),
        }
    }

    fn report(&mut self, message: impl Into<String>) {
        self.result_message = message.into();
        self.show_result_dialog = true;
    }

    fn report_error(&mut self, context: &str, err: &cardify::Error) {
        error!(error = %err, "{}", context);
        self.report(format!("{}: {}", context, err));
    }
}
