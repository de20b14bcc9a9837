pub mod clock;
pub mod flashcard;
pub mod leitner;
pub mod review_session;
pub mod selection;
pub mod stats;

pub use clock::{Clock, FixedClock, SimulatedClock, SystemClock};
pub use flashcard::Flashcard;
pub use leitner::{
    IntervalTable, LEITNER_BOX_INTERVALS, MAX_BOX, MIN_BOX, apply_review_outcome, interval_for_box,
    next_box_level, next_review_date,
};
pub use review_session::ReviewSession;
pub use selection::{CardFilter, cards_in_box, due_cards, filter_cards};
pub use stats::ReviewStats;
