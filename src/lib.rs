#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // may be revisited
// Scores, percentages and pixel maths convert between counts and floats on purpose.
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::doc_markdown,
    clippy::float_cmp,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools
)]

pub mod types;
pub mod error;
pub mod config;
pub mod cards;
pub mod rng;
pub mod shuffle;
pub mod options;
pub mod timers;
pub mod cues;
pub mod persist;
pub mod grid;
pub mod piece;
pub mod physics;

pub mod modes {
    pub mod flashcards;
    pub mod learn;
    pub mod test;
    pub mod matching;
    pub mod blast;
    pub mod blocks;
}

// Re-exports: stable minimal API surface for external callers
pub use crate::cards::{builtin_deck, load_cards_from_json, Deck, QuizCard};
pub use crate::config::{load_config_from_json, StudyConfig};
pub use crate::cues::Cue;
pub use crate::error::{Result, StudyError};
pub use crate::grid::{Grid, Lines};
pub use crate::options::{build_options, AnswerOption};
pub use crate::persist::{JsonFileStore, KvStore, MemoryStore};
pub use crate::piece::{Piece, Shape};
pub use crate::rng::{rng_for_state, RngCursor};
pub use crate::shuffle::{pick_random, shuffle};
pub use crate::types::{Category, Color, Side, GRID_SIZE};
