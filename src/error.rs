/// Errors from the few fallible surfaces: loading decks and config files,
/// and talking to the key-value store. Game actions never fail; a
/// disallowed action leaves the state untouched instead.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No cards in deck")]
    EmptyDeck,

    #[error("Duplicate card id {0}")]
    DuplicateCardId(u32),

    #[error("Card id {id}: {reason}")]
    InvalidCard { id: u32, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, StudyError>;
