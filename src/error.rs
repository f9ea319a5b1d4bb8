use thiserror::Error;

/// Error taxonomy for the quiz core.
///
/// Malformed per-question data (an unresolvable correct-answer id) is
/// deliberately *not* represented here: it is normalized to a safe default
/// at load time instead of failing the load.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The catalog document did not parse into the expected shape. Fatal for
    /// that load attempt; no partial catalog is installed.
    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),

    /// The requested category has no questions in the store.
    #[error("no questions available for this category")]
    EmptyCategory,

    /// A question store or score ledger operation failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Reading a catalog document from disk failed.
    #[error("catalog file error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored option/tag lists failed to (de)serialize.
    #[error("stored question data error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
