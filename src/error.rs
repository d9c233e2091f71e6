use thiserror::Error;

/// Errors raised by registry validation, selection changes and style composition.
///
/// Partial district data is never an error: missing counts or percentages are
/// read as `None` by [`crate::models::District`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    #[error("unknown election: {0}")]
    UnknownElection(String),

    #[error("candidate {candidate} does not take part in election {election}")]
    UnknownCandidate { election: String, candidate: String },

    #[error("invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("invalid style document: {0}")]
    InvalidStyle(String),
}

pub type MapResult<T> = std::result::Result<T, MapError>;
