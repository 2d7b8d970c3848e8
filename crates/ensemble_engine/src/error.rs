use chess_core::FenError;
use thiserror::Error;

use crate::predictor::PredictorError;

/// Errors surfaced by one resolve cycle or its building blocks.
///
/// A position with no legal moves is not an error; it is reported as
/// [`Resolution::NoLegalMoves`](crate::Resolution::NoLegalMoves).
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed position text or move string.
    #[error("malformed input: {0}")]
    Format(String),
    /// Square address outside the 64-square board.
    #[error("square index {0} is outside the board")]
    IllegalSquare(usize),
    /// Move rejected by the rules oracle.
    #[error("illegal move {0}")]
    IllegalMove(String),
    /// Tensor with the wrong shape or non-finite scores.
    #[error("malformed tensor: {0}")]
    Decode(String),
    #[error("predictor '{name}' failed: {source}")]
    Predictor {
        name: String,
        #[source]
        source: PredictorError,
    },
    #[error("no predictor produced a usable prediction")]
    NoPredictions,
    #[error("rules oracle rejected position: {0}")]
    Oracle(#[from] FenError),
    #[error("unknown session '{0}'")]
    UnknownSession(String),
    #[error("session store failure: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
