//! Standard chess rules: pieces, FEN positions with castling and en passant
//! state, and legal move generation.
//!
//! The ensemble engine treats this crate as its rules oracle; nothing here
//! knows about predictors or tensors.

pub mod board;
pub mod movegen;
pub mod perft;
pub mod types;

pub use board::*;
pub use movegen::*;
pub use perft::perft;
pub use types::*;
