//! Move selection for a human-vs-ensemble chess game.
//!
//! Positions travel between three forms: FEN-style [`PositionText`], the
//! 64-square [`CategoricalGrid`] and the 64×13 [`ProbabilityTensor`] that
//! predictors read and write. The [`EnsembleResolver`] asks every
//! [`Predictor`] for the next position and settles on one legal move, using
//! `chess_core` as its rules oracle.
//!
//! ```no_run
//! use ensemble_engine::{EnsembleConfig, Game, MemoryStore, NoisyEchoPredictor, Predictor};
//!
//! let predictors: Vec<Box<dyn Predictor>> = vec![Box::new(NoisyEchoPredictor::new("echo", 0.1))];
//! let game = Game::new(EnsembleConfig::default(), predictors);
//! let mut store = MemoryStore::new();
//! game.new_game(&mut store, "demo", None)?;
//! let turn = game.play_turn(&mut store, "demo", "e2e4")?;
//! println!("{}", turn.text);
//! # Ok::<(), ensemble_engine::EngineError>(())
//! ```

pub mod apply;
pub mod codec;
pub mod config;
pub mod error;
pub mod grid;
pub mod moves;
pub mod oracle;
pub mod position;
pub mod predictor;
pub mod resolver;
pub mod scorer;
pub mod session;
pub mod tensor;

pub use apply::{apply, apply_to_grid};
pub use codec::{
    PositionText, color_swap, decode, encode, grid_to_tensor, mirror_ranks, tensor_to_grid,
    white_frame,
};
pub use config::{ConfigError, EnsembleConfig, FailurePolicy};
pub use error::{EngineError, Result};
pub use grid::{CategoricalGrid, Label, Square};
pub use moves::Move;
pub use oracle::{Candidate, CandidateSet, OracleAdapter, RulesOracle, StandardRules};
pub use position::Position;
pub use predictor::{FnPredictor, NoisyEchoPredictor, Predictor, PredictorError};
pub use resolver::{DecisionTag, EnsembleResolver, Resolution, Selection};
pub use scorer::{
    ConfidenceMode, cloned_piece_detected, confidence, focused_confidence, matches, moved_squares,
};
pub use session::{FileStore, Game, MemoryStore, Opening, SessionStore, TurnOutcome};
pub use tensor::ProbabilityTensor;
