//! Turn driver: one human move and one ensemble reply per call, with the
//! game's position kept in a caller-owned store.
//!
//! Each turn reads the stored position once and writes the new one once,
//! after both moves have been played. A failed turn leaves the store as it
//! was.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::apply::apply;
use crate::codec::PositionText;
use crate::config::EnsembleConfig;
use crate::error::{EngineError, Result};
use crate::moves::Move;
use crate::oracle::{RulesOracle, StandardRules};
use crate::position::Position;
use crate::predictor::Predictor;
use crate::resolver::{EnsembleResolver, Resolution, Selection};

/// Durable per-game position storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<PositionText>>;

    fn put(&mut self, key: &str, text: PositionText) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    games: HashMap<String, PositionText>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<PositionText>> {
        Ok(self.games.get(key).cloned())
    }

    fn put(&mut self, key: &str, text: PositionText) -> Result<()> {
        self.games.insert(key.to_string(), text);
        Ok(())
    }
}

/// All sessions in one JSON object on disk, keyed by session id.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, PositionText>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| EngineError::Store(format!("Failed to read: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| EngineError::Store(format!("Failed to parse: {}", e)))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<PositionText>> {
        Ok(self.read_all()?.remove(key))
    }

    fn put(&mut self, key: &str, text: PositionText) -> Result<()> {
        let mut games = self.read_all()?;
        games.insert(key.to_string(), text);
        let json = serde_json::to_string_pretty(&games)
            .map_err(|e| EngineError::Store(format!("Failed to serialize: {}", e)))?;
        std::fs::write(&self.path, json)
            .map_err(|e| EngineError::Store(format!("Failed to write: {}", e)))
    }
}

/// Named middlegame setups to start from, Black to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opening {
    SpasskyFischer1972,
    KingsIndian,
    NimzoIndian,
    RuyLopez,
}

impl Opening {
    pub const ALL: [Opening; 4] = [
        Opening::SpasskyFischer1972,
        Opening::KingsIndian,
        Opening::NimzoIndian,
        Opening::RuyLopez,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Opening::SpasskyFischer1972 => "Spassky-Fischer 1972",
            Opening::KingsIndian => "King's Indian Defence",
            Opening::NimzoIndian => "Nimzo-Indian Defence",
            Opening::RuyLopez => "Ruy Lopez",
        }
    }

    pub fn text(self) -> PositionText {
        PositionText::from(match self {
            Opening::SpasskyFischer1972 => {
                "r1b1qrk1/1pp1ppbp/1n4p1/p1n1P3/P3N3/1B3N1P/1PP1QPP1/R1B2RK1 b - - 0 1"
            }
            Opening::KingsIndian => {
                "rnbq1rk1/ppp2pbp/3p1np1/4p3/2PPP3/2N2N2/PP2BPPP/R1BQ1RK1 b - - 0 1"
            }
            Opening::NimzoIndian => {
                "rnbq1rk1/pp3ppp/4pn2/2pp4/1bPP4/2NBPN2/PP3PPP/R1BQ1RK1 b - - 0 1"
            }
            Opening::RuyLopez => {
                "r1bq1rk1/2ppbppp/p1n2n2/1p2p3/4P3/1BP2N2/PP1P1PPP/RNBQR1K1 b - - 0 1"
            }
        })
    }
}

/// What one turn did.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnOutcome {
    /// The human move as played, in its legal orientation.
    pub human_move: Move,
    /// The ensemble's reply, or `NoLegalMoves` when the human move ended
    /// the game.
    pub reply: Resolution,
    /// The position now in the store.
    pub text: PositionText,
}

impl TurnOutcome {
    pub fn engine_move(&self) -> Option<&Selection> {
        self.reply.selection()
    }

    pub fn is_game_over(&self) -> bool {
        self.reply.is_terminal()
    }
}

/// A human playing against an ensemble of predictors.
pub struct Game<O = StandardRules> {
    resolver: EnsembleResolver<O>,
    predictors: Vec<Box<dyn Predictor>>,
}

impl Game<StandardRules> {
    pub fn new(config: EnsembleConfig, predictors: Vec<Box<dyn Predictor>>) -> Self {
        Self::with_resolver(EnsembleResolver::new(config), predictors)
    }
}

impl<O: RulesOracle> Game<O> {
    pub fn with_resolver(resolver: EnsembleResolver<O>, predictors: Vec<Box<dyn Predictor>>) -> Self {
        Self {
            resolver,
            predictors,
        }
    }

    pub fn resolver(&self) -> &EnsembleResolver<O> {
        &self.resolver
    }

    /// Store the start position under `key`, replacing any game there.
    /// Defaults to the standard starting position.
    pub fn new_game<S: SessionStore>(
        &self,
        store: &mut S,
        key: &str,
        start: Option<PositionText>,
    ) -> Result<PositionText> {
        let position = match start {
            Some(text) => Position::parse(&text)?,
            None => Position::startpos(),
        };
        let text = position.to_text();
        store.put(key, text.clone())?;
        info!(session = key, position = %text, "new game");
        Ok(text)
    }

    /// Play `human_move` in the stored game, then the ensemble's reply.
    pub fn play_turn<S: SessionStore>(
        &self,
        store: &mut S,
        key: &str,
        human_move: &str,
    ) -> Result<TurnOutcome> {
        let stored = store
            .get(key)?
            .ok_or_else(|| EngineError::UnknownSession(key.to_string()))?;
        let position = Position::parse(&stored)?;

        let requested = Move::parse(human_move)?;
        let human = self
            .resolver
            .adapter()
            .legal_orientation_in(&position, requested)?
            .ok_or_else(|| EngineError::IllegalMove(requested.to_string()))?;
        let after_human = apply(&position, human);

        let reply = self.resolver.resolve(&after_human, &self.predictors)?;
        let text = match &reply {
            Resolution::Selected(selection) => selection.position.to_text(),
            Resolution::NoLegalMoves => after_human.to_text(),
        };
        store.put(key, text.clone())?;

        match &reply {
            Resolution::Selected(selection) => info!(
                session = key,
                human = %human,
                reply = %selection.mv,
                tag = %selection.tag,
                "turn played"
            ),
            Resolution::NoLegalMoves => info!(session = key, human = %human, "game over"),
        }

        Ok(TurnOutcome {
            human_move: human,
            reply,
            text,
        })
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
