//! Legal-move enumeration behind a narrow rules seam.
//!
//! A [`RulesOracle`] is only ever asked about positions with White to move.
//! [`OracleAdapter`] takes care of presenting Black's positions colour
//! flipped and upside down, and of mapping the answers back.

use chess_core::PieceKind;
use tracing::debug;

use crate::apply::apply;
use crate::codec::{PositionText, white_frame};
use crate::error::Result;
use crate::grid::{CategoricalGrid, Square};
use crate::moves::Move;
use crate::position::Position;

/// Source of legal moves for positions with White to move.
pub trait RulesOracle: Send + Sync {
    fn legal_moves(&self, text: &PositionText) -> Result<Vec<Move>>;

    fn is_legal(&self, text: &PositionText, mv: Move) -> Result<bool> {
        Ok(self
            .legal_moves(text)?
            .iter()
            .any(|legal| legal.same_squares(mv)))
    }
}

/// Standard chess rules from `chess_core`.
///
/// Under-promotions are dropped: the four promotion choices collapse into
/// the single queen promotion.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl RulesOracle for StandardRules {
    fn legal_moves(&self, text: &PositionText) -> Result<Vec<Move>> {
        let pos = chess_core::Position::from_fen(text.as_str())?;
        Ok(chess_core::legal_moves(&pos)
            .into_iter()
            .filter(|m| matches!(m.promo, None | Some(PieceKind::Queen)))
            .map(|m| Move {
                from: Square::from_core(m.from),
                to: Square::from_core(m.to),
                promotion: m.promo.is_some(),
            })
            .collect())
    }
}

/// A legal move together with the position it leads to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub position: Position,
    pub mv: Move,
}

/// Candidates in the oracle's order. Indices mean nothing across calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// First candidate whose resulting grid is exactly `grid`.
    pub fn find(&self, grid: &CategoricalGrid) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.position.grid == *grid)
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.candidates.iter().map(|c| c.mv)
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

impl IntoIterator for CandidateSet {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

#[derive(Clone, Debug, Default)]
pub struct OracleAdapter<O = StandardRules> {
    oracle: O,
}

impl OracleAdapter<StandardRules> {
    pub fn standard() -> Self {
        Self::new(StandardRules)
    }
}

impl<O: RulesOracle> OracleAdapter<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Legal moves of the side to move, in real board coordinates.
    pub fn legal_moves(&self, position: &Position) -> Result<Vec<Move>> {
        let text = position.to_text();
        match position.side_to_move {
            chess_core::Color::White => self.oracle.legal_moves(&text),
            chess_core::Color::Black => {
                let framed = white_frame(&text)?;
                Ok(self
                    .oracle
                    .legal_moves(&framed)?
                    .into_iter()
                    .map(Move::mirrored)
                    .collect())
            }
        }
    }

    /// Every legal move of `text` with its resulting position. Empty means
    /// checkmate or stalemate.
    pub fn enumerate(&self, text: &PositionText) -> Result<CandidateSet> {
        self.enumerate_position(&Position::parse(text)?)
    }

    pub fn enumerate_position(&self, position: &Position) -> Result<CandidateSet> {
        let candidates: Vec<Candidate> = self
            .legal_moves(position)?
            .into_iter()
            .map(|mv| Candidate {
                position: apply(position, mv),
                mv,
            })
            .collect();
        debug!(
            side = %position.side_to_move.fen_char(),
            candidates = candidates.len(),
            "enumerated legal moves"
        );
        Ok(CandidateSet { candidates })
    }

    /// Whether `mv`, in either orientation, is legal in `text`.
    pub fn is_legal(&self, text: &PositionText, mv: Move) -> Result<bool> {
        Ok(self.legal_orientation(text, mv)?.is_some())
    }

    /// The legal move `mv` stands for: itself, or failing that the move
    /// with origin and destination swapped.
    pub fn legal_orientation(&self, text: &PositionText, mv: Move) -> Result<Option<Move>> {
        self.legal_orientation_in(&Position::parse(text)?, mv)
    }

    pub fn legal_orientation_in(&self, position: &Position, mv: Move) -> Result<Option<Move>> {
        let legal = self.legal_moves(position)?;
        let found = [mv, mv.reversed()]
            .into_iter()
            .find_map(|wanted| legal.iter().copied().find(|m| m.same_squares(wanted)));
        Ok(found)
    }
}

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod oracle_tests;
