use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};
use crate::grid::Square;

/// A move between two distinct squares, optionally marked as a queen
/// promotion.
///
/// The marker is informational: the applicator promotes any pawn that
/// reaches its last rank whether or not it is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: bool,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Result<Self> {
        if from == to {
            return Err(EngineError::Format(format!(
                "move from {from} to itself"
            )));
        }
        Ok(Self {
            from,
            to,
            promotion: false,
        })
    }

    pub fn from_indices(from: usize, to: usize) -> Result<Self> {
        Self::new(Square::new(from)?, Square::new(to)?)
    }

    /// Parse `a2a3` or `a7a8q`. Letters are case-insensitive. The `q`
    /// suffix is only accepted on moves to rank 8 or rank 1.
    pub fn parse(text: &str) -> Result<Self> {
        let bad = || EngineError::Format(format!("expected 'a2a3' or 'a7a8q', got '{text}'"));
        if !text.is_ascii() {
            return Err(bad());
        }
        let lower = text.to_ascii_lowercase();
        let promotion = match lower.len() {
            4 => false,
            5 if lower.ends_with('q') => true,
            _ => return Err(bad()),
        };
        let from = Square::from_algebraic(&lower[0..2]).map_err(|_| bad())?;
        let to = Square::from_algebraic(&lower[2..4]).map_err(|_| bad())?;
        if promotion && !matches!(to.rank(), 1 | 8) {
            return Err(bad());
        }
        let mut mv = Self::new(from, to)?;
        mv.promotion = promotion;
        Ok(mv)
    }

    /// Origin and destination swapped.
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            promotion: self.promotion,
        }
    }

    /// The same move seen with the board turned upside down.
    pub fn mirrored(self) -> Self {
        Self {
            from: self.from.mirrored(),
            to: self.to.mirrored(),
            promotion: self.promotion,
        }
    }

    /// Same squares, ignoring the promotion marker.
    pub fn same_squares(self, other: Move) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Move::parse(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.promotion {
            f.write_str("q")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "moves_tests.rs"]
mod moves_tests;
