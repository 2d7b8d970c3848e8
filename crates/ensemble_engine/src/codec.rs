//! Conversions between position text, the categorical grid and the
//! probability tensor.
//!
//! Position text is FEN: ranks 8 to 1 separated by `/`, then side to move,
//! castling rights, en-passant square and the two move counters.

use std::fmt;

use chess_core::{CastlingRights, Color};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::grid::{CategoricalGrid, Label, Square};
use crate::tensor::{ProbabilityTensor, argmax};

/// Suffix appended by [`encode`] after the side to move.
pub const FIXED_SUFFIX: &str = "KQkq - 0 1";

pub const STARTPOS: &str = chess_core::STARTPOS_FEN;

/// Durable textual form of a position, as kept in session storage.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionText(String);

impl PositionText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn startpos() -> Self {
        Self::new(STARTPOS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub(crate) fn fields(&self) -> Result<Vec<&str>> {
        let fields: Vec<&str> = self.0.split_whitespace().collect();
        match fields.len() {
            0 => Err(EngineError::Format("empty position text".to_string())),
            n if n > 6 => Err(EngineError::Format(format!(
                "position text has {n} fields, at most 6 expected"
            ))),
            _ => Ok(fields),
        }
    }
}

impl From<&str> for PositionText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for PositionText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl AsRef<str> for PositionText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decode the piece placement of `text` into a grid.
pub fn decode(text: &PositionText) -> Result<CategoricalGrid> {
    let fields = text.fields()?;
    decode_placement(fields[0])
}

pub(crate) fn decode_placement(placement: &str) -> Result<CategoricalGrid> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(EngineError::Format(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    let mut grid = CategoricalGrid::empty();
    for (row, rank) in ranks.iter().enumerate() {
        let mut col = 0usize;
        for ch in rank.chars() {
            if let Some(run) = ch.to_digit(10).filter(|d| (1..=8).contains(d)) {
                col += run as usize;
            } else {
                let label = Label::from_char(ch)
                    .filter(|l| *l != Label::Empty)
                    .ok_or_else(|| EngineError::Format(format!("unrecognised character '{ch}'")))?;
                if let Some(sq) = Square::from_row_col(row, col) {
                    grid.set(sq, label);
                }
                col += 1;
            }
            if col > 8 {
                break;
            }
        }
        if col != 8 {
            return Err(EngineError::Format(format!(
                "rank {} expands to {col} squares",
                8 - row
            )));
        }
    }
    Ok(grid)
}

/// Placement field of `grid`, empty runs collapsed to digits.
pub fn placement(grid: &CategoricalGrid) -> String {
    let mut out = String::with_capacity(72);
    for (i, row) in grid.rows().enumerate() {
        if i > 0 {
            out.push('/');
        }
        let mut run = 0;
        for label in row {
            if *label == Label::Empty {
                run += 1;
                continue;
            }
            if run > 0 {
                out.push_str(&run.to_string());
                run = 0;
            }
            out.push(label.to_char());
        }
        if run > 0 {
            out.push_str(&run.to_string());
        }
    }
    out
}

/// Encode `grid` with `side` to move and the fixed [`FIXED_SUFFIX`].
///
/// Exact left inverse of [`decode`]. Use [`Position::to_text`](crate::Position::to_text)
/// to keep real castling, en-passant and clock fields.
pub fn encode(grid: &CategoricalGrid, side: Color) -> PositionText {
    PositionText(format!(
        "{} {} {FIXED_SUFFIX}",
        placement(grid),
        side.fen_char()
    ))
}

/// One-hot tensor: 1.0 at each square's label index.
pub fn grid_to_tensor(grid: &CategoricalGrid) -> ProbabilityTensor {
    let mut tensor = ProbabilityTensor::zeros();
    for sq in Square::all() {
        tensor.square_mut(sq)[grid.get(sq).index()] = 1.0;
    }
    tensor
}

/// Collapse each square to its highest-scoring category.
pub fn tensor_to_grid(tensor: &ProbabilityTensor) -> CategoricalGrid {
    let mut grid = CategoricalGrid::empty();
    for (sq, scores) in Square::all().zip(tensor.squares()) {
        grid.set(sq, Label::ALL[argmax(scores)]);
    }
    grid
}

/// Recolour every piece and hand the move to `side`.
///
/// Castling letters swap case with the pieces they belong to. The en
/// passant square and clocks are carried over unchanged; missing trailing
/// fields are filled with `-`, `-`, `0`, `1`.
pub fn color_swap(text: &PositionText, side: Color) -> Result<PositionText> {
    let fields = text.fields()?;
    let swapped: String = fields[0]
        .chars()
        .map(|ch| {
            if ch.is_ascii_uppercase() {
                ch.to_ascii_lowercase()
            } else {
                ch.to_ascii_uppercase()
            }
        })
        .collect();
    let castling = CastlingRights::from_fen(fields.get(2).copied().unwrap_or("-"))
        .map_err(|e| EngineError::Format(e.to_string()))?
        .swapped();
    Ok(PositionText(format!(
        "{swapped} {} {} {} {} {}",
        side.fen_char(),
        castling.to_fen(),
        fields.get(3).copied().unwrap_or("-"),
        fields.get(4).copied().unwrap_or("0"),
        fields.get(5).copied().unwrap_or("1"),
    )))
}

/// Turn the board upside down: rank order reversed, en-passant square
/// mirrored, other fields kept.
pub fn mirror_ranks(text: &PositionText) -> Result<PositionText> {
    let fields = text.fields()?;
    let mut ranks: Vec<&str> = fields[0].split('/').collect();
    ranks.reverse();
    let en_passant = match fields.get(3).copied().unwrap_or("-") {
        "-" => "-".to_string(),
        ep => Square::from_algebraic(ep)?.mirrored().to_algebraic(),
    };
    Ok(PositionText(format!(
        "{} {} {} {en_passant} {} {}",
        ranks.join("/"),
        fields.get(1).copied().unwrap_or("w"),
        fields.get(2).copied().unwrap_or("-"),
        fields.get(4).copied().unwrap_or("0"),
        fields.get(5).copied().unwrap_or("1"),
    )))
}

/// The colour-flipped equivalent of `text` with White to move.
///
/// `color_swap` alone would leave the pawns marching the wrong way, so the
/// ranks are mirrored as well. Moves found in the result map back with
/// [`Move::mirrored`](crate::Move::mirrored).
pub fn white_frame(text: &PositionText) -> Result<PositionText> {
    mirror_ranks(&color_swap(text, Color::White)?)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod codec_tests;
