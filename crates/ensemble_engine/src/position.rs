use chess_core::{CastlingRights, Color, Piece, PieceKind};

use crate::codec::{PositionText, decode_placement, grid_to_tensor, placement};
use crate::error::{EngineError, Result};
use crate::grid::{CategoricalGrid, Label, Square};
use crate::tensor::ProbabilityTensor;

/// Full board state: grid plus the FEN side fields.
///
/// Castling rights are explicit here rather than inferred from where the
/// king happens to stand; the move applicator relies on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub grid: CategoricalGrid,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Position {
    pub fn startpos() -> Self {
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut grid = CategoricalGrid::empty();
        for sq in Square::all() {
            let piece = match sq.row() {
                0 => Piece::new(Color::Black, back[sq.col()]),
                1 => Piece::new(Color::Black, PieceKind::Pawn),
                6 => Piece::new(Color::White, PieceKind::Pawn),
                7 => Piece::new(Color::White, back[sq.col()]),
                _ => continue,
            };
            grid.set(sq, Label::from_piece(piece));
        }
        Self::from_grid(grid, Color::White)
    }

    /// Position with every castling right the layout supports, no en
    /// passant square and fresh clocks.
    pub fn from_grid(grid: CategoricalGrid, side_to_move: Color) -> Self {
        Self {
            castling: supported_castling(&grid, CastlingRights::ALL),
            grid,
            side_to_move,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Parse position text. Side to move is required; castling, en
    /// passant and the clocks default to `- - 0 1`.
    pub fn parse(text: &PositionText) -> Result<Self> {
        let fields = text.fields()?;
        let grid = decode_placement(fields[0])?;

        let side_to_move = match fields.get(1).copied() {
            Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => {
                return Err(EngineError::Format(format!("bad side to move '{other}'")));
            }
            None => return Err(EngineError::Format("missing side to move".to_string())),
        };

        let castling = CastlingRights::from_fen(fields.get(2).copied().unwrap_or("-"))
            .map_err(|e| EngineError::Format(e.to_string()))?;

        let en_passant = match fields.get(3).copied().unwrap_or("-") {
            "-" => None,
            ep => Some(Square::from_algebraic(ep)?),
        };

        let counter = |idx: usize, default: u32| -> Result<u32> {
            match fields.get(idx) {
                Some(v) => v
                    .parse()
                    .map_err(|_| EngineError::Format(format!("bad move counter '{v}'"))),
                None => Ok(default),
            }
        };

        Ok(Self {
            castling: supported_castling(&grid, castling),
            grid,
            side_to_move,
            en_passant,
            halfmove_clock: counter(4, 0)?,
            fullmove_number: counter(5, 1)?,
        })
    }

    pub fn to_text(&self) -> PositionText {
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), Square::to_algebraic);
        PositionText::new(format!(
            "{} {} {} {ep} {} {}",
            placement(&self.grid),
            self.side_to_move.fen_char(),
            self.castling.to_fen(),
            self.halfmove_clock,
            self.fullmove_number
        ))
    }

    pub fn tensor(&self) -> ProbabilityTensor {
        grid_to_tensor(&self.grid)
    }
}

/// Home row of `color`'s back rank in grid rows (row 0 = rank 8).
pub(crate) fn back_row(color: Color) -> usize {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

/// Keep only the rights whose king and rook stand on their home squares.
pub fn supported_castling(grid: &CategoricalGrid, rights: CastlingRights) -> CastlingRights {
    let holds = |color: Color, col: usize, kind: PieceKind| {
        Square::from_row_col(back_row(color), col)
            .is_some_and(|sq| grid.get(sq).is_kind(kind) && grid.get(sq).color() == Some(color))
    };
    let king_home = |c: Color| holds(c, 4, PieceKind::King);
    let rook_home = |c: Color, col: usize| holds(c, col, PieceKind::Rook);
    CastlingRights {
        wk: rights.wk && king_home(Color::White) && rook_home(Color::White, 7),
        wq: rights.wq && king_home(Color::White) && rook_home(Color::White, 0),
        bk: rights.bk && king_home(Color::Black) && rook_home(Color::Black, 7),
        bq: rights.bq && king_home(Color::Black) && rook_home(Color::Black, 0),
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
