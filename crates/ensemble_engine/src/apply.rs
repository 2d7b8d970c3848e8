//! Playing a move on a [`Position`].
//!
//! The applicator does not check legality; it only knows how pieces land.
//! Castling is decided by the position's castling rights, never by the
//! king's location alone.

use chess_core::{CastlingRights, Color, Piece, PieceKind};

use crate::grid::{CategoricalGrid, Label, Square};
use crate::moves::Move;
use crate::position::{Position, back_row};

/// Return the position after `mv`.
///
/// Pawns reaching the far rank always become queens. A double pawn push
/// records the en-passant square, and a pawn stepping diagonally onto that
/// square removes the pawn it passed.
pub fn apply(position: &Position, mv: Move) -> Position {
    let mut next = position.clone();
    let moved = position.grid.get(mv.from);
    let captured = position.grid.get(mv.to);
    let color = moved.color().unwrap_or(position.side_to_move);

    next.en_passant = None;
    let mut reset_clock = moved.is_kind(PieceKind::Pawn) || captured != Label::Empty;

    if let Some(castle) = castle_squares(position, mv) {
        next.grid.set(mv.from, Label::Empty);
        next.grid.set(castle.rook_from, Label::Empty);
        next.grid.set(castle.king_to, moved);
        next.grid.set(castle.rook_to, rook(color));
        next.castling.clear(color);
        // In king-takes-rook notation the own rook on `to` is no capture.
        reset_clock = false;
    } else {
        let mut placed = moved;
        if moved.is_kind(PieceKind::Pawn) {
            if Some(mv.to) == position.en_passant
                && mv.from.col() != mv.to.col()
                && captured == Label::Empty
                && let Some(passed) = Square::from_row_col(mv.from.row(), mv.to.col())
            {
                next.grid.set(passed, Label::Empty);
            }
            if mv.from.col() == mv.to.col() && mv.from.row().abs_diff(mv.to.row()) == 2 {
                next.en_passant =
                    Square::from_row_col((mv.from.row() + mv.to.row()) / 2, mv.from.col());
            }
            if mv.to.row() == last_row(color) {
                placed = Label::queen(color);
            }
        }

        next.grid.set(mv.from, Label::Empty);
        next.grid.set(mv.to, placed);

        if moved.is_kind(PieceKind::King) {
            next.castling.clear(color);
        }
        next.castling.clear_corner(mv.from.to_core());
        next.castling.clear_corner(mv.to.to_core());
    }

    next.halfmove_clock = if reset_clock {
        0
    } else {
        position.halfmove_clock + 1
    };
    if position.side_to_move == Color::Black {
        next.fullmove_number += 1;
    }
    next.side_to_move = position.side_to_move.other();
    next
}

/// Move pieces on a bare grid: no castling rights, no en passant. Pawns
/// reaching the far rank still promote.
pub fn apply_to_grid(grid: &CategoricalGrid, mv: Move) -> CategoricalGrid {
    let side = grid.get(mv.from).color().unwrap_or(Color::White);
    let position = Position {
        castling: CastlingRights::NONE,
        ..Position::from_grid(*grid, side)
    };
    apply(&position, mv).grid
}

struct Castle {
    king_to: Square,
    rook_from: Square,
    rook_to: Square,
}

/// Squares of a castling move, when `mv` is one the rights allow.
fn castle_squares(position: &Position, mv: Move) -> Option<Castle> {
    let king = position.grid.get(mv.from);
    if !king.is_kind(PieceKind::King) {
        return None;
    }
    let color = king.color()?;
    let row = back_row(color);
    if mv.from != Square::from_row_col(row, 4)? || mv.to.row() != row {
        return None;
    }

    let (held, king_col, rook_col, rook_to_col) = match mv.to.col() {
        6 | 7 => (position.castling.kingside(color), 6, 7, 5),
        2 | 0 => (position.castling.queenside(color), 2, 0, 3),
        _ => return None,
    };
    let rook_from = Square::from_row_col(row, rook_col)?;
    if !held || position.grid.get(rook_from) != rook(color) {
        return None;
    }
    Some(Castle {
        king_to: Square::from_row_col(row, king_col)?,
        rook_from,
        rook_to: Square::from_row_col(row, rook_to_col)?,
    })
}

fn rook(color: Color) -> Label {
    Label::from_piece(Piece::new(color, PieceKind::Rook))
}

/// Promotion row: row 0 (rank 8) for White, row 7 (rank 1) for Black.
fn last_row(color: Color) -> usize {
    back_row(color.other())
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod apply_tests;
