//! Board squares, the 13-symbol piece alphabet and the categorical grid.
//!
//! Squares are numbered row-major from the top-left as White sees the
//! board: index 0 is `a8`, index 7 is `h8`, index 63 is `h1`. This differs
//! from `chess_core`, which numbers from `a1`; [`Square::from_core`] and
//! [`Square::to_core`] convert between the two.

use std::fmt;

use chess_core::{Color, Piece, PieceKind};

use crate::error::{EngineError, Result};

/// Number of categories in the piece alphabet (12 pieces + empty).
pub const CATEGORIES: usize = 13;

/// Number of squares on the board.
pub const SQUARES: usize = 64;

/// One square's contents. The discriminant is the tensor category index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    BlackRook = 0,
    BlackKnight = 1,
    BlackBishop = 2,
    BlackQueen = 3,
    BlackKing = 4,
    BlackPawn = 5,
    WhiteRook = 6,
    WhiteKnight = 7,
    WhiteBishop = 8,
    WhiteQueen = 9,
    WhiteKing = 10,
    WhitePawn = 11,
    Empty = 12,
}

const KIND_ORDER: [PieceKind; 6] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Pawn,
];

impl Label {
    /// All labels in category order.
    pub const ALL: [Label; CATEGORIES] = [
        Label::BlackRook,
        Label::BlackKnight,
        Label::BlackBishop,
        Label::BlackQueen,
        Label::BlackKing,
        Label::BlackPawn,
        Label::WhiteRook,
        Label::WhiteKnight,
        Label::WhiteBishop,
        Label::WhiteQueen,
        Label::WhiteKing,
        Label::WhitePawn,
        Label::Empty,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Label> {
        Label::ALL.get(index).copied()
    }

    pub fn from_piece(piece: Piece) -> Label {
        let offset = match piece.color {
            Color::Black => 0,
            Color::White => 6,
        };
        let kind = match piece.kind {
            PieceKind::Rook => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Queen => 3,
            PieceKind::King => 4,
            PieceKind::Pawn => 5,
        };
        Label::ALL[offset + kind]
    }

    pub fn piece(self) -> Option<Piece> {
        let idx = self.index();
        if idx >= 12 {
            return None;
        }
        let color = if idx < 6 { Color::Black } else { Color::White };
        Some(Piece::new(color, KIND_ORDER[idx % 6]))
    }

    pub fn color(self) -> Option<Color> {
        self.piece().map(|p| p.color)
    }

    pub fn is_kind(self, kind: PieceKind) -> bool {
        self.piece().is_some_and(|p| p.kind == kind)
    }

    /// FEN letter, or `.` for an empty square.
    pub fn to_char(self) -> char {
        self.piece().map_or('.', Piece::fen_char)
    }

    pub fn from_char(ch: char) -> Option<Label> {
        if ch == '.' {
            return Some(Label::Empty);
        }
        Piece::from_fen_char(ch).map(Label::from_piece)
    }

    /// The same piece in the other colour.
    pub fn recolored(self) -> Label {
        match self.piece() {
            Some(p) => Label::from_piece(Piece::new(p.color.other(), p.kind)),
            None => Label::Empty,
        }
    }

    pub fn queen(color: Color) -> Label {
        Label::from_piece(Piece::new(color, PieceKind::Queen))
    }
}

/// A board square, 0 (`a8`) through 63 (`h1`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub fn new(index: usize) -> Result<Square> {
        if index < SQUARES {
            Ok(Square(index as u8))
        } else {
            Err(EngineError::IllegalSquare(index))
        }
    }

    pub fn from_row_col(row: usize, col: usize) -> Option<Square> {
        (row < 8 && col < 8).then(|| Square((row * 8 + col) as u8))
    }

    /// Parse `<file><rank>`, e.g. `e4`.
    pub fn from_algebraic(text: &str) -> Result<Square> {
        match text.as_bytes() {
            &[f @ b'a'..=b'h', r @ b'1'..=b'8'] => {
                let col = (f - b'a') as usize;
                let row = (b'8' - r) as usize;
                Ok(Square((row * 8 + col) as u8))
            }
            _ => Err(EngineError::Format(format!("bad square '{text}'"))),
        }
    }

    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.col() as u8) as char;
        format!("{file}{}", self.rank())
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn row(self) -> usize {
        self.index() / 8
    }

    pub fn col(self) -> usize {
        self.index() % 8
    }

    /// Chess rank, 1..=8.
    pub fn rank(self) -> usize {
        8 - self.row()
    }

    /// Same file, opposite rank (`e2` <-> `e7`).
    pub fn mirrored(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// Convert from `chess_core`'s a1-based numbering.
    pub fn from_core(sq: u8) -> Square {
        Square((sq & 63) ^ 56)
    }

    pub fn to_core(self) -> u8 {
        self.0 ^ 56
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..SQUARES as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

/// 8x8 grid of labels; row 0 is rank 8, column 0 is file a.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoricalGrid([Label; SQUARES]);

impl Default for CategoricalGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl CategoricalGrid {
    pub fn empty() -> Self {
        Self([Label::Empty; SQUARES])
    }

    pub fn from_labels(labels: [Label; SQUARES]) -> Self {
        Self(labels)
    }

    pub fn labels(&self) -> &[Label; SQUARES] {
        &self.0
    }

    pub fn get(&self, sq: Square) -> Label {
        self.0[sq.index()]
    }

    pub fn set(&mut self, sq: Square, label: Label) {
        self.0[sq.index()] = label;
    }

    /// Row `r` (0 = rank 8), or `None` past the last row.
    pub fn row(&self, r: usize) -> Option<&[Label]> {
        self.0.chunks_exact(8).nth(r)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Label]> {
        self.0.chunks_exact(8)
    }

    /// Piece count per category, empty squares excluded.
    pub fn piece_counts(&self) -> [u32; CATEGORIES - 1] {
        let mut counts = [0u32; CATEGORIES - 1];
        for label in self.0 {
            if let Some(slot) = counts.get_mut(label.index()) {
                *slot += 1;
            }
        }
        counts
    }

    pub fn recolored(&self) -> Self {
        Self(self.0.map(Label::recolored))
    }
}

impl fmt::Display for CategoricalGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|l| l.to_char()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CategoricalGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CategoricalGrid")?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod grid_tests;
