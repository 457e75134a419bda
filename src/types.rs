//! Core enums and small value types shared across the crate.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the seven Xiangqi piece kinds, color-agnostic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Piece {
    King,
    Guard,
    Elephant,
    Horse,
    Rook,
    Cannon,
    Pawn,
}

pub const PIECE_KINDS: [Piece; 7] = [
    Piece::King,
    Piece::Guard,
    Piece::Elephant,
    Piece::Horse,
    Piece::Rook,
    Piece::Cannon,
    Piece::Pawn,
];

impl Piece {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Piece::King => 0,
            Piece::Guard => 1,
            Piece::Elephant => 2,
            Piece::Horse => 3,
            Piece::Rook => 4,
            Piece::Cannon => 5,
            Piece::Pawn => 6,
        }
    }

    #[inline]
    pub const fn from_index(idx: usize) -> Piece {
        match idx {
            0 => Piece::King,
            1 => Piece::Guard,
            2 => Piece::Elephant,
            3 => Piece::Horse,
            4 => Piece::Rook,
            5 => Piece::Cannon,
            6 => Piece::Pawn,
            _ => panic!("invalid piece index"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// A (piece, color) kind, enumerated 0..13: Red kinds 0..6, Black kinds 7..13.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Kind(pub u8);

pub const NUM_KINDS: usize = 14;

impl Kind {
    #[inline]
    pub const fn new(piece: Piece, color: Color) -> Kind {
        Kind((color.index() * 7 + piece.index()) as u8)
    }

    #[inline]
    pub const fn piece(self) -> Piece {
        Piece::from_index(self.0 as usize % 7)
    }

    #[inline]
    pub const fn color(self) -> Color {
        if (self.0 as usize) < 7 {
            Color::Red
        } else {
            Color::Black
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A board square, `rank * 9 + file`. Rank 0 is Black's back rank, rank 9 is Red's.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(pub u8);

pub const BOARD_RANKS: u8 = 10;
pub const BOARD_FILES: u8 = 9;
pub const NUM_SQUARES: usize = (BOARD_RANKS as usize) * (BOARD_FILES as usize);

impl Square {
    #[inline]
    pub const fn new(rank: u8, file: u8) -> Square {
        Square(rank * BOARD_FILES + file)
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / BOARD_FILES
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % BOARD_FILES
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn on_board(rank: i32, file: i32) -> bool {
        rank >= 0 && rank < BOARD_RANKS as i32 && file >= 0 && file < BOARD_FILES as i32
    }

    /// Red's half is ranks 5..9 (below the river), Black's is ranks 0..4.
    #[inline]
    pub const fn in_own_half(self, color: Color) -> bool {
        match color {
            Color::Red => self.rank() >= 5,
            Color::Black => self.rank() <= 4,
        }
    }

    #[inline]
    pub const fn in_palace(self, color: Color) -> bool {
        let f = self.file();
        if f < 3 || f > 5 {
            return false;
        }
        match color {
            Color::Red => self.rank() >= 7,
            Color::Black => self.rank() <= 2,
        }
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.rank(), self.file())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.rank(), self.file())
    }
}

/// A move: a pair of squares. No promotions, no castling, no special moves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Move {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Opaque undo token produced by `Position::make`, required by `Position::unmake`.
/// Records the kind that was captured on the destination square, if any.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Undo {
    pub captured: Option<Kind>,
}
