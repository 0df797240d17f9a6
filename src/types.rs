use std::fmt;

use crate::{color::Color, role::Role, square::Square};

/// A piece with [`Color`] and [`Role`].
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Piece {
    pub color: Color,
    pub role: Role,
}

impl Piece {
    /// FEN letter: uppercase for White, lowercase for Black.
    pub const fn char(self) -> char {
        match self.color {
            Color::White => self.role.upper_char(),
            Color::Black => self.role.char(),
        }
    }

    pub fn from_char(ch: char) -> Option<Piece> {
        Role::from_char(ch).map(|role| role.of(Color::from_white(ch.is_ascii_uppercase())))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.role)
    }
}

/// `KingSide` (O-O) or `QueenSide` (O-O-O).
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    pub const fn is_king_side(self) -> bool {
        matches!(self, CastlingSide::KingSide)
    }

    pub const fn is_queen_side(self) -> bool {
        matches!(self, CastlingSide::QueenSide)
    }

    /// The king's home square.
    pub const fn king_from(color: Color) -> Square {
        Square::from_coords(4, color.backrank())
    }

    pub const fn king_to(self, color: Color) -> Square {
        match self {
            CastlingSide::KingSide => Square::from_coords(6, color.backrank()),
            CastlingSide::QueenSide => Square::from_coords(2, color.backrank()),
        }
    }

    /// The rook's home corner.
    pub const fn rook_from(self, color: Color) -> Square {
        match self {
            CastlingSide::KingSide => Square::from_coords(7, color.backrank()),
            CastlingSide::QueenSide => Square::from_coords(0, color.backrank()),
        }
    }

    pub const fn rook_to(self, color: Color) -> Square {
        match self {
            CastlingSide::KingSide => Square::from_coords(5, color.backrank()),
            CastlingSide::QueenSide => Square::from_coords(3, color.backrank()),
        }
    }

    /// Recognizes the king's two-square move as castling.
    pub fn from_king_move(color: Color, from: Square, to: Square) -> Option<CastlingSide> {
        if from != CastlingSide::king_from(color) {
            None
        } else if to == CastlingSide::KingSide.king_to(color) {
            Some(CastlingSide::KingSide)
        } else if to == CastlingSide::QueenSide.king_to(color) {
            Some(CastlingSide::QueenSide)
        } else {
            None
        }
    }

    /// `KingSide` and `QueenSide`, in this order.
    pub const ALL: [CastlingSide; 2] = [CastlingSide::KingSide, CastlingSide::QueenSide];
}

/// Outcome of a finished game.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Outcome {
    Decisive { winner: Color },
    Draw,
}

impl Outcome {
    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::Decisive { winner } => Some(winner),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Outcome::Decisive {
                winner: Color::White,
            } => "1-0",
            Outcome::Decisive {
                winner: Color::Black,
            } => "0-1",
            Outcome::Draw => "1/2-1/2",
        })
    }
}
