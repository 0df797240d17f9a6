//! Castling rights.

use std::fmt;

use bitflags::bitflags;

use crate::{
    bitboard::Bitboard,
    color::Color,
    square::Square,
    types::CastlingSide,
};

bitflags! {
    /// The four independent castling rights.
    ///
    /// A right only records that neither the king nor the corresponding rook
    /// has moved. Whether castling is currently possible is decided by move
    /// generation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rookery::{CastlingRights, CastlingSide, Color};
    ///
    /// let rights: CastlingRights = "Kq".parse()?;
    /// assert!(rights.has(Color::White, CastlingSide::KingSide));
    /// assert!(!rights.has(Color::White, CastlingSide::QueenSide));
    /// assert_eq!(rights.to_string(), "Kq");
    /// assert_eq!(CastlingRights::empty().to_string(), "-");
    /// # Ok::<_, rookery::ParseFenError>(())
    /// ```
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct CastlingRights: u8 {
        const WHITE_KING_SIDE = 1 << 0;
        const WHITE_QUEEN_SIDE = 1 << 1;
        const BLACK_KING_SIDE = 1 << 2;
        const BLACK_QUEEN_SIDE = 1 << 3;
    }
}

impl CastlingRights {
    /// The right for one color and side.
    pub const fn flag(color: Color, side: CastlingSide) -> CastlingRights {
        match (color, side) {
            (Color::White, CastlingSide::KingSide) => CastlingRights::WHITE_KING_SIDE,
            (Color::White, CastlingSide::QueenSide) => CastlingRights::WHITE_QUEEN_SIDE,
            (Color::Black, CastlingSide::KingSide) => CastlingRights::BLACK_KING_SIDE,
            (Color::Black, CastlingSide::QueenSide) => CastlingRights::BLACK_QUEEN_SIDE,
        }
    }

    /// Both rights of one color.
    pub const fn color(color: Color) -> CastlingRights {
        match color {
            Color::White => {
                CastlingRights::WHITE_KING_SIDE.union(CastlingRights::WHITE_QUEEN_SIDE)
            }
            Color::Black => {
                CastlingRights::BLACK_KING_SIDE.union(CastlingRights::BLACK_QUEEN_SIDE)
            }
        }
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastlingSide) -> bool {
        self.contains(CastlingRights::flag(color, side))
    }

    /// Rights lost when a piece leaves or arrives on `sq`.
    ///
    /// Only the king squares and the rook corners matter.
    pub const fn touched_by(sq: Square) -> CastlingRights {
        match sq {
            Square::E1 => CastlingRights::color(Color::White),
            Square::E8 => CastlingRights::color(Color::Black),
            Square::H1 => CastlingRights::WHITE_KING_SIDE,
            Square::A1 => CastlingRights::WHITE_QUEEN_SIDE,
            Square::H8 => CastlingRights::BLACK_KING_SIDE,
            Square::A8 => CastlingRights::BLACK_QUEEN_SIDE,
            _ => CastlingRights::empty(),
        }
    }

    /// The rook corners of the rights in this set.
    pub fn rook_squares(self) -> Bitboard {
        let mut squares = Bitboard::EMPTY;
        for color in Color::ALL {
            for side in CastlingSide::ALL {
                if self.has(color, side) {
                    squares.add(side.rook_from(color));
                }
            }
        }
        squares
    }

    /// Parses the castling field of a FEN, `-` or a subset of `KQkq`.
    pub fn from_ascii(s: &[u8]) -> Option<CastlingRights> {
        if s == b"-" {
            return Some(CastlingRights::empty());
        }
        if s.is_empty() {
            return None;
        }
        let mut rights = CastlingRights::empty();
        for &ch in s {
            let flag = match ch {
                b'K' => CastlingRights::WHITE_KING_SIDE,
                b'Q' => CastlingRights::WHITE_QUEEN_SIDE,
                b'k' => CastlingRights::BLACK_KING_SIDE,
                b'q' => CastlingRights::BLACK_QUEEN_SIDE,
                _ => return None,
            };
            if rights.contains(flag) {
                return None;
            }
            rights |= flag;
        }
        Some(rights)
    }
}

impl Default for CastlingRights {
    fn default() -> CastlingRights {
        CastlingRights::all()
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (flag, ch) in [
            (CastlingRights::WHITE_KING_SIDE, "K"),
            (CastlingRights::WHITE_QUEEN_SIDE, "Q"),
            (CastlingRights::BLACK_KING_SIDE, "k"),
            (CastlingRights::BLACK_QUEEN_SIDE, "q"),
        ] {
            if self.contains(flag) {
                f.write_str(ch)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for CastlingRights {
    type Err = crate::fen::ParseFenError;

    fn from_str(s: &str) -> Result<CastlingRights, crate::fen::ParseFenError> {
        CastlingRights::from_ascii(s.as_bytes()).ok_or(crate::fen::ParseFenError::InvalidCastling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(CastlingRights::from_ascii(b"KQkq"), Some(CastlingRights::all()));
        assert_eq!(CastlingRights::from_ascii(b"-"), Some(CastlingRights::empty()));
        assert_eq!(
            CastlingRights::from_ascii(b"Qk"),
            Some(CastlingRights::WHITE_QUEEN_SIDE | CastlingRights::BLACK_KING_SIDE)
        );
        assert_eq!(CastlingRights::from_ascii(b""), None);
        assert_eq!(CastlingRights::from_ascii(b"KK"), None);
        assert_eq!(CastlingRights::from_ascii(b"KX"), None);
    }

    #[test]
    fn test_touched_by() {
        assert_eq!(
            CastlingRights::touched_by(Square::E1),
            CastlingRights::WHITE_KING_SIDE | CastlingRights::WHITE_QUEEN_SIDE
        );
        assert_eq!(
            CastlingRights::touched_by(Square::A8),
            CastlingRights::BLACK_QUEEN_SIDE
        );
        assert!(CastlingRights::touched_by(Square::E4).is_empty());
    }

    #[test]
    fn test_rook_squares() {
        assert_eq!(CastlingRights::all().rook_squares(), Bitboard::CORNERS);
        assert_eq!(
            CastlingRights::BLACK_KING_SIDE.rook_squares(),
            Bitboard::from_square(Square::H8)
        );
    }
}
