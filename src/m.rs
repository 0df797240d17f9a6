use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::{role::Role, square::Square};

/// A move from one square to another, with an optional promotion.
///
/// Castling is the king's two-square move, like `e1g1`. Whether a move is
/// a capture, en passant, castling or a double pawn push depends on the
/// position it is played in; see
/// [`Position::move_flags()`](crate::Position::move_flags).
///
/// # Display
///
/// `Move` implements [`Display`](std::fmt::Display) and
/// [`FromStr`](std::str::FromStr) using the machine notation of the
/// [`uci`](crate::uci) module.
///
/// ```
/// use rookery::{Move, Role, Square};
///
/// let m = Move::new(Square::E7, Square::E8).with_promotion(Role::Queen);
/// assert_eq!(m.to_string(), "e7e8q");
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    #[must_use]
    #[inline]
    pub const fn with_promotion(self, role: Role) -> Move {
        Move {
            promotion: Some(role),
            ..self
        }
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }
}

bitflags! {
    /// Properties of a move relative to the position it is played in.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct MoveFlags: u8 {
        const CAPTURE = 1 << 0;
        const EN_PASSANT = 1 << 1;
        const CASTLE = 1 << 2;
        const DOUBLE_PUSH = 1 << 3;
        const PROMOTION = 1 << 4;
    }
}

/// A container for moves that can be stored inline on the stack.
///
/// The capacity leaves room for pseudo-legal moves of any reachable
/// position.
///
/// ```
/// use rookery::{Position, Role};
///
/// let pos = Position::new();
/// let mut moves = pos.legal_moves();
/// moves.retain(|m| pos.piece_at(m.from).map(|p| p.role) == Some(Role::Pawn));
/// assert_eq!(moves.len(), 16);
/// ```
pub type MoveList = ArrayVec<Move, 512>;

#[cfg(feature = "serde")]
impl serde::Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Move, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MoveVisitor;

        impl serde::de::Visitor<'_> for MoveVisitor {
            type Value = Move;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("move in machine notation")
            }

            fn visit_str<E>(self, value: &str) -> Result<Move, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(MoveVisitor)
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use super::*;

    #[test]
    fn test_move_size() {
        assert!(mem::size_of::<Move>() <= 4);
    }

    #[test]
    fn test_with_promotion() {
        let m = Move::new(Square::B2, Square::B1);
        assert!(!m.is_promotion());
        assert_eq!(m.with_promotion(Role::Knight).promotion, Some(Role::Knight));
    }
}
