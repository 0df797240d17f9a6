use std::fmt::{self, Write as _};

use crate::{
    attacks,
    bitboard::Bitboard,
    color::{ByColor, Color},
    role::{ByRole, Role},
    square::Square,
    types::Piece,
};

/// Piece placement: one bitboard per role and per color.
///
/// The board alone knows nothing about the side to move, castling rights or
/// en passant. It does not validate that there are kings.
///
/// # Examples
///
/// ```
/// use rookery::{Board, Color, Square};
///
/// let board = Board::new();
/// assert_eq!(board.piece_at(Square::E1), Some(Color::White.king()));
/// assert_eq!(board.board_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
/// ```
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Board {
    by_role: ByRole<Bitboard>,
    by_color: ByColor<Bitboard>,
    occupied: Bitboard,
}

impl Board {
    /// The standard starting placement.
    pub const fn new() -> Board {
        Board {
            by_role: ByRole {
                pawn: Bitboard(0x00ff_0000_0000_ff00),
                knight: Bitboard(0x4200_0000_0000_0042),
                bishop: Bitboard(0x2400_0000_0000_0024),
                rook: Bitboard(0x8100_0000_0000_0081),
                queen: Bitboard(0x0800_0000_0000_0008),
                king: Bitboard(0x1000_0000_0000_0010),
            },
            by_color: ByColor {
                white: Bitboard(0xffff),
                black: Bitboard(0xffff_0000_0000_0000),
            },
            occupied: Bitboard(0xffff_0000_0000_ffff),
        }
    }

    pub const fn empty() -> Board {
        Board {
            by_role: ByRole {
                pawn: Bitboard::EMPTY,
                knight: Bitboard::EMPTY,
                bishop: Bitboard::EMPTY,
                rook: Bitboard::EMPTY,
                queen: Bitboard::EMPTY,
                king: Bitboard::EMPTY,
            },
            by_color: ByColor {
                white: Bitboard::EMPTY,
                black: Bitboard::EMPTY,
            },
            occupied: Bitboard::EMPTY,
        }
    }

    #[inline]
    pub const fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub const fn by_color(&self, color: Color) -> Bitboard {
        *self.by_color.get(color)
    }

    #[inline]
    pub const fn by_role(&self, role: Role) -> Bitboard {
        *self.by_role.get(role)
    }

    #[inline]
    pub const fn by_piece(&self, piece: Piece) -> Bitboard {
        Bitboard(self.by_color(piece.color).0 & self.by_role(piece.role).0)
    }

    pub fn color_at(&self, sq: Square) -> Option<Color> {
        if self.by_color.white.contains(sq) {
            Some(Color::White)
        } else if self.by_color.black.contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn role_at(&self, sq: Square) -> Option<Role> {
        if !self.occupied.contains(sq) {
            return None;
        }
        Role::ALL
            .into_iter()
            .find(|&role| self.by_role(role).contains(sq))
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let role = self.role_at(sq)?;
        let color = self.color_at(sq)?;
        Some(role.of(color))
    }

    /// Removes and returns the piece on `sq`, if any.
    pub fn remove_piece_at(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.by_color.get_mut(piece.color).toggle(sq);
        self.by_role.get_mut(piece.role).toggle(sq);
        self.occupied.toggle(sq);
        Some(piece)
    }

    /// Puts `piece` on `sq`, replacing whatever was there.
    pub fn set_piece_at(&mut self, sq: Square, piece: Piece) {
        self.remove_piece_at(sq);
        self.by_color.get_mut(piece.color).add(sq);
        self.by_role.get_mut(piece.role).add(sq);
        self.occupied.add(sq);
    }

    /// The square of the unique king of `color`, if exactly one.
    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.by_piece(color.king()).single_square()
    }

    /// Pieces of color `attacker` that attack `sq`, given `occupied`.
    pub fn attacks_to(&self, sq: Square, attacker: Color, occupied: Bitboard) -> Bitboard {
        let rooks_and_queens = self.by_role(Role::Rook) | self.by_role(Role::Queen);
        let bishops_and_queens = self.by_role(Role::Bishop) | self.by_role(Role::Queen);
        self.by_color(attacker)
            & ((attacks::rook_attacks(sq, occupied) & rooks_and_queens)
                | (attacks::bishop_attacks(sq, occupied) & bishops_and_queens)
                | (attacks::knight_attacks(sq) & self.by_role(Role::Knight))
                | (attacks::king_attacks(sq) & self.by_role(Role::King))
                | (attacks::pawn_attacks(!attacker, sq) & self.by_role(Role::Pawn)))
    }

    /// Squares attacked by the piece on `sq`.
    pub fn attacks_from(&self, sq: Square) -> Bitboard {
        self.piece_at(sq)
            .map_or(Bitboard::EMPTY, |piece| attacks::attacks(sq, piece, self.occupied))
    }

    /// Iterates over all pieces, lowest square first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied
            .into_iter()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// The piece placement field of a FEN.
    pub fn board_fen(&self) -> String {
        let mut fen = String::with_capacity(64);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square::from_coords(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

/// Eight lines of eight characters, eighth rank first, `.` for empty.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let sq = Square::from_coords(file, rank);
                f.write_char(self.piece_at(sq).map_or('.', Piece::char))?;
                f.write_char(if file < 7 { ' ' } else { '\n' })?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.board_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_at() {
        let board = Board::new();
        assert_eq!(board.piece_at(Square::A2), Some(Color::White.pawn()));
        assert_eq!(board.piece_at(Square::D8), Some(Role::Queen.of(Color::Black)));
        assert_eq!(board.piece_at(Square::E4), None);
        assert_eq!(board.king_of(Color::Black), Some(Square::E8));
    }

    #[test]
    fn test_set_remove() {
        let mut board = Board::new();
        assert_eq!(board.remove_piece_at(Square::E2), Some(Color::White.pawn()));
        assert_eq!(board.remove_piece_at(Square::E2), None);
        board.set_piece_at(Square::E4, Color::White.pawn());
        board.set_piece_at(Square::D8, Role::Knight.of(Color::White));
        assert_eq!(board.piece_at(Square::D8), Some(Role::Knight.of(Color::White)));
        assert_eq!(board.by_role(Role::Queen).count(), 1);
        assert_eq!(board.occupied().count(), 31);
        assert_eq!(
            board.board_fen(),
            "rnbNkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR"
        );
    }

    #[test]
    fn test_attacks_to() {
        let board = Board::new();
        let attackers = board.attacks_to(Square::F3, Color::White, board.occupied());
        assert_eq!(
            attackers,
            Bitboard::EMPTY.with(Square::E2).with(Square::G2).with(Square::G1)
        );
        assert!(board
            .attacks_to(Square::E4, Color::Black, board.occupied())
            .is_empty());
    }

    #[test]
    fn test_display() {
        let board = Board::new();
        let diagram = board.to_string();
        assert!(diagram.starts_with("r n b q k b n r\n"));
        assert!(diagram.ends_with("R N B Q K B N R\n"));
        assert_eq!(diagram.lines().count(), 8);
    }
}
