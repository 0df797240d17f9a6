//! Pseudo-legal and legal move generation.
//!
//! Pseudo-legal moves obey piece movement rules but may leave the mover's
//! king attacked. Legal moves are filtered by playing each candidate on a
//! scratch copy and testing the king.

use crate::{
    attacks,
    bitboard::Bitboard,
    color::Color,
    m::{Move, MoveList},
    position::Position,
    role::Role,
    square::Square,
    types::CastlingSide,
};

impl Position {
    /// All pseudo-legal moves of the side to move.
    pub fn pseudo_legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.gen_pieces(&mut moves);
        self.gen_pawns(&mut moves);
        self.gen_castling(&mut moves);
        moves
    }

    /// All legal moves of the side to move.
    ///
    /// ```
    /// use rookery::Position;
    ///
    /// assert_eq!(Position::new().legal_moves().len(), 20);
    /// ```
    pub fn legal_moves(&self) -> MoveList {
        let us = self.turn();
        let mut scratch = self.clone();
        let mut moves = self.pseudo_legal_moves();
        moves.retain(|m| {
            scratch.play_unchecked(*m);
            let legal = !scratch.is_king_attacked(us);
            scratch.take_back();
            legal
        });
        moves
    }

    /// Legal moves of the piece on `from`.
    pub fn legal_moves_from(&self, from: Square) -> MoveList {
        let mut moves = self.legal_moves();
        moves.retain(|m| m.from == from);
        moves
    }

    /// Legal moves that land on `to`.
    pub fn legal_moves_to(&self, to: Square) -> MoveList {
        let mut moves = self.legal_moves();
        moves.retain(|m| m.to == to);
        moves
    }

    pub fn is_legal(&self, m: Move) -> bool {
        self.legal_moves().contains(&m)
    }

    pub fn is_pseudo_legal(&self, m: Move) -> bool {
        self.board().color_at(m.from) == Some(self.turn())
            && self.pseudo_legal_moves().contains(&m)
    }

    /// Tests if any piece of color `by` attacks `sq`.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.attackers(sq, by).any()
    }

    /// Pieces of color `by` attacking `sq`.
    pub fn attackers(&self, sq: Square, by: Color) -> Bitboard {
        self.board()
            .attacks_to(sq, by, self.board().occupied())
    }

    fn gen_pieces(&self, moves: &mut MoveList) {
        let board = self.board();
        let us = board.by_color(self.turn());
        let target = !us;
        let occupied = board.occupied();

        for from in us & !board.by_role(Role::Pawn) {
            let Some(piece) = board.piece_at(from) else {
                continue;
            };
            let attacks = match piece.role {
                Role::Knight => attacks::knight_attacks(from),
                Role::Bishop => attacks::bishop_attacks(from, occupied),
                Role::Rook => attacks::rook_attacks(from, occupied),
                Role::Queen => attacks::queen_attacks(from, occupied),
                Role::King => attacks::king_attacks(from),
                Role::Pawn => continue,
            };
            for to in attacks & target {
                moves.push(Move::new(from, to));
            }
        }
    }

    fn gen_pawns(&self, moves: &mut MoveList) {
        let board = self.board();
        let turn = self.turn();
        let them = board.by_color(!turn);
        let occupied = board.occupied();
        let push = turn.pawn_push_delta();

        for from in board.by_piece(turn.pawn()) {
            let mut captures = attacks::pawn_attacks(turn, from) & them;
            if let Some(ep_square) = self.ep_square() {
                if attacks::pawn_attacks(turn, from).contains(ep_square) {
                    captures.add(ep_square);
                }
            }
            for to in captures {
                push_pawn_move(moves, turn, from, to);
            }

            let Some(single) = from.offset(push) else {
                continue;
            };
            if occupied.contains(single) {
                continue;
            }
            push_pawn_move(moves, turn, from, single);

            if from.relative_rank(turn) == 1 {
                if let Some(double) = single.offset(push) {
                    if !occupied.contains(double) {
                        moves.push(Move::new(from, double));
                    }
                }
            }
        }
    }

    fn gen_castling(&self, moves: &mut MoveList) {
        let turn = self.turn();
        let king = CastlingSide::king_from(turn);
        if self.board().piece_at(king) != Some(turn.king()) || self.is_check() {
            return;
        }

        for side in CastlingSide::ALL {
            if !self.castling_rights().has(turn, side) {
                continue;
            }
            let rook = side.rook_from(turn);
            if attacks::between(king, rook).intersects(self.board().occupied()) {
                continue;
            }
            let transit = side.rook_to(turn);
            let king_to = side.king_to(turn);
            if self.is_attacked(transit, !turn) || self.is_attacked(king_to, !turn) {
                continue;
            }
            moves.push(Move::new(king, king_to));
        }
    }
}

fn push_pawn_move(moves: &mut MoveList, color: Color, from: Square, to: Square) {
    if to.relative_rank(color) == 7 {
        for role in Role::PROMOTIONS {
            moves.push(Move::new(from, to).with_promotion(role));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(fen: &str) -> Position {
        Position::from_fen(fen).expect("valid fen")
    }

    #[test]
    fn test_start_moves() {
        let pos = Position::new();
        assert_eq!(pos.pseudo_legal_moves().len(), 20);
        assert_eq!(pos.legal_moves().len(), 20);
        assert_eq!(pos.legal_moves_from(Square::G1).len(), 2);
        assert_eq!(pos.legal_moves_to(Square::F3).len(), 2);
        assert!(pos.is_legal(Move::new(Square::B1, Square::C3)));
        assert!(!pos.is_legal(Move::new(Square::B1, Square::D2)));
    }

    #[test]
    fn test_promotions() {
        let pos = setup("1r5k/P7/8/8/8/8/8/K7 w - - 0 1");
        let moves = pos.legal_moves_from(Square::A7);
        assert_eq!(moves.len(), 8);
        assert!(moves.contains(&Move::new(Square::A7, Square::B8).with_promotion(Role::Knight)));
        assert!(!moves.contains(&Move::new(Square::A7, Square::A8)));
    }

    #[test]
    fn test_pinned_piece() {
        // The knight on d2 is pinned by the bishop on a5.
        let pos = setup("4k3/8/8/b7/8/8/3N4/4K3 w - - 0 1");
        assert!(pos.legal_moves_from(Square::D2).is_empty());
        assert_eq!(pos.pseudo_legal_moves().len(), 4 + 6);
    }

    #[test]
    fn test_castling_requirements() {
        // Transit square f1 attacked by the bishop on c4.
        let pos = setup("4k3/8/8/8/2b5/8/8/R3K2R w KQ - 0 1");
        assert!(!pos.is_legal(Move::new(Square::E1, Square::G1)));
        assert!(pos.is_legal(Move::new(Square::E1, Square::C1)));

        // b1 may be attacked, but must be empty.
        let pos = setup("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        assert!(!pos.is_legal(Move::new(Square::E1, Square::C1)));
        let pos = setup("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(pos.is_legal(Move::new(Square::E1, Square::C1)));

        // Not out of check.
        let pos = setup("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1");
        assert!(!pos.is_legal(Move::new(Square::E1, Square::G1)));
        assert!(!pos.is_legal(Move::new(Square::E1, Square::C1)));
    }

    #[test]
    fn test_en_passant_only_onto_target() {
        let with_target = setup("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        assert!(with_target.is_legal(Move::new(Square::E5, Square::D6)));
        let without_target = setup("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2");
        assert!(!without_target.is_legal(Move::new(Square::E5, Square::D6)));
    }

    #[test]
    fn test_en_passant_discovered_check() {
        // Capturing en passant would expose the king on the fifth rank.
        let pos = setup("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2");
        assert!(pos.is_pseudo_legal(Move::new(Square::E5, Square::D6)));
        assert!(!pos.is_legal(Move::new(Square::E5, Square::D6)));
    }

    #[test]
    fn test_attackers() {
        let pos = Position::new();
        assert!(pos.is_attacked(Square::F3, Color::White));
        assert!(!pos.is_attacked(Square::F4, Color::White));
        assert_eq!(pos.attackers(Square::F6, Color::Black).count(), 3);
    }

    #[test]
    fn test_disambiguation_counts() {
        assert_eq!(
            setup("rnbqkbnr/pppppppp/8/2R5/5R2/2R5/PPPPPPP1/1NBQKBNR w - - 0 1")
                .legal_moves()
                .len(),
            43
        );
        assert_eq!(
            setup("rnbqkbnr/pppppppp/8/2R5/8/2R5/PPPPPPP1/1NBQKBNR w - - 0 1")
                .legal_moves()
                .len(),
            33
        );
    }
}
