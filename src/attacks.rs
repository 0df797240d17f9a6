//! Attack and ray tables.
//!
//! All tables are evaluated at compile time. Leapers (knights, kings and
//! pawn captures) are plain lookups. Sliding pieces cast one ray per
//! direction and cut it at the first occupied square, which stays part of
//! the attack set.
//!
//! # Examples
//!
//! ```
//! use rookery::{attacks, Bitboard, Square};
//!
//! let occupied = Bitboard::from_square(Square::F6);
//! let attacks = attacks::bishop_attacks(Square::C3, occupied);
//! assert!(attacks.contains(Square::E5));
//! assert!(attacks.contains(Square::F6));
//! assert!(!attacks.contains(Square::G7));
//! ```

use crate::{
    bitboard::Bitboard,
    color::{ByColor, Color},
    role::Role,
    square::Square,
    types::Piece,
};

const KING_DELTAS: [i32; 8] = [9, 8, 7, 1, -9, -8, -7, -1];
const KNIGHT_DELTAS: [i32; 8] = [17, 15, 10, 6, -17, -15, -10, -6];
const WHITE_PAWN_DELTAS: [i32; 2] = [7, 9];
const BLACK_PAWN_DELTAS: [i32; 2] = [-7, -9];

// Ray directions. The first four increase the square index.
const NORTH: usize = 0;
const EAST: usize = 1;
const NORTH_EAST: usize = 2;
const NORTH_WEST: usize = 3;
const SOUTH: usize = 4;
const WEST: usize = 5;
const SOUTH_WEST: usize = 6;
const SOUTH_EAST: usize = 7;

const DIRECTION_DELTAS: [i32; 8] = [8, 1, 9, 7, -8, -1, -9, -7];

/// Walks `delta` from `square` until leaving the board or hitting an
/// occupied square (inclusive).
const fn sliding_attacks(square: i32, occupied: u64, deltas: &[i32]) -> u64 {
    let mut attack = 0;

    let mut i = 0;
    while i < deltas.len() {
        let mut previous = square;
        loop {
            let sq = previous + deltas[i];
            let file_diff = (sq & 0x7) - (previous & 0x7);
            if file_diff > 2 || file_diff < -2 || sq < 0 || sq > 63 {
                break;
            }
            let bb = 1 << sq;
            attack |= bb;
            if occupied & bb != 0 {
                break;
            }
            previous = sq;
        }
        i += 1;
    }

    attack
}

const fn init_stepping_attacks(deltas: &[i32]) -> [u64; 64] {
    let mut table = [0; 64];
    let mut sq = 0;
    while sq < 64 {
        table[sq] = sliding_attacks(sq as i32, !0, deltas);
        sq += 1;
    }
    table
}

const fn init_rays() -> [[u64; 64]; 8] {
    let mut table = [[0; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let mut sq = 0;
        while sq < 64 {
            table[dir][sq] = sliding_attacks(sq as i32, 0, &[DIRECTION_DELTAS[dir]]);
            sq += 1;
        }
        dir += 1;
    }
    table
}

static KNIGHT_ATTACKS: [u64; 64] = init_stepping_attacks(&KNIGHT_DELTAS);
static KING_ATTACKS: [u64; 64] = init_stepping_attacks(&KING_DELTAS);
static PAWN_ATTACKS: ByColor<[u64; 64]> = ByColor {
    white: init_stepping_attacks(&WHITE_PAWN_DELTAS),
    black: init_stepping_attacks(&BLACK_PAWN_DELTAS),
};

const RAY_TABLE: [[u64; 64]; 8] = init_rays();
static RAYS: [[u64; 64]; 8] = RAY_TABLE;

static BETWEEN: [[u64; 64]; 64] = {
    let mut table = [[0; 64]; 64];
    let mut a = 0;
    while a < 64 {
        let mut dir = 0;
        while dir < 8 {
            let mut covered = 0;
            let mut ray = RAY_TABLE[dir][a];
            while ray != 0 {
                // Squares along a ray, nearest first.
                let b = if dir < 4 {
                    ray.trailing_zeros() as usize
                } else {
                    63 - ray.leading_zeros() as usize
                };
                table[a][b] = covered;
                covered |= 1 << b;
                ray &= !(1 << b);
            }
            dir += 1;
        }
        a += 1;
    }
    table
};

#[inline]
fn ray_attacks(dir: usize, sq: Square, occupied: Bitboard) -> u64 {
    let ray = RAYS[dir][usize::from(sq)];
    let blockers = ray & occupied.0;
    if blockers == 0 {
        return ray;
    }
    let blocker = if dir < 4 {
        blockers.trailing_zeros()
    } else {
        63 - blockers.leading_zeros()
    };
    ray ^ RAYS[dir][blocker as usize]
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[usize::from(sq)])
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[usize::from(sq)])
}

/// Squares a pawn of `color` on `sq` attacks diagonally.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS.get(color)[usize::from(sq)])
}

/// Looks up attacks for a bishop on `sq` with `occupied` squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(
        ray_attacks(NORTH_EAST, sq, occupied)
            | ray_attacks(NORTH_WEST, sq, occupied)
            | ray_attacks(SOUTH_EAST, sq, occupied)
            | ray_attacks(SOUTH_WEST, sq, occupied),
    )
}

/// Looks up attacks for a rook on `sq` with `occupied` squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(
        ray_attacks(NORTH, sq, occupied)
            | ray_attacks(EAST, sq, occupied)
            | ray_attacks(SOUTH, sq, occupied)
            | ray_attacks(WEST, sq, occupied),
    )
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Squares attacked by `piece` standing on `sq`.
pub fn attacks(sq: Square, piece: Piece, occupied: Bitboard) -> Bitboard {
    match piece.role {
        Role::Pawn => pawn_attacks(piece.color, sq),
        Role::Knight => knight_attacks(sq),
        Role::Bishop => bishop_attacks(sq, occupied),
        Role::Rook => rook_attacks(sq, occupied),
        Role::Queen => queen_attacks(sq, occupied),
        Role::King => king_attacks(sq),
    }
}

/// Squares strictly between `a` and `b` if they share a rank, file or
/// diagonal. Empty otherwise.
///
/// ```
/// use rookery::{attacks, Square};
///
/// let between = attacks::between(Square::E1, Square::H1);
/// assert_eq!(between.into_iter().collect::<Vec<_>>(), [Square::F1, Square::G1]);
/// assert!(attacks::between(Square::A1, Square::B3).is_empty());
/// ```
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    Bitboard(BETWEEN[usize::from(a)][usize::from(b)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knight_attacks() {
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(Square::D4).count(), 8);
        assert!(knight_attacks(Square::G1).contains(Square::F3));
        assert!(!knight_attacks(Square::H1).contains(Square::A2));
    }

    #[test]
    fn test_king_attacks() {
        assert_eq!(king_attacks(Square::E1).count(), 5);
        assert_eq!(king_attacks(Square::H8).count(), 3);
    }

    #[test]
    fn test_pawn_attacks() {
        assert_eq!(
            pawn_attacks(Color::White, Square::A2),
            Bitboard::from_square(Square::B3)
        );
        assert_eq!(
            pawn_attacks(Color::Black, Square::E5),
            Bitboard::from_square(Square::D4).with(Square::F4)
        );
        assert!(pawn_attacks(Color::White, Square::H8).is_empty());
    }

    #[test]
    fn test_rook_attacks() {
        assert_eq!(rook_attacks(Square::D4, Bitboard::EMPTY).count(), 14);
        let occupied = Bitboard::EMPTY.with(Square::D6).with(Square::F4);
        let attacks = rook_attacks(Square::D4, occupied);
        assert!(attacks.contains(Square::D6));
        assert!(!attacks.contains(Square::D7));
        assert!(attacks.contains(Square::F4));
        assert!(!attacks.contains(Square::G4));
        assert!(attacks.contains(Square::A4));
        assert!(attacks.contains(Square::D1));
    }

    #[test]
    fn test_bishop_attacks() {
        assert_eq!(bishop_attacks(Square::A1, Bitboard::EMPTY).count(), 7);
        let occupied = Bitboard::from_square(Square::B2);
        assert_eq!(
            bishop_attacks(Square::A1, occupied),
            Bitboard::from_square(Square::B2)
        );
        let attacks = bishop_attacks(Square::E4, Bitboard::from_square(Square::C2));
        assert!(attacks.contains(Square::C2));
        assert!(!attacks.contains(Square::B1));
        assert!(attacks.contains(Square::A8));
        assert!(attacks.contains(Square::H1));
    }

    #[test]
    fn test_between() {
        assert_eq!(between(Square::A1, Square::A8).count(), 6);
        assert_eq!(between(Square::H8, Square::A1).count(), 6);
        assert!(between(Square::E1, Square::F1).is_empty());
        assert_eq!(
            between(Square::E1, Square::A1),
            Bitboard::EMPTY.with(Square::B1).with(Square::C1).with(Square::D1)
        );
        assert_eq!(
            between(Square::C7, Square::F4),
            Bitboard::EMPTY.with(Square::D6).with(Square::E5)
        );
        assert!(between(Square::A1, Square::C2).is_empty());
    }
}
