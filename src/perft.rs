//! Count legal move paths.
//!
//! # Examples
//!
//! ```
//! use rookery::{perft, Position};
//!
//! let pos = Position::new();
//! assert_eq!(perft(&pos, 1), 20);
//! assert_eq!(perft(&pos, 2), 400);
//! assert_eq!(perft(&pos, 3), 8902);
//! ```

use tracing::trace;

use crate::{m::Move, position::Position};

/// Counts legal move paths of a given length.
///
/// Paths with mate or stalemate are not counted unless it occurs in the final
/// position. Useful for comparing, testing and debugging move generation
/// correctness and performance.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth < 1 {
        return 1;
    }
    let mut scratch = pos.clone();
    walk(&mut scratch, depth)
}

fn walk(pos: &mut Position, depth: u32) -> u64 {
    let moves = pos.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for m in moves {
        pos.play_unchecked(m);
        nodes += walk(pos, depth - 1);
        pos.take_back();
    }
    nodes
}

/// Like [`perft()`], but reports the count below each legal move of `pos`.
pub fn divide(pos: &Position, depth: u32) -> Vec<(Move, u64)> {
    let mut scratch = pos.clone();
    pos.legal_moves()
        .into_iter()
        .map(|m| {
            scratch.play_unchecked(m);
            let nodes = if depth <= 1 {
                1
            } else {
                walk(&mut scratch, depth - 1)
            };
            scratch.take_back();
            trace!(%m, depth, nodes, "divide");
            (m, nodes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let pos = Position::new();
        assert_eq!(perft(&pos, 0), 1);
        assert_eq!(perft(&pos, 1), 20);
        assert_eq!(perft(&pos, 2), 400);
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let pos = Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1")
            .expect("valid fen");
        let children = divide(&pos, 2);
        assert_eq!(children.len(), 14);
        assert_eq!(children.iter().map(|(_, n)| n).sum::<u64>(), perft(&pos, 2));
        assert!(divide(&pos, 1).iter().all(|(_, n)| *n == 1));
    }

    #[test]
    fn test_history_is_restored() {
        let mut pos = Position::new();
        pos.play("e2e4".parse().expect("valid uci")).expect("legal");
        assert_eq!(perft(&pos, 2), 600);
        assert_eq!(pos.history_len(), 1);
    }
}
