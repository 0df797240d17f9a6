use rookery::{
    CastlingRights, Color, Move, Outcome, PlayError, Position, Role, Square, UndoError,
};

const POSITIONS: [&str; 6] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
];

fn setup(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid fen")
}

fn play_uci(pos: &mut Position, moves: &[&str]) {
    for uci in moves {
        let m = pos.parse_uci(uci).expect("legal uci");
        pos.play(m).expect("legal move");
    }
}

#[test]
fn test_undo_restores_position() {
    for fen in POSITIONS {
        let mut pos = setup(fen);
        let hash = pos.zobrist_hash();

        for m in pos.legal_moves() {
            pos.play(m).expect("legal move");
            assert_eq!(pos.zobrist_hash(), pos.recompute_hash(), "{fen} {m}");

            for reply in pos.legal_moves() {
                pos.play(reply).expect("legal reply");
                assert_eq!(pos.zobrist_hash(), pos.recompute_hash(), "{fen} {m} {reply}");
                assert_eq!(pos.undo(), Ok(reply));
            }

            assert_eq!(pos.undo(), Ok(m));
            assert_eq!(pos.fen(), fen, "{m}");
            assert_eq!(pos.zobrist_hash(), hash, "{m}");
        }

        assert!(!pos.can_undo());
        assert_eq!(pos.undo(), Err(UndoError));
    }
}

#[test]
fn test_illegal_play_leaves_position_untouched() {
    // The knight on d2 is pinned.
    let mut pos = setup("4k3/8/8/b7/8/8/3N4/4K3 w - - 0 1");
    let fen = pos.fen();
    let hash = pos.zobrist_hash();

    for m in [
        Move::new(Square::D2, Square::F3),
        Move::new(Square::E1, Square::E3),
        Move::new(Square::A5, Square::B6),
        Move::new(Square::H1, Square::H2),
    ] {
        assert_eq!(pos.play(m), Err(PlayError { m }));
        assert_eq!(pos.fen(), fen);
        assert_eq!(pos.zobrist_hash(), hash);
        assert_eq!(pos.history_len(), 0);
    }
}

#[test]
fn test_san_round_trip() {
    for fen in POSITIONS {
        let pos = setup(fen);
        for m in pos.legal_moves() {
            let san = pos.san(m).expect("legal move");
            assert_eq!(pos.parse_san(&san), Ok(m), "{fen} {san}");

            let mut direct = pos.clone();
            direct.play(m).expect("legal move");
            let mut replayed = pos.clone();
            replayed
                .play(pos.parse_san(&san).expect("valid san"))
                .expect("legal move");
            assert_eq!(direct.fen(), replayed.fen());
        }
    }
}

#[test]
fn test_end_conditions() {
    for fen in POSITIONS {
        let pos = setup(fen);
        for m in pos.legal_moves() {
            let mut after = pos.clone();
            after.play(m).expect("legal move");
            if after.is_checkmate() {
                assert!(after.is_check());
                assert!(after.legal_moves().is_empty());
            }
            if after.is_stalemate() {
                assert!(!after.is_check());
                assert!(after.legal_moves().is_empty());
            }
        }
    }

    let stalemate = setup("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(stalemate.is_stalemate());
    assert!(!stalemate.is_checkmate());
    assert_eq!(stalemate.outcome(), Some(Outcome::Draw));
}

#[test]
fn test_castling_rights_are_permanent() {
    let mut pos = Position::new();
    play_uci(&mut pos, &["e2e4", "e7e5", "e1e2", "e8e7", "e2e1", "e7e8"]);
    assert_eq!(pos.castling_rights(), CastlingRights::empty());

    let mut pos = Position::new();
    play_uci(&mut pos, &["h2h4", "a7a5", "h1h3", "a8a6", "h3h1", "a6a8"]);
    assert_eq!(
        pos.castling_rights(),
        CastlingRights::WHITE_QUEEN_SIDE | CastlingRights::BLACK_KING_SIDE
    );
    assert_ne!(pos.zobrist_hash(), {
        let mut other = Position::new();
        play_uci(&mut other, &["h2h4", "a7a5", "g1f3", "b8c6", "f3g1", "c6b8"]);
        other.zobrist_hash()
    });

    // Capturing a rook on its home square clears the right as well.
    let mut pos = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    play_uci(&mut pos, &["a1a8"]);
    assert_eq!(
        pos.castling_rights(),
        CastlingRights::WHITE_KING_SIDE | CastlingRights::BLACK_KING_SIDE
    );
    assert_eq!(pos.undo(), Ok(Move::new(Square::A1, Square::A8)));
    assert_eq!(pos.castling_rights(), CastlingRights::all());
}

#[test]
fn test_en_passant_target() {
    for fen in POSITIONS {
        let pos = setup(fen);
        for m in pos.legal_moves() {
            let mut after = pos.clone();
            let pawn = pos.piece_at(m.from).map(|piece| piece.role) == Some(Role::Pawn);
            after.play(m).expect("legal move");

            let double_push = pawn && m.from.rank().abs_diff(m.to.rank()) == 2;
            let expected = if double_push {
                Some(Square::from_coords(m.from.file(), (m.from.rank() + m.to.rank()) / 2))
            } else {
                None
            };
            assert_eq!(after.ep_square(), expected, "{fen} {m}");
        }
    }
}

#[test]
fn test_start_position_moves() {
    let pos = setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    assert!(pos.is_initial_position());
    assert_eq!(pos.legal_moves().len(), 20);
}

#[test]
fn test_double_push_fen() {
    let mut pos = Position::new();
    pos.play(Move::new(Square::E2, Square::E4)).expect("legal move");
    assert_eq!(
        pos.fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
}

#[test]
fn test_promotion() {
    let mut pos = setup("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
    play_uci(&mut pos, &["e7e8q"]);
    assert_eq!(pos.piece_at(Square::E8), Some(Role::Queen.of(Color::White)));
    assert_eq!(pos.board().by_role(Role::Pawn).count(), 0);
    assert_eq!(pos.castling_rights(), CastlingRights::empty());
    assert!(pos.is_check());
    assert_eq!(pos.halfmoves(), 0);

    assert_eq!(
        pos.undo(),
        Ok(Move::new(Square::E7, Square::E8).with_promotion(Role::Queen))
    );
    assert_eq!(pos.piece_at(Square::E7), Some(Color::White.pawn()));
    assert_eq!(pos.piece_at(Square::E8), None);
}

#[test]
fn test_scholars_mate() {
    let mut pos = Position::new();
    for san in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6"] {
        let m = pos.parse_san(san).expect("legal san");
        pos.play(m).expect("legal move");
    }

    let mate = pos.parse_san("Qxf7#").expect("legal san");
    assert_eq!(pos.san(mate), Ok("Qxf7#".to_owned()));
    pos.play(mate).expect("legal move");

    assert!(pos.is_checkmate());
    assert!(pos.legal_moves().is_empty());
    assert_eq!(
        pos.outcome(),
        Some(Outcome::Decisive {
            winner: Color::White
        })
    );
    assert_eq!(pos.history_len(), 7);
}

#[test]
fn test_repetition_by_hash() {
    let mut pos = Position::new();
    let mut seen = vec![pos.zobrist_hash()];
    for _ in 0..2 {
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            let m = pos.parse_uci(uci).expect("legal uci");
            pos.play(m).expect("legal move");
            seen.push(pos.zobrist_hash());
        }
    }

    let start = Position::new().zobrist_hash();
    assert_eq!(seen.iter().filter(|hash| **hash == start).count(), 3);

    let mut other = Position::new();
    play_uci(&mut other, &["b1c3", "g8f6", "g1f3", "b8c6"]);
    let mut transposed = Position::new();
    play_uci(&mut transposed, &["g1f3", "b8c6", "b1c3", "g8f6"]);
    assert_eq!(other.zobrist_hash(), transposed.zobrist_hash());
}
