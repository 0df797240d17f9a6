use rookery::{zobrist, Move, Position, Zobrist64};
use serde::Deserialize;
use serde_with::{formats::SpaceSeparator, serde_as, StringWithSeparator};

#[serde_as]
#[derive(Deserialize)]
struct Record {
    #[serde_as(as = "StringWithSeparator<SpaceSeparator, Move>")]
    uci: Vec<Move>,
    zobrist: String,
}

fn key(hex: &str) -> Zobrist64 {
    Zobrist64(u64::from_str_radix(hex, 16).expect("hex key"))
}

#[test]
fn test_polyglot_reference() {
    let mut reader = csv::Reader::from_path("tests/zobrist.csv").expect("reader");

    for (i, record) in reader.deserialize().enumerate() {
        let record: Record = record.expect("record");

        let mut pos = Position::new();
        assert_eq!(pos.zobrist_hash(), key("463b96181691fc9c"));

        for m in record.uci {
            pos.play(m).expect("legal move");
            assert_eq!(pos.zobrist_hash(), pos.recompute_hash(), "line {}", i + 1);
        }

        assert_eq!(pos.zobrist_hash(), key(&record.zobrist), "line {}", i + 1);

        let from_fen = Position::from_fen(&pos.fen()).expect("valid fen");
        assert_eq!(from_fen.zobrist_hash(), key(&record.zobrist), "line {}", i + 1);

        while pos.undo().is_ok() {
            assert_eq!(pos.zobrist_hash(), pos.recompute_hash(), "line {}", i + 1);
        }
        assert_eq!(pos.zobrist_hash(), key("463b96181691fc9c"));
    }
}

#[test]
fn test_en_passant_file_only_when_capturable() {
    // The double push to d5 can not be answered en passant.
    let plain = Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
        .expect("valid fen");
    let without = Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
        .expect("valid fen");
    assert_eq!(plain.ep_square(), Some(rookery::Square::D6));
    assert_eq!(plain.zobrist_hash(), without.zobrist_hash());
    assert_eq!(
        zobrist::hashed_ep_square(plain.board(), plain.turn(), plain.ep_square()),
        None
    );

    let capturable =
        Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .expect("valid fen");
    assert_eq!(capturable.zobrist_hash(), key("22a48b5a8e47ff78"));
}

#[test]
fn test_transposition() {
    let mut a = Position::new();
    let mut b = Position::new();
    for uci in ["g1f3", "g8f6", "b1c3", "b8c6"] {
        a.play(uci.parse().expect("valid uci")).expect("legal");
    }
    for uci in ["b1c3", "b8c6", "g1f3", "g8f6"] {
        b.play(uci.parse().expect("valid uci")).expect("legal");
    }
    assert_eq!(a.zobrist_hash(), b.zobrist_hash());
    assert_eq!(a, b);

    // Same placement, different castling rights.
    let mut c = Position::new();
    for uci in ["g1f3", "g8f6", "h1g1", "h8g8", "g1h1", "g8h8"] {
        c.play(uci.parse().expect("valid uci")).expect("legal");
    }
    let mut d = Position::new();
    for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        d.play(uci.parse().expect("valid uci")).expect("legal");
    }
    assert_eq!(c.placement_hash(), d.placement_hash());
    assert_ne!(c.zobrist_hash(), d.zobrist_hash());
    assert_eq!(d.zobrist_hash(), Position::new().zobrist_hash());
}
