use std::{
    fs::File,
    io::{prelude::*, BufReader},
};

use rookery::{perft, Position};

fn test_perft_file(path: &str, node_limit: u64) {
    let file = File::open(path).expect("failed to open test suite");
    let reader = BufReader::new(file);

    let mut pos = Position::new();

    for line in reader.lines().map(|l| l.unwrap()) {
        println!("{}", line);

        let trimmed = line.trim();
        let mut slices = trimmed.splitn(2, ' ');

        match slices.next() {
            Some("epd") => {
                pos = slices
                    .next()
                    .expect("missing epd")
                    .parse()
                    .expect("valid fen");
            }
            Some("perft") => {
                let mut params = slices.next().expect("missing perft params").splitn(2, ' ');

                let depth = params
                    .next()
                    .expect("missing perft depth")
                    .parse()
                    .expect("depth not an integer");

                let nodes = params
                    .next()
                    .expect("missing perft nodes")
                    .parse()
                    .expect("nodes not an integer");

                if nodes <= node_limit {
                    assert_eq!(perft(&pos, depth), nodes);
                }
            }
            _ => {}
        }
    }
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_chess() {
    test_perft_file("tests/chess.perft", 250_000);
}

#[test]
fn test_perft_leaves_position_untouched() {
    let mut pos: Position = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
        .parse()
        .expect("valid fen");
    pos.play("e1g1".parse().expect("valid uci")).expect("legal castling");
    let fen = pos.fen();
    let hash = pos.zobrist_hash();

    assert_eq!(perft(&pos, 2), perft(&pos.clone(), 2));
    assert_eq!(pos.fen(), fen);
    assert_eq!(pos.zobrist_hash(), hash);
    assert_eq!(pos.history_len(), 1);
}
