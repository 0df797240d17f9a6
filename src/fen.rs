//! Parse and write Forsyth-Edwards-Notation.
//!
//! # Examples
//!
//! ```
//! use rookery::{Color, Position, Square};
//!
//! let pos = Position::from_fen("r1bqkbnr/ppp2Qpp/2np4/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")?;
//! assert!(pos.is_checkmate());
//! assert_eq!(pos.piece_at(Square::F7), Some(rookery::Role::Queen.of(Color::White)));
//!
//! // The last two fields are optional.
//! let pos: Position = "4k3/8/8/8/8/8/8/4K3 w - -".parse()?;
//! assert_eq!(pos.fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
//! assert_eq!(pos.epd(), "4k3/8/8/8/8/8/8/4K3 w - -");
//! # Ok::<_, rookery::FenError>(())
//! ```

use std::{error::Error, fmt, str::FromStr};

use tracing::debug;

use crate::{
    board::Board,
    castling::CastlingRights,
    color::Color,
    position::{Position, PositionError},
    square::Square,
    types::Piece,
};

/// Errors that can occur when parsing a FEN.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseFenError {
    InvalidFen,
    InvalidBoard,
    InvalidTurn,
    InvalidCastling,
    InvalidEpSquare,
    InvalidHalfmoveClock,
    InvalidFullmoves,
}

impl fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            ParseFenError::InvalidFen => "invalid fen",
            ParseFenError::InvalidBoard => "invalid board part in fen",
            ParseFenError::InvalidTurn => "invalid turn part in fen",
            ParseFenError::InvalidCastling => "invalid castling part in fen",
            ParseFenError::InvalidEpSquare => "invalid en passant part in fen",
            ParseFenError::InvalidHalfmoveClock => "invalid halfmove clock in fen",
            ParseFenError::InvalidFullmoves => "invalid fullmove part in fen",
        })
    }
}

impl Error for ParseFenError {}

/// Error when setting up a [`Position`] from a FEN.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FenError {
    /// The FEN is malformed.
    Parse(ParseFenError),
    /// The FEN is well formed, but describes an invalid position.
    Position(PositionError),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FenError::Parse(ref err) => err.fmt(f),
            FenError::Position(ref err) => err.fmt(f),
        }
    }
}

impl Error for FenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            FenError::Parse(ref err) => Some(err),
            FenError::Position(ref err) => Some(err),
        }
    }
}

impl From<ParseFenError> for FenError {
    fn from(err: ParseFenError) -> FenError {
        FenError::Parse(err)
    }
}

impl From<PositionError> for FenError {
    fn from(err: PositionError) -> FenError {
        FenError::Position(err)
    }
}

impl Board {
    /// Parses the piece placement field of a FEN.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFenError::InvalidBoard`] unless there are exactly
    /// eight ranks of exactly eight squares each.
    pub fn from_board_fen(board_fen: &[u8]) -> Result<Board, ParseFenError> {
        let mut board = Board::empty();

        let mut rank = 7u8;
        let mut file = 0u8;
        let mut prev_digit = false;

        for &ch in board_fen {
            match ch {
                b'/' => {
                    if file != 8 || rank == 0 {
                        return Err(ParseFenError::InvalidBoard);
                    }
                    file = 0;
                    rank -= 1;
                }
                b'1'..=b'8' => {
                    // Empty squares are written as a single digit.
                    if prev_digit {
                        return Err(ParseFenError::InvalidBoard);
                    }
                    file += ch - b'0';
                    if file > 8 {
                        return Err(ParseFenError::InvalidBoard);
                    }
                }
                _ => {
                    let piece =
                        Piece::from_char(char::from(ch)).ok_or(ParseFenError::InvalidBoard)?;
                    if file >= 8 {
                        return Err(ParseFenError::InvalidBoard);
                    }
                    board.set_piece_at(Square::from_coords(file, rank), piece);
                    file += 1;
                }
            }
            prev_digit = ch.is_ascii_digit();
        }

        if rank == 0 && file == 8 {
            Ok(board)
        } else {
            Err(ParseFenError::InvalidBoard)
        }
    }
}

/// The raw fields of a FEN, before validation.
struct Fields {
    board: Board,
    turn: Color,
    castling_rights: CastlingRights,
    ep_square: Option<Square>,
    halfmoves: u32,
    fullmoves: u32,
}

fn parse_fields(fen: &[u8]) -> Result<Fields, ParseFenError> {
    let mut parts = fen.split(|ch| *ch == b' ').filter(|part| !part.is_empty());

    let board = Board::from_board_fen(parts.next().ok_or(ParseFenError::InvalidFen)?)?;

    let turn = match parts.next() {
        Some(b"w") => Color::White,
        Some(b"b") => Color::Black,
        _ => return Err(ParseFenError::InvalidTurn),
    };

    let castling_rights = parts
        .next()
        .and_then(CastlingRights::from_ascii)
        .ok_or(ParseFenError::InvalidCastling)?;

    let ep_square = match parts.next() {
        Some(b"-") => None,
        Some(part) => Some(Square::from_ascii(part).map_err(|_| ParseFenError::InvalidEpSquare)?),
        None => return Err(ParseFenError::InvalidEpSquare),
    };

    let halfmoves = match parts.next() {
        Some(part) => btoi::btou(part).map_err(|_| ParseFenError::InvalidHalfmoveClock)?,
        None => 0,
    };

    let fullmoves = match parts.next() {
        Some(part) => btoi::btou(part).map_err(|_| ParseFenError::InvalidFullmoves)?,
        None => 1,
    };

    if parts.next().is_some() {
        return Err(ParseFenError::InvalidFen);
    }

    Ok(Fields {
        board,
        turn,
        castling_rights,
        ep_square,
        halfmoves,
        fullmoves,
    })
}

impl Position {
    /// Sets up a position from a FEN.
    ///
    /// Halfmove clock and fullmove number may be omitted. A fullmove number
    /// of 0 is read as 1.
    ///
    /// # Errors
    ///
    /// Returns [`FenError::Parse`] for malformed input and
    /// [`FenError::Position`] for an invalid position.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let result = parse_fields(fen.trim().as_bytes())
            .map_err(FenError::from)
            .and_then(|fields| {
                Position::from_parts(
                    fields.board,
                    fields.turn,
                    fields.castling_rights,
                    fields.ep_square,
                    fields.halfmoves,
                    fields.fullmoves,
                )
                .map_err(FenError::from)
            });
        if let Err(ref err) = result {
            debug!(fen, %err, "rejected fen");
        }
        result
    }

    /// Replaces this position with the one described by `fen`. The history
    /// is cleared.
    ///
    /// # Errors
    ///
    /// Same as [`Position::from_fen()`]. On error `self` is left untouched.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Position::from_fen(fen)?;
        Ok(())
    }

    /// The first four fields of the FEN.
    pub fn epd(&self) -> String {
        format!(
            "{} {} {} {}",
            self.board().board_fen(),
            self.turn().char(),
            self.castling_rights(),
            self.ep_square()
                .map_or_else(|| "-".to_owned(), |sq| sq.to_string())
        )
    }

    /// The full FEN. The en passant square is written whenever the last
    /// move was a double pawn push.
    pub fn fen(&self) -> String {
        format!("{} {} {}", self.epd(), self.halfmoves(), self.fullmoves())
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        Position::from_fen(fen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_fen() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let pos = Position::from_fen(fen).expect("valid fen");
        assert_eq!(pos, Position::new());
        assert_eq!(pos.fen(), fen);
    }

    #[test]
    fn test_round_trip() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ] {
            assert_eq!(Position::from_fen(fen).expect("valid fen").fen(), fen);
        }
    }

    #[test]
    fn test_lenient_fields() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 12 0").expect("valid fen");
        assert_eq!(pos.fullmoves(), 1);
        assert_eq!(pos.halfmoves(), 12);

        let pos = Position::from_fen("  4k3/8/8/8/8/8/8/4K3 w -  -  ").expect("valid fen");
        assert_eq!(pos.halfmoves(), 0);
        assert_eq!(pos.fullmoves(), 1);
    }

    #[test]
    fn test_parse_errors() {
        for (fen, expected) in [
            ("", ParseFenError::InvalidFen),
            ("4k3/8/8/8/8/8/8 w - - 0 1", ParseFenError::InvalidBoard),
            ("4k3/8/8/8/8/8/8/4K4 w - - 0 1", ParseFenError::InvalidBoard),
            ("4k3/8/8/8/8/8/8/4X3 w - - 0 1", ParseFenError::InvalidBoard),
            ("4k3/8/8/8/8/8/8/4K21 w - - 0 1", ParseFenError::InvalidBoard),
            ("4k3/44/8/8/8/8/8/4K3 w - - 0 1", ParseFenError::InvalidBoard),
            ("4k3/8/8/8/8/8/8/4K3 x - - 0 1", ParseFenError::InvalidTurn),
            ("4k3/8/8/8/8/8/8/4K3 w", ParseFenError::InvalidCastling),
            ("4k3/8/8/8/8/8/8/4K3 w KX - 0 1", ParseFenError::InvalidCastling),
            ("4k3/8/8/8/8/8/8/4K3 w - e9 0 1", ParseFenError::InvalidEpSquare),
            ("4k3/8/8/8/8/8/8/4K3 w - - x 1", ParseFenError::InvalidHalfmoveClock),
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 -1", ParseFenError::InvalidFullmoves),
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1 7", ParseFenError::InvalidFen),
        ] {
            assert_eq!(
                Position::from_fen(fen),
                Err(FenError::Parse(expected)),
                "{fen}"
            );
        }
    }

    #[test]
    fn test_set_fen_keeps_position_on_error() {
        let mut pos = Position::new();
        assert!(pos.set_fen("not a fen").is_err());
        assert_eq!(pos, Position::new());
        pos.set_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("valid fen");
        assert_eq!(pos.board().occupied().count(), 2);
    }
}
