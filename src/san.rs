//! Read and write Standard Algebraic Notation.
//!
//! # Examples
//!
//! Parse and play a SAN:
//!
//! ```
//! use rookery::{san::San, Move, Position, Square};
//!
//! let san: San = "Nf3".parse()?;
//! let mut pos = Position::new();
//! let m = san.to_move(&pos)?;
//! assert_eq!(m, Move::new(Square::G1, Square::F3));
//! pos.play(m)?;
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! Write a move as SAN:
//!
//! ```
//! use rookery::{Move, Position, Square};
//!
//! let pos = Position::new();
//! assert_eq!(pos.san(Move::new(Square::E2, Square::E4))?, "e4");
//! # Ok::<_, rookery::PlayError>(())
//! ```

use std::{error::Error, fmt, str::FromStr};

use crate::{
    m::Move,
    position::{PlayError, Position},
    role::Role,
    square::{file_from_char, rank_from_char, Square},
    types::CastlingSide,
};

/// Error when parsing a syntactically invalid SAN.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseSanError;

impl fmt::Display for ParseSanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid san")
    }
}

impl Error for ParseSanError {}

/// `IllegalSan` or `AmbiguousSan`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SanError {
    /// Standard algebraic notation does not match a legal move.
    IllegalSan,
    /// Standard algebraic notation matches multiple legal moves.
    AmbiguousSan,
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            SanError::IllegalSan => "illegal san",
            SanError::AmbiguousSan => "ambiguous san",
        })
    }
}

impl Error for SanError {}

/// Error when a SAN string can not be resolved to a legal move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseMoveError {
    Parse(ParseSanError),
    San(SanError),
}

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParseMoveError::Parse(ref err) => err.fmt(f),
            ParseMoveError::San(ref err) => err.fmt(f),
        }
    }
}

impl Error for ParseMoveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ParseMoveError::Parse(ref err) => Some(err),
            ParseMoveError::San(ref err) => Some(err),
        }
    }
}

impl From<ParseSanError> for ParseMoveError {
    fn from(err: ParseSanError) -> ParseMoveError {
        ParseMoveError::Parse(err)
    }
}

impl From<SanError> for ParseMoveError {
    fn from(err: SanError) -> ParseMoveError {
        ParseMoveError::San(err)
    }
}

/// A move in Standard Algebraic Notation, without check suffix.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum San {
    Normal {
        role: Role,
        file: Option<u8>,
        rank: Option<u8>,
        capture: bool,
        to: Square,
        promotion: Option<Role>,
    },
    Castle(CastlingSide),
}

/// Strips trailing annotation glyphs and a check or checkmate suffix.
fn strip_suffixes(mut san: &[u8]) -> (&[u8], Option<Suffix>) {
    while let [rest @ .., b'!' | b'?'] = san {
        san = rest;
    }
    match san {
        [rest @ .., ch @ (b'+' | b'#')] => (rest, Suffix::from_char(char::from(*ch))),
        _ => (san, None),
    }
}

impl San {
    /// Parses a SAN. Ignores a possible check or checkmate suffix and
    /// annotation glyphs like `!?`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseSanError`] if `san` is not syntactically valid.
    pub fn from_ascii(san: &[u8]) -> Result<San, ParseSanError> {
        let (san, _) = strip_suffixes(san);

        match san {
            b"O-O" | b"0-0" => return Ok(San::Castle(CastlingSide::KingSide)),
            b"O-O-O" | b"0-0-0" => return Ok(San::Castle(CastlingSide::QueenSide)),
            _ => (),
        }

        let mut chars = san.iter().copied().map(char::from).peekable();

        let role = match chars.peek() {
            Some(&ch) if ch.is_ascii_uppercase() => {
                chars.next();
                Role::from_char(ch).filter(|role| *role != Role::Pawn).ok_or(ParseSanError)?
            }
            Some(_) => Role::Pawn,
            None => return Err(ParseSanError),
        };

        // Collect up to two coordinate pairs, with an optional capture
        // marker in between.
        let mut coords: Vec<(Option<u8>, Option<u8>)> = Vec::with_capacity(2);
        let mut capture = false;
        let mut current = (None, None);
        let mut promotion = None;

        while let Some(ch) = chars.next() {
            if let Some(file) = file_from_char(ch) {
                if current.0.is_some() || current.1.is_some() {
                    coords.push(current);
                    current = (None, None);
                }
                current.0 = Some(file);
            } else if let Some(rank) = rank_from_char(ch) {
                if current.1.is_some() {
                    coords.push(current);
                    current = (None, None);
                }
                current.1 = Some(rank);
            } else if ch == 'x' && !capture {
                capture = true;
                if current.0.is_some() || current.1.is_some() {
                    coords.push(current);
                    current = (None, None);
                }
            } else if ch == '=' {
                let role = chars
                    .next()
                    .and_then(Role::from_char)
                    .filter(|role| role.is_promotion_target())
                    .ok_or(ParseSanError)?;
                promotion = Some(role);
                if chars.next().is_some() {
                    return Err(ParseSanError);
                }
            } else {
                return Err(ParseSanError);
            }
        }
        coords.push(current);

        let (disambiguation, target) = match *coords.as_slice() {
            [target] => ((None, None), target),
            [disambiguation, target] => (disambiguation, target),
            _ => return Err(ParseSanError),
        };

        let to = match target {
            (Some(file), Some(rank)) => Square::from_coords(file, rank),
            _ => return Err(ParseSanError),
        };

        if promotion.is_some() && role != Role::Pawn {
            return Err(ParseSanError);
        }

        Ok(San::Normal {
            role,
            file: disambiguation.0,
            rank: disambiguation.1,
            capture,
            to,
            promotion,
        })
    }

    /// Converts a legal move to Standard Algebraic Notation.
    pub fn from_move(pos: &Position, m: Move) -> San {
        let role = pos.piece_at(m.from).map_or(Role::Pawn, |piece| piece.role);
        let capture = pos.move_flags(m).contains(crate::m::MoveFlags::CAPTURE);

        match role {
            Role::King => {
                if let Some(side) = CastlingSide::from_king_move(pos.turn(), m.from, m.to) {
                    return San::Castle(side);
                }
                San::Normal {
                    role,
                    file: None,
                    rank: None,
                    capture,
                    to: m.to,
                    promotion: None,
                }
            }
            Role::Pawn => San::Normal {
                role,
                file: if capture { Some(m.from.file()) } else { None },
                rank: None,
                capture,
                to: m.to,
                promotion: m.promotion,
            },
            Role::Knight | Role::Bishop | Role::Rook | Role::Queen => {
                let mut others = pos.legal_moves_to(m.to);
                others.retain(|c| {
                    c.from != m.from && pos.piece_at(c.from).map(|piece| piece.role) == Some(role)
                });

                let (file, rank) = if others.is_empty() {
                    (None, None)
                } else if others.iter().all(|c| c.from.file() != m.from.file()) {
                    (Some(m.from.file()), None)
                } else if others.iter().all(|c| c.from.rank() != m.from.rank()) {
                    (None, Some(m.from.rank()))
                } else {
                    (Some(m.from.file()), Some(m.from.rank()))
                };

                San::Normal {
                    role,
                    file,
                    rank,
                    capture,
                    to: m.to,
                    promotion: None,
                }
            }
        }
    }

    /// Tries to convert the `San` to a legal move in the context of a
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`SanError`] if there is no unique matching legal move.
    pub fn to_move(&self, pos: &Position) -> Result<Move, SanError> {
        let mut legals = match *self {
            San::Normal { to, .. } => pos.legal_moves_to(to),
            San::Castle(side) => pos.legal_moves_to(side.king_to(pos.turn())),
        };
        legals.retain(|m| self.matches(pos, *m));

        match *legals.as_slice() {
            [m] => Ok(m),
            [] => Err(SanError::IllegalSan),
            _ => Err(SanError::AmbiguousSan),
        }
    }

    /// Tests if the `San` describes the move `m` in `pos`.
    ///
    /// The capture marker is not checked. A pawn move without origin file
    /// must stay on its file.
    pub fn matches(&self, pos: &Position, m: Move) -> bool {
        let Some(piece) = pos.piece_at(m.from) else {
            return false;
        };
        match *self {
            San::Normal {
                role,
                file,
                rank,
                to,
                promotion,
                ..
            } => {
                piece.role == role
                    && m.to == to
                    && m.promotion == promotion
                    && file.map_or(role != Role::Pawn || m.from.file() == to.file(), |f| {
                        f == m.from.file()
                    })
                    && rank.map_or(true, |r| r == m.from.rank())
            }
            San::Castle(side) => {
                piece.role == Role::King
                    && CastlingSide::from_king_move(piece.color, m.from, m.to) == Some(side)
            }
        }
    }
}

impl FromStr for San {
    type Err = ParseSanError;

    fn from_str(san: &str) -> Result<San, ParseSanError> {
        San::from_ascii(san.as_bytes())
    }
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            San::Normal {
                role,
                file,
                rank,
                capture,
                to,
                promotion,
            } => {
                if role != Role::Pawn {
                    write!(f, "{}", role.upper_char())?;
                }
                if let Some(file) = file {
                    write!(f, "{}", char::from(b'a' + file))?;
                }
                if let Some(rank) = rank {
                    write!(f, "{}", char::from(b'1' + rank))?;
                }
                if capture {
                    f.write_str("x")?;
                }
                write!(f, "{to}")?;
                if let Some(promotion) = promotion {
                    write!(f, "={}", promotion.upper_char())?;
                }
                Ok(())
            }
            San::Castle(CastlingSide::KingSide) => f.write_str("O-O"),
            San::Castle(CastlingSide::QueenSide) => f.write_str("O-O-O"),
        }
    }
}

/// Check (`+`) or checkmate (`#`) suffix.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Suffix {
    Check,
    Checkmate,
}

impl Suffix {
    pub const fn char(self) -> char {
        match self {
            Suffix::Check => '+',
            Suffix::Checkmate => '#',
        }
    }

    pub const fn from_char(ch: char) -> Option<Suffix> {
        match ch {
            '+' => Some(Suffix::Check),
            '#' => Some(Suffix::Checkmate),
            _ => None,
        }
    }

    /// The suffix for a move that led to `pos`.
    pub fn from_position(pos: &Position) -> Option<Suffix> {
        if pos.is_checkmate() {
            Some(Suffix::Checkmate)
        } else if pos.is_check() {
            Some(Suffix::Check)
        } else {
            None
        }
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A [`San`] and possible check and checkmate suffix.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct SanPlus {
    pub san: San,
    pub suffix: Option<Suffix>,
}

impl SanPlus {
    /// Parses a SAN and possible check and checkmate suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ParseSanError`] if `san` is not syntactically valid.
    pub fn from_ascii(san: &[u8]) -> Result<SanPlus, ParseSanError> {
        let (_, suffix) = strip_suffixes(san);
        San::from_ascii(san).map(|san| SanPlus { san, suffix })
    }

    /// Converts a legal move to Standard Algebraic Notation including
    /// possible check and checkmate suffixes, determined by playing the move
    /// on a scratch copy of `pos`.
    ///
    /// `m` must be legal in `pos`. Use [`Position::san()`] to have that
    /// checked.
    pub fn from_move(pos: &Position, m: Move) -> SanPlus {
        debug_assert!(pos.is_legal(m), "SanPlus::from_move with illegal {m}");
        let san = San::from_move(pos, m);
        let mut after = pos.clone();
        after.play_unchecked(m);
        let suffix = Suffix::from_position(&after);
        SanPlus { san, suffix }
    }
}

impl FromStr for SanPlus {
    type Err = ParseSanError;

    fn from_str(san: &str) -> Result<SanPlus, ParseSanError> {
        SanPlus::from_ascii(san.as_bytes())
    }
}

impl fmt::Display for SanPlus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.san)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

impl Position {
    /// Writes a legal move in SAN, with check or checkmate suffix.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] if `m` is not legal.
    pub fn san(&self, m: Move) -> Result<String, PlayError> {
        if self.is_legal(m) {
            Ok(SanPlus::from_move(self, m).to_string())
        } else {
            Err(PlayError { m })
        }
    }

    /// Parses a SAN and resolves it to a legal move.
    ///
    /// # Errors
    ///
    /// Returns [`ParseMoveError::Parse`] for malformed input and
    /// [`ParseMoveError::San`] if no unique legal move matches.
    pub fn parse_san(&self, san: &str) -> Result<Move, ParseMoveError> {
        Ok(san.parse::<San>()?.to_move(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(fen: &str) -> Position {
        Position::from_fen(fen).expect("valid fen")
    }

    #[test]
    fn test_read_write() {
        for san in [
            "a1", "a8", "h1", "h8", "e4", "b6", "e4=Q", "f1=N#", "hxg7", "bxc1", "axe4", "bxc1+",
            "bxa8=R+", "Nf3", "Ba5", "Qh8", "Kh1", "Bba5", "N2c4", "Red3", "d1=N", "Ra1a8",
            "Qxh7#", "O-O", "O-O-O+",
        ] {
            let result = san.parse::<SanPlus>().expect("valid san").to_string();
            assert_eq!(san, result, "read {san} write {result}");
        }
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!("0-0".parse(), Ok(San::Castle(CastlingSide::KingSide)));
        assert_eq!("0-0-0#".parse(), Ok(San::Castle(CastlingSide::QueenSide)));
        assert_eq!("Nf3!?".parse::<San>(), "Nf3".parse::<San>());
        assert_eq!(
            "e4+?".parse::<SanPlus>().map(|san| san.suffix),
            Ok(Some(Suffix::Check))
        );
    }

    #[test]
    fn test_parse_errors() {
        for invalid in ["", "x", "Nf", "Kx", "e9", "Xe4", "e8=K", "Nf3=Q", "Pe4", "e4e5e6", "O-O-O-O"] {
            assert_eq!(invalid.parse::<San>(), Err(ParseSanError), "{invalid}");
        }
    }

    #[test]
    fn test_pawn_capture_without_file() {
        let san = "f6".parse::<San>().expect("valid san");

        let pos = setup("4k3/8/5p2/4P3/8/8/8/4K3 w - - 0 1");
        assert_eq!(san.to_move(&pos), Err(SanError::IllegalSan));

        let pos = setup("4k3/8/8/4Pp2/8/8/8/4K3 w - f6 0 1");
        assert_eq!(san.to_move(&pos), Err(SanError::IllegalSan));
        assert_eq!(pos.parse_san("exf6"), Ok(Move::new(Square::E5, Square::F6)));
        assert_eq!(pos.san(Move::new(Square::E5, Square::F6)), Ok("exf6".to_owned()));
    }

    #[test]
    fn test_disambiguation() {
        let pos = setup("rnbqkbnr/pppppppp/8/2R5/5R2/2R5/PPPPPPP1/1NBQKBNR w - - 0 1");
        assert_eq!(pos.san(Move::new(Square::C5, Square::C4)), Ok("R5c4".to_owned()));
        assert_eq!(pos.san(Move::new(Square::C3, Square::C4)), Ok("R3c4".to_owned()));
        assert_eq!(pos.san(Move::new(Square::F4, Square::C4)), Ok("Rfc4".to_owned()));
        assert_eq!(pos.san(Move::new(Square::F4, Square::F5)), Ok("Rff5".to_owned()));
        assert_eq!(pos.parse_san("Rc4"), Err(ParseMoveError::San(SanError::AmbiguousSan)));
        assert_eq!(pos.parse_san("R5c4"), Ok(Move::new(Square::C5, Square::C4)));

        // Three queens reach e1, two share the h-file and two the fourth rank.
        let pos = setup("8/8/1k6/8/4Q2Q/8/K7/7Q w - - 0 1");
        assert_eq!(pos.san(Move::new(Square::H4, Square::E1)), Ok("Qh4e1".to_owned()));
        assert_eq!(pos.san(Move::new(Square::H1, Square::E1)), Ok("Q1e1".to_owned()));
        assert_eq!(pos.san(Move::new(Square::E4, Square::E1)), Ok("Qee1".to_owned()));
        assert_eq!(pos.san(Move::new(Square::H4, Square::H2)), Ok("Q4h2".to_owned()));
        assert_eq!(pos.san(Move::new(Square::E4, Square::G2)), Ok("Qeg2".to_owned()));
        assert_eq!(pos.san(Move::new(Square::H4, Square::F2)), Ok("Qf2".to_owned()));
        assert_eq!(pos.parse_san("Qe1"), Err(ParseMoveError::San(SanError::AmbiguousSan)));
        assert_eq!(pos.parse_san("Qh4e1"), Ok(Move::new(Square::H4, Square::E1)));
        assert_eq!(
            pos.san(Move::new(Square::H4, Square::A4)),
            Err(PlayError {
                m: Move::new(Square::H4, Square::A4)
            })
        );
    }

    #[test]
    fn test_castling_and_suffixes() {
        let pos = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(pos.san(Move::new(Square::E1, Square::G1)), Ok("O-O".to_owned()));
        assert_eq!(pos.san(Move::new(Square::E1, Square::C1)), Ok("O-O-O".to_owned()));
        assert_eq!(pos.parse_san("O-O-O"), Ok(Move::new(Square::E1, Square::C1)));
        assert_eq!(pos.san(Move::new(Square::A1, Square::A8)), Ok("Rxa8+".to_owned()));

        let pos = setup("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        assert_eq!(pos.san(Move::new(Square::A1, Square::A8)), Ok("Ra8#".to_owned()));
    }

    #[test]
    fn test_promotion() {
        let pos = setup("1r5k/P7/8/8/8/8/8/K7 w - - 0 1");
        assert_eq!(
            pos.san(Move::new(Square::A7, Square::B8).with_promotion(Role::Queen)),
            Ok("axb8=Q+".to_owned())
        );
        assert_eq!(
            pos.parse_san("a8=N"),
            Ok(Move::new(Square::A7, Square::A8).with_promotion(Role::Knight))
        );
        assert_eq!(pos.parse_san("a8"), Err(ParseMoveError::San(SanError::IllegalSan)));
    }

    #[test]
    fn test_san_plus_suffix() {
        let pos = setup("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let mate = SanPlus::from_move(&pos, Move::new(Square::A1, Square::A8));
        assert_eq!(mate.suffix, Some(Suffix::Checkmate));
        let quiet = SanPlus::from_move(&pos, Move::new(Square::A1, Square::A2));
        assert_eq!(quiet.to_string(), "Ra2");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "illegal")]
    fn test_san_plus_rejects_illegal_move() {
        let pos = Position::new();
        SanPlus::from_move(&pos, Move::new(Square::E2, Square::E5));
    }
}
