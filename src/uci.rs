//! Parse and write moves in machine notation, as used by the UCI protocol.
//!
//! A move is written as origin and target square, followed by the
//! lowercase promotion letter if any: `e2e4`, `e7e8q`. Castling is the
//! king's move, `e1g1`.
//!
//! # Examples
//!
//! ```
//! use rookery::{Move, Position, Role, Square};
//!
//! let m: Move = "b7b8N".parse()?;
//! assert_eq!(m, Move::new(Square::B7, Square::B8).with_promotion(Role::Knight));
//! assert_eq!(m.to_string(), "b7b8n");
//!
//! let pos = Position::new();
//! assert!(pos.parse_uci("e2e4").is_ok());
//! assert!(pos.parse_uci("e2e5").is_err());
//! # Ok::<_, rookery::uci::ParseUciError>(())
//! ```

use std::{error::Error, fmt, str::FromStr};

use crate::{m::Move, position::Position, role::Role, square::Square};

/// Error when parsing a syntactically invalid move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseUciError;

impl fmt::Display for ParseUciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid uci")
    }
}

impl Error for ParseUciError {}

/// Error when a move in machine notation can not be played.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UciError {
    /// The notation is malformed.
    Parse(ParseUciError),
    /// The move is well formed, but not legal in the position.
    Illegal { m: Move },
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            UciError::Parse(ref err) => err.fmt(f),
            UciError::Illegal { m } => write!(f, "illegal uci: {m}"),
        }
    }
}

impl Error for UciError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            UciError::Parse(ref err) => Some(err),
            UciError::Illegal { .. } => None,
        }
    }
}

impl From<ParseUciError> for UciError {
    fn from(err: ParseUciError) -> UciError {
        UciError::Parse(err)
    }
}

impl Move {
    /// Parses machine notation from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ParseUciError`] unless `uci` is two squares optionally
    /// followed by one of `q`, `r`, `b`, `n` in either case.
    pub fn from_ascii(uci: &[u8]) -> Result<Move, ParseUciError> {
        if uci.len() != 4 && uci.len() != 5 {
            return Err(ParseUciError);
        }

        let from = Square::from_ascii(&uci[0..2]).map_err(|_| ParseUciError)?;
        let to = Square::from_ascii(&uci[2..4]).map_err(|_| ParseUciError)?;
        let promotion = match uci.get(4) {
            Some(&ch) => Some(
                Role::from_char(char::from(ch))
                    .filter(|role| role.is_promotion_target())
                    .ok_or(ParseUciError)?,
            ),
            None => None,
        };

        if from == to {
            return Err(ParseUciError);
        }

        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}

impl FromStr for Move {
    type Err = ParseUciError;

    fn from_str(uci: &str) -> Result<Move, ParseUciError> {
        Move::from_ascii(uci.as_bytes())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.promotion {
            Some(role) => write!(f, "{}{}{}", self.from, self.to, role.char()),
            None => write!(f, "{}{}", self.from, self.to),
        }
    }
}

impl Position {
    /// Parses a move in machine notation and checks that it is legal.
    ///
    /// # Errors
    ///
    /// Returns [`UciError::Parse`] for malformed input and
    /// [`UciError::Illegal`] if the move can not be played.
    pub fn parse_uci(&self, uci: &str) -> Result<Move, UciError> {
        let m: Move = uci.parse()?;
        if self.is_legal(m) {
            Ok(m)
        } else {
            Err(UciError::Illegal { m })
        }
    }
}
