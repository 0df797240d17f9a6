//! A mutable chess position with an undo log, legal move generation and
//! Polyglot compatible Zobrist hashing.
//!
//! # Examples
//!
//! Generate legal moves in the starting position:
//!
//! ```
//! use rookery::Position;
//!
//! let pos = Position::new();
//! let legals = pos.legal_moves();
//! assert_eq!(legals.len(), 20);
//! ```
//!
//! Play and take back moves:
//!
//! ```
//! use rookery::{Move, Position, Square};
//!
//! let mut pos = Position::new();
//! let start = pos.zobrist_hash();
//!
//! // 1. e4
//! pos.play(Move::new(Square::E2, Square::E4))?;
//! assert_eq!(pos.ep_square(), Some(Square::E3));
//!
//! assert_eq!(pos.undo(), Ok(Move::new(Square::E2, Square::E4)));
//! assert_eq!(pos.zobrist_hash(), start);
//! # Ok::<_, rookery::PlayError>(())
//! ```
//!
//! Detect game end conditions:
//!
//! ```
//! # use rookery::Position;
//! # let pos = Position::new();
//! assert!(!pos.is_checkmate());
//! assert!(!pos.is_stalemate());
//! assert!(!pos.is_insufficient_material());
//! assert_eq!(pos.outcome(), None); // no winner yet
//! ```
//!
//! Also supports [FEN](fen), [SAN](san) and
//! [UCI](uci) formats for positions and moves.
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   types with unique natural representations.
//! * `nohash-hasher`: Implements
//!   [`nohash_hasher::IsEnabled`](https://docs.rs/nohash-hasher/0.2/nohash_hasher/trait.IsEnabled.html)
//!   for sensible types.

#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod castling;
mod color;
mod m;
mod movegen;
mod perft;
mod position;
mod role;
mod square;
mod types;

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod fen;
pub mod san;
pub mod uci;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use board::Board;
pub use castling::CastlingRights;
pub use color::{ByColor, Color, ParseColorError};
pub use fen::{FenError, ParseFenError};
pub use m::{Move, MoveFlags, MoveList};
pub use perft::{divide, perft};
pub use position::{PlayError, Position, PositionError, PositionErrorKinds, UndoError};
pub use role::{ByRole, Role};
pub use square::{ParseSquareError, Square};
pub use types::{CastlingSide, Outcome, Piece};
pub use zobrist::Zobrist64;

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Square {}
