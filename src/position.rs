use std::{error::Error, fmt};

use bitflags::bitflags;
use tracing::debug;

use crate::{
    bitboard::Bitboard,
    board::Board,
    castling::CastlingRights,
    color::Color,
    m::{Move, MoveFlags},
    role::Role,
    square::Square,
    types::{CastlingSide, Outcome, Piece},
    zobrist::{self, Zobrist64},
};

bitflags! {
    /// Reasons for a [`Position`] to be rejected.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct PositionErrorKinds: u8 {
        /// A side has no king.
        const MISSING_KING = 1 << 0;
        /// A side has more than one king.
        const TOO_MANY_KINGS = 1 << 1;
        /// There are pawns on the first or eighth rank.
        const PAWNS_ON_BACKRANK = 1 << 2;
        /// The side that just moved left its king in check.
        const OPPOSITE_CHECK = 1 << 3;
        /// A castling right without the king and rook on their home
        /// squares.
        const INVALID_CASTLING_RIGHTS = 1 << 4;
        /// An en passant square that no double pawn push could have left.
        const INVALID_EP_SQUARE = 1 << 5;
    }
}

/// Error when setting up an invalid [`Position`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionError {
    kinds: PositionErrorKinds,
}

impl PositionError {
    /// All problems found, there is at least one.
    pub const fn kinds(&self) -> PositionErrorKinds {
        self.kinds
    }
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("illegal position: ")?;

        let mut reasons = Vec::new();
        for (kind, reason) in [
            (PositionErrorKinds::MISSING_KING, "missing king"),
            (PositionErrorKinds::TOO_MANY_KINGS, "too many kings"),
            (PositionErrorKinds::PAWNS_ON_BACKRANK, "pawns on backrank"),
            (PositionErrorKinds::OPPOSITE_CHECK, "opposite check"),
            (
                PositionErrorKinds::INVALID_CASTLING_RIGHTS,
                "invalid castling rights",
            ),
            (PositionErrorKinds::INVALID_EP_SQUARE, "invalid ep square"),
        ] {
            if self.kinds.contains(kind) {
                reasons.push(reason);
            }
        }
        f.write_str(&reasons.join(", "))
    }
}

impl Error for PositionError {}

/// Error when trying to play an illegal move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlayError {
    pub m: Move,
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal move {}", self.m)
    }
}

impl Error for PlayError {}

/// Error when undoing with an empty history.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UndoError;

impl fmt::Display for UndoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no move to undo")
    }
}

impl Error for UndoError {}

/// Everything needed to take back one move.
#[derive(Copy, Clone, Debug)]
struct UndoRecord {
    m: Move,
    moved: Piece,
    captured: Option<Piece>,
    castling_rights: CastlingRights,
    ep_square: Option<Square>,
    halfmoves: u32,
    fullmoves: u32,
    hash: Zobrist64,
}

/// A mutable chess position with an undo log.
///
/// Moves are applied in place with [`Position::play()`] and taken back with
/// [`Position::undo()`]. The Polyglot [`Zobrist64`] key is maintained
/// incrementally.
///
/// Cloning yields an independent position whose history is empty, so it
/// can not be undone past the point where it was copied.
///
/// # Examples
///
/// ```
/// use rookery::{Move, Position, Square};
///
/// let mut pos = Position::new();
/// pos.play(Move::new(Square::E2, Square::E4))?;
/// assert_eq!(pos.fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
///
/// assert_eq!(pos.undo()?, Move::new(Square::E2, Square::E4));
/// assert_eq!(pos, Position::new());
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub struct Position {
    board: Board,
    turn: Color,
    castling_rights: CastlingRights,
    ep_square: Option<Square>,
    halfmoves: u32,
    fullmoves: u32,
    hash: Zobrist64,
    history: Vec<UndoRecord>,
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Position {
        let board = Board::new();
        let hash = zobrist::hash_position(&board, Color::White, CastlingRights::all(), None);
        Position {
            board,
            turn: Color::White,
            castling_rights: CastlingRights::all(),
            ep_square: None,
            halfmoves: 0,
            fullmoves: 1,
            hash,
            history: Vec::new(),
        }
    }

    /// Validates and assembles a position.
    ///
    /// A fullmove number of 0 is read as 1.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] listing every problem found.
    pub fn from_parts(
        board: Board,
        turn: Color,
        castling_rights: CastlingRights,
        ep_square: Option<Square>,
        halfmoves: u32,
        fullmoves: u32,
    ) -> Result<Position, PositionError> {
        let hash = zobrist::hash_position(&board, turn, castling_rights, ep_square);
        let pos = Position {
            board,
            turn,
            castling_rights,
            ep_square,
            halfmoves,
            fullmoves: fullmoves.max(1),
            hash,
            history: Vec::new(),
        };

        let kinds = pos.validate();
        if kinds.is_empty() {
            Ok(pos)
        } else {
            Err(PositionError { kinds })
        }
    }

    fn validate(&self) -> PositionErrorKinds {
        let mut kinds = PositionErrorKinds::empty();

        for color in Color::ALL {
            match self.board.by_piece(color.king()).count() {
                0 => kinds |= PositionErrorKinds::MISSING_KING,
                1 => (),
                _ => kinds |= PositionErrorKinds::TOO_MANY_KINGS,
            }
        }

        if (self.board.by_role(Role::Pawn) & Bitboard::BACKRANKS).any() {
            kinds |= PositionErrorKinds::PAWNS_ON_BACKRANK;
        }

        if let Some(their_king) = self.board.king_of(!self.turn) {
            if self.is_attacked(their_king, self.turn) {
                kinds |= PositionErrorKinds::OPPOSITE_CHECK;
            }
        }

        for color in Color::ALL {
            for side in CastlingSide::ALL {
                if self.castling_rights.has(color, side)
                    && (self.board.piece_at(CastlingSide::king_from(color)) != Some(color.king())
                        || self.board.piece_at(side.rook_from(color))
                            != Some(Role::Rook.of(color)))
                {
                    kinds |= PositionErrorKinds::INVALID_CASTLING_RIGHTS;
                }
            }
        }

        if let Some(ep_square) = self.ep_square {
            if !self.is_valid_ep_square(ep_square) {
                kinds |= PositionErrorKinds::INVALID_EP_SQUARE;
            }
        }

        kinds
    }

    /// The target must be empty, on the sixth rank from the point of view of
    /// the side to move, with the pushed pawn in front and its origin empty.
    fn is_valid_ep_square(&self, ep_square: Square) -> bool {
        if ep_square.relative_rank(self.turn) != 5 {
            return false;
        }
        let pushed_to = ep_square.offset((!self.turn).pawn_push_delta());
        let pushed_from = ep_square.offset(self.turn.pawn_push_delta());
        match (pushed_to, pushed_from) {
            (Some(pushed_to), Some(pushed_from)) => {
                !self.board.occupied().contains(ep_square)
                    && !self.board.occupied().contains(pushed_from)
                    && self.board.piece_at(pushed_to) == Some((!self.turn).pawn())
            }
            _ => false,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// The en passant target square, recorded after every double pawn push
    /// whether or not a capture is possible.
    #[inline]
    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Plies since the last capture or pawn move.
    #[inline]
    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    /// Starts at 1 and is incremented after every move of Black.
    #[inline]
    pub fn fullmoves(&self) -> u32 {
        self.fullmoves
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    /// Square of the king of `color`.
    #[inline]
    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.board.king_of(color)
    }

    /// The current Polyglot key.
    #[inline]
    pub fn zobrist_hash(&self) -> Zobrist64 {
        self.hash
    }

    /// The Polyglot key computed from scratch. Always equal to
    /// [`Position::zobrist_hash()`].
    pub fn recompute_hash(&self) -> Zobrist64 {
        zobrist::hash_position(&self.board, self.turn, self.castling_rights, self.ep_square)
    }

    /// Key of the piece placement only, ignoring side to move, castling and
    /// en passant. Useful to search for a placement across games.
    pub fn placement_hash(&self) -> Zobrist64 {
        zobrist::hash_board(&self.board)
    }

    /// Tests for the standard starting position.
    pub fn is_initial_position(&self) -> bool {
        self.board == Board::new()
            && self.turn == Color::White
            && self.castling_rights == CastlingRights::all()
            && self.ep_square.is_none()
    }

    /// Enemy pieces giving check to the side to move.
    pub fn checkers(&self) -> Bitboard {
        self.king_of(self.turn).map_or(Bitboard::EMPTY, |king| {
            self.board
                .attacks_to(king, !self.turn, self.board.occupied())
        })
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        self.checkers().any()
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// Tests for K vs K, K and a single minor piece vs K, and K+B vs K+B
    /// with both bishops on squares of the same color.
    pub fn is_insufficient_material(&self) -> bool {
        let others = self.board.occupied() & !self.board.by_role(Role::King);
        let minors = self.board.by_role(Role::Knight) | self.board.by_role(Role::Bishop);
        match others.count() {
            0 => true,
            1 => others.intersects(minors),
            2 => {
                let bishops = self.board.by_role(Role::Bishop);
                others == bishops
                    && self.board.by_color(Color::White).intersects(bishops)
                    && self.board.by_color(Color::Black).intersects(bishops)
                    && (bishops & Bitboard::DARK_SQUARES).count() != 1
            }
            _ => false,
        }
    }

    /// Tests if the side to move may claim a draw by the fifty-move rule.
    #[inline]
    pub fn can_claim_fifty_moves(&self) -> bool {
        self.halfmoves >= 100
    }

    /// The outcome if the game is over by checkmate, stalemate or
    /// insufficient material.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.legal_moves().is_empty() {
            Some(if self.is_check() {
                Outcome::Decisive { winner: !self.turn }
            } else {
                Outcome::Draw
            })
        } else if self.is_insufficient_material() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    /// Describes `m` relative to this position.
    ///
    /// ```
    /// use rookery::{Move, MoveFlags, Position, Square};
    ///
    /// let pos = Position::new();
    /// assert_eq!(
    ///     pos.move_flags(Move::new(Square::E2, Square::E4)),
    ///     MoveFlags::DOUBLE_PUSH
    /// );
    /// ```
    pub fn move_flags(&self, m: Move) -> MoveFlags {
        let mut flags = MoveFlags::empty();
        let Some(piece) = self.board.piece_at(m.from) else {
            return flags;
        };

        if self.board.color_at(m.to) == Some(!piece.color) {
            flags |= MoveFlags::CAPTURE;
        }

        match piece.role {
            Role::Pawn => {
                if self.is_en_passant(piece, m) {
                    flags |= MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
                }
                if m.from.rank().abs_diff(m.to.rank()) == 2 {
                    flags |= MoveFlags::DOUBLE_PUSH;
                }
                if m.promotion.is_some() {
                    flags |= MoveFlags::PROMOTION;
                }
            }
            Role::King => {
                if CastlingSide::from_king_move(piece.color, m.from, m.to).is_some() {
                    flags |= MoveFlags::CASTLE;
                }
            }
            Role::Knight | Role::Bishop | Role::Rook | Role::Queen => (),
        }

        flags
    }

    fn is_en_passant(&self, moved: Piece, m: Move) -> bool {
        moved.role == Role::Pawn
            && Some(m.to) == self.ep_square
            && m.from.file() != m.to.file()
            && !self.board.occupied().contains(m.to)
    }

    /// Plays a move.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] and leaves the position unchanged if `m` is
    /// not legal.
    pub fn play(&mut self, m: Move) -> Result<(), PlayError> {
        if !self.is_pseudo_legal(m) {
            debug!(%m, fen = %self.fen(), "rejected move that is not pseudo-legal");
            return Err(PlayError { m });
        }

        let us = self.turn;
        self.play_unchecked(m);
        if self.is_king_attacked(us) {
            self.take_back();
            debug!(%m, fen = %self.fen(), "rejected move leaving the king in check");
            return Err(PlayError { m });
        }

        Ok(())
    }

    /// Plays a move without checking legality.
    ///
    /// Only for moves taken from [`Position::legal_moves()`] (or
    /// pseudo-legal moves that are then checked and undone). Anything else
    /// leaves the position inconsistent.
    pub fn play_unchecked(&mut self, m: Move) {
        debug_assert!(self.is_pseudo_legal(m), "play_unchecked with {m}");

        let Some(moved) = self.board.piece_at(m.from) else {
            return;
        };
        let us = self.turn;

        let record = UndoRecord {
            m,
            moved,
            captured: None,
            castling_rights: self.castling_rights,
            ep_square: self.ep_square,
            halfmoves: self.halfmoves,
            fullmoves: self.fullmoves,
            hash: self.hash,
        };

        let mut hash = self.hash;
        hash ^= zobrist::ep_key(&self.board, self.turn, self.ep_square);
        hash ^= Zobrist64::for_castling_rights(self.castling_rights);

        let captured = if self.is_en_passant(moved, m) {
            let capture_sq = Square::from_coords(m.to.file(), m.from.rank());
            self.board.remove_piece_at(capture_sq).map(|pawn| {
                hash ^= Zobrist64::for_piece(capture_sq, pawn);
                pawn
            })
        } else {
            self.board.remove_piece_at(m.to).map(|piece| {
                hash ^= Zobrist64::for_piece(m.to, piece);
                piece
            })
        };

        self.board.remove_piece_at(m.from);
        hash ^= Zobrist64::for_piece(m.from, moved);
        let placed = m.promotion.map_or(moved, |role| role.of(us));
        self.board.set_piece_at(m.to, placed);
        hash ^= Zobrist64::for_piece(m.to, placed);

        if moved.role == Role::King {
            if let Some(side) = CastlingSide::from_king_move(us, m.from, m.to) {
                let rook = Role::Rook.of(us);
                self.board.remove_piece_at(side.rook_from(us));
                self.board.set_piece_at(side.rook_to(us), rook);
                hash ^= Zobrist64::for_piece(side.rook_from(us), rook);
                hash ^= Zobrist64::for_piece(side.rook_to(us), rook);
            }
        }

        self.castling_rights
            .remove(CastlingRights::touched_by(m.from) | CastlingRights::touched_by(m.to));
        hash ^= Zobrist64::for_castling_rights(self.castling_rights);

        self.ep_square = if moved.role == Role::Pawn && m.from.rank().abs_diff(m.to.rank()) == 2
        {
            Some(Square::from_coords(
                m.from.file(),
                (m.from.rank() + m.to.rank()) / 2,
            ))
        } else {
            None
        };

        if moved.role == Role::Pawn || captured.is_some() {
            self.halfmoves = 0;
        } else {
            self.halfmoves = self.halfmoves.saturating_add(1);
        }

        if us.is_black() {
            self.fullmoves = self.fullmoves.saturating_add(1);
        }

        self.turn = !us;
        hash ^= Zobrist64::for_white_turn();
        hash ^= zobrist::ep_key(&self.board, self.turn, self.ep_square);
        self.hash = hash;

        self.history.push(UndoRecord { captured, ..record });

        debug_assert_eq!(self.hash, self.recompute_hash(), "after {m}");
    }

    /// Takes back the last move and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`UndoError`] if there is no move to take back.
    pub fn undo(&mut self) -> Result<Move, UndoError> {
        self.take_back().ok_or_else(|| {
            debug!("undo with empty history");
            UndoError
        })
    }

    pub(crate) fn take_back(&mut self) -> Option<Move> {
        let record = self.history.pop()?;
        let m = record.m;

        self.turn = !self.turn;
        let us = self.turn;

        self.board.remove_piece_at(m.to);
        self.board.set_piece_at(m.from, record.moved);

        if record.moved.role == Role::King {
            if let Some(side) = CastlingSide::from_king_move(us, m.from, m.to) {
                self.board.remove_piece_at(side.rook_to(us));
                self.board.set_piece_at(side.rook_from(us), Role::Rook.of(us));
            }
        }

        self.castling_rights = record.castling_rights;
        self.ep_square = record.ep_square;
        self.halfmoves = record.halfmoves;
        self.fullmoves = record.fullmoves;
        self.hash = record.hash;

        if let Some(captured) = record.captured {
            let capture_sq = if self.is_en_passant(record.moved, m) {
                Square::from_coords(m.to.file(), m.from.rank())
            } else {
                m.to
            };
            self.board.set_piece_at(capture_sq, captured);
        }

        Some(m)
    }

    /// Tests if there is a move to take back.
    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Number of moves that can be taken back.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn is_king_attacked(&self, color: Color) -> bool {
        self.king_of(color)
            .is_some_and(|king| self.is_attacked(king, !color))
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

/// Copies the position without its history.
impl Clone for Position {
    fn clone(&self) -> Position {
        Position {
            board: self.board.clone(),
            turn: self.turn,
            castling_rights: self.castling_rights,
            ep_square: self.ep_square,
            halfmoves: self.halfmoves,
            fullmoves: self.fullmoves,
            hash: self.hash,
            history: Vec::new(),
        }
    }
}

/// Positions are equal if all FEN fields are equal. History is ignored.
impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        self.board == other.board
            && self.turn == other.turn
            && self.castling_rights == other.castling_rights
            && self.ep_square == other.ep_square
            && self.halfmoves == other.halfmoves
            && self.fullmoves == other.fullmoves
    }
}

impl Eq for Position {}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.fen())
            .field("history_len", &self.history.len())
            .finish()
    }
}

/// The board diagram followed by a line with the remaining FEN fields.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        write!(
            f,
            "{} {} {} {} {}",
            self.turn.char(),
            self.castling_rights,
            self.ep_square.map_or("-".to_owned(), |sq| sq.to_string()),
            self.halfmoves,
            self.fullmoves
        )
    }
}
