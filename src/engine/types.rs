use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a pawn step. Row 0 is the eighth rank, so White walks
    /// towards smaller rows.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row the pawns start on.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row the pieces start on (king, rooks, ...).
    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row on which a pawn of this colour promotes.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Identifier tag: 'w' or 'b'.
    pub const fn tag(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Pieces a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Number of piece types.
    pub const COUNT: usize = 6;

    /// Index for array lookups: Pawn=0 .. King=5.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Uppercase letter used in piece identifiers ("wN1").
    pub const fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// Parse a type letter, ignoring case.
    pub fn from_letter(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'N' => Some(PieceType::Knight),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Whether a pawn may promote to this type.
    #[inline]
    pub fn is_promotion_target(self) -> bool {
        !matches!(self, PieceType::Pawn | PieceType::King)
    }

    /// FEN character: uppercase for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = self.letter();
        match color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parse a FEN piece character; case carries the colour.
    pub fn from_char(c: char) -> Option<(Color, PieceType)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        PieceType::from_letter(c).map(|pt| (color, pt))
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A decoded piece identifier.
///
/// Identifiers look like `wK`, `bR2` or `wP5=Q`: colour tag, type letter, an
/// optional ordinal telling same-type pieces apart, and for a promoted pawn
/// an `=X` suffix giving the type it now moves as. Two pieces compare equal
/// only if they are the same physical piece, which is what lets the rules
/// ask "has this rook ever moved" by scanning the move history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
    /// 0 when the piece is unique (king, queen).
    pub ordinal: u8,
    /// Set on pawns that have been promoted; `kind` is then the new type.
    pub promoted: bool,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Piece {
            color,
            kind,
            ordinal: 0,
            promoted: false,
        }
    }

    pub const fn with_ordinal(color: Color, kind: PieceType, ordinal: u8) -> Self {
        Piece {
            color,
            kind,
            ordinal,
            promoted: false,
        }
    }

    #[inline]
    pub fn color(self) -> Color {
        self.color
    }

    #[inline]
    pub fn kind(self) -> PieceType {
        self.kind
    }

    #[inline]
    pub fn is(self, color: Color, kind: PieceType) -> bool {
        self.color == color && self.kind == kind
    }

    /// The same pawn, now moving as `kind`.
    pub fn promote(self, kind: PieceType) -> Self {
        debug_assert_eq!(self.kind, PieceType::Pawn);
        Piece {
            kind,
            promoted: true,
            ..self
        }
    }

    /// Identifier text, e.g. "wR2".
    pub fn code(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = if self.promoted {
            PieceType::Pawn
        } else {
            self.kind
        };
        write!(f, "{}{}", self.color.tag(), origin.letter())?;
        if self.ordinal > 0 {
            write!(f, "{}", self.ordinal)?;
        }
        if self.promoted {
            write!(f, "={}", self.kind.letter())?;
        }
        Ok(())
    }
}

impl FromStr for Piece {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChessError::InvalidPiece(s.to_string());
        let mut chars = s.chars();
        let color = match chars.next() {
            Some('w' | 'W') => Color::White,
            Some('b' | 'B') => Color::Black,
            _ => return Err(invalid()),
        };
        let kind = chars
            .next()
            .and_then(PieceType::from_letter)
            .ok_or_else(invalid)?;

        let rest = chars.as_str();
        let (digits, suffix) = match rest.split_once('=') {
            Some((digits, suffix)) => (digits, Some(suffix)),
            None => (rest, None),
        };
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let ordinal = if digits.is_empty() {
            0
        } else {
            digits.parse::<u8>().map_err(|_| invalid())?
        };

        let Some(suffix) = suffix else {
            return Ok(Piece::with_ordinal(color, kind, ordinal));
        };
        // Promotion suffix: strip it and take the type from it.
        if kind != PieceType::Pawn {
            return Err(invalid());
        }
        let mut suffix_chars = suffix.chars();
        let promoted = suffix_chars
            .next()
            .and_then(PieceType::from_letter)
            .filter(|pt| pt.is_promotion_target())
            .ok_or_else(invalid)?;
        if suffix_chars.next().is_some() {
            return Err(invalid());
        }
        Ok(Piece::with_ordinal(color, PieceType::Pawn, ordinal).promote(promoted))
    }
}

impl TryFrom<String> for Piece {
    type Error = ChessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Piece> for String {
    fn from(piece: Piece) -> Self {
        piece.to_string()
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A square on the chess board.
///
/// Index layout is row-major with row 0 being the eighth rank, matching the
/// 8×8 board array: a8 = 0, h8 = 7, a1 = 56, h1 = 63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square(u8);

impl Square {
    pub const NUM: usize = 64;

    /// Square from file (0 = a) and row (0 = eighth rank).
    #[inline]
    pub fn new(file: u8, row: u8) -> Option<Self> {
        (file < 8 && row < 8).then(|| Square(row * 8 + file))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn file(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.0 >> 3
    }

    /// Chess rank number, 1..=8.
    #[inline]
    pub fn rank(self) -> u8 {
        8 - self.row()
    }

    /// Step by a file/row delta, `None` when it leaves the board.
    #[inline]
    pub fn offset(self, file_delta: i8, row_delta: i8) -> Option<Square> {
        let file = self.file() as i8 + file_delta;
        let row = self.row() as i8 + row_delta;
        if (0..8).contains(&file) && (0..8).contains(&row) {
            Some(Square(row as u8 * 8 + file as u8))
        } else {
            None
        }
    }

    /// Parse algebraic notation like "e4". Anything that is not exactly a
    /// file letter followed by a rank digit yields `None`.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Square::new(file, 7 - rank)
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.file()) as char;
        let rank = (b'0' + self.rank()) as char;
        format!("{file}{rank}")
    }

    /// Notation for raw coordinates; empty when either is off the board.
    pub fn notation(file: i32, row: i32) -> String {
        if (0..8).contains(&file) && (0..8).contains(&row) {
            Square(row as u8 * 8 + file as u8).to_algebraic()
        } else {
            String::new()
        }
    }

    /// Iterate all 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| ChessError::InvalidSquare(s.to_string()))
    }
}

impl TryFrom<String> for Square {
    type Error = ChessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_algebraic()
    }
}

// ---------------------------------------------------------------------------
// MoveFlags
// ---------------------------------------------------------------------------

/// Flags for special move aspects packed in a single byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlags(pub u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    pub const CAPTURE: MoveFlags = MoveFlags(1);
    pub const EN_PASSANT: MoveFlags = MoveFlags(2);
    pub const CASTLING: MoveFlags = MoveFlags(4);
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(8);
    pub const PROMOTION: MoveFlags = MoveFlags(16);

    #[inline]
    pub fn is_capture(self) -> bool {
        self.0 & Self::CAPTURE.0 != 0
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.0 & Self::EN_PASSANT.0 != 0
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        self.0 & Self::CASTLING.0 != 0
    }

    #[inline]
    pub fn is_double_push(self) -> bool {
        self.0 & Self::DOUBLE_PUSH.0 != 0
    }

    #[inline]
    pub fn is_promotion(self) -> bool {
        self.0 & Self::PROMOTION.0 != 0
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        MoveFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for MoveFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ---------------------------------------------------------------------------
// MoveKind
// ---------------------------------------------------------------------------

/// The single classification tag attached to an applied move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Normal,
    Capture,
    Castle,
    Promotion,
    EnPassant,
    Check,
    Checkmate,
}

impl MoveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MoveKind::Normal => "normal",
            MoveKind::Capture => "capture",
            MoveKind::Castle => "castle",
            MoveKind::Promotion => "promotion",
            MoveKind::EnPassant => "en_passant",
            MoveKind::Check => "check",
            MoveKind::Checkmate => "checkmate",
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MoveIntent
// ---------------------------------------------------------------------------

/// A requested move: from-square, to-square and optional promotion choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveIntent {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl MoveIntent {
    pub fn new(from: Square, to: Square) -> Self {
        MoveIntent {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PieceType) -> Self {
        MoveIntent {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// Parse long algebraic notation: "e2e4", "e7e8q" or "e7e8=q".
    pub fn from_lan(s: &str) -> Option<Self> {
        let s = s.trim();
        if !s.is_ascii() || s.len() < 4 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].trim_start_matches('=') {
            "" => None,
            p if p.len() == 1 => {
                let pt = p.chars().next().and_then(PieceType::from_letter)?;
                if !pt.is_promotion_target() {
                    return None;
                }
                Some(pt)
            }
            _ => return None,
        };
        Some(MoveIntent {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for MoveIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char(Color::Black))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// An applied move as recorded in the history. Never mutated after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// The piece as it stood on `from` before moving.
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceType>,
    pub flags: MoveFlags,
    pub kind: MoveKind,
}

impl Move {
    /// The request that reproduces this move.
    pub fn intent(&self) -> MoveIntent {
        MoveIntent {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.intent())
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// Castling availability bitfield: bits 0-3 = WK, WQ, BK, BQ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn insert(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Flag bit for one side of one colour.
    #[inline]
    pub const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::King) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queen) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::King) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queen) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Parse FEN castling string (e.g. "KQkq", "-", "Kq").
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = 0u8;
        for c in s.chars() {
            match c {
                'K' => rights |= Self::WHITE_KINGSIDE,
                'Q' => rights |= Self::WHITE_QUEENSIDE,
                'k' => rights |= Self::BLACK_KINGSIDE,
                'q' => rights |= Self::BLACK_QUEENSIDE,
                _ => return None,
            }
        }
        Some(CastlingRights(rights))
    }

    /// Convert to FEN castling string.
    pub fn to_fen(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.has(Self::WHITE_KINGSIDE) {
            s.push('K');
        }
        if self.has(Self::WHITE_QUEENSIDE) {
            s.push('Q');
        }
        if self.has(Self::BLACK_KINGSIDE) {
            s.push('k');
        }
        if self.has(Self::BLACK_QUEENSIDE) {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

/// Which rook the king castles with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    /// File the rook starts on.
    pub const fn rook_file(self) -> u8 {
        match self {
            CastleSide::King => 7,
            CastleSide::Queen => 0,
        }
    }

    /// File the king lands on.
    pub const fn king_to_file(self) -> u8 {
        match self {
            CastleSide::King => 6,
            CastleSide::Queen => 2,
        }
    }

    /// File the rook lands on.
    pub const fn rook_to_file(self) -> u8 {
        match self {
            CastleSide::King => 5,
            CastleSide::Queen => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Current status of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw(reason) => reason.as_str(),
        }
    }

    /// Mate, stalemate and dead positions end the game. Claimable draws
    /// are reported but play may continue.
    pub fn is_game_over(&self) -> bool {
        match self {
            GameStatus::Checkmate | GameStatus::Stalemate => true,
            GameStatus::Draw(reason) => !reason.is_claimable(),
            GameStatus::Active | GameStatus::Check => false,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reason for a draw other than stalemate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

impl DrawReason {
    pub fn as_str(&self) -> &str {
        match self {
            DrawReason::FiftyMoveRule => "fifty_move_rule",
            DrawReason::ThreefoldRepetition => "threefold_repetition",
            DrawReason::InsufficientMaterial => "insufficient_material",
        }
    }

    /// Fifty-move and threefold draws have to be claimed by a player.
    pub fn is_claimable(self) -> bool {
        matches!(
            self,
            DrawReason::FiftyMoveRule | DrawReason::ThreefoldRepetition
        )
    }
}

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

/// Why a move request was turned down. These are ordinary outcomes, not
/// errors: the board is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    InvalidSquare,
    MalformedMove,
    NoPiece,
    WrongTurn,
    IllegalDestination,
    InvalidPromotion,
    GameOver,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::InvalidSquare => "invalid_square",
            Rejection::MalformedMove => "malformed_move",
            Rejection::NoPiece => "no_piece",
            Rejection::WrongTurn => "wrong_turn",
            Rejection::IllegalDestination => "illegal_destination",
            Rejection::InvalidPromotion => "invalid_promotion",
            Rejection::GameOver => "game_over",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the chess engine.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid piece identifier: {0}")]
    InvalidPiece(String),

    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(String),

    #[error("invalid game state: {0}")]
    InvalidState(String),

    #[error("no moves to undo")]
    NothingToUndo,

    #[error("no moves to redo")]
    NothingToRedo,

    #[error("move source failed: {0}")]
    MoveSource(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
