//! Mailbox board representation.
//!
//! `Board` is a plain 8×8 grid of optional pieces, row 0 being the eighth
//! rank. `Position` adds the per-move state that travels with a board: side
//! to move, en-passant target and the move counters. Both are cheap to clone
//! and are always copied, never patched in place, when a move is applied.

use serde::{Deserialize, Serialize};

use crate::engine::types::{ChessError, Color, Piece, PieceType, Square};

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// An 8×8 grid of optional pieces, indexed `[row][file]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.file() as usize]
    }

    /// Place a piece, returning whatever stood there before.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.file() as usize].replace(piece)
    }

    /// Remove and return the piece on a square.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.file() as usize].take()
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Relocate whatever is on `from` to `to`, overwriting `to`.
    pub fn relocate(&mut self, from: Square, to: Square) {
        if let Some(piece) = self.take(from) {
            self.put(to, piece);
        }
    }

    /// All occupied squares with their pieces, in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Pieces of one colour.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Number of pieces of one colour and type.
    pub fn count(&self, color: Color, kind: PieceType) -> usize {
        self.pieces().filter(|(_, p)| p.is(color, kind)).count()
    }

    /// The grid as rows of identifier strings ("" for empty squares), rank 8
    /// first.
    pub fn to_array(&self) -> [[String; 8]; 8] {
        std::array::from_fn(|row| {
            std::array::from_fn(|file| {
                self.grid[row][file]
                    .map(|p| p.code())
                    .unwrap_or_default()
            })
        })
    }

    // -----------------------------------------------------------------------
    // FEN piece placement
    // -----------------------------------------------------------------------

    /// Parse the piece-placement field of a FEN string.
    ///
    /// Ordinals are handed out per (colour, type) scanning from rank 1 to
    /// rank 8 and file a to h, which reproduces the identifiers of the
    /// standard starting set.
    pub fn from_fen_placement(field: &str) -> Result<Self, ChessError> {
        let ranks: Vec<&str> = field.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        let mut kinds: Vec<(Square, Color, PieceType)> = Vec::with_capacity(32);

        for (row, rank_str) in ranks.iter().enumerate() {
            let rank = 8 - row;
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if file > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {rank}"
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {rank}"
                        )));
                    }
                    file += digit as u8;
                } else if let Some((color, piece)) = PieceType::from_char(ch) {
                    let sq = Square::new(file, row as u8).ok_or_else(|| {
                        ChessError::InvalidFen(format!("too many squares in rank {rank}"))
                    })?;
                    kinds.push((sq, color, piece));
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if file != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {rank} has {file} squares instead of 8"
                )));
            }
        }

        // Rank 1 first, a to h within a rank.
        kinds.sort_by_key(|(sq, _, _)| (7 - sq.row(), sq.file()));
        let mut next_ordinal = [[0u8; PieceType::COUNT]; 2];
        for (sq, color, kind) in kinds {
            let ordinal = match kind {
                PieceType::King | PieceType::Queen if !is_repeated(field, color, kind) => 0,
                _ => {
                    let slot = &mut next_ordinal[color.index()][kind.index()];
                    *slot = slot.saturating_add(1);
                    *slot
                }
            };
            board.put(sq, Piece::with_ordinal(color, kind, ordinal));
        }

        Ok(board)
    }

    /// Render the piece-placement field of a FEN string.
    pub fn to_fen_placement(&self) -> String {
        let mut fen = String::with_capacity(72);
        for row in 0..8u8 {
            let mut empty_count = 0u8;
            for file in 0..8u8 {
                match self.grid[row as usize][file as usize] {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.kind.to_char(piece.color));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for file in 0..8u8 {
                let ch = match self.grid[row as usize][file as usize] {
                    Some(p) => p.kind.to_char(p.color),
                    None => '.',
                };
                s.push(ch);
                if file < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

/// Whether a placement field holds more than one piece of this colour and
/// type, in which case even kings and queens get ordinals.
fn is_repeated(field: &str, color: Color, kind: PieceType) -> bool {
    let ch = kind.to_char(color);
    field.chars().filter(|&c| c == ch).count() > 1
}

// ---------------------------------------------------------------------------
// EnPassant
// ---------------------------------------------------------------------------

/// The square a double-stepping pawn skipped, plus the pawn that created it.
/// Valid for exactly one reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnPassant {
    pub target: Square,
    pub pawn: Piece,
    pub pawn_square: Square,
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Board plus the state needed to continue play from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub board: Board,

    /// Whose turn it is.
    pub side_to_move: Color,

    pub en_passant: Option<EnPassant>,

    /// Half-move clock for the 50-move rule (reset on pawn move or capture).
    pub halfmove_clock: u16,

    /// Full-move number (starts at 1, incremented after Black moves).
    pub fullmove_number: u16,
}

impl Position {
    /// An empty board with White to move.
    pub fn empty() -> Self {
        Position {
            board: Board::empty(),
            side_to_move: Color::White,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
