//! The game-state aggregate.
//!
//! A `GameState` is never patched by callers: the executor clones it,
//! applies one move to the clone and hands back the fully evaluated result.
//! Castling availability is not stored as flags that need upkeep; it is
//! derived from the rights the game started with plus a scan of the move
//! history for king and rook moves.

use serde::{Deserialize, Serialize};

use crate::engine::attacks;
use crate::engine::board::{Board, EnPassant, Position};
use crate::engine::status;
use crate::engine::types::{
    CastleSide, CastlingRights, ChessError, Color, DrawReason, GameStatus, Move, MoveIntent,
    Piece, PieceType, Square,
};
use crate::engine::zobrist;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One applied move together with what is needed to take it back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub mv: Move,
    /// Position before the move.
    pub before: Position,
    /// Fingerprint of `before`, kept for repetition detection.
    pub fingerprint_before: u64,
}

/// Presentation hint: the square the user picked and where it may go.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub square: Square,
    pub targets: Vec<Square>,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub position: Position,
    /// Castling rights the game (or loaded FEN) started with.
    pub castling_origin: CastlingRights,

    pub white_in_check: bool,
    pub black_in_check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub winner: Option<Color>,
    pub draw: Option<DrawReason>,

    pub history: Vec<HistoryEntry>,
    /// Moves taken back by undo, most recent last.
    pub redo_stack: Vec<MoveIntent>,
    pub last_move: Option<(Square, Square)>,
    pub selection: Option<Selection>,
}

impl GameState {
    /// The standard starting position, White to move.
    pub fn initial() -> Self {
        Self::from_fen(STARTING_FEN).expect("starting FEN is always valid")
    }

    /// A fresh state for a position, status already evaluated.
    pub fn from_position(position: Position, castling_origin: CastlingRights) -> Self {
        let mut state = GameState {
            position,
            castling_origin,
            white_in_check: false,
            black_in_check: false,
            checkmate: false,
            stalemate: false,
            winner: None,
            draw: None,
            history: Vec::new(),
            redo_stack: Vec::new(),
            last_move: None,
            selection: None,
        };
        status::evaluate(&mut state);
        state
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    #[inline]
    pub fn board(&self) -> &Board {
        &self.position.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.position.board.piece_at(sq)
    }

    pub fn in_check(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_in_check,
            Color::Black => self.black_in_check,
        }
    }

    /// Summary of the stamped flags.
    pub fn status(&self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate
        } else if self.stalemate {
            GameStatus::Stalemate
        } else if let Some(reason) = self.draw {
            GameStatus::Draw(reason)
        } else if self.in_check(self.side_to_move()) {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_game_over()
    }

    /// Fingerprint of the current position, castling availability included.
    pub fn fingerprint(&self) -> u64 {
        zobrist::fingerprint(&self.position, self.castling_rights())
    }

    // -----------------------------------------------------------------
    // Castling availability
    // -----------------------------------------------------------------

    /// Whether `piece` has ever been the mover of a recorded move.
    pub fn has_moved(&self, piece: Piece) -> bool {
        self.history.iter().any(|entry| entry.mv.piece == piece)
    }

    /// King and rook squares for a castle that is still permitted by
    /// history: origin right present, king and rook on their home squares
    /// and neither has ever moved. Path and attack checks are left to the
    /// move generator.
    pub fn castle_candidate(&self, color: Color, side: CastleSide) -> Option<(Square, Square)> {
        if !self.castling_origin.has(CastlingRights::flag(color, side)) {
            return None;
        }
        let row = color.back_row();
        let king_sq = Square::new(4, row)?;
        let rook_sq = Square::new(side.rook_file(), row)?;

        let king = self.piece_at(king_sq).filter(|p| p.is(color, PieceType::King))?;
        let rook = self.piece_at(rook_sq).filter(|p| p.is(color, PieceType::Rook))?;
        if self.has_moved(king) || self.has_moved(rook) {
            return None;
        }
        Some((king_sq, rook_sq))
    }

    /// Castling availability as it would appear in FEN.
    pub fn castling_rights(&self) -> CastlingRights {
        let mut rights = CastlingRights::NONE;
        for color in [Color::White, Color::Black] {
            for side in CastleSide::BOTH {
                if self.castle_candidate(color, side).is_some() {
                    rights.insert(CastlingRights::flag(color, side));
                }
            }
        }
        rights
    }

    // -----------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------

    /// Check the invariants the engine relies on: one king per colour and
    /// the side not to move not standing in check.
    pub fn validate(&self) -> Result<(), ChessError> {
        for color in [Color::White, Color::Black] {
            let kings = self.board().count(color, PieceType::King);
            if kings != 1 {
                return Err(ChessError::InvalidState(format!(
                    "{color} has {kings} kings (expected 1)"
                )));
            }
        }
        let waiting = !self.side_to_move();
        if attacks::is_in_check(self.board(), waiting) {
            return Err(ChessError::InvalidState(format!(
                "{waiting} is in check but it is {} to move",
                self.side_to_move()
            )));
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // FEN
    // -----------------------------------------------------------------

    /// Parse a FEN string. History starts empty; the castling field becomes
    /// the origin rights.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let board = Board::from_fen_placement(fields[0])?;
        for color in [Color::White, Color::Black] {
            let kings = board.count(color, PieceType::King);
            if kings != 1 {
                return Err(ChessError::InvalidFen(format!(
                    "{color} has {kings} kings (expected 1)"
                )));
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        let castling_origin = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        let en_passant = if fields[3] == "-" {
            None
        } else {
            Some(parse_en_passant(&board, side_to_move, fields[3])?)
        };

        let halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;
        let fullmove_number = fields[5].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if fullmove_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        let position = Position {
            board,
            side_to_move,
            en_passant,
            halfmove_clock,
            fullmove_number,
        };
        if attacks::is_in_check(&position.board, !side_to_move) {
            return Err(ChessError::InvalidFen(format!(
                "side not to move ({}) is in check",
                !side_to_move
            )));
        }
        Ok(Self::from_position(position, castling_origin))
    }

    /// Export the position as a FEN string: placement, side to move,
    /// castling, en passant, half-move clock, full-move number.
    pub fn to_fen(&self) -> String {
        let pos = &self.position;
        let side = match pos.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = pos
            .en_passant
            .map(|ep| ep.target.to_algebraic())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            pos.board.to_fen_placement(),
            side,
            self.castling_rights().to_fen(),
            ep,
            pos.halfmove_clock,
            pos.fullmove_number
        )
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Resolve an en-passant field to the target plus the pawn that skipped it.
fn parse_en_passant(board: &Board, side_to_move: Color, field: &str) -> Result<EnPassant, ChessError> {
    let target = Square::from_algebraic(field)
        .ok_or_else(|| ChessError::InvalidFen(format!("invalid en passant square: '{field}'")))?;
    let pusher = !side_to_move;
    // The target sits one step behind the pawn, seen from the pusher.
    let expected_row = (pusher.pawn_row() as i8 + pusher.forward()) as u8;
    if target.row() != expected_row {
        return Err(ChessError::InvalidFen(format!(
            "en passant square {field} does not match the side to move"
        )));
    }
    let pawn_square = target
        .offset(0, pusher.forward())
        .ok_or_else(|| ChessError::InvalidFen(format!("invalid en passant square: '{field}'")))?;
    let pawn = board
        .piece_at(pawn_square)
        .filter(|p| p.is(pusher, PieceType::Pawn))
        .ok_or_else(|| {
            ChessError::InvalidFen(format!("no pawn in front of en passant square {field}"))
        })?;
    Ok(EnPassant {
        target,
        pawn,
        pawn_square,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
