//! Move generation.
//!
//! Pipeline:
//!   1. Pseudo-legal targets per piece type (geometry and occupancy).
//!   2. Filter: simulate the move on a scratch board and keep it only if the
//!      mover's king is not attacked afterwards.
//!
//! A third, unfiltered mode produces premove targets for a side that is not
//! on move. It looks at geometry only and is never used to apply a move.

use crate::engine::attacks::{
    self, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};
use crate::engine::board::Board;
use crate::engine::state::GameState;
use crate::engine::types::{CastleSide, Color, MoveIntent, Piece, PieceType, Square};

// =========================================================================
// Public API
// =========================================================================

/// Legal destinations for the piece on `from`, fully filtered for king
/// safety. Empty when the square is empty.
pub fn legal_targets(state: &GameState, from: Square) -> Vec<Square> {
    let Some(piece) = state.piece_at(from) else {
        return Vec::new();
    };
    let board = state.board();
    pseudo_legal_targets(state, from)
        .into_iter()
        .filter(|&to| match en_passant_victim(state, piece, from, to) {
            Some(victim) => attacks::is_capture_safe(board, piece, from, to, victim),
            None => attacks::is_move_safe(board, piece, from, to),
        })
        .collect()
}

/// Every legal move for the side to move. Pawn moves onto the last rank
/// are expanded into one intent per promotion piece.
pub fn legal_moves(state: &GameState) -> Vec<MoveIntent> {
    let us = state.side_to_move();
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in state.board().pieces_of(us) {
        for to in legal_targets(state, from) {
            if piece.kind == PieceType::Pawn && to.row() == us.promotion_row() {
                moves.extend(
                    PieceType::PROMOTIONS
                        .iter()
                        .map(|&promo| MoveIntent::with_promotion(from, to, promo)),
                );
            } else {
                moves.push(MoveIntent::new(from, to));
            }
        }
    }
    moves
}

/// Whether the side to move has at least one legal move.
pub fn has_legal_move(state: &GameState) -> bool {
    let us = state.side_to_move();
    state
        .board()
        .pieces_of(us)
        .any(|(from, _)| !legal_targets(state, from).is_empty())
}

/// Destinations by movement geometry and occupancy, before the king-safety
/// filter. Castling destinations are included when still permitted.
pub fn pseudo_legal_targets(state: &GameState, from: Square) -> Vec<Square> {
    let Some(piece) = state.piece_at(from) else {
        return Vec::new();
    };
    let board = state.board();
    let mut targets = Vec::with_capacity(28);
    match piece.kind {
        PieceType::Pawn => pawn_targets(state, piece, from, &mut targets),
        PieceType::Knight => step_targets(board, piece, from, &KNIGHT_OFFSETS, &mut targets),
        PieceType::Bishop => ray_targets(board, piece, from, &BISHOP_DIRECTIONS, &mut targets),
        PieceType::Rook => ray_targets(board, piece, from, &ROOK_DIRECTIONS, &mut targets),
        PieceType::Queen => {
            ray_targets(board, piece, from, &ROOK_DIRECTIONS, &mut targets);
            ray_targets(board, piece, from, &BISHOP_DIRECTIONS, &mut targets);
        }
        PieceType::King => {
            step_targets(board, piece, from, &KING_OFFSETS, &mut targets);
            castling_targets(state, piece.color, from, &mut targets);
        }
    }
    targets
}

/// Geometry-only destinations for a queued move: no occupancy, no check
/// filtering. Pawn diagonals are offered whether or not anything stands
/// there, and the king's castling squares whenever it is on its home square.
pub fn premove_targets(piece: Piece, from: Square) -> Vec<Square> {
    let mut targets = Vec::with_capacity(28);
    let steps = |offsets: &[(i8, i8)], targets: &mut Vec<Square>| {
        targets.extend(offsets.iter().filter_map(|&(df, dr)| from.offset(df, dr)));
    };
    match piece.kind {
        PieceType::Pawn => {
            let fwd = piece.color.forward();
            steps(&[(-1, fwd), (0, fwd), (1, fwd)], &mut targets);
            if from.row() == piece.color.pawn_row()
                && let Some(double) = from.offset(0, 2 * fwd)
            {
                targets.push(double);
            }
        }
        PieceType::Knight => steps(&KNIGHT_OFFSETS, &mut targets),
        PieceType::King => {
            steps(&KING_OFFSETS, &mut targets);
            if from == home_square(piece.color) {
                targets.extend(CastleSide::BOTH.iter().filter_map(|side| {
                    Square::new(side.king_to_file(), piece.color.back_row())
                }));
            }
        }
        PieceType::Bishop => open_rays(from, &BISHOP_DIRECTIONS, &mut targets),
        PieceType::Rook => open_rays(from, &ROOK_DIRECTIONS, &mut targets),
        PieceType::Queen => {
            open_rays(from, &ROOK_DIRECTIONS, &mut targets);
            open_rays(from, &BISHOP_DIRECTIONS, &mut targets);
        }
    }
    targets
}

/// Every square along each direction up to the edge of the board.
fn open_rays(from: Square, directions: &[(i8, i8)], targets: &mut Vec<Square>) {
    for &(df, dr) in directions {
        let mut cursor = from.offset(df, dr);
        while let Some(sq) = cursor {
            targets.push(sq);
            cursor = sq.offset(df, dr);
        }
    }
}

/// If moving `piece` from `from` to `to` is an en-passant capture, the
/// square of the pawn it removes.
pub fn en_passant_victim(state: &GameState, piece: Piece, from: Square, to: Square) -> Option<Square> {
    let ep = state.position.en_passant?;
    let eligible = piece.kind == PieceType::Pawn
        && piece.color != ep.pawn.color
        && to == ep.target
        && from.file().abs_diff(to.file()) == 1
        && state.piece_at(ep.pawn_square) == Some(ep.pawn);
    eligible.then_some(ep.pawn_square)
}

/// Square a king of `color` starts on.
pub fn home_square(color: Color) -> Square {
    Square::new(4, color.back_row()).expect("e-file back row is on the board")
}

// =========================================================================
// Pawn
// =========================================================================

fn pawn_targets(state: &GameState, piece: Piece, from: Square, targets: &mut Vec<Square>) {
    let board = state.board();
    let fwd = piece.color.forward();

    if let Some(one) = from.offset(0, fwd)
        && board.is_empty(one)
    {
        targets.push(one);
        if from.row() == piece.color.pawn_row()
            && let Some(two) = one.offset(0, fwd)
            && board.is_empty(two)
        {
            targets.push(two);
        }
    }

    for df in [-1, 1] {
        let Some(diag) = from.offset(df, fwd) else {
            continue;
        };
        match board.piece_at(diag) {
            Some(other) if other.color != piece.color => targets.push(diag),
            Some(_) => {}
            None => {
                if en_passant_victim(state, piece, from, diag).is_some() {
                    targets.push(diag);
                }
            }
        }
    }
}

// =========================================================================
// Steppers and sliders
// =========================================================================

/// Single-step destinations: on board and not held by a friendly piece.
fn step_targets(
    board: &Board,
    piece: Piece,
    from: Square,
    offsets: &[(i8, i8)],
    targets: &mut Vec<Square>,
) {
    targets.extend(
        offsets
            .iter()
            .filter_map(|&(df, dr)| from.offset(df, dr))
            .filter(|&to| board.piece_at(to).is_none_or(|p| p.color != piece.color)),
    );
}

/// Ray-cast along each direction, stopping before a friendly piece and on
/// an enemy piece.
fn ray_targets(
    board: &Board,
    piece: Piece,
    from: Square,
    directions: &[(i8, i8)],
    targets: &mut Vec<Square>,
) {
    for &(df, dr) in directions {
        let mut cursor = from.offset(df, dr);
        while let Some(sq) = cursor {
            match board.piece_at(sq) {
                None => targets.push(sq),
                Some(other) => {
                    if other.color != piece.color {
                        targets.push(sq);
                    }
                    break;
                }
            }
            cursor = sq.offset(df, dr);
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

fn castling_targets(state: &GameState, color: Color, from: Square, targets: &mut Vec<Square>) {
    let board = state.board();
    let them = !color;
    for side in CastleSide::BOTH {
        let Some((king_sq, rook_sq)) = state.castle_candidate(color, side) else {
            continue;
        };
        if king_sq != from {
            continue;
        }
        let row = color.back_row();
        let (lo, hi) = if rook_sq.file() < king_sq.file() {
            (rook_sq.file() + 1, king_sq.file())
        } else {
            (king_sq.file() + 1, rook_sq.file())
        };
        let path_clear = (lo..hi)
            .filter_map(|file| Square::new(file, row))
            .all(|sq| board.is_empty(sq));
        if !path_clear {
            continue;
        }

        // Start, transit and destination squares of the king.
        let dest_file = side.king_to_file();
        let (a, b) = if dest_file < king_sq.file() {
            (dest_file, king_sq.file())
        } else {
            (king_sq.file(), dest_file)
        };
        let king_path_safe = (a..=b)
            .filter_map(|file| Square::new(file, row))
            .all(|sq| !attacks::is_square_attacked(board, sq, them));
        if king_path_safe && let Some(dest) = Square::new(dest_file, row) {
            targets.push(dest);
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
