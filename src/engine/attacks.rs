//! Attack and check detection on a mailbox board.
//!
//! Everything here answers questions about a single board snapshot and is
//! independent of whose turn it is: callers say which colour attacks.

use crate::engine::board::Board;
use crate::engine::types::{Color, Piece, PieceType, Square};

/// (file, row) steps of a knight.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// (file, row) steps of a king.
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Orthogonal ray directions (rook, queen).
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Diagonal ray directions (bishop, queen).
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Is `sq` attacked by any piece of colour `by`?
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let holds = |target: Option<Square>, kind: PieceType| {
        target
            .and_then(|t| board.piece_at(t))
            .is_some_and(|p| p.is(by, kind))
    };

    // A pawn attacks diagonally forward, so look diagonally behind from the
    // attacker's point of view.
    let behind = -by.forward();
    if holds(sq.offset(-1, behind), PieceType::Pawn) || holds(sq.offset(1, behind), PieceType::Pawn)
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), PieceType::Knight))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), PieceType::King))
    {
        return true;
    }

    let slider_hits = |directions: &[(i8, i8)], kind: PieceType| {
        directions.iter().any(|&(df, dr)| {
            first_piece_on_ray(board, sq, df, dr)
                .is_some_and(|p| p.color == by && (p.kind == kind || p.kind == PieceType::Queen))
        })
    };

    slider_hits(&ROOK_DIRECTIONS, PieceType::Rook) || slider_hits(&BISHOP_DIRECTIONS, PieceType::Bishop)
}

/// Walk outward from `from` and return the first piece met, if any.
fn first_piece_on_ray(board: &Board, from: Square, df: i8, dr: i8) -> Option<Piece> {
    let mut cursor = from.offset(df, dr);
    while let Some(sq) = cursor {
        if let Some(piece) = board.piece_at(sq) {
            return Some(piece);
        }
        cursor = sq.offset(df, dr);
    }
    None
}

/// Square of the king of `color`, `None` when the board has none.
pub fn find_king(board: &Board, color: Color) -> Option<Square> {
    board
        .pieces()
        .find(|(_, p)| p.is(color, PieceType::King))
        .map(|(sq, _)| sq)
}

/// Square of the king of `color`. Reachable positions always have one.
pub(crate) fn king_square(board: &Board, color: Color) -> Square {
    find_king(board, color).expect("king must exist")
}

/// Is the king of `color` attacked on this board?
pub fn is_in_check(board: &Board, color: Color) -> bool {
    is_square_attacked(board, king_square(board, color), !color)
}

/// Would moving `piece` from `from` to `to` keep its own king safe?
///
/// The move is simulated as a bare relocation on a scratch copy; castling
/// needs nothing more because its transit squares are checked separately.
pub fn is_move_safe(board: &Board, piece: Piece, from: Square, to: Square) -> bool {
    simulate_safe(board, piece, from, to, None)
}

/// Like [`is_move_safe`], also lifting a piece captured off the landing
/// square (en passant), so that a pin along the rank is seen.
pub(crate) fn is_capture_safe(
    board: &Board,
    piece: Piece,
    from: Square,
    to: Square,
    captured_at: Square,
) -> bool {
    simulate_safe(board, piece, from, to, Some(captured_at))
}

fn simulate_safe(
    board: &Board,
    piece: Piece,
    from: Square,
    to: Square,
    captured_at: Option<Square>,
) -> bool {
    let mut scratch = board.clone();
    if let Some(sq) = captured_at {
        scratch.take(sq);
    }
    scratch.take(from);
    scratch.put(to, piece);
    match find_king(&scratch, piece.color) {
        Some(king) => !is_square_attacked(&scratch, king, !piece.color),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
