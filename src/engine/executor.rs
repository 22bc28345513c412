//! Move application.
//!
//! `execute` never touches the state it is given. It clones it, applies the
//! move to the clone (rook and king land in the same board write pass for
//! castling, the passed pawn disappears together with the capturing pawn's
//! relocation for en passant), runs the status evaluator and returns the
//! new state with the recorded move.
//!
//! Legality is not re-derived here: the caller owns that check.

use crate::engine::board::EnPassant;
use crate::engine::movegen;
use crate::engine::state::{GameState, HistoryEntry};
use crate::engine::status;
use crate::engine::types::{
    CastleSide, Color, Move, MoveFlags, MoveIntent, MoveKind, PieceType, Rejection, Square,
};

/// Apply `intent` to a copy of `state`.
///
/// Rejects only what bookkeeping cannot handle: an empty source square or a
/// promotion choice that does not fit the move.
pub fn execute(state: &GameState, intent: MoveIntent) -> Result<(GameState, Move), Rejection> {
    let MoveIntent { from, to, promotion } = intent;
    let piece = state.piece_at(from).ok_or(Rejection::NoPiece)?;
    let us = state.side_to_move();

    let promotes = piece.kind == PieceType::Pawn && to.row() == piece.color.promotion_row();
    let promote_to = match (promotes, promotion) {
        (true, None) => Some(PieceType::Queen),
        (true, Some(kind)) if kind.is_promotion_target() => Some(kind),
        (false, None) => None,
        _ => return Err(Rejection::InvalidPromotion),
    };

    let ep_victim = movegen::en_passant_victim(state, piece, from, to);
    let castle = castle_side(piece.kind, piece.color, from, to);
    let fingerprint_before = state.fingerprint();

    let mut next = state.clone();
    let board = &mut next.position.board;
    let mut flags = MoveFlags::NONE;

    // Whatever stands on the destination is captured; en passant takes the
    // pawn behind it instead.
    let mut captured = board.take(to);
    if let Some(victim) = ep_victim {
        captured = board.take(victim);
        flags |= MoveFlags::EN_PASSANT;
    }
    if captured.is_some() {
        flags |= MoveFlags::CAPTURE;
    }

    board.take(from);
    let landed = match promote_to {
        Some(kind) => {
            flags |= MoveFlags::PROMOTION;
            piece.promote(kind)
        }
        None => piece,
    };
    board.put(to, landed);

    if let Some(side) = castle {
        let row = piece.color.back_row();
        if let (Some(rook_from), Some(rook_to)) = (
            Square::new(side.rook_file(), row),
            Square::new(side.rook_to_file(), row),
        ) {
            board.relocate(rook_from, rook_to);
        }
        flags |= MoveFlags::CASTLING;
    }

    // En-passant target lives for exactly one reply.
    let fwd = piece.color.forward();
    let double_push = piece.kind == PieceType::Pawn
        && from.row() == piece.color.pawn_row()
        && to.file() == from.file()
        && to.row() as i8 == from.row() as i8 + 2 * fwd;
    next.position.en_passant = match from.offset(0, fwd) {
        Some(target) if double_push => {
            flags |= MoveFlags::DOUBLE_PUSH;
            Some(EnPassant {
                target,
                pawn: piece,
                pawn_square: to,
            })
        }
        _ => None,
    };

    if piece.kind == PieceType::Pawn || captured.is_some() {
        next.position.halfmove_clock = 0;
    } else {
        next.position.halfmove_clock = next.position.halfmove_clock.saturating_add(1);
    }
    if us == Color::Black {
        next.position.fullmove_number = next.position.fullmove_number.saturating_add(1);
    }
    next.position.side_to_move = !us;

    let mut mv = Move {
        from,
        to,
        piece,
        captured,
        promotion: promote_to,
        flags,
        kind: MoveKind::Normal,
    };
    // The entry must be in place before evaluation: castling availability
    // and repetition both read the history.
    next.history.push(HistoryEntry {
        mv,
        before: state.position.clone(),
        fingerprint_before,
    });
    next.redo_stack.clear();
    next.last_move = Some((from, to));
    next.selection = None;

    status::evaluate(&mut next);

    mv.kind = classify(&next, flags);
    if let Some(entry) = next.history.last_mut() {
        entry.mv.kind = mv.kind;
    }
    Ok((next, mv))
}

/// Take back the last recorded move. The move goes onto the redo stack.
pub fn undo(state: &GameState) -> Option<GameState> {
    let mut prev = state.clone();
    let entry = prev.history.pop()?;
    prev.position = entry.before;
    prev.redo_stack.push(entry.mv.intent());
    prev.last_move = prev.history.last().map(|e| (e.mv.from, e.mv.to));
    prev.selection = None;
    status::evaluate(&mut prev);
    Some(prev)
}

/// Replay the most recently undone move, keeping the rest of the redo
/// stack intact.
pub fn redo(state: &GameState) -> Option<Result<(GameState, Move), Rejection>> {
    let mut remaining = state.redo_stack.clone();
    let intent = remaining.pop()?;
    Some(execute(state, intent).map(|(mut next, mv)| {
        next.redo_stack = remaining;
        (next, mv)
    }))
}

/// The castling side when a king steps from its home square onto one of
/// the two castling destinations.
fn castle_side(kind: PieceType, color: Color, from: Square, to: Square) -> Option<CastleSide> {
    if kind != PieceType::King || from != movegen::home_square(color) || to.row() != from.row() {
        return None;
    }
    CastleSide::BOTH
        .into_iter()
        .find(|side| side.king_to_file() == to.file())
}

/// One tag per move, strongest first.
fn classify(after: &GameState, flags: MoveFlags) -> MoveKind {
    if after.checkmate {
        MoveKind::Checkmate
    } else if after.in_check(after.side_to_move()) {
        MoveKind::Check
    } else if flags.is_promotion() {
        MoveKind::Promotion
    } else if flags.is_castling() {
        MoveKind::Castle
    } else if flags.is_en_passant() {
        MoveKind::EnPassant
    } else if flags.is_capture() {
        MoveKind::Capture
    } else {
        MoveKind::Normal
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
