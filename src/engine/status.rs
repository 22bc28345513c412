//! Game status evaluation.
//!
//! Run once per completed move (and after undo or a state load). It stamps
//! both check flags and settles whether the side to move is mated,
//! stalemated or drawn by rule. Fifty-move and threefold draws are
//! recorded for the players to claim; only a dead position ends the game.

use crate::engine::attacks;
use crate::engine::movegen;
use crate::engine::state::GameState;
use crate::engine::types::{Color, DrawReason, PieceType};

/// Recompute every status field of `state` from its board and history.
pub fn evaluate(state: &mut GameState) {
    let board = state.board();
    let (white, black) = (
        attacks::is_in_check(board, Color::White),
        attacks::is_in_check(board, Color::Black),
    );
    state.white_in_check = white;
    state.black_in_check = black;

    state.checkmate = false;
    state.stalemate = false;
    state.winner = None;
    state.draw = None;

    let us = state.side_to_move();
    if !movegen::has_legal_move(state) {
        if state.in_check(us) {
            state.checkmate = true;
            state.winner = Some(!us);
        } else {
            state.stalemate = true;
        }
        return;
    }
    state.draw = draw_reason(state);
}

/// Draw by rule, checked cheapest first.
pub fn draw_reason(state: &GameState) -> Option<DrawReason> {
    if state.position.halfmove_clock >= 100 {
        Some(DrawReason::FiftyMoveRule)
    } else if is_threefold_repetition(state) {
        Some(DrawReason::ThreefoldRepetition)
    } else if is_insufficient_material(state) {
        Some(DrawReason::InsufficientMaterial)
    } else {
        None
    }
}

/// The current position has occurred at least twice before.
fn is_threefold_repetition(state: &GameState) -> bool {
    let current = state.fingerprint();
    let earlier = state
        .history
        .iter()
        .filter(|entry| entry.fingerprint_before == current)
        .count();
    earlier + 1 >= 3
}

/// K v K, K+minor v K, K+B v K+B with both bishops on one square colour.
fn is_insufficient_material(state: &GameState) -> bool {
    let board = state.board();
    let mut minors = [0usize; 2];
    let mut bishop_shades = [None::<u8>; 2];

    for (sq, piece) in board.pieces() {
        match piece.kind {
            PieceType::King => {}
            PieceType::Pawn | PieceType::Rook | PieceType::Queen => return false,
            PieceType::Knight => minors[piece.color.index()] += 1,
            PieceType::Bishop => {
                minors[piece.color.index()] += 1;
                bishop_shades[piece.color.index()] = Some((sq.file() + sq.row()) & 1);
            }
        }
    }

    match (minors[0], minors[1]) {
        (0, 0) | (1, 0) | (0, 1) => true,
        (1, 1) => match (bishop_shades[0], bishop_shades[1]) {
            (Some(w), Some(b)) => w == b,
            _ => false,
        },
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
