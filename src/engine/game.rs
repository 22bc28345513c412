//! Stateful game controller wrapping GameState.
//!
//! `Game` owns exactly one current `GameState` and replaces it wholesale on
//! every accepted move, undo, redo or load. It is the primary type callers
//! interact with; everything below it is pure functions over snapshots.

use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::executor;
use crate::engine::movegen;
use crate::engine::state::{GameState, Selection};
use crate::engine::status;
use crate::engine::types::{
    ChessError, Color, GameStatus, Move, MoveIntent, MoveKind, Piece, PieceType, Rejection,
    Square,
};

// =========================================================================
// MoveResult
// =========================================================================

/// Outcome of a move request. A rejected request carries the unchanged
/// state and the reason; it is not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveResult {
    pub state: GameState,
    pub mv: Option<Move>,
    pub rejection: Option<Rejection>,
}

impl MoveResult {
    fn accepted(state: GameState, mv: Move) -> Self {
        MoveResult {
            state,
            mv: Some(mv),
            rejection: None,
        }
    }

    fn rejected(state: GameState, reason: Rejection) -> Self {
        MoveResult {
            state,
            mv: None,
            rejection: Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.mv.is_some()
    }

    pub fn move_kind(&self) -> Option<MoveKind> {
        self.mv.map(|mv| mv.kind)
    }
}

// =========================================================================
// Game
// =========================================================================

/// A chess game with history, undo/redo and status tracking.
#[derive(Clone, Debug)]
pub struct Game {
    pub id: String,
    state: GameState,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::with_state(GameState::initial())
    }

    /// Create a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Ok(Self::with_state(GameState::from_fen(fen)?))
    }

    fn with_state(state: GameState) -> Self {
        Game {
            id: Uuid::new_v4().to_string(),
            state,
        }
    }

    // -----------------------------------------------------------------
    // State access
    // -----------------------------------------------------------------

    /// A copy of the current state.
    pub fn state(&self) -> GameState {
        self.state.clone()
    }

    /// Borrow the current state without copying.
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    /// Replace the current state wholesale, e.g. to rehydrate a stored
    /// snapshot. Status flags are recomputed from the board.
    pub fn set_state(&mut self, state: GameState) -> Result<(), ChessError> {
        state.validate()?;
        let mut state = state;
        status::evaluate(&mut state);
        debug!(game_id = %self.id, fen = %state.to_fen(), "state replaced");
        self.state = state;
        Ok(())
    }

    /// Back to the starting position; history and redo stack are dropped.
    pub fn reset(&mut self) {
        debug!(game_id = %self.id, "game reset");
        self.state = GameState::initial();
    }

    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Current position as FEN.
    pub fn to_fen(&self) -> String {
        self.state.to_fen()
    }

    /// Fingerprint of the current position.
    pub fn fingerprint(&self) -> u64 {
        self.state.fingerprint()
    }

    /// 8×8 identifier grid, rank 8 first; empty squares are empty strings.
    pub fn board_array(&self) -> [[String; 8]; 8] {
        self.state.board().to_array()
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.state.piece_at(sq)
    }

    /// Piece on a square given in algebraic notation. Malformed notation
    /// reads as an empty square.
    pub fn piece_at_notation(&self, notation: &str) -> Option<Piece> {
        Square::from_algebraic(notation).and_then(|sq| self.piece_at(sq))
    }

    /// Legal destinations for `piece` standing on `from`. Empty when the
    /// piece is not there, is not on move, or the game is over.
    pub fn valid_moves(&self, piece: Piece, from: Square) -> Vec<Square> {
        if self.state.is_game_over()
            || piece.color != self.side_to_move()
            || self.piece_at(from) != Some(piece)
        {
            return Vec::new();
        }
        movegen::legal_targets(&self.state, from)
    }

    /// Legal destinations from a square, as notation strings.
    pub fn valid_move_notations(&self, from: &str) -> Vec<String> {
        let Some(sq) = Square::from_algebraic(from) else {
            return Vec::new();
        };
        let Some(piece) = self.piece_at(sq) else {
            return Vec::new();
        };
        self.valid_moves(piece, sq)
            .into_iter()
            .map(Square::to_algebraic)
            .collect()
    }

    /// Geometry-only destinations for queueing a move out of turn. Never
    /// used to decide whether a move is applied.
    pub fn premove_moves(&self, piece: Piece, from: Square) -> Vec<Square> {
        movegen::premove_targets(piece, from)
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> Vec<MoveIntent> {
        if self.state.is_game_over() {
            return Vec::new();
        }
        movegen::legal_moves(&self.state)
    }

    // -----------------------------------------------------------------
    // Selection hint
    // -----------------------------------------------------------------

    /// Select a square for move hints. Only a piece of the side to move
    /// can be selected; anything else clears the selection. Like every other
    /// change, the hint produces a new state rather than editing the old.
    pub fn select(&mut self, sq: Square) -> Option<Selection> {
        let selection = match self.piece_at(sq) {
            Some(piece) if piece.color == self.side_to_move() => Some(Selection {
                square: sq,
                targets: self.valid_moves(piece, sq),
            }),
            _ => None,
        };
        self.replace_selection(selection.clone());
        selection
    }

    pub fn clear_selection(&mut self) {
        self.replace_selection(None);
    }

    fn replace_selection(&mut self, selection: Option<Selection>) {
        self.state = GameState {
            selection,
            ..self.state()
        };
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Play `from` → `to`. A pawn reaching the last rank becomes a queen.
    pub fn make_move(&mut self, from: Square, to: Square) -> MoveResult {
        self.apply(MoveIntent::new(from, to))
    }

    /// Play a move with an explicit promotion choice.
    pub fn make_move_with_promotion(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> MoveResult {
        self.apply(MoveIntent {
            from,
            to,
            promotion,
        })
    }

    /// Play a move given as two notation strings.
    pub fn make_move_notation(&mut self, from: &str, to: &str) -> MoveResult {
        match (Square::from_algebraic(from), Square::from_algebraic(to)) {
            (Some(from), Some(to)) => self.make_move(from, to),
            _ => self.reject(Rejection::InvalidSquare, from, to),
        }
    }

    /// Play a move in long algebraic notation (`e2e4`, `e7e8q`), as an
    /// external move source would supply it.
    pub fn play_lan(&mut self, lan: &str) -> MoveResult {
        match MoveIntent::from_lan(lan) {
            Some(intent) => self.apply(intent),
            None => self.reject(Rejection::MalformedMove, lan, ""),
        }
    }

    /// Validate and apply a move. The request is checked against the
    /// current legal destinations every time; the executor is only reached
    /// with a move that is legal right now.
    pub fn apply(&mut self, intent: MoveIntent) -> MoveResult {
        let from = intent.from.to_algebraic();
        let to = intent.to.to_algebraic();

        if self.state.is_game_over() {
            return self.reject(Rejection::GameOver, &from, &to);
        }
        let Some(piece) = self.piece_at(intent.from) else {
            return self.reject(Rejection::NoPiece, &from, &to);
        };
        if piece.color != self.side_to_move() {
            return self.reject(Rejection::WrongTurn, &from, &to);
        }
        if !movegen::legal_targets(&self.state, intent.from).contains(&intent.to) {
            return self.reject(Rejection::IllegalDestination, &from, &to);
        }

        match executor::execute(&self.state, intent) {
            Ok((next, mv)) => {
                debug!(game_id = %self.id, %from, %to, kind = %mv.kind, "move applied");
                self.state = next;
                self.log_game_end();
                MoveResult::accepted(self.state(), mv)
            }
            Err(reason) => self.reject(reason, &from, &to),
        }
    }

    fn reject(&self, reason: Rejection, from: &str, to: &str) -> MoveResult {
        debug!(game_id = %self.id, from, to, reason = %reason, "move rejected");
        MoveResult::rejected(self.state(), reason)
    }

    fn log_game_end(&self) {
        let status = self.state.status();
        if status.is_game_over() {
            info!(
                game_id = %self.id,
                status = %status,
                winner = ?self.state.winner,
                fen = %self.state.to_fen(),
                "game over"
            );
        }
    }

    // -----------------------------------------------------------------
    // Undo / redo
    // -----------------------------------------------------------------

    /// Take back the last move. Returns the new current state.
    pub fn try_undo(&mut self) -> Result<GameState, ChessError> {
        let prev = executor::undo(&self.state).ok_or(ChessError::NothingToUndo)?;
        debug!(game_id = %self.id, redo_depth = prev.redo_stack.len(), "move undone");
        self.state = prev;
        Ok(self.state())
    }

    /// Replay the last undone move. Returns the new current state.
    pub fn try_redo(&mut self) -> Result<GameState, ChessError> {
        let (next, mv) = match executor::redo(&self.state) {
            None => return Err(ChessError::NothingToRedo),
            Some(Err(reason)) => {
                return Err(ChessError::InvalidState(format!(
                    "redo rejected: {reason}"
                )));
            }
            Some(Ok(replayed)) => replayed,
        };
        debug!(game_id = %self.id, mv = %mv, "move redone");
        self.state = next;
        self.log_game_end();
        Ok(self.state())
    }

    /// Undo, returning the current state unchanged when there is nothing
    /// to take back.
    pub fn undo_move(&mut self) -> GameState {
        self.try_undo().unwrap_or_else(|_| self.state())
    }

    /// Redo, returning the current state unchanged when there is nothing
    /// to replay.
    pub fn redo_move(&mut self) -> GameState {
        self.try_redo().unwrap_or_else(|_| self.state())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::STARTING_FEN;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn play(g: &mut Game, from: &str, to: &str) -> MoveResult {
        let result = g.make_move_notation(from, to);
        assert!(result.is_valid(), "{from}{to} rejected: {:?}", result.rejection);
        result
    }

    // -----------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------

    #[test]
    fn new_game_is_active() {
        let g = Game::new();
        assert_eq!(g.status(), GameStatus::Active);
        assert!(!g.is_game_over());
        assert_eq!(g.to_fen(), STARTING_FEN);
        assert_eq!(g.legal_moves().len(), 20);
        assert!(Uuid::parse_str(&g.id).is_ok());
    }

    #[test]
    fn game_from_fen() {
        let g = Game::from_fen("4k3/8/8/8/8/8/8/4K2R b K - 3 30").unwrap();
        assert_eq!(g.side_to_move(), Color::Black);
        assert_eq!(g.to_fen(), "4k3/8/8/8/8/8/8/4K2R b K - 3 30");
    }

    #[test]
    fn game_from_invalid_fen() {
        assert!(matches!(
            Game::from_fen("not a fen"),
            Err(ChessError::InvalidFen(_))
        ));
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    #[test]
    fn make_move_e2e4() {
        let mut g = Game::new();
        let result = play(&mut g, "e2", "e4");
        assert_eq!(result.move_kind(), Some(MoveKind::Normal));
        assert_eq!(result.state, g.state());
        assert_eq!(g.side_to_move(), Color::Black);
        assert_eq!(g.piece_at_notation("e2"), None);
        assert!(g.piece_at_notation("e4").is_some());
    }

    #[test]
    fn rejections_leave_state_unchanged() {
        let mut g = Game::new();
        let before = g.state();

        let cases = [
            (g.make_move_notation("e3", "e4"), Rejection::NoPiece),
            (g.make_move_notation("e7", "e5"), Rejection::WrongTurn),
            (g.make_move_notation("e2", "e5"), Rejection::IllegalDestination),
            (g.make_move_notation("z9", "e4"), Rejection::InvalidSquare),
            (g.play_lan("e2"), Rejection::MalformedMove),
        ];
        for (result, reason) in cases {
            assert!(!result.is_valid());
            assert_eq!(result.rejection, Some(reason));
            assert_eq!(result.state, before);
        }
        assert_eq!(g.state(), before);
    }

    #[test]
    fn make_move_on_finished_game_is_rejected() {
        let mut g = Game::new();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            play(&mut g, from, to);
        }
        assert_eq!(g.status(), GameStatus::Checkmate);
        let result = g.make_move_notation("a2", "a3");
        assert_eq!(result.rejection, Some(Rejection::GameOver));
        assert!(g.legal_moves().is_empty());
    }

    #[test]
    fn play_continues_past_fifty_move_mark() {
        let mut g = Game::from_fen("4k3/8/8/8/8/8/4P3/4K2R w - - 100 80").unwrap();
        assert_eq!(
            g.status(),
            GameStatus::Draw(crate::engine::types::DrawReason::FiftyMoveRule)
        );
        assert!(!g.is_game_over());
        assert_eq!(g.valid_move_notations("e2"), ["e3", "e4"]);
        assert!(!g.legal_moves().is_empty());

        let result = g.make_move_notation("e2", "e4");
        assert!(result.is_valid(), "{:?}", result.rejection);
        assert_eq!(g.status(), GameStatus::Active);
    }

    #[test]
    fn promotion_choice() {
        let mut g = Game::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let result = g.make_move_with_promotion(sq("e7"), sq("e8"), Some(PieceType::Rook));
        assert!(result.is_valid());
        assert_eq!(g.piece_at(sq("e8")).unwrap().kind, PieceType::Rook);
        assert_eq!(g.state().history[0].mv.promotion, Some(PieceType::Rook));
    }

    #[test]
    fn play_lan_promotion() {
        let mut g = Game::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(g.play_lan("e7e8b").is_valid());
        assert_eq!(g.piece_at(sq("e8")).unwrap().to_string(), "wP1=B");
    }

    // -----------------------------------------------------------------
    // Valid / premove moves
    // -----------------------------------------------------------------

    #[test]
    fn valid_moves_need_matching_piece() {
        let g = Game::new();
        let pawn = g.piece_at(sq("e2")).unwrap();
        assert_eq!(g.valid_moves(pawn, sq("e2")), vec![sq("e3"), sq("e4")]);
        // Wrong square for that piece.
        assert!(g.valid_moves(pawn, sq("d2")).is_empty());
        // Black is not on move.
        let black = g.piece_at(sq("e7")).unwrap();
        assert!(g.valid_moves(black, sq("e7")).is_empty());
        assert_eq!(g.valid_move_notations("g1"), ["f3", "h3"]);
        assert!(g.valid_move_notations("x1").is_empty());
    }

    #[test]
    fn premove_for_side_not_on_move() {
        let g = Game::new();
        let black_knight = g.piece_at(sq("g8")).unwrap();
        let mut targets: Vec<_> = g
            .premove_moves(black_knight, sq("g8"))
            .into_iter()
            .map(Square::to_algebraic)
            .collect();
        targets.sort();
        // e7 is occupied by a black pawn; premove does not care.
        assert_eq!(targets, ["e7", "f6", "h6"]);
    }

    // -----------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------

    #[test]
    fn select_piece_and_clear() {
        let mut g = Game::new();
        let selection = g.select(sq("b1")).unwrap();
        assert_eq!(selection.square, sq("b1"));
        assert_eq!(selection.targets.len(), 2);
        assert_eq!(g.state().selection, Some(selection));

        assert!(g.select(sq("b8")).is_none());
        assert!(g.select(sq("e4")).is_none());

        g.select(sq("b1"));
        play(&mut g, "b1", "c3");
        assert_eq!(g.state().selection, None);

        g.select(sq("g8"));
        g.clear_selection();
        assert_eq!(g.state().selection, None);
    }

    #[test]
    fn selection_touches_nothing_else() {
        let mut g = Game::new();
        let before = g.state();
        g.select(sq("g1"));
        let after = g.state();
        assert_eq!(before.selection, None);
        assert!(after.selection.is_some());
        assert_eq!(
            GameState {
                selection: None,
                ..after
            },
            before
        );
    }

    // -----------------------------------------------------------------
    // Undo / redo
    // -----------------------------------------------------------------

    #[test]
    fn undo_and_redo() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        play(&mut g, "e7", "e5");
        let after_two = g.to_fen();

        let s = g.undo_move();
        assert_eq!(s.history.len(), 1);
        let s = g.undo_move();
        assert_eq!(s.to_fen(), STARTING_FEN);
        assert!(matches!(g.try_undo(), Err(ChessError::NothingToUndo)));
        // Plain undo on an empty history is a no-op.
        assert_eq!(g.undo_move().to_fen(), STARTING_FEN);

        g.redo_move();
        let s = g.redo_move();
        assert_eq!(s.to_fen(), after_two);
        assert!(matches!(g.try_redo(), Err(ChessError::NothingToRedo)));
    }

    #[test]
    fn new_move_discards_redo() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        g.undo_move();
        play(&mut g, "d2", "d4");
        assert!(matches!(g.try_redo(), Err(ChessError::NothingToRedo)));
    }

    // -----------------------------------------------------------------
    // Set state / reset
    // -----------------------------------------------------------------

    #[test]
    fn set_state_validates_kings() {
        let mut g = Game::new();
        let mut broken = g.state();
        broken.position.board.take(sq("e1"));
        assert!(matches!(
            g.set_state(broken),
            Err(ChessError::InvalidState(_))
        ));
        assert_eq!(g.to_fen(), STARTING_FEN);
    }

    #[test]
    fn set_state_restamps_flags() {
        let mut g = Game::new();
        let mut state = GameState::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
        state.white_in_check = false;
        g.set_state(state).unwrap();
        assert_eq!(g.status(), GameStatus::Check);
    }

    #[test]
    fn reset_restores_start() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        g.reset();
        assert_eq!(g.to_fen(), STARTING_FEN);
        assert!(g.state().history.is_empty());
    }

    #[test]
    fn board_array_starting_position() {
        let g = Game::new();
        let arr = g.board_array();
        assert_eq!(arr[0][4], "bK");
        assert_eq!(arr[7][0], "wR1");
        assert_eq!(arr[6][3], "wP4");
        assert_eq!(arr[4][4], "");
    }
}
