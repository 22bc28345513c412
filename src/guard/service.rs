//! A `Game` behind the move dispatcher.
//!
//! Every move, whatever its origin (local input, a replayed network echo,
//! an external suggestion), goes through [`GuardedGame::submit`]. The key of
//! a submission is the fingerprint of the currently published position
//! plus the move in long algebraic notation, so the same move requested
//! twice for the same position runs once.
//!
//! Undo, redo, reset and state loads go through the same queue, so the
//! dispatcher stays the only place the game is ever mutated.

use std::convert::Infallible;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::{Mutex, watch};
use tracing::debug;

use crate::config::GuardConfig;
use crate::engine::{
    ChessError, Game, GameState, MoveIntent, MoveResult, PieceType, Square, legal_targets,
};
use crate::guard::dedupe::Dedupe;
use crate::guard::dispatcher::{DispatchError, MoveDispatcher, Submission};

// ---------------------------------------------------------------------------
// MoveSource
// ---------------------------------------------------------------------------

/// Something that proposes a move for a position, e.g. a remote engine.
/// It may take arbitrarily long; its answer is re-validated before it is
/// applied.
pub trait MoveSource: Send + Sync {
    /// Suggest a move in long algebraic notation for the FEN position.
    fn suggest(&self, fen: &str) -> BoxFuture<'_, Result<String, ChessError>>;

    /// Human-readable name of the source.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// GuardedGame
// ---------------------------------------------------------------------------

pub struct GuardedGame {
    id: String,
    game: Arc<Mutex<Game>>,
    published: Arc<watch::Sender<GameState>>,
    dispatcher: MoveDispatcher,
}

impl GuardedGame {
    /// Wrap `game`; spawns the dispatcher worker on the current runtime.
    pub fn new(game: Game, config: &GuardConfig) -> Self {
        let id = game.id.clone();
        let (published, _) = watch::channel(game.state());
        let dedupe = Arc::new(Dedupe::new(config.dedupe_ttl()));
        GuardedGame {
            id,
            game: Arc::new(Mutex::new(game)),
            published: Arc::new(published),
            dispatcher: MoveDispatcher::new(dedupe),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The last published state.
    pub fn current(&self) -> GameState {
        self.published.borrow().clone()
    }

    /// Receive every state published after an accepted move.
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.published.subscribe()
    }

    pub fn dedupe(&self) -> &Arc<Dedupe> {
        self.dispatcher.dedupe()
    }

    /// Dedupe key for a move or command against a given position.
    pub fn submission_key(state: &GameState, action: &str) -> String {
        format!("{:016x}:{}", state.fingerprint(), action)
    }

    /// Canonical text of a move for keying: a promotion without an explicit
    /// choice is spelled as the queen promotion it becomes.
    fn move_key(state: &GameState, intent: MoveIntent) -> String {
        let promotes = state.piece_at(intent.from).is_some_and(|piece| {
            piece.kind == PieceType::Pawn && intent.to.row() == piece.color.promotion_row()
        });
        let intent = match intent.promotion {
            None if promotes => MoveIntent::with_promotion(intent.from, intent.to, PieceType::Queen),
            _ => intent,
        };
        Self::submission_key(state, &intent.to_string())
    }

    /// Legal destinations from `from` in the last published state.
    pub fn valid_moves(&self, from: Square) -> Vec<Square> {
        let state = self.current();
        if state.is_game_over() {
            return Vec::new();
        }
        match state.piece_at(from) {
            Some(piece) if piece.color == state.side_to_move() => legal_targets(&state, from),
            _ => Vec::new(),
        }
    }

    /// Submit a move. Resolves to `Ok(None)` if the same move for the same
    /// position is already in flight or was just submitted.
    pub fn submit(&self, intent: MoveIntent) -> Submission<MoveResult> {
        let key = Self::move_key(&self.current(), intent);
        self.run(key, move |game| game.apply(intent))
    }

    pub fn submit_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Submission<MoveResult> {
        self.submit(MoveIntent {
            from,
            to,
            promotion,
        })
    }

    /// Submit a move in long algebraic notation. Spelling variants of one
    /// move (`e7e8q`, `e7e8=Q`) share a key. Malformed text is still queued
    /// and comes back as a rejected `MoveResult`.
    pub fn submit_lan(&self, lan: &str) -> Submission<MoveResult> {
        let lan = lan.trim();
        if let Some(intent) = MoveIntent::from_lan(lan) {
            return self.submit(intent);
        }
        let lan = lan.to_string();
        let key = Self::submission_key(&self.current(), &lan);
        self.run(key, move |game| game.play_lan(&lan))
    }

    /// Take back the last move.
    pub fn submit_undo(&self) -> Submission<GameState> {
        self.run_command("undo", Game::try_undo)
    }

    /// Replay the last undone move.
    pub fn submit_redo(&self) -> Submission<GameState> {
        self.run_command("redo", Game::try_redo)
    }

    /// Back to the starting position.
    pub fn submit_reset(&self) -> Submission<GameState> {
        self.run_command("reset", |game| {
            game.reset();
            Ok(game.state())
        })
    }

    /// Replace the game state, e.g. with a stored snapshot. An invalid
    /// state fails the task and leaves the game as it was.
    pub fn submit_set_state(&self, state: GameState) -> Submission<GameState> {
        let action = format!("load:{:016x}", state.fingerprint());
        self.run_command(&action, move |game| {
            game.set_state(state)?;
            Ok(game.state())
        })
    }

    /// Ask `source` for a move on the current position and submit it. The
    /// position may change while the source thinks; the suggestion is then
    /// judged against whatever is current when its turn in the queue comes.
    pub async fn request_suggestion<S>(
        &self,
        source: &S,
    ) -> Result<Option<MoveResult>, DispatchError>
    where
        S: MoveSource + ?Sized,
    {
        let fen = self.current().to_fen();
        let lan = source
            .suggest(&fen)
            .await
            .map_err(|error| DispatchError::Source {
                name: source.name().to_string(),
                error,
            })?;
        debug!(game_id = %self.id, source = source.name(), %lan, "move suggested");
        self.submit_lan(&lan).await
    }

    /// Run `f` on the game under the dispatcher and publish the resulting
    /// state when the move was accepted.
    fn run<F>(&self, key: String, f: F) -> Submission<MoveResult>
    where
        F: FnOnce(&mut Game) -> MoveResult + Send + 'static,
    {
        let game = Arc::clone(&self.game);
        let published = Arc::clone(&self.published);
        self.dispatcher.enqueue(key, move || async move {
            let mut game = game.lock().await;
            let result = f(&mut *game);
            if result.is_valid() {
                published.send_replace(result.state.clone());
            }
            Ok::<_, Infallible>(result)
        })
    }

    /// Run a non-move command on the game under the dispatcher and publish
    /// the state it produced.
    fn run_command<F>(&self, action: &str, f: F) -> Submission<GameState>
    where
        F: FnOnce(&mut Game) -> Result<GameState, ChessError> + Send + 'static,
    {
        let key = Self::submission_key(&self.current(), action);
        let game = Arc::clone(&self.game);
        let published = Arc::clone(&self.published);
        let id = self.id.clone();
        let action = action.to_string();
        self.dispatcher.enqueue(key, move || async move {
            let mut game = game.lock().await;
            let state = f(&mut *game)?;
            debug!(game_id = %id, %action, fen = %state.to_fen(), "command applied");
            published.send_replace(state.clone());
            Ok::<_, ChessError>(state)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
