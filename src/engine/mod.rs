pub mod attacks;
pub mod board;
pub mod executor;
pub mod game;
pub mod movegen;
pub mod state;
pub mod status;
pub mod types;
pub mod zobrist;

pub use board::{Board, EnPassant, Position};
pub use game::{Game, MoveResult};
pub use movegen::{legal_moves, legal_targets, premove_targets};
pub use state::{GameState, HistoryEntry, STARTING_FEN, Selection};
pub use types::*;
