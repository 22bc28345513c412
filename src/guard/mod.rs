pub mod dedupe;
pub mod dispatcher;
pub mod service;

pub use dedupe::{Dedupe, Mark};
pub use dispatcher::{DispatchError, MoveDispatcher, Submission};
pub use service::{GuardedGame, MoveSource};
