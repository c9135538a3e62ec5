pub mod attacks;
pub mod board;
pub mod game;
pub mod movegen;
pub mod types;

pub use board::Board;
pub use game::{GameState, KingPositions, MoveRecord};
pub use movegen::legal_moves;
pub use types::*;
