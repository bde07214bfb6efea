pub mod board;
pub mod game;
pub mod rules;
pub mod templates;
pub mod types;

pub use board::Board;
pub use game::Game;
pub use rules::{is_move_valid, legal_moves};
pub use types::*;
