//! Piece supply, the game engine and the layers the host talks to.
//!
//! - [`PieceFactory`] builds pieces and supplies them from a shuffled bag
//! - [`Game`] owns the board and the active piece and applies every action
//! - [`GameManager`] gates the engine behind the menu / play / game-over modes
//! - [`InputHandler`] turns key presses into actions with auto-repeat

pub use self::{config::*, game::*, game_manager::*, input::*, piece_factory::*};

pub(crate) mod config;
pub(crate) mod game;
pub(crate) mod game_manager;
pub(crate) mod input;
pub(crate) mod piece_factory;
