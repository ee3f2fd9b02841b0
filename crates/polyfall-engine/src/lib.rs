//! Falling-block puzzle engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - pieces, piece families and the board (pure data + geometry)
//! - [`engine`] - piece supply, the game engine, the top-level mode switch and
//!   the key-repeat input layer
//!
//! Everything is single-threaded and tick-driven: the host owns a monotonic
//! clock and passes the current time in milliseconds to every timed call.
//!
//! # Example
//!
//! ```
//! use polyfall_engine::{GameConfig, GameManager, InputHandler, Key};
//!
//! let config = GameConfig::default();
//! let mut manager = GameManager::new(&config, 0);
//! let mut input = InputHandler::new(config.input);
//!
//! input.on_key_down(&mut manager, Key::MoveLeft, 10);
//! input.on_key_up(Key::MoveLeft);
//! manager.update(1000);
//!
//! assert!(manager.mode().is_play());
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// The piece could not be placed at the requested position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board")]
pub struct PieceCollisionError;

/// The factory was asked for a kind its family does not register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown piece type '{kind}' for the {family} family")]
pub struct UnknownPieceTypeError {
    pub kind: PieceKind,
    pub family: &'static str,
}

/// A configuration value the engine cannot run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board size {width}x{height} is out of range, each side must be 1..={max}")]
    BoardSize {
        width: usize,
        height: usize,
        max: usize,
    },
}

/// Why a player action was not applied.
///
/// None of these are fatal: the caller normally just drops the error.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum ActionError {
    #[display("game is not in play")]
    NotPlaying,
    #[display("game is over")]
    GameOver,
    #[display("piece colliding with the board")]
    PieceCollision,
    #[display("hold already used for this piece")]
    HoldAlreadyUsed,
}

impl From<PieceCollisionError> for ActionError {
    fn from(_: PieceCollisionError) -> Self {
        ActionError::PieceCollision
    }
}
