use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::family::{FamilyKind, PieceFamily},
    engine::{input::InputTiming, piece_factory::PieceSeed},
};

/// Default gravity period.
pub const DEFAULT_DROP_INTERVAL_MS: u64 = 1000;
/// Largest accepted board width or height.
pub const MAX_BOARD_SIZE: usize = 1024;

/// Session configuration.
///
/// Every field has a default, so a configuration file only needs the fields it
/// changes.
///
/// # Example
///
/// ```
/// use polyfall_engine::{FamilyKind, GameConfig};
///
/// let config: GameConfig =
///     serde_json::from_str(r#"{ "family": "pentomino", "input": { "dasMs": 120 } }"#).unwrap();
/// assert_eq!(config.family, FamilyKind::Pentomino);
/// assert_eq!(config.input.das_ms, 120);
/// assert_eq!(config.input.arr_ms, 30);
/// assert_eq!(config.board_width, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub family: FamilyKind,
    pub drop_interval_ms: u64,
    /// Fixed seed for the piece supply. `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<PieceSeed>,
    pub input: InputTiming,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            family: FamilyKind::default(),
            drop_interval_ms: DEFAULT_DROP_INTERVAL_MS,
            seed: None,
            input: InputTiming::default(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn family(&self) -> &'static PieceFamily {
        self.family.family()
    }

    /// Checks the values serde cannot rule out on its own.
    ///
    /// [`Game::new`](crate::Game::new) expects a configuration that passes
    /// this check.
    ///
    /// ```
    /// use polyfall_engine::{ConfigError, GameConfig};
    ///
    /// assert_eq!(GameConfig::default().validate(), Ok(()));
    ///
    /// let config = GameConfig { board_width: 0, ..GameConfig::default() };
    /// assert!(matches!(config.validate(), Err(ConfigError::BoardSize { width: 0, .. })));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let side_ok = |n: usize| (1..=MAX_BOARD_SIZE).contains(&n);
        if !side_ok(self.board_width) || !side_ok(self.board_height) {
            return Err(ConfigError::BoardSize {
                width: self.board_width,
                height: self.board_height,
                max: MAX_BOARD_SIZE,
            });
        }
        Ok(())
    }
}
