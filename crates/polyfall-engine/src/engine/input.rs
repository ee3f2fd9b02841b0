use serde::{Deserialize, Serialize};

use crate::engine::game_manager::GameManager;

/// Key-repeat timing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputTiming {
    /// Delayed auto shift: how long a horizontal move key is held before it
    /// starts repeating.
    pub das_ms: u64,
    /// Auto repeat rate: period between repeated horizontal moves.
    pub arr_ms: u64,
    /// Soft drop interval: period between repeated soft drops.
    pub sdi_ms: u64,
}

impl Default for InputTiming {
    fn default() -> Self {
        Self {
            das_ms: 150,
            arr_ms: 30,
            sdi_ms: 50,
        }
    }
}

/// Logical game keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Key {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateLeft,
    RotateRight,
    Hold,
}

impl Key {
    pub const ALL: [Self; 7] = [
        Self::MoveLeft,
        Self::MoveRight,
        Self::SoftDrop,
        Self::HardDrop,
        Self::RotateLeft,
        Self::RotateRight,
        Self::Hold,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    const fn repeat(self) -> Repeat {
        match self {
            Self::MoveLeft | Self::MoveRight => Repeat::AutoShift,
            Self::SoftDrop => Repeat::SoftDrop,
            Self::HardDrop | Self::RotateLeft | Self::RotateRight | Self::Hold => Repeat::Never,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Repeat {
    AutoShift,
    SoftDrop,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyState {
    time_pressed_ms: u64,
    last_action_ms: u64,
}

/// Turns key presses and releases into game actions with auto-repeat.
///
/// A press acts immediately. While a horizontal move key stays down it repeats
/// every `arr_ms` once it has been held for `das_ms`; soft drop repeats every
/// `sdi_ms`. Rotations, hard drop and hold fire once per press.
///
/// # Example
///
/// ```
/// use polyfall_engine::{GameConfig, GameManager, InputHandler, Key};
///
/// let config = GameConfig::default();
/// let mut manager = GameManager::new(&config, 0);
/// let mut input = InputHandler::new(config.input);
///
/// let x = manager.game().current().origin().x();
/// input.on_key_down(&mut manager, Key::MoveRight, 0);
/// input.update(&mut manager, 100); // still inside the DAS window
/// assert_eq!(manager.game().current().origin().x(), x + 1);
///
/// input.update(&mut manager, 150);
/// assert_eq!(manager.game().current().origin().x(), x + 2);
/// ```
#[derive(Debug, Clone)]
pub struct InputHandler {
    timing: InputTiming,
    pressed: [Option<KeyState>; Key::ALL.len()],
}

impl InputHandler {
    #[must_use]
    pub fn new(timing: InputTiming) -> Self {
        Self {
            timing,
            pressed: [None; Key::ALL.len()],
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed[key.index()].is_some()
    }

    /// Records a press and performs the key's action.
    ///
    /// A repeated press of a key that is already down keeps its original press
    /// time, so host-side key repeat does not reset the DAS window.
    pub fn on_key_down(&mut self, manager: &mut GameManager, key: Key, now_ms: u64) {
        let state = self.pressed[key.index()].get_or_insert(KeyState {
            time_pressed_ms: now_ms,
            last_action_ms: 0,
        });
        state.last_action_ms = now_ms;
        _ = manager.perform(key);
    }

    pub fn on_key_up(&mut self, key: Key) {
        self.pressed[key.index()] = None;
    }

    /// Forgets every held key.
    pub fn release_all(&mut self) {
        self.pressed = [None; Key::ALL.len()];
    }

    /// Fires auto-repeat for every held key whose timer is due.
    ///
    /// At most one repeat per key is fired per call.
    pub fn update(&mut self, manager: &mut GameManager, now_ms: u64) {
        for key in Key::ALL {
            let Some(state) = &mut self.pressed[key.index()] else {
                continue;
            };
            let held = now_ms.saturating_sub(state.time_pressed_ms);
            let idle = now_ms.saturating_sub(state.last_action_ms);
            let due = match key.repeat() {
                Repeat::AutoShift => held >= self.timing.das_ms && idle >= self.timing.arr_ms,
                Repeat::SoftDrop => idle >= self.timing.sdi_ms,
                Repeat::Never => false,
            };
            if due {
                state.last_action_ms = now_ms;
                _ = manager.perform(key);
            }
        }
    }
}
