use crate::{
    ActionError,
    core::{board::Board, piece::Piece},
    engine::{
        config::GameConfig,
        game::{Game, LockOutcome},
        input::Key,
    },
};

/// Columns of the reference display grid: the board plus side panels.
pub const DISPLAY_COLUMNS: u32 = 16;
/// Rows of the reference display grid: the board plus a margin.
pub const DISPLAY_ROWS: u32 = 22;

/// Largest block size that fits the reference display grid in a window.
///
/// Never returns less than 1.
///
/// ```
/// use polyfall_engine::fit_block_size;
///
/// assert_eq!(fit_block_size(800, 600), 27);
/// assert_eq!(fit_block_size(160, 2200), 10);
/// assert_eq!(fit_block_size(0, 0), 1);
/// ```
#[must_use]
pub fn fit_block_size(window_width: u32, window_height: u32) -> u32 {
    fit_block_size_in(window_width, window_height, DISPLAY_COLUMNS, DISPLAY_ROWS)
}

/// Largest block size that fits a `columns` x `rows` grid of blocks in a
/// window. Never returns less than 1.
#[must_use]
pub fn fit_block_size_in(window_width: u32, window_height: u32, columns: u32, rows: u32) -> u32 {
    (window_width / columns.max(1))
        .min(window_height / rows.max(1))
        .max(1)
}

/// Top-level mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Mode {
    Menu,
    Play,
    GameOver,
}

/// What the host should draw for the current mode.
#[derive(Debug, Clone, Copy)]
pub enum Scene<'a> {
    Menu,
    Play(Playfield<'a>),
    GameOver(Playfield<'a>),
}

/// Everything visible while a game is on screen.
#[derive(Debug, Clone, Copy)]
pub struct Playfield<'a> {
    pub board: &'a Board,
    pub current: &'a Piece,
    pub ghost: &'a Piece,
    pub next: &'a Piece,
    pub hold: Option<&'a Piece>,
}

impl<'a> Playfield<'a> {
    fn of(game: &'a Game) -> Self {
        Self {
            board: game.board(),
            current: game.current(),
            ghost: game.ghost(),
            next: game.next(),
            hold: game.hold(),
        }
    }
}

/// Routes ticks and actions to the game engine according to the current mode.
///
/// Input and gravity only reach the engine in [`Mode::Play`]. When the engine
/// reports that the game is over the manager switches to [`Mode::GameOver`],
/// which is terminal.
#[derive(Debug, Clone)]
pub struct GameManager {
    game: Game,
    mode: Mode,
    block_size: u32,
}

impl GameManager {
    /// Starts a new session directly in [`Mode::Play`].
    #[must_use]
    pub fn new(config: &GameConfig, now_ms: u64) -> Self {
        Self::with_game(Game::new(config, now_ms))
    }

    /// Starts a new session on the menu. Call [`Self::start`] to begin playing.
    #[must_use]
    pub fn new_in_menu(config: &GameConfig, now_ms: u64) -> Self {
        let mut manager = Self::new(config, now_ms);
        manager.open_menu();
        manager
    }

    /// Wraps an existing engine, in [`Mode::Play`] unless it is already over.
    #[must_use]
    pub fn with_game(game: Game) -> Self {
        let mode = if game.is_game_over() {
            Mode::GameOver
        } else {
            Mode::Play
        };
        Self {
            game,
            mode,
            block_size: 1,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Side length of one block in host units.
    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn set_block_size(&mut self, block_size: u32) {
        self.block_size = block_size.max(1);
    }

    /// Blocks needed to show the board with its NEXT and HOLD panels stacked
    /// to the right, one block of margin per border included.
    ///
    /// The default 10x20 tetromino game needs exactly
    /// [`DISPLAY_COLUMNS`] x [`DISPLAY_ROWS`].
    #[must_use]
    pub fn display_grid(&self) -> (u32, u32) {
        let to_u32 = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        let board = self.game.board();
        let panel = to_u32(self.game.family().cell_count());
        let columns = to_u32(board.width())
            .saturating_add(panel)
            .saturating_add(2);
        let rows = to_u32(board.height())
            .saturating_add(2)
            .max(panel.saturating_mul(2).saturating_add(4));
        (columns, rows)
    }

    /// Leaves the menu and starts (or resumes) play.
    ///
    /// Gravity restarts from `now_ms`, so time spent on the menu never causes a
    /// drop. Does nothing outside [`Mode::Menu`].
    pub fn start(&mut self, now_ms: u64) {
        if self.mode.is_menu() {
            self.change_mode(Mode::Play);
            self.game.reset_drop_timer(now_ms);
        }
    }

    /// Returns to the menu. Does nothing outside [`Mode::Play`].
    pub fn open_menu(&mut self) {
        if self.mode.is_play() {
            self.change_mode(Mode::Menu);
        }
    }

    /// Advances gravity. Only effective in [`Mode::Play`].
    pub fn update(&mut self, now_ms: u64) -> Option<LockOutcome> {
        if !self.mode.is_play() {
            return None;
        }
        let outcome = self.game.update(now_ms);
        self.sync_game_over();
        outcome
    }

    /// Performs the action bound to `key`.
    ///
    /// Outside [`Mode::Play`] nothing happens and [`ActionError::NotPlaying`] is
    /// returned.
    pub fn perform(&mut self, key: Key) -> Result<(), ActionError> {
        if !self.mode.is_play() {
            return Err(ActionError::NotPlaying);
        }
        let res = match key {
            Key::MoveLeft => self.game.try_move(-1, 0),
            Key::MoveRight => self.game.try_move(1, 0),
            Key::SoftDrop => self.game.try_move(0, 1),
            Key::HardDrop => self.game.hard_drop().map(drop),
            Key::RotateLeft => self.game.try_rotate_left(),
            Key::RotateRight => self.game.try_rotate_right(),
            Key::Hold => self.game.try_hold(),
        };
        self.sync_game_over();
        res
    }

    /// The view to draw for the current mode.
    #[must_use]
    pub fn scene(&self) -> Scene<'_> {
        match self.mode {
            Mode::Menu => Scene::Menu,
            Mode::Play => Scene::Play(Playfield::of(&self.game)),
            Mode::GameOver => Scene::GameOver(Playfield::of(&self.game)),
        }
    }

    fn sync_game_over(&mut self) {
        if self.game.is_game_over() && !self.mode.is_game_over() {
            self.change_mode(Mode::GameOver);
        }
    }

    fn change_mode(&mut self, mode: Mode) {
        log::debug!("mode {} -> {mode}", self.mode);
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::family::{FamilyKind, PieceFamily},
        engine::piece_factory::{PieceFactory, PieceSeed},
    };

    const SEED: PieceSeed = PieceSeed::from_bytes([9; 16]);

    fn manager_on(board: Board) -> GameManager {
        let factory = PieceFactory::with_seed(&PieceFamily::TETROMINO, SEED);
        GameManager::with_game(Game::with_parts(board, factory, 1000, 0))
    }

    #[test]
    fn test_fit_block_size() {
        assert_eq!(fit_block_size(1600, 2200), 100);
        assert_eq!(fit_block_size(1600, 1100), 50);
        assert_eq!(fit_block_size(159, 10_000), 9);
        assert_eq!(fit_block_size(5, 5), 1);
    }

    #[test]
    fn test_new_starts_in_play() {
        let manager = GameManager::new(&GameConfig::default(), 0);
        assert_eq!(manager.mode(), Mode::Play);
        assert!(matches!(manager.scene(), Scene::Play(_)));
    }

    #[test]
    fn test_menu_blocks_input_and_gravity() {
        let mut manager = GameManager::new_in_menu(&GameConfig::default(), 0);
        assert!(manager.mode().is_menu());
        assert!(matches!(manager.scene(), Scene::Menu));

        let before = manager.game().current().clone();
        assert_eq!(manager.perform(Key::MoveLeft), Err(ActionError::NotPlaying));
        assert_eq!(manager.perform(Key::HardDrop), Err(ActionError::NotPlaying));
        assert_eq!(manager.update(10_000), None);
        assert_eq!(manager.game().current(), &before);
    }

    #[test]
    fn test_start_resets_drop_timer() {
        let mut manager = GameManager::new_in_menu(&GameConfig::default(), 0);
        let y = manager.game().current().origin().y();

        manager.start(5000);
        assert!(manager.mode().is_play());
        manager.update(5999);
        assert_eq!(manager.game().current().origin().y(), y);
        manager.update(6000);
        assert_eq!(manager.game().current().origin().y(), y + 1);

        // Starting again while playing is a no-op.
        manager.start(9000);
        assert_eq!(manager.game().last_drop_time_ms(), 6000);
    }

    #[test]
    fn test_perform_routes_keys() {
        let mut manager = manager_on(Board::new(10, 20));
        let origin = manager.game().current().origin();

        manager.perform(Key::MoveLeft).unwrap();
        manager.perform(Key::SoftDrop).unwrap();
        let moved = manager.game().current().origin();
        assert_eq!((moved.x(), moved.y()), (origin.x() - 1, origin.y() + 1));

        manager.perform(Key::Hold).unwrap();
        assert!(manager.game().hold().is_some());
        assert_eq!(manager.perform(Key::Hold), Err(ActionError::HoldAlreadyUsed));

        manager.perform(Key::HardDrop).unwrap();
        assert!(manager.game().board().rows().flatten().any(|b| !b.is_empty()));
    }

    #[test]
    fn test_game_over_switches_mode_and_keeps_showing_field() {
        let mut manager = manager_on(Board::new(10, 20));
        for _ in 0..30 {
            if manager.mode().is_game_over() {
                break;
            }
            manager.perform(Key::HardDrop).unwrap();
        }
        assert!(manager.mode().is_game_over());

        let Scene::GameOver(field) = manager.scene() else {
            panic!("expected the game-over scene");
        };
        assert!(field.board.rows().take(2).flatten().any(|b| !b.is_empty()));

        let board = manager.game().board().clone();
        assert_eq!(manager.perform(Key::MoveRight), Err(ActionError::NotPlaying));
        assert_eq!(manager.update(1_000_000), None);
        manager.start(0);
        manager.open_menu();
        assert!(manager.mode().is_game_over());
        assert_eq!(manager.game().board(), &board);
    }

    #[test]
    fn test_blocked_spawn_starts_in_game_over() {
        let mut rows = vec!["....##...."; 2];
        rows.extend([".........."; 18]);
        let manager = manager_on(Board::from_rows(&rows));
        assert!(manager.mode().is_game_over());
    }

    #[test]
    fn test_play_scene_matches_engine() {
        let mut manager = manager_on(Board::new(10, 20));
        manager.perform(Key::Hold).unwrap();
        let Scene::Play(field) = manager.scene() else {
            panic!("expected the play scene");
        };
        let game = manager.game();
        assert_eq!(field.current, game.current());
        assert_eq!(field.ghost, game.ghost());
        assert_eq!(field.next, game.next());
        assert_eq!(field.hold, game.hold());
        assert_eq!(field.board, game.board());
        assert_eq!(field.ghost.origin().x(), field.current.origin().x());
    }

    #[test]
    fn test_display_grid_follows_board_and_family() {
        let manager = GameManager::new(&GameConfig::default(), 0);
        assert_eq!(manager.display_grid(), (DISPLAY_COLUMNS, DISPLAY_ROWS));

        let config = GameConfig {
            family: FamilyKind::Pentomino,
            board_width: 12,
            board_height: 4,
            ..GameConfig::default()
        };
        let manager = GameManager::new(&config, 0);
        // 12 board columns, a 5-block panel and two borders; the panels are
        // taller than the board.
        assert_eq!(manager.display_grid(), (19, 14));
    }

    #[test]
    fn test_fit_block_size_in() {
        assert_eq!(fit_block_size_in(34, 100, 17, 22), 2);
        assert_eq!(fit_block_size_in(32, 100, 17, 22), 1);
        assert_eq!(fit_block_size_in(100, 43, 16, 22), 1);
        assert_eq!(fit_block_size_in(100, 100, 0, 0), 100);
    }

    #[test]
    fn test_block_size() {
        let mut manager = manager_on(Board::new(10, 20));
        manager.set_block_size(fit_block_size(800, 600));
        assert_eq!(manager.block_size(), 27);
        manager.set_block_size(0);
        assert_eq!(manager.block_size(), 1);
    }
}
