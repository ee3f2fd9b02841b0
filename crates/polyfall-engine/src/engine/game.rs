use crate::{
    ActionError, PieceCollisionError,
    core::{board::Board, family::PieceFamily, piece::Piece},
    engine::{config::GameConfig, piece_factory::PieceFactory},
};

/// Observable state of a [`Game`] between calls.
///
/// Locking a piece, clearing lines and spawning the next piece all happen inside
/// the call that triggered the lock, so the engine is only ever seen falling or
/// finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EngineState {
    Falling,
    GameOver,
}

/// Result of locking a piece into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    /// Rows removed by the lock.
    pub lines_cleared: usize,
    /// Whether the piece spawned afterwards collided.
    pub game_over: bool,
}

/// The game engine: board, active piece, preview, hold slot and gravity.
///
/// All state changes go through this type. The ghost piece is recomputed after
/// every change to the active piece or the board.
///
/// # Example
///
/// ```
/// use polyfall_engine::{Game, GameConfig};
///
/// let mut game = Game::new(&GameConfig::default(), 0);
/// _ = game.try_move(-1, 0);
/// let outcome = game.hard_drop().unwrap();
/// assert!(!outcome.game_over);
/// assert!(game.can_hold());
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    factory: PieceFactory,
    current: Piece,
    next: Piece,
    hold: Option<Piece>,
    can_hold: bool,
    ghost: Piece,
    drop_interval_ms: u64,
    last_drop_time_ms: u64,
    state: EngineState,
}

impl Game {
    /// Starts a session on an empty board as described by `config`.
    ///
    /// # Panics
    ///
    /// Panics if the board size is zero, see [`GameConfig::validate`].
    #[must_use]
    pub fn new(config: &GameConfig, now_ms: u64) -> Self {
        let family = config.family();
        let factory = match config.seed {
            Some(seed) => PieceFactory::with_seed(family, seed),
            None => PieceFactory::new(family),
        };
        Self::with_parts(
            Board::new(config.board_width, config.board_height),
            factory,
            config.drop_interval_ms,
            now_ms,
        )
    }

    /// Starts a session on an existing board.
    ///
    /// The first two pieces are drawn from the factory's bag. If the first one
    /// cannot spawn, the game starts already over.
    #[must_use]
    pub fn with_parts(
        board: Board,
        mut factory: PieceFactory,
        drop_interval_ms: u64,
        now_ms: u64,
    ) -> Self {
        let current = factory.create_from_bag();
        let next = factory.create_from_bag();
        let state = if board.can_spawn(&current) {
            EngineState::Falling
        } else {
            EngineState::GameOver
        };
        let mut game = Self {
            board,
            factory,
            ghost: current.clone(),
            current,
            next,
            hold: None,
            can_hold: true,
            drop_interval_ms,
            last_drop_time_ms: now_ms,
            state,
        };
        game.update_ghost();
        game
    }

    /// The family the pieces are drawn from.
    #[must_use]
    pub fn family(&self) -> &'static PieceFamily {
        self.factory.family()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current(&self) -> &Piece {
        &self.current
    }

    #[must_use]
    pub fn next(&self) -> &Piece {
        &self.next
    }

    #[must_use]
    pub fn hold(&self) -> Option<&Piece> {
        self.hold.as_ref()
    }

    /// Where the active piece would land if dropped now.
    #[must_use]
    pub fn ghost(&self) -> &Piece {
        &self.ghost
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn drop_interval_ms(&self) -> u64 {
        self.drop_interval_ms
    }

    #[must_use]
    pub fn last_drop_time_ms(&self) -> u64 {
        self.last_drop_time_ms
    }

    /// Restarts the gravity period from `now_ms`.
    pub fn reset_drop_timer(&mut self, now_ms: u64) {
        self.last_drop_time_ms = now_ms;
    }

    /// Replaces the active piece if it fits.
    #[cfg(test)]
    pub(crate) fn set_current(&mut self, piece: Piece) -> Result<(), ActionError> {
        self.ensure_falling()?;
        Ok(self.commit(piece)?)
    }

    /// Applies gravity once a full drop interval has elapsed since the last
    /// gravity step.
    ///
    /// Returns the lock outcome if the piece could not fall and was locked.
    pub fn update(&mut self, now_ms: u64) -> Option<LockOutcome> {
        if self.is_game_over()
            || now_ms.saturating_sub(self.last_drop_time_ms) < self.drop_interval_ms
        {
            return None;
        }
        self.last_drop_time_ms = now_ms;
        if self.try_move(0, 1).is_ok() {
            return None;
        }
        Some(self.lock_and_spawn())
    }

    /// Moves the active piece by `(dx, dy)` if the destination is free.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), ActionError> {
        self.ensure_falling()?;
        let moved = self.current.moved_by(dx, dy);
        Ok(self.commit(moved)?)
    }

    /// Rotates the active piece clockwise. No wall kicks are attempted.
    pub fn try_rotate_right(&mut self) -> Result<(), ActionError> {
        self.ensure_falling()?;
        let rotated = self.current.rotated_right();
        Ok(self.commit(rotated)?)
    }

    /// Rotates the active piece counter-clockwise. No wall kicks are attempted.
    pub fn try_rotate_left(&mut self) -> Result<(), ActionError> {
        self.ensure_falling()?;
        let rotated = self.current.rotated_left();
        Ok(self.commit(rotated)?)
    }

    /// Drops the active piece as far as it goes and locks it immediately.
    pub fn hard_drop(&mut self) -> Result<LockOutcome, ActionError> {
        self.ensure_falling()?;
        while self.try_move(0, 1).is_ok() {}
        Ok(self.lock_and_spawn())
    }

    /// Swaps the active piece with the hold slot, once per piece.
    ///
    /// With an empty slot the active piece is stored and the next piece takes its
    /// place. The incoming piece restarts at the spawn position; if it does not
    /// fit there the hold is refused and nothing changes.
    pub fn try_hold(&mut self) -> Result<(), ActionError> {
        self.ensure_falling()?;
        if !self.can_hold {
            return Err(ActionError::HoldAlreadyUsed);
        }

        let spawn = self.factory.family().spawn_position();
        let incoming = self.hold.as_ref().unwrap_or(&self.next).moved_to(spawn);
        if !self.board.can_spawn(&incoming) {
            return Err(ActionError::PieceCollision);
        }

        let outgoing = std::mem::replace(&mut self.current, incoming);
        log::debug!("hold {} for {}", outgoing.kind(), self.current.kind());
        if self.hold.replace(outgoing).is_none() {
            self.next = self.factory.create_from_bag();
        }
        self.can_hold = false;
        self.update_ghost();
        Ok(())
    }

    fn ensure_falling(&self) -> Result<(), ActionError> {
        if self.is_game_over() {
            return Err(ActionError::GameOver);
        }
        Ok(())
    }

    fn commit(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.board.can_place(&piece) {
            return Err(PieceCollisionError);
        }
        self.current = piece;
        self.update_ghost();
        Ok(())
    }

    fn lock_and_spawn(&mut self) -> LockOutcome {
        self.board.fix(&self.current);
        let lines_cleared = self.board.clear_lines();
        log::debug!(
            "locked {} at ({}, {}), cleared {lines_cleared} line(s)",
            self.current.kind(),
            self.current.origin().x(),
            self.current.origin().y()
        );

        let next = self.factory.create_from_bag();
        self.current = std::mem::replace(&mut self.next, next);
        self.can_hold = true;

        let game_over = !self.board.can_spawn(&self.current);
        if game_over {
            log::info!("game over: {} cannot spawn", self.current.kind());
            self.state = EngineState::GameOver;
        }
        self.update_ghost();

        LockOutcome {
            lines_cleared,
            game_over,
        }
    }

    fn update_ghost(&mut self) {
        let mut ghost = self.current.clone();
        loop {
            let below = ghost.moved_by(0, 1);
            if !self.board.can_place(&below) {
                break;
            }
            ghost = below;
        }
        self.ghost = ghost;
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{
        core::{board::Block, family::PieceFamily, piece::PieceKind},
        engine::piece_factory::PieceSeed,
    };

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);
    const EMPTY_ROW: &str = "..........";

    fn factory() -> PieceFactory {
        PieceFactory::with_seed(&PieceFamily::TETROMINO, SEED)
    }

    fn game_on(board: Board) -> Game {
        Game::with_parts(board, factory(), 1000, 0)
    }

    fn piece(kind: PieceKind) -> Piece {
        factory().create(kind).unwrap()
    }

    fn occupied(board: &Board) -> Vec<(usize, usize)> {
        let mut cells = vec![];
        for (y, row) in board.rows().enumerate() {
            for (x, block) in row.iter().enumerate() {
                if !block.is_empty() {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    fn assert_ghost_invariants(game: &Game) {
        let ghost = game.ghost();
        let current = game.current();
        assert_eq!(ghost.kind(), current.kind());
        assert_eq!(ghost.shape(), current.shape());
        assert_eq!(ghost.origin().x(), current.origin().x());
        assert!(ghost.origin().y() >= current.origin().y());
        assert!(game.board().can_place(ghost), "ghost must fit");
        assert!(
            !game.board().can_place(&ghost.moved_by(0, 1)),
            "ghost must rest on something"
        );
    }

    #[test]
    fn test_new_game_starts_falling() {
        let game = Game::new(&GameConfig::default(), 0);
        assert_eq!(game.state(), EngineState::Falling);
        assert!(game.can_hold());
        assert!(game.hold().is_none());
        assert_eq!(game.board().width(), 10);
        assert_eq!(game.board().height(), 20);
        assert_ghost_invariants(&game);
    }

    #[test]
    fn test_hard_drop_i_piece_locks_into_bottom_row() {
        let mut game = game_on(Board::new(10, 20));
        game.set_current(piece(PieceKind::I)).unwrap();
        let expected_next = game.next().clone();

        let outcome = game.hard_drop().unwrap();
        assert_eq!(
            outcome,
            LockOutcome {
                lines_cleared: 0,
                game_over: false
            }
        );
        assert_eq!(occupied(game.board()), vec![(4, 19), (5, 19), (6, 19), (7, 19)]);
        for x in 4..8 {
            assert!(matches!(
                game.board().block_at(x, 19),
                Some(Block::Fixed {
                    kind: PieceKind::I,
                    ..
                })
            ));
        }
        assert_eq!(game.current(), &expected_next);
        assert_eq!(game.current().origin(), PieceFamily::TETROMINO.spawn_position());
        assert_ghost_invariants(&game);
    }

    #[test]
    fn test_hard_drop_clears_completed_row() {
        let mut rows = vec![EMPTY_ROW; 18];
        rows.push("#.........");
        rows.push("####....##");
        let mut game = game_on(Board::from_rows(&rows));
        game.set_current(piece(PieceKind::I)).unwrap();

        let outcome = game.hard_drop().unwrap();
        assert_eq!(outcome.lines_cleared, 1);
        assert_eq!(game.board().height(), 20);
        assert_eq!(occupied(game.board()), vec![(0, 19)]);
        assert!(game.board().rows().next().unwrap().iter().all(|b| b.is_empty()));
    }

    #[test]
    fn test_gravity_waits_for_drop_interval() {
        let mut game = game_on(Board::new(10, 20));
        let start_y = game.current().origin().y();

        assert_eq!(game.update(999), None);
        assert_eq!(game.current().origin().y(), start_y);

        assert_eq!(game.update(1000), None);
        assert_eq!(game.current().origin().y(), start_y + 1);
        assert_eq!(game.last_drop_time_ms(), 1000);

        assert_eq!(game.update(1500), None);
        assert_eq!(game.current().origin().y(), start_y + 1);
        assert_eq!(game.update(2000), None);
        assert_eq!(game.current().origin().y(), start_y + 2);
    }

    #[test]
    fn test_gravity_locks_resting_piece() {
        let mut game = game_on(Board::new(10, 20));
        game.set_current(piece(PieceKind::I).moved_by(0, 19)).unwrap();

        let outcome = game.update(1000).expect("resting piece should lock");
        assert_eq!(outcome.lines_cleared, 0);
        assert_eq!(occupied(game.board()), vec![(4, 19), (5, 19), (6, 19), (7, 19)]);
        assert!(game.can_hold());
    }

    #[test]
    fn test_move_rejected_at_wall_keeps_piece() {
        let mut game = game_on(Board::new(10, 20));
        game.set_current(piece(PieceKind::I)).unwrap();
        for _ in 0..4 {
            game.try_move(-1, 0).unwrap();
        }
        let before = game.current().clone();
        assert_eq!(game.try_move(-1, 0), Err(ActionError::PieceCollision));
        assert_eq!(game.current(), &before);
        assert_ghost_invariants(&game);
    }

    #[test]
    fn test_rotation_without_room_is_rejected() {
        let mut game = game_on(Board::new(10, 20));
        game.set_current(piece(PieceKind::I)).unwrap();
        // Stand the bar up in column 6, then push it against the left wall.
        game.try_rotate_right().unwrap();
        for _ in 0..6 {
            game.try_move(-1, 0).unwrap();
        }
        assert!(game.current().positions().all(|(x, _)| x == 0));

        let before = game.current().clone();
        assert_eq!(game.try_rotate_left(), Err(ActionError::PieceCollision));
        assert_eq!(game.current(), &before);
        assert_eq!(game.try_rotate_right(), Err(ActionError::PieceCollision));

        game.try_move(2, 0).unwrap();
        assert_eq!(game.try_rotate_left(), Ok(()));
        assert!(game.current().positions().all(|(_, y)| y == 0));
    }

    #[test]
    fn test_hold_swaps_once_per_piece() {
        let mut game = game_on(Board::new(10, 20));
        let first = game.current().clone();
        let second = game.next().clone();

        game.try_move(1, 3).unwrap();
        game.try_hold().unwrap();
        assert_eq!(game.hold().map(Piece::kind), Some(first.kind()));
        assert_eq!(game.current().kind(), second.kind());
        assert_eq!(game.current().origin(), PieceFamily::TETROMINO.spawn_position());
        assert!(!game.can_hold());

        let after_first_hold = game.clone();
        assert_eq!(game.try_hold(), Err(ActionError::HoldAlreadyUsed));
        assert_eq!(game.current(), after_first_hold.current());
        assert_eq!(game.hold(), after_first_hold.hold());
        assert_eq!(game.next(), after_first_hold.next());
        assert!(!game.can_hold());

        game.hard_drop().unwrap();
        assert!(game.can_hold());
        let dropped_next = game.current().kind();
        game.try_hold().unwrap();
        assert_eq!(game.current().kind(), first.kind());
        assert_eq!(game.current().origin(), PieceFamily::TETROMINO.spawn_position());
        assert_eq!(game.hold().map(Piece::kind), Some(dropped_next));
    }

    #[test]
    fn test_stacking_to_the_top_ends_the_game() {
        let mut game = game_on(Board::new(10, 20));
        let mut locks = 0;
        while !game.is_game_over() {
            let outcome = game.hard_drop().unwrap();
            assert_eq!(outcome.lines_cleared, 0);
            assert_eq!(outcome.game_over, game.is_game_over());
            locks += 1;
            assert!(locks <= 20, "column 5 should overflow within 20 pieces");
        }

        let board = game.board().clone();
        let current = game.current().clone();
        assert_eq!(game.try_move(1, 0), Err(ActionError::GameOver));
        assert_eq!(game.try_move(0, 1), Err(ActionError::GameOver));
        assert_eq!(game.try_rotate_right(), Err(ActionError::GameOver));
        assert_eq!(game.try_hold(), Err(ActionError::GameOver));
        assert_eq!(game.hard_drop(), Err(ActionError::GameOver));
        assert_eq!(game.update(1_000_000), None);
        assert_eq!(game.board(), &board);
        assert_eq!(game.current(), &current);
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut rows = vec!["....##...."; 2];
        rows.extend([EMPTY_ROW; 18]);
        let game = game_on(Board::from_rows(&rows));
        assert!(game.is_game_over());
    }

    #[test]
    fn test_ghost_invariants_hold_during_random_play() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut game = game_on(Board::new(10, 20));
        let mut now = 0;
        for _ in 0..3000 {
            if game.is_game_over() {
                game = game_on(Board::new(10, 20));
            }
            _ = match rng.random_range(0..9) {
                0 | 1 => game.try_move(-1, 0),
                2 | 3 => game.try_move(1, 0),
                4 => game.try_move(0, 1),
                5 => game.try_rotate_left(),
                6 => game.try_rotate_right(),
                7 => game.try_hold(),
                _ => game.hard_drop().map(drop),
            };
            now += 250;
            game.update(now);
            if !game.is_game_over() {
                assert_ghost_invariants(&game);
            }
        }
    }
}
