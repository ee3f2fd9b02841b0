use crossterm::event::Event;
use polyfall_engine::{GameConfig, GameManager, InputHandler, Key, fit_block_size_in};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    command::play::keymap::{self, Command, Transition},
    tui::{App, Tui},
    ui::widgets::{BlockDisplay, SceneDisplay},
};

const FPS: f64 = 60.0;
const HELP_HEIGHT: u16 = 1;

/// Block size that fits the scene into a terminal, leaving room for the help
/// line.
fn block_size_for(manager: &GameManager, width: u16, height: u16) -> u32 {
    let (columns, rows) = manager.display_grid();
    fit_block_size_in(
        u32::from(width / BlockDisplay::WIDTH),
        u32::from(height.saturating_sub(HELP_HEIGHT) / BlockDisplay::HEIGHT),
        columns,
        rows,
    )
}

#[derive(Debug)]
pub(super) struct PlayApp {
    manager: GameManager,
    input: InputHandler,
    is_exiting: bool,
}

impl PlayApp {
    pub(super) fn new(config: GameConfig, start_in_menu: bool, now_ms: u64) -> Self {
        let manager = if start_in_menu {
            GameManager::new_in_menu(&config, now_ms)
        } else {
            GameManager::new(&config, now_ms)
        };
        log::info!(
            "new {} game on a {}x{} board",
            config.family().name(),
            config.board_width,
            config.board_height
        );
        Self {
            manager,
            input: InputHandler::new(config.input),
            is_exiting: false,
        }
    }

    fn handle_command(&mut self, tui: &Tui, command: Command, transition: Transition) {
        let now = tui.now_ms();
        match (command, transition) {
            (_, Transition::Ignore) => {}
            (Command::Quit, Transition::Down | Transition::Tap) => self.is_exiting = true,
            (Command::Start, Transition::Down | Transition::Tap) => {
                self.input.release_all();
                self.manager.start(now);
            }
            (Command::Quit | Command::Start, Transition::Up) => {}
            (Command::Game(key), Transition::Down) => self.key_down(key, now),
            (Command::Game(key), Transition::Up) => self.input.on_key_up(key),
            (Command::Game(key), Transition::Tap) => {
                self.key_down(key, now);
                self.input.on_key_up(key);
            }
        }
    }

    fn key_down(&mut self, key: Key, now_ms: u64) {
        self.input.on_key_down(&mut self.manager, key, now_ms);
    }

    fn help_text(&self) -> &'static str {
        if self.manager.mode().is_menu() {
            "Enter (Start) | Esc (Quit)"
        } else if self.manager.mode().is_play() {
            "A D ← → (Move) | S ↓ (Soft Drop) | W ↑ (Hard Drop) | Q E Z X (Rotate) | C Space (Hold) | Esc (Quit)"
        } else {
            "Esc (Quit)"
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        match event {
            Event::Key(key_event) => {
                let Some(command) = keymap::command_for(&key_event) else {
                    return;
                };
                let transition = keymap::transition(key_event.kind, tui.reports_key_release());
                self.handle_command(tui, command, transition);
            }
            Event::Resize(width, height) => {
                let block_size = block_size_for(&self.manager, width, height);
                log::debug!("terminal resized to {width}x{height}, block size {block_size}");
                self.manager.set_block_size(block_size);
            }
            Event::FocusLost => self.input.release_all(),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(HELP_HEIGHT)]).areas(frame.area());
        frame.render_widget(SceneDisplay::new(&self.manager), main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, tui: &mut Tui) {
        let now = tui.now_ms();
        self.input.update(&mut self.manager, now);
        self.manager.update(now);
    }
}

#[cfg(test)]
mod tests {
    use polyfall_engine::FamilyKind;

    use super::*;

    fn manager(family: FamilyKind) -> GameManager {
        let config = GameConfig {
            family,
            ..GameConfig::default()
        };
        GameManager::new(&config, 0)
    }

    #[test]
    fn test_block_size_leaves_room_for_help_line() {
        let manager = manager(FamilyKind::Tetromino);
        assert_eq!(block_size_for(&manager, 200, 45), 2);
        assert_eq!(block_size_for(&manager, 200, 44), 1);
        assert_eq!(block_size_for(&manager, 0, 0), 1);
    }

    #[test]
    fn test_block_size_accounts_for_wider_panels() {
        // 17 blocks of 2 columns each at block size 2.
        assert_eq!(block_size_for(&manager(FamilyKind::Tetromino), 64, 200), 2);
        assert_eq!(block_size_for(&manager(FamilyKind::Pentomino), 64, 200), 1);
        assert_eq!(block_size_for(&manager(FamilyKind::Pentomino), 68, 200), 2);
    }
}
