use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// An application driven by [`Tui::run`].
pub trait App {
    /// Called once the terminal is set up, before the first event.
    ///
    /// The terminal's initial size is delivered right after as an
    /// [`Event::Resize`].
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Handles key input, resizes and other terminal events.
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the application on every tick.
    fn update(&mut self, tui: &mut Tui);
}
