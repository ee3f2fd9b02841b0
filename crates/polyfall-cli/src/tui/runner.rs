use std::{io, time::Duration};

use crossterm::{
    event::{
        Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use ratatui::DefaultTerminal;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// Runs an [`App`] in the terminal.
#[derive(Debug, Default)]
pub struct Tui {
    events: EventLoop,
    key_release_events: bool,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate in Hz.
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Current time of the host's monotonic clock, in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.events.now_ms()
    }

    /// Whether the terminal reports key releases.
    ///
    /// Without them every press has to be treated as an instant tap.
    pub fn reports_key_release(&self) -> bool {
        self.key_release_events
    }

    /// Sets up the terminal and runs `app` until it asks to exit.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            self.key_release_events = enable_key_release_events();
            log::debug!("key release events: {}", self.key_release_events);

            app.init(&mut self);
            let size = terminal.size()?;
            app.handle_event(&mut self, Event::Resize(size.width, size.height));

            let res = self.run_loop(terminal, app);
            if self.key_release_events {
                _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
            }
            res
        })
    }

    fn run_loop<A>(&mut self, terminal: &mut DefaultTerminal, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick => app.update(self),
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => app.handle_event(self, event),
            }
        }
        Ok(())
    }
}

fn enable_key_release_events() -> bool {
    if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
        return false;
    }
    execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok()
}
