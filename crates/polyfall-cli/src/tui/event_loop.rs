use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Monotonic clock and event source of the host loop.
///
/// Ticks are produced at a fixed interval (none without one). A redraw follows
/// every tick and every terminal event. Late ticks are not replayed.
#[derive(Debug)]
pub(super) struct EventLoop {
    started: Instant,
    tick_interval: Option<Duration>,
    next_tick: Instant,
    needs_redraw: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            tick_interval: None,
            next_tick: now,
            needs_redraw: true,
        }
    }

    /// Milliseconds since the loop was created.
    pub(super) fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.next_tick = Instant::now();
    }

    /// Blocks until a tick or redraw is due, or a terminal event arrives.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now >= self.next_tick
            {
                self.next_tick = now + interval;
                self.needs_redraw = true;
                return Ok(TuiEvent::Tick);
            }

            if self.needs_redraw {
                self.needs_redraw = false;
                return Ok(TuiEvent::Render);
            }

            let timeout = self
                .tick_interval
                .map(|_| self.next_tick.saturating_duration_since(now));
            if let Some(timeout) = timeout
                && !event::poll(timeout)?
            {
                continue;
            }

            self.needs_redraw = true;
            return Ok(event::read()?.into());
        }
    }
}
