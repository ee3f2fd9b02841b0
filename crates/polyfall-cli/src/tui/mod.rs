//! Terminal host: owns the terminal, the clock and the event loop.

mod app;
mod event;
mod event_loop;
mod runner;

pub use self::{app::App, runner::Tui};
