use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use polyfall_engine::Key;

/// What a terminal key does in the play screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Command {
    Game(Key),
    Start,
    Quit,
}

/// Maps a terminal key to its command. Letter bindings ignore case.
pub(super) fn command_for(event: &KeyEvent) -> Option<Command> {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(event.code, KeyCode::Char('c')).then_some(Command::Quit);
    }
    let command = match event.code {
        KeyCode::Left => Command::Game(Key::MoveLeft),
        KeyCode::Right => Command::Game(Key::MoveRight),
        KeyCode::Down => Command::Game(Key::SoftDrop),
        KeyCode::Up => Command::Game(Key::HardDrop),
        KeyCode::Char(' ') => Command::Game(Key::Hold),
        KeyCode::Enter => Command::Start,
        KeyCode::Esc => Command::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'a' => Command::Game(Key::MoveLeft),
            'd' => Command::Game(Key::MoveRight),
            's' => Command::Game(Key::SoftDrop),
            'w' => Command::Game(Key::HardDrop),
            'q' | 'z' => Command::Game(Key::RotateLeft),
            'e' | 'x' => Command::Game(Key::RotateRight),
            'c' => Command::Game(Key::Hold),
            _ => return None,
        },
        _ => return None,
    };
    Some(command)
}

/// How a key event should reach the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Transition {
    Down,
    Up,
    /// Press immediately followed by release.
    Tap,
    Ignore,
}

/// Classifies a key event.
///
/// When the terminal reports releases, its own auto-repeat is ignored since the
/// input layer repeats held keys itself. Otherwise each press is a tap.
pub(super) fn transition(kind: KeyEventKind, reports_release: bool) -> Transition {
    match (kind, reports_release) {
        (KeyEventKind::Press, true) => Transition::Down,
        (KeyEventKind::Release, true) => Transition::Up,
        (KeyEventKind::Repeat, true) | (KeyEventKind::Release, false) => Transition::Ignore,
        (KeyEventKind::Press | KeyEventKind::Repeat, false) => Transition::Tap,
    }
}
