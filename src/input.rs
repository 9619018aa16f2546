use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Command;
use crate::position::Direction::{self, *};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Quit,
    Pause,
    Ignore,
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn map_key(ev: &KeyEvent) -> KeyAction {
    if ev.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    if is_ctrl_c(ev) {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => KeyAction::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => KeyAction::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => KeyAction::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => KeyAction::Turn(Right),
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Esc => KeyAction::Pause,
        _ => KeyAction::Ignore,
    }
}

/// Keys collected between two frames. The last direction wins and a quit
/// overrides everything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameInput {
    turn: Option<Direction>,
    quit: bool,
    pause_toggled: bool,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(dir) => self.turn = Some(dir),
            KeyAction::Quit => self.quit = true,
            KeyAction::Pause => self.pause_toggled = !self.pause_toggled,
            KeyAction::Ignore => {}
        }
    }

    pub fn pause_toggled(&self) -> bool {
        self.pause_toggled
    }

    pub fn command(&self) -> Command {
        if self.quit {
            Command::Quit
        } else if let Some(dir) = self.turn {
            Command::Turn(dir)
        } else {
            Command::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd() {
        assert_eq!(map_key(&key(KeyCode::Up)), KeyAction::Turn(Up));
        assert_eq!(map_key(&key(KeyCode::Char('a'))), KeyAction::Turn(Left));
        assert_eq!(map_key(&key(KeyCode::Char('S'))), KeyAction::Turn(Down));
        assert_eq!(map_key(&key(KeyCode::Right)), KeyAction::Turn(Right));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(&key(KeyCode::Char('q'))), KeyAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_ctrl_c(&ctrl_c));
        assert_eq!(map_key(&ctrl_c), KeyAction::Quit);
        assert_eq!(map_key(&key(KeyCode::Char('c'))), KeyAction::Ignore);
    }

    #[test]
    fn releases_are_ignored() {
        let mut ev = key(KeyCode::Up);
        ev.kind = KeyEventKind::Release;
        assert_eq!(map_key(&ev), KeyAction::Ignore);
    }

    #[test]
    fn frame_input_resolution() {
        let mut input = FrameInput::new();
        assert_eq!(input.command(), Command::Continue);

        input.push(KeyAction::Turn(Up));
        input.push(KeyAction::Turn(Left));
        assert_eq!(input.command(), Command::Turn(Left));

        input.push(KeyAction::Quit);
        input.push(KeyAction::Turn(Down));
        assert_eq!(input.command(), Command::Quit);
    }

    #[test]
    fn double_escape_cancels_out() {
        let mut input = FrameInput::new();
        input.push(KeyAction::Pause);
        assert!(input.pause_toggled());
        input.push(KeyAction::Pause);
        assert!(!input.pause_toggled());
    }
}
