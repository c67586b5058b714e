//! Key mapping from terminal events to game actions.
//!
//! Letter keys are case-insensitive. Arrows, vim keys (`hjkl`) and WASD all
//! steer the piece.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Commands the host handles without involving the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Stop or resume delivering ticks and actions
    TogglePause,
    /// Start a new game
    Restart,
}

fn ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Map keyboard input to a session action.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if ctrl(&key) {
        return None;
    }
    match key.code {
        KeyCode::Left => Some(GameAction::MoveLeft),
        KeyCode::Right => Some(GameAction::MoveRight),
        KeyCode::Down => Some(GameAction::SoftDrop),
        KeyCode::Up => Some(GameAction::Rotate),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'h' | 'a' => Some(GameAction::MoveLeft),
            'l' | 'd' => Some(GameAction::MoveRight),
            'j' | 's' => Some(GameAction::SoftDrop),
            'k' | 'w' => Some(GameAction::Rotate),
            ' ' => Some(GameAction::HardDrop),
            'c' => Some(GameAction::Hold),
            _ => None,
        },
        _ => None,
    }
}

/// Map keyboard input to a host command (pause, restart).
pub fn host_command(key: KeyEvent) -> Option<HostCommand> {
    match key.code {
        KeyCode::Esc => Some(HostCommand::TogglePause),
        KeyCode::Char(c) if !ctrl(&key) => match c.to_ascii_lowercase() {
            'p' => Some(HostCommand::TogglePause),
            'r' => Some(HostCommand::Restart),
            _ => None,
        },
        _ => None,
    }
}

/// `q` or Ctrl-C.
pub fn should_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') => ctrl(&key),
        KeyCode::Char(c) => c.eq_ignore_ascii_case(&'q'),
        _ => false,
    }
}
