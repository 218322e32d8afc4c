/// Keyboard boundary.
///
/// Drains pending terminal events and turns the recognised ones into
/// `InputAction`s. This is the only place raw keys are interpreted: keys
/// with no meaning are dropped here and never reach the command queue.
///
/// Press and Repeat both count, so holding a key walks the player one cell
/// per accepted turn. Release events are ignored.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveCommand;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputAction {
    Move(MoveCommand),
    Quit,
    Restart,
}

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];

/// Map one key event to an action. `None` = not ours, drop it.
pub fn action_for_key(key: &KeyEvent) -> Option<InputAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(InputAction::Quit);
    }

    let code = key.code;
    if KEYS_UP.contains(&code) {
        Some(InputAction::Move(MoveCommand::Up))
    } else if KEYS_DOWN.contains(&code) {
        Some(InputAction::Move(MoveCommand::Down))
    } else if KEYS_LEFT.contains(&code) {
        Some(InputAction::Move(MoveCommand::Left))
    } else if KEYS_RIGHT.contains(&code) {
        Some(InputAction::Move(MoveCommand::Right))
    } else if KEYS_QUIT.contains(&code) {
        Some(InputAction::Quit)
    } else if KEYS_RESTART.contains(&code) {
        Some(InputAction::Restart)
    } else {
        None
    }
}

pub struct InputState {
    actions: Vec<InputAction>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { actions: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame; the returned slice is valid until the next call.
    pub fn drain_events(&mut self) -> &[InputAction] {
        self.actions.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(action) = action_for_key(&key) {
                        self.actions.push(action);
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }

        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use rstest::rstest;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[rstest]
    #[case(KeyCode::Char('w'), MoveCommand::Up)]
    #[case(KeyCode::Char('S'), MoveCommand::Down)]
    #[case(KeyCode::Char('a'), MoveCommand::Left)]
    #[case(KeyCode::Char('d'), MoveCommand::Right)]
    #[case(KeyCode::Up, MoveCommand::Up)]
    #[case(KeyCode::Down, MoveCommand::Down)]
    #[case(KeyCode::Left, MoveCommand::Left)]
    #[case(KeyCode::Right, MoveCommand::Right)]
    fn movement_keys(#[case] code: KeyCode, #[case] cmd: MoveCommand) {
        assert_eq!(action_for_key(&press(code)), Some(InputAction::Move(cmd)));
    }

    #[rstest]
    #[case(KeyCode::Char('x'))]
    #[case(KeyCode::Char('1'))]
    #[case(KeyCode::Enter)]
    #[case(KeyCode::Tab)]
    fn unknown_keys_dropped(#[case] code: KeyCode) {
        assert_eq!(action_for_key(&press(code)), None);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(action_for_key(&press(KeyCode::Char('q'))), Some(InputAction::Quit));
        assert_eq!(action_for_key(&press(KeyCode::Esc)), Some(InputAction::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(&ctrl_c), Some(InputAction::Quit));
    }

    #[test]
    fn restart_key() {
        assert_eq!(action_for_key(&press(KeyCode::Char('r'))), Some(InputAction::Restart));
    }

    #[test]
    fn release_ignored() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('w'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(action_for_key(&release), None);
    }
}
