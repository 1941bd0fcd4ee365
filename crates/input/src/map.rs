//! Mapping from crossterm events to platform-neutral input records.

use crossterm::event::{
    Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton as CtButton,
    MouseEvent, MouseEventKind,
};

use crate::types::{InputEvent, Key, KeyInput, MouseButton, Pos, Size};

/// Map a terminal event to an input record.
///
/// Key releases, scroll wheel, focus and paste events have no counterpart and
/// map to `None`. Terminal coordinates are 0-based; records are 1-based.
pub fn map_event(event: CtEvent) -> Option<InputEvent> {
    match event {
        CtEvent::Key(key) => map_key_event(key).map(InputEvent::KeyDown),
        CtEvent::Mouse(mouse) => map_mouse_event(mouse),
        CtEvent::Resize(width, height) => Some(InputEvent::Resize(Size::new(width, height))),
        _ => None,
    }
}

/// Map a key press (or terminal auto-repeat) to a key record.
pub fn map_key_event(key: KeyEvent) -> Option<KeyInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let mapped = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        _ => return None,
    };
    Some(KeyInput {
        key: mapped,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
    })
}

fn map_mouse_event(mouse: MouseEvent) -> Option<InputEvent> {
    let pos = Pos::new(mouse.row.saturating_add(1), mouse.column.saturating_add(1));
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(InputEvent::MouseMove(pos)),
        MouseEventKind::Down(button) => Some(InputEvent::MouseClick {
            pos,
            button: match button {
                CtButton::Left => MouseButton::Left,
                CtButton::Right => MouseButton::Right,
                CtButton::Middle => MouseButton::Middle,
            },
        }),
        _ => None,
    }
}

/// Check if a key should quit the program.
pub fn should_quit(key: KeyInput) -> bool {
    (matches!(key.key, Key::Char('q') | Key::Char('Q')) && !key.ctrl)
        || (key.key == Key::Char('c') && key.ctrl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton as CtButton};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CtEvent {
        CtEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_key_press_maps() {
        assert_eq!(
            map_event(CtEvent::Key(KeyEvent::from(KeyCode::Enter))),
            Some(InputEvent::KeyDown(KeyInput::new(Key::Enter)))
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char('4'))),
            Some(KeyInput::new(Key::Char('4')))
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyInput::ctrl(Key::Char('c')))
        );
        assert_eq!(map_key_event(KeyEvent::from(KeyCode::F(5))), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key_event(release), None);
    }

    #[test]
    fn test_mouse_is_one_indexed() {
        assert_eq!(
            map_event(mouse(MouseEventKind::Moved, 0, 0)),
            Some(InputEvent::MouseMove(Pos::new(1, 1)))
        );
        assert_eq!(
            map_event(mouse(MouseEventKind::Down(CtButton::Right), 9, 4)),
            Some(InputEvent::MouseClick {
                pos: Pos::new(5, 10),
                button: MouseButton::Right
            })
        );
        assert_eq!(map_event(mouse(MouseEventKind::ScrollUp, 1, 1)), None);
    }

    #[test]
    fn test_resize_maps_width_then_height() {
        assert_eq!(
            map_event(CtEvent::Resize(120, 40)),
            Some(InputEvent::Resize(Size::new(120, 40)))
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyInput::new(Key::Char('q'))));
        assert!(should_quit(KeyInput::ctrl(Key::Char('c'))));
        assert!(!should_quit(KeyInput::new(Key::Char('c'))));
        assert!(!should_quit(KeyInput::new(Key::Char('x'))));
    }
}
