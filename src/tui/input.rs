use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Like the current cat
    Like,
    /// Reject the current cat
    Nope,
    /// Fetch a fresh deck (retry, or swipe more)
    Reset,
    /// Open the current cat in the browser
    Open,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// Pointer events the swipe gesture cares about, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down { column: u16, row: u16 },
    Drag { column: u16, row: u16 },
    Up { column: u16, row: u16 },
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Like,
        (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::Like,

        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Nope,
        (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::Nope,

        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Reset,
        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::Open,
        (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::Help,
        (KeyCode::Char('?'), KeyModifiers::SHIFT) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Keys while the help or welcome overlay is up: anything that closes it
/// maps to `Help`.
pub fn handle_overlay_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,

        (KeyCode::Char('?'), _) => KeyAction::Help,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Help,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Help,
        (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps left-button mouse events to pointer actions
pub fn handle_mouse_event(mouse: MouseEvent) -> PointerAction {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerAction::Down { column, row },
        MouseEventKind::Drag(MouseButton::Left) => PointerAction::Drag { column, row },
        MouseEventKind::Up(MouseButton::Left) => PointerAction::Up { column, row },
        _ => PointerAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_key_quit() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::Quit);

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(key), KeyAction::Quit);

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::Quit);
    }

    #[test]
    fn test_key_like() {
        let key = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::Like);

        let key = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::Like);
    }

    #[test]
    fn test_key_nope() {
        let key = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::Nope);

        let key = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::Nope);
    }

    #[test]
    fn test_key_reset_open_help() {
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::Reset);

        let key = KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::Open);

        let key = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::Help);

        let key = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_event(key), KeyAction::Help);
    }

    #[test]
    fn test_key_none() {
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(key), KeyAction::None);
    }

    #[test]
    fn test_overlay_keys() {
        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(handle_overlay_input(key), KeyAction::Help);

        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(handle_overlay_input(key), KeyAction::Help);

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(handle_overlay_input(key), KeyAction::Quit);

        // Decisions are not reachable behind an overlay
        let key = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(handle_overlay_input(key), KeyAction::None);
    }

    #[test]
    fn test_mouse_left_button() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            PointerAction::Down { column: 3, row: 4 }
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 9, 4)),
            PointerAction::Drag { column: 9, row: 4 }
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 12, 5)),
            PointerAction::Up { column: 12, row: 5 }
        );
    }

    #[test]
    fn test_mouse_other_events_ignored() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)),
            PointerAction::None
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Moved, 0, 0)),
            PointerAction::None
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollDown, 0, 0)),
            PointerAction::None
        );
    }
}
