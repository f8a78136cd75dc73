//! Terminal mouse translation. Crossterm only reports a cell position, never
//! sub-cell pixel offsets, so this backend always reports `(0.5, 0.5)` for
//! `sub_cell_x`/`sub_cell_y` — the fallback explicitly permitted by §4.4 when
//! sub-cell data is unavailable.

use crossterm::event::{
    MouseButton as CMouseButton, MouseEvent as CMouseEvent, MouseEventKind as CMouseEventKind,
};
use ttk_events::{Modifiers, MouseButton, MouseEvent, MouseEventKind};

pub fn map_mouse_event(event: &CMouseEvent, modifiers: Modifiers, timestamp: u64) -> Option<MouseEvent> {
    let (kind, button, scroll_dx, scroll_dy) = match event.kind {
        CMouseEventKind::Down(button) => (MouseEventKind::ButtonDown, map_button(button), 0.0, 0.0),
        CMouseEventKind::Up(button) => (MouseEventKind::ButtonUp, map_button(button), 0.0, 0.0),
        CMouseEventKind::Drag(button) => (MouseEventKind::Drag, map_button(button), 0.0, 0.0),
        CMouseEventKind::Moved => (MouseEventKind::Move, MouseButton::None, 0.0, 0.0),
        CMouseEventKind::ScrollDown => (MouseEventKind::Wheel, MouseButton::None, 0.0, -1.0),
        CMouseEventKind::ScrollUp => (MouseEventKind::Wheel, MouseButton::None, 0.0, 1.0),
        CMouseEventKind::ScrollLeft => (MouseEventKind::Wheel, MouseButton::None, -1.0, 0.0),
        CMouseEventKind::ScrollRight => (MouseEventKind::Wheel, MouseButton::None, 1.0, 0.0),
    };

    Some(MouseEvent {
        kind,
        col: event.column,
        row: event.row,
        sub_cell_x: 0.5,
        sub_cell_y: 0.5,
        button,
        scroll_dx,
        scroll_dy,
        timestamp,
        modifiers,
    })
}

fn map_button(button: CMouseButton) -> MouseButton {
    match button {
        CMouseButton::Left => MouseButton::Left,
        CMouseButton::Middle => MouseButton::Middle,
        CMouseButton::Right => MouseButton::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseEvent as CMouseEvent;

    #[test]
    fn sub_cell_fallback_is_always_half() {
        let event = CMouseEvent {
            kind: CMouseEventKind::Down(CMouseButton::Left),
            column: 10,
            row: 4,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        let mapped = map_mouse_event(&event, Modifiers::empty(), 0).unwrap();
        assert_eq!(mapped.sub_cell_x, 0.5);
        assert_eq!(mapped.sub_cell_y, 0.5);
        assert_eq!(mapped.col, 10);
        assert_eq!(mapped.row, 4);
    }

    #[test]
    fn scroll_down_reports_negative_dy() {
        let event = CMouseEvent {
            kind: CMouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        let mapped = map_mouse_event(&event, Modifiers::empty(), 0).unwrap();
        assert_eq!(mapped.kind, MouseEventKind::Wheel);
        assert!(mapped.scroll_dy < 0.0);
    }
}
