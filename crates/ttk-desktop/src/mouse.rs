//! Pixel -> grid coordinate conversion for the desktop backend. Unlike the
//! terminal backend (which only ever reports a `(0.5, 0.5)` fallback), the
//! desktop backend has true sub-pixel cursor positions from `winit` and
//! computes the cell/sub-cell split directly (§4.4, property #11).

use ttk_events::{Modifiers, MouseButton, MouseEvent, MouseEventKind};

/// Converts a window-space pixel position into `(col, row, sub_cell_x,
/// sub_cell_y)`, given the backend's current cell dimensions in pixels.
/// `sub_cell_x`/`sub_cell_y` are always in `[0, 1)` for any non-negative
/// pixel coordinate and any positive cell dimension, per property #11.
pub fn pixel_to_cell(x_px: f64, y_px: f64, cell_w: f64, cell_h: f64) -> (u16, u16, f32, f32) {
    let x_px = x_px.max(0.0);
    let y_px = y_px.max(0.0);
    let col = (x_px / cell_w).floor();
    let row = (y_px / cell_h).floor();
    let sub_cell_x = ((x_px - col * cell_w) / cell_w) as f32;
    let sub_cell_y = ((y_px - row * cell_h) / cell_h) as f32;
    (
        col.clamp(0.0, u16::MAX as f64) as u16,
        row.clamp(0.0, u16::MAX as f64) as u16,
        sub_cell_x.clamp(0.0, f32::from_bits(0x3f7f_ffff)), // just under 1.0
        sub_cell_y.clamp(0.0, f32::from_bits(0x3f7f_ffff)),
    )
}

pub(crate) fn map_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Right => MouseButton::Right,
        _ => MouseButton::None,
    }
}

/// Builds a `ttk_events::MouseEvent` from a window-space pixel position plus
/// the pieces `app.rs` has already pulled out of the `winit::event::WindowEvent`
/// it is translating. `timestamp` must be monotonic, non-decreasing across
/// the backend's lifetime (§4.4).
#[allow(clippy::too_many_arguments)]
pub(crate) fn map_mouse_event(
    kind: MouseEventKind,
    x_px: f64,
    y_px: f64,
    cell_w: f64,
    cell_h: f64,
    button: MouseButton,
    scroll_dx: f32,
    scroll_dy: f32,
    timestamp: u64,
    modifiers: Modifiers,
) -> MouseEvent {
    let (col, row, sub_cell_x, sub_cell_y) = pixel_to_cell(x_px, y_px, cell_w, cell_h);
    MouseEvent { kind, col, row, sub_cell_x, sub_cell_y, button, scroll_dx, scroll_dy, timestamp, modifiers }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_pixel_is_cell_zero_zero_with_no_sub_cell_offset() {
        let (col, row, sx, sy) = pixel_to_cell(0.0, 0.0, 8.0, 16.0);
        assert_eq!((col, row), (0, 0));
        assert_eq!(sx, 0.0);
        assert_eq!(sy, 0.0);
    }

    #[test]
    fn midpoint_of_a_cell_reports_half() {
        let (col, row, sx, sy) = pixel_to_cell(4.0, 8.0, 8.0, 16.0);
        assert_eq!((col, row), (0, 0));
        assert_eq!(sx, 0.5);
        assert_eq!(sy, 0.5);
    }

    #[test]
    fn second_cell_column_resolves_correctly() {
        let (col, row, sx, _sy) = pixel_to_cell(9.0, 0.0, 8.0, 16.0);
        assert_eq!(col, 1);
        assert_eq!(row, 0);
        assert!((sx - 0.125).abs() < 1e-5);
    }

    #[test]
    fn map_button_reports_none_for_unmapped_side_buttons() {
        assert_eq!(map_button(winit::event::MouseButton::Back), MouseButton::None);
    }

    #[test]
    fn map_mouse_event_combines_cell_split_with_caller_supplied_fields() {
        let event = map_mouse_event(
            MouseEventKind::ButtonDown,
            9.0,
            0.0,
            8.0,
            16.0,
            MouseButton::Left,
            0.0,
            0.0,
            42,
            Modifiers::SHIFT,
        );
        assert_eq!(event.col, 1);
        assert_eq!(event.row, 0);
        assert_eq!(event.button, MouseButton::Left);
        assert_eq!(event.timestamp, 42);
        assert_eq!(event.modifiers, Modifiers::SHIFT);
    }

    proptest::proptest! {
        /// Property #11: sub_cell_x/sub_cell_y always land in [0, 1).
        #[test]
        fn sub_cell_bounds(
            x_px in 0.0f64..100_000.0,
            y_px in 0.0f64..100_000.0,
            cell_w in 1.0f64..64.0,
            cell_h in 1.0f64..64.0,
        ) {
            let (_, _, sx, sy) = pixel_to_cell(x_px, y_px, cell_w, cell_h);
            prop_assert!(sx >= 0.0 && sx < 1.0);
            prop_assert!(sy >= 0.0 && sy < 1.0);
        }
    }
}
