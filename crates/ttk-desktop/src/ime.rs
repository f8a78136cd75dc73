//! OS-driven text composition state (§4.6).
//!
//! `winit` turns a platform's native text-input callbacks (macOS
//! `NSTextInputClient`, the Windows TSF, IBus on Linux) into a single
//! cross-platform `WindowEvent::Ime` stream rather than calling back into
//! application code for each query; cursor-area placement is like wise
//! pushed out via `Window::set_ime_cursor_area` instead of pulled in by an
//! OS rect query. This module keeps the §4.6 method names and shapes so the
//! contract reads the same as the query-based protocol it is grounded on,
//! while the actual OS plumbing underneath is `winit`'s push model.

use ttk_events::CharEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ImeState {
    marked_text: String,
    marked_selection: (usize, usize),
    caret_cell: (u16, u16),
}

impl ImeState {
    pub(crate) fn has_marked_text(&self) -> bool {
        !self.marked_text.is_empty()
    }

    /// `(start, end)` character offsets of the composition buffer, or `None`
    /// when nothing is being composed.
    pub(crate) fn marked_range(&self) -> Option<(usize, usize)> {
        self.has_marked_text().then(|| (0, self.marked_text.chars().count()))
    }

    pub(crate) fn selected_range(&self) -> (usize, usize) {
        self.marked_selection
    }

    /// Called from `WindowEvent::Ime(Ime::Preedit(text, cursor_range))`. No
    /// `CharEvent`s are produced during composition (§4.6).
    pub(crate) fn set_marked_text(&mut self, text: String, selected_range: Option<(usize, usize)>) {
        self.marked_text = text;
        self.marked_selection = selected_range.unwrap_or((0, 0));
    }

    pub(crate) fn unmark_text(&mut self) {
        self.marked_text.clear();
        self.marked_selection = (0, 0);
    }

    /// Called from `WindowEvent::Ime(Ime::Commit(text))`. Clears composition
    /// state and returns one `CharEvent` per Unicode scalar, in order.
    pub(crate) fn insert_text(&mut self, text: &str) -> Vec<CharEvent> {
        self.unmark_text();
        text.chars().map(|char| CharEvent { char }).collect()
    }

    pub(crate) fn set_caret_cell(&mut self, row: u16, col: u16) {
        self.caret_cell = (row, col);
    }

    /// Screen-space rectangle of the caret cell in window-logical pixels, so
    /// the OS candidate window is positioned correctly. `(0, 0, 0, 0)` when
    /// `cell_w`/`cell_h` are not yet known (no font loaded, no window).
    pub(crate) fn first_rect_for_character_range(&self, cell_w: f64, cell_h: f64) -> (f64, f64, f64, f64) {
        if cell_w <= 0.0 || cell_h <= 0.0 {
            return (0.0, 0.0, 0.0, 0.0);
        }
        let (row, col) = self.caret_cell;
        (f64::from(col) * cell_w, f64::from(row) * cell_h, cell_w, cell_h)
    }

    /// A minimal string carrying the composition text; the backend draws it
    /// in its own font so OS-rendered composition matches the grid's
    /// metrics, rather than returning rich attributes the platform would
    /// otherwise supply.
    pub(crate) fn attributed_substring_for_proposed_range(&self) -> String {
        self.marked_text.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_no_marked_text() {
        let state = ImeState::default();
        assert!(!state.has_marked_text());
        assert_eq!(state.marked_range(), None);
    }

    #[test]
    fn set_marked_text_reports_range_over_composition_buffer() {
        let mut state = ImeState::default();
        state.set_marked_text("nihao".to_string(), Some((0, 2)));
        assert!(state.has_marked_text());
        assert_eq!(state.marked_range(), Some((0, 5)));
        assert_eq!(state.selected_range(), (0, 2));
    }

    #[test]
    fn unmark_clears_composition_state() {
        let mut state = ImeState::default();
        state.set_marked_text("n".to_string(), None);
        state.unmark_text();
        assert!(!state.has_marked_text());
        assert_eq!(state.marked_range(), None);
    }

    #[test]
    fn insert_text_clears_composition_and_emits_one_char_event_per_scalar() {
        let mut state = ImeState::default();
        state.set_marked_text("ni".to_string(), None);
        let events = state.insert_text("\u{4f60}\u{597d}");
        assert!(!state.has_marked_text());
        assert_eq!(events, vec![CharEvent { char: '\u{4f60}' }, CharEvent { char: '\u{597d}' }]);
    }

    #[test]
    fn first_rect_for_character_range_tracks_caret_cell() {
        let mut state = ImeState::default();
        state.set_caret_cell(2, 3);
        assert_eq!(state.first_rect_for_character_range(8.0, 16.0), (24.0, 32.0, 8.0, 16.0));
    }

    #[test]
    fn first_rect_for_character_range_is_zero_without_known_cell_metrics() {
        let state = ImeState::default();
        assert_eq!(state.first_rect_for_character_range(0.0, 0.0), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn attributed_substring_mirrors_marked_text() {
        let mut state = ImeState::default();
        state.set_marked_text("draft".to_string(), None);
        assert_eq!(state.attributed_substring_for_proposed_range(), "draft");
    }
}
