//! A single-line text-entry layer, implementing the documented text-widget
//! contract from §4.5 (a reference pattern, not a mandated component).
//!
//! Open question resolution (see DESIGN.md): the cursor is tracked as a
//! grapheme-cluster index into the line, advancing by exactly one per
//! `CharEvent` regardless of the inserted character's display width. The
//! grid *column* the caret is placed at is derived separately by summing the
//! display width of every grapheme before the cursor — so a wide character
//! still occupies two grid cells on screen, but one `CharEvent` still moves
//! the logical cursor by one position, matching ordinary text-editor
//! semantics rather than the rendering width.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use ttk_events::{Consumed, Event, KeyCode, SpecialKey};
use ttk_grid::Rect;
use ttk_render::Renderer;

use crate::Layer;

/// A single-line, single-style text field. Lives entirely in grapheme-index
/// space; wide-character rendering width is only ever computed when mapping
/// the cursor to a grid column.
pub struct TextWidget {
    bounds: Rect,
    text: String,
    cursor: usize,
    dirty: bool,
    pair: u16,
}

impl TextWidget {
    pub fn new(bounds: Rect, pair: u16) -> Self {
        TextWidget { bounds, text: String::new(), cursor: 0, dirty: true, pair }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn graphemes(&self) -> Vec<&str> {
        self.text.graphemes(true).collect()
    }

    /// Display column of the cursor: the sum of the display width of every
    /// grapheme before it.
    fn cursor_column(&self) -> u16 {
        let graphemes = self.graphemes();
        graphemes[..self.cursor.min(graphemes.len())]
            .iter()
            .map(|g| UnicodeWidthStr::width(*g).max(1) as u16)
            .sum()
    }

    fn byte_offset(&self, grapheme_index: usize) -> usize {
        self.graphemes()[..grapheme_index].iter().map(|g| g.len()).sum()
    }

    /// Inserts `ch` at the cursor and advances the cursor by one grapheme.
    pub fn insert_char(&mut self, ch: char) {
        let offset = self.byte_offset(self.cursor);
        self.text.insert(offset, ch);
        self.cursor += 1;
        self.dirty = true;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
        self.dirty = true;
    }

    pub fn delete_forward(&mut self) {
        let len = self.graphemes().len();
        if self.cursor >= len {
            return;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.text.replace_range(start..end, "");
        self.dirty = true;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.dirty = true;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.graphemes().len() {
            self.cursor += 1;
            self.dirty = true;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
        self.dirty = true;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.graphemes().len();
        self.dirty = true;
    }

    /// Records gaining focus: forces the next draw to re-place the caret.
    pub fn on_focus_gained(&mut self) {
        self.dirty = true;
    }
}

impl Layer for TextWidget {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn handle_event(&mut self, event: &Event) -> Consumed {
        match event {
            Event::Char(c) => {
                self.insert_char(c.char);
                true
            }
            Event::Key(k) => match k.key {
                KeyCode::Special(SpecialKey::Backspace) => {
                    self.backspace();
                    true
                }
                KeyCode::Special(SpecialKey::Delete) => {
                    self.delete_forward();
                    true
                }
                KeyCode::Special(SpecialKey::Left) => {
                    self.move_left();
                    true
                }
                KeyCode::Special(SpecialKey::Right) => {
                    self.move_right();
                    true
                }
                KeyCode::Special(SpecialKey::Home) => {
                    self.move_home();
                    true
                }
                KeyCode::Special(SpecialKey::End) => {
                    self.move_end();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn draw(&mut self, renderer: &mut dyn Renderer) {
        renderer.fill_rect(self.bounds.row, self.bounds.col, 1, self.bounds.width, self.pair);
        for (i, g) in self.graphemes().iter().enumerate() {
            let col = self.bounds.col + self.cursor_column_of(i);
            if col >= self.bounds.col_end() {
                break;
            }
            if let Some(ch) = g.chars().next() {
                renderer.put_char(self.bounds.row, col, ch, self.pair, ttk_grid::CellFlags::empty());
            }
        }
        renderer
            .set_caret_position(self.bounds.row, self.bounds.col + self.cursor_column());
        self.dirty = false;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl TextWidget {
    fn cursor_column_of(&self, grapheme_index: usize) -> u16 {
        let graphemes = self.graphemes();
        graphemes[..grapheme_index].iter().map(|g| UnicodeWidthStr::width(*g).max(1) as u16).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttk_events::CharEvent;

    fn widget() -> TextWidget {
        TextWidget::new(Rect { row: 0, col: 0, height: 1, width: 20 }, 0)
    }

    #[test]
    fn char_event_inserts_at_cursor_and_advances_by_one() {
        let mut w = widget();
        w.handle_event(&Event::Char(CharEvent { char: 'a' }));
        w.handle_event(&Event::Char(CharEvent { char: 'b' }));
        assert_eq!(w.text(), "ab");
        assert_eq!(w.cursor, 2);
    }

    #[test]
    fn wide_character_insertion_still_advances_cursor_by_one() {
        let mut w = widget();
        w.handle_event(&Event::Char(CharEvent { char: '漢' }));
        w.handle_event(&Event::Char(CharEvent { char: 'a' }));
        assert_eq!(w.text(), "漢a");
        assert_eq!(w.cursor, 2);
        // But the display column for the second grapheme accounts for the
        // first one's width-2 rendering.
        assert_eq!(w.cursor_column(), 3);
    }

    #[test]
    fn backspace_removes_previous_grapheme() {
        let mut w = widget();
        w.insert_char('a');
        w.insert_char('b');
        w.backspace();
        assert_eq!(w.text(), "a");
        assert_eq!(w.cursor, 1);
    }

    #[test]
    fn move_left_right_clamp_at_bounds() {
        let mut w = widget();
        w.insert_char('a');
        w.move_left();
        w.move_left();
        assert_eq!(w.cursor, 0);
        w.move_right();
        w.move_right();
        assert_eq!(w.cursor, 1);
    }

    #[test]
    fn home_and_end_move_to_line_boundaries() {
        let mut w = widget();
        w.insert_char('a');
        w.insert_char('b');
        w.insert_char('c');
        w.move_home();
        assert_eq!(w.cursor, 0);
        w.move_end();
        assert_eq!(w.cursor, 3);
    }
}
