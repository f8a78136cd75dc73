use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

bitflags! {
    /// Attributes a cell may carry. Rich text beyond this set (styled runs,
    /// proportional weight, colour gradients) is an explicit non-goal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const BOLD      = 0b001;
        const UNDERLINE = 0b010;
        const REVERSE   = 0b100;
    }
}

/// One character position in the grid. A space with no attributes and pair 0
/// is the canonical empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub pair: u16,
    pub flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Cell { glyph: ' ', pair: 0, flags: CellFlags::empty() }
    }
}

impl Cell {
    /// Display width in grid columns: 2 for East-Asian-wide glyphs, else 1.
    /// Phase 4 of the render pipeline draws a wide glyph only at its left
    /// cell; the right-hand cell is left untouched by the writer (it still
    /// exists in the grid as an ordinary cell so put_char/fill_rect indexing
    /// stays simple, but the application is responsible for not placing a
    /// second glyph there — the open question in the design notes about
    /// cursor-advance semantics is documented in `ttk-layers::text_widget`).
    pub fn display_width(&self) -> u8 {
        UnicodeWidthChar::width(self.glyph).unwrap_or(1).clamp(1, 2) as u8
    }

    /// Whether this cell renders as nothing: the empty glyph with no
    /// attributes (Phase 4's "is not U+0020 with no attributes" clause).
    pub fn is_blank(&self) -> bool {
        self.glyph == ' ' && self.flags.is_empty()
    }
}
