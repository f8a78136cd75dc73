use ttk_grid::{Grid, Rect};

use crate::RectBatcher;

/// Backend-specific drawing operations the shared paint pipeline calls into
/// for Phases 3-5. Phases 1-2 (damage computation and background batching)
/// are pure data-structure work shared by every backend and live in
/// [`paint`] itself; only the actual draw calls differ between
/// `ttk-terminal` (escape sequences) and `ttk-desktop` (wgpu draw calls).
pub trait PaintSurface {
    /// Pixel (or cell, for terminal backends) dimensions of one grid cell.
    fn cell_size(&self) -> (u16, u16);

    /// Phase 3: draw one batched background rectangle. Pixel-exact on the
    /// cell grid.
    fn draw_bg_rect(&mut self, rect: crate::BgRect);

    /// Phase 4: draw one glyph at its cell position, in the given effective
    /// foreground colour. Never called for blank cells or for the
    /// right-hand cell of a wide character.
    fn draw_glyph(&mut self, row: u16, col: u16, ch: char, fg: ttk_grid::Rgb);

    /// Phase 5: place the OS/terminal caret at the given cell, or hide it
    /// when `None`.
    fn place_caret(&mut self, position: Option<(u16, u16)>);
}

/// Runs Phases 1-5 of the render pipeline against `grid`'s current damage.
/// Returns immediately (without touching `surface`) if nothing is dirty.
///
/// Phase 2's inner loop pre-binds the grid and pair table references once,
/// outside the loop, and hoists the per-row pixel-y computation out of the
/// per-cell loop, per the performance contract (a 24x80 region must batch in
/// under 50ms).
pub fn paint<S: PaintSurface>(grid: &mut Grid, surface: &mut S, caret: Option<(u16, u16)>) {
    // Phase 1.
    let Some(dirty) = grid.take_damage() else {
        return;
    };
    if dirty.is_empty() {
        return;
    }

    let (cell_w, cell_h) = surface.cell_size();
    let (cell_w, cell_h) = (i32::from(cell_w), i32::from(cell_h));
    let pairs = grid.pairs();
    let row_end = dirty.row_end();
    let col_end = dirty.col_end();

    // Phase 2.
    let mut batcher = RectBatcher::new();
    for row in dirty.row..row_end {
        let y = i32::from(row) * cell_h;
        for (_, col, cell) in grid.iter_rect(Rect { row, col: dirty.col, height: 1, width: col_end - dirty.col }) {
            let bg = pairs.effective_background(cell.pair, cell.flags);
            let x = i32::from(col) * cell_w;
            batcher.add_cell(x, y, cell_w, cell_h, bg);
        }
        batcher.finish_row();
    }

    // Phase 3.
    for rect in batcher.drain() {
        surface.draw_bg_rect(rect);
    }

    // Phase 4.
    for row in dirty.row..row_end {
        let mut skip_next = false;
        for (_, col, cell) in grid.iter_rect(Rect { row, col: dirty.col, height: 1, width: col_end - dirty.col }) {
            if skip_next {
                skip_next = false;
                continue;
            }
            if !cell.is_blank() {
                let fg = pairs.effective_foreground(cell.pair, cell.flags);
                surface.draw_glyph(row, col, cell.glyph, fg);
            }
            skip_next = cell.display_width() == 2;
        }
    }

    // Phase 5.
    let in_bounds = caret
        .map(|(r, c)| r < grid.dimensions().0 && c < grid.dimensions().1)
        .unwrap_or(false);
    surface.place_caret(if in_bounds { caret } else { None });
}
