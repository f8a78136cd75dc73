//! The character grid: a dense `Vec<Cell>` indexed `r * cols + c`, its colour
//! pair table, and the damage tracker that coalesces per-cell dirty flags into
//! a bounding rectangle for the render pipeline (see `ttk-render`).
//!
//! Dictionary-keyed grid access in the source this toolkit descends from
//! becomes a single contiguous slice here; the inner render loop in
//! `ttk-render` binds references to this slice and to the pair table once,
//! outside the per-cell loop.

pub mod cell;
pub mod color;
pub mod damage;
pub mod rect;

pub use cell::{Cell, CellFlags};
pub use color::{ColorPair, ColorPairTable, Rgb};
pub use damage::DamageTracker;
pub use rect::Rect;

/// Dense `rows x cols` array of [`Cell`]s plus the colour pair table and
/// damage tracker for the region. Owns the single allocation every backend
/// draws from.
pub struct Grid {
    rows: u16,
    cols: u16,
    cells: Vec<Cell>,
    pairs: ColorPairTable,
    damage: DamageTracker,
}

impl Grid {
    /// Allocates a `rows x cols` grid of empty cells and a pair table seeded
    /// with pair 0 (the default pair, required to exist at init).
    pub fn new(rows: u16, cols: u16, default_pair: ColorPair) -> Self {
        let mut pairs = ColorPairTable::new();
        pairs.define(0, default_pair);
        let cells = vec![Cell::default(); usize::from(rows) * usize::from(cols)];
        Grid {
            rows,
            cols,
            cells,
            pairs,
            damage: DamageTracker::new(rows, cols),
        }
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    pub fn pairs(&self) -> &ColorPairTable {
        &self.pairs
    }

    pub fn pairs_mut(&mut self) -> &mut ColorPairTable {
        &mut self.pairs
    }

    pub fn damage(&self) -> &DamageTracker {
        &self.damage
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(usize::from(row) * usize::from(self.cols) + usize::from(col))
        } else {
            None
        }
    }

    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// Invariant #1 (grid clipping is total): out-of-bounds coordinates leave
    /// the grid unchanged and never panic.
    pub fn put_char(&mut self, row: u16, col: u16, ch: char, pair: u16, flags: CellFlags) {
        let Some(i) = self.index(row, col) else {
            return;
        };
        let resolved_pair = if self.pairs.get(pair).is_some() { pair } else { 0 };
        let new_cell = Cell { glyph: ch, pair: resolved_pair, flags };
        if self.cells[i] != new_cell {
            self.cells[i] = new_cell;
            self.damage.mark(row, col);
        }
    }

    /// Fills a rectangle's background by rewriting every covered cell's pair,
    /// preserving each cell's existing glyph and attributes other than the
    /// pair id. Out-of-bounds rows/cols are silently clipped to the grid.
    pub fn fill_rect(&mut self, row: u16, col: u16, height: u16, width: u16, pair: u16) {
        let resolved_pair = if self.pairs.get(pair).is_some() { pair } else { 0 };
        let row_end = row.saturating_add(height).min(self.rows);
        let col_end = col.saturating_add(width).min(self.cols);
        if row >= row_end || col >= col_end {
            return;
        }
        for r in row..row_end {
            for c in col..col_end {
                let i = self.index(r, c).expect("clipped range stays in bounds");
                if self.cells[i].pair != resolved_pair {
                    self.cells[i].pair = resolved_pair;
                }
            }
        }
        self.damage.mark_rect(Rect { row, col, height: row_end - row, width: col_end - col });
    }

    /// Fills the whole grid with empty cells and marks it entirely dirty.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
        self.damage.mark_all();
    }

    /// Reallocates the backing buffer at the new dimensions, re-initialised
    /// to empty, and marks the whole grid dirty (resize transition in the
    /// damage tracker state machine).
    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.rows = rows;
        self.cols = cols;
        self.cells = vec![Cell::default(); usize::from(rows) * usize::from(cols)];
        self.damage = DamageTracker::new(rows, cols);
        self.damage.mark_all();
    }

    /// Row-major iterator over `(row, col, &Cell)` within `rect`, clipped to
    /// the grid bounds. Used by the render pipeline's Phase 2 batching pass.
    pub fn iter_rect(&self, rect: Rect) -> impl Iterator<Item = (u16, u16, &Cell)> {
        let row_end = rect.row.saturating_add(rect.height).min(self.rows);
        let col_end = rect.col.saturating_add(rect.width).min(self.cols);
        let row_start = rect.row.min(row_end);
        let col_start = rect.col.min(col_end);
        (row_start..row_end).flat_map(move |r| {
            (col_start..col_end).map(move |c| {
                let i = usize::from(r) * usize::from(self.cols) + usize::from(c);
                (r, c, &self.cells[i])
            })
        })
    }

    /// Consumes the damage tracker's current bounds and clears it, per the
    /// `Dirty --refresh--> Clean` transition. Phases 1-5 in `ttk-render`
    /// drive this.
    pub fn take_damage(&mut self) -> Option<Rect> {
        self.damage.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pair() -> ColorPair {
        ColorPair { fg_rgb: Rgb(255, 255, 255), bg_rgb: Rgb(0, 0, 0) }
    }

    #[test]
    fn new_grid_is_all_empty_cells() {
        let grid = Grid::new(4, 4, default_pair());
        for r in 0..4 {
            for c in 0..4 {
                assert_eq!(grid.cell(r, c), Some(&Cell::default()));
            }
        }
    }

    #[test]
    fn put_char_out_of_bounds_is_silently_clipped() {
        let mut grid = Grid::new(2, 2, default_pair());
        grid.put_char(10, 10, 'x', 0, CellFlags::empty());
        for r in 0..2 {
            for c in 0..2 {
                assert_eq!(grid.cell(r, c), Some(&Cell::default()));
            }
        }
    }

    #[test]
    fn put_char_unknown_pair_substitutes_pair_zero() {
        let mut grid = Grid::new(2, 2, default_pair());
        grid.put_char(0, 0, 'x', 99, CellFlags::empty());
        assert_eq!(grid.cell(0, 0).unwrap().pair, 0);
    }

    #[test]
    fn put_char_marks_cell_dirty_only_on_change() {
        let mut grid = Grid::new(2, 2, default_pair());
        assert!(grid.take_damage().is_none());
        grid.put_char(0, 0, 'x', 0, CellFlags::empty());
        assert_eq!(grid.take_damage(), Some(Rect { row: 0, col: 0, height: 1, width: 1 }));
        assert!(grid.take_damage().is_none());
    }

    #[test]
    fn resize_marks_whole_grid_dirty() {
        let mut grid = Grid::new(2, 2, default_pair());
        grid.take_damage();
        grid.resize(3, 5);
        assert_eq!(grid.dimensions(), (3, 5));
        assert_eq!(grid.take_damage(), Some(Rect { row: 0, col: 0, height: 3, width: 5 }));
    }

    #[test]
    fn iter_rect_is_row_major_and_clipped() {
        let mut grid = Grid::new(2, 2, default_pair());
        grid.put_char(0, 0, 'a', 0, CellFlags::empty());
        grid.put_char(0, 1, 'b', 0, CellFlags::empty());
        let collected: Vec<char> = grid
            .iter_rect(Rect { row: 0, col: 0, height: 10, width: 10 })
            .map(|(_, _, cell)| cell.glyph)
            .collect();
        assert_eq!(collected, vec!['a', 'b', ' ', ' ']);
    }

    proptest::proptest! {
        #[test]
        fn grid_clipping_is_total(row in 0u16..=2000, col in 0u16..=2000, ch in proptest::char::any()) {
            let mut grid = Grid::new(24, 80, default_pair());
            grid.put_char(row, col, ch, 0, CellFlags::empty());
            if row >= 24 || col >= 80 {
                for r in 0..24 {
                    for c in 0..80 {
                        prop_assert_eq!(grid.cell(r, c), Some(&Cell::default()));
                    }
                }
            }
        }
    }
}
