use crate::Rect;

/// Per-cell dirty flags plus a cached bounding rectangle, so Phase 1 of the
/// render pipeline can answer "what changed" in O(1) while invariant #3
/// ("the dirty bounding rectangle covers every cell whose dirty flag is
/// set") stays checkable against the flag array in tests.
///
/// State machine (see the rendering pipeline design):
///
/// ```text
/// Clean  --put/fill-->  Dirty(bounds)
/// Dirty  --put/fill-->  Dirty(bounds ∪ new_rect)
/// Dirty  --refresh-->   Clean   (take() clears both the flags and bounds)
/// *      --resize-->    Dirty(whole-grid)
/// ```
pub struct DamageTracker {
    rows: u16,
    cols: u16,
    flags: Vec<bool>,
    bounds: Option<Rect>,
}

impl DamageTracker {
    pub fn new(rows: u16, cols: u16) -> Self {
        DamageTracker {
            rows,
            cols,
            flags: vec![false; usize::from(rows) * usize::from(cols)],
            bounds: None,
        }
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(usize::from(row) * usize::from(self.cols) + usize::from(col))
        } else {
            None
        }
    }

    pub fn is_dirty(&self, row: u16, col: u16) -> bool {
        self.index(row, col).map(|i| self.flags[i]).unwrap_or(false)
    }

    pub fn mark(&mut self, row: u16, col: u16) {
        self.mark_rect(Rect { row, col, height: 1, width: 1 });
    }

    pub fn mark_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let row_end = rect.row_end().min(self.rows);
        let col_end = rect.col_end().min(self.cols);
        for r in rect.row.min(row_end)..row_end {
            for c in rect.col.min(col_end)..col_end {
                let i = usize::from(r) * usize::from(self.cols) + usize::from(c);
                self.flags[i] = true;
            }
        }
        let clipped = Rect {
            row: rect.row.min(row_end),
            col: rect.col.min(col_end),
            height: row_end.saturating_sub(rect.row.min(row_end)),
            width: col_end.saturating_sub(rect.col.min(col_end)),
        };
        if !clipped.is_empty() {
            self.bounds = Some(self.bounds.unwrap_or_default().union(clipped));
        }
    }

    pub fn mark_all(&mut self) {
        for f in &mut self.flags {
            *f = true;
        }
        self.bounds = Some(Rect { row: 0, col: 0, height: self.rows, width: self.cols });
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Consumes the current bounds and clears every flag within it,
    /// implementing the `Dirty --refresh--> Clean` transition. Returns
    /// `None` (and leaves state untouched) when nothing was dirty.
    pub fn take(&mut self) -> Option<Rect> {
        let bounds = self.bounds.take()?;
        for r in bounds.row..bounds.row_end().min(self.rows) {
            for c in bounds.col..bounds.col_end().min(self.cols) {
                let i = usize::from(r) * usize::from(self.cols) + usize::from(c);
                self.flags[i] = false;
            }
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_tracker_has_no_bounds() {
        let tracker = DamageTracker::new(4, 4);
        assert_eq!(tracker.bounds(), None);
    }

    #[test]
    fn mark_then_mark_unions_bounds() {
        let mut tracker = DamageTracker::new(10, 10);
        tracker.mark(0, 0);
        tracker.mark(5, 5);
        assert_eq!(tracker.bounds(), Some(Rect { row: 0, col: 0, height: 6, width: 6 }));
    }

    #[test]
    fn take_clears_flags_within_bounds() {
        let mut tracker = DamageTracker::new(4, 4);
        tracker.mark(1, 1);
        assert!(tracker.is_dirty(1, 1));
        let taken = tracker.take();
        assert_eq!(taken, Some(Rect { row: 1, col: 1, height: 1, width: 1 }));
        assert!(!tracker.is_dirty(1, 1));
        assert_eq!(tracker.bounds(), None);
    }

    #[test]
    fn take_on_clean_tracker_returns_none() {
        let mut tracker = DamageTracker::new(4, 4);
        assert_eq!(tracker.take(), None);
    }

    #[test]
    fn resize_marks_whole_grid() {
        let mut tracker = DamageTracker::new(2, 2);
        tracker.mark_all();
        assert_eq!(tracker.bounds(), Some(Rect { row: 0, col: 0, height: 2, width: 2 }));
        assert!(tracker.is_dirty(0, 0));
        assert!(tracker.is_dirty(1, 1));
    }

    proptest::proptest! {
        /// Property #2: after any sequence of marks, the bounding rectangle
        /// contains every cell whose dirty flag is set.
        #[test]
        fn dirty_bounds_cover_dirty_cells(
            marks in proptest::collection::vec((0u16..24, 0u16..80), 0..50)
        ) {
            let mut tracker = DamageTracker::new(24, 80);
            for (r, c) in &marks {
                tracker.mark(*r, *c);
            }
            if let Some(bounds) = tracker.bounds() {
                for r in 0..24 {
                    for c in 0..80 {
                        if tracker.is_dirty(r, c) {
                            prop_assert!(bounds.contains(r, c));
                        }
                    }
                }
            } else {
                prop_assert!(marks.is_empty());
            }
        }
    }
}
