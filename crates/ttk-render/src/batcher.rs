use ttk_grid::Rgb;

/// A filled background rectangle, in pixel space, ready for the backend to
/// draw in a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BgRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub bg: Rgb,
}

impl BgRect {
    fn right(&self) -> i32 {
        self.x + self.w
    }
}

/// Coalesces same-background adjacent cells within a row into filled
/// rectangles. Purely accumulative: `add_cell` never issues a draw call, it
/// only ever grows `rects` (via `drain`). Mirrors the teacher's
/// `BatchWriter::flush_pending` batching discipline, generalised from
/// consecutive plain-text runs to consecutive same-background cell runs.
#[derive(Debug, Default)]
pub struct RectBatcher {
    pending: Option<BgRect>,
    rects: Vec<BgRect>,
}

impl RectBatcher {
    pub fn new() -> Self {
        RectBatcher::default()
    }

    /// Adds one cell's background to the in-progress rectangle for its row,
    /// or flushes the current one and starts a new one when the colour
    /// differs or the cell is not adjacent.
    ///
    /// Adjacency test (per the detailed batcher contract): `bg == current.bg
    /// && x == current.right()`.
    pub fn add_cell(&mut self, x: i32, y: i32, w: i32, h: i32, bg: Rgb) {
        match &mut self.pending {
            Some(current) if current.bg == bg && x == current.right() && y == current.y => {
                current.w += w;
            }
            _ => {
                self.flush_pending();
                self.pending = Some(BgRect { x, y, w, h, bg });
            }
        }
    }

    fn flush_pending(&mut self) {
        if let Some(rect) = self.pending.take() {
            self.rects.push(rect);
        }
    }

    /// Closes any open rectangle at a row boundary. Rectangles never span
    /// rows; callers must call this between rows.
    pub fn finish_row(&mut self) {
        self.flush_pending();
    }

    /// Drains every rectangle produced so far, in emission order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, BgRect> {
        self.rects.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none() && self.rects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(n: u8) -> Rgb {
        Rgb(n, n, n)
    }

    #[test]
    fn adjacent_same_colour_cells_merge_into_one_rect() {
        let mut b = RectBatcher::new();
        b.add_cell(0, 0, 8, 16, rgb(1));
        b.add_cell(8, 0, 8, 16, rgb(1));
        b.add_cell(16, 0, 8, 16, rgb(1));
        b.finish_row();
        let rects: Vec<_> = b.drain().collect();
        assert_eq!(rects, vec![BgRect { x: 0, y: 0, w: 24, h: 16, bg: rgb(1) }]);
    }

    #[test]
    fn differing_colour_starts_new_rect() {
        let mut b = RectBatcher::new();
        b.add_cell(0, 0, 8, 16, rgb(1));
        b.add_cell(8, 0, 8, 16, rgb(2));
        b.finish_row();
        let rects: Vec<_> = b.drain().collect();
        assert_eq!(
            rects,
            vec![
                BgRect { x: 0, y: 0, w: 8, h: 16, bg: rgb(1) },
                BgRect { x: 8, y: 0, w: 8, h: 16, bg: rgb(2) },
            ]
        );
    }

    #[test]
    fn finish_row_always_emits_open_rect() {
        let mut b = RectBatcher::new();
        b.add_cell(0, 0, 8, 16, rgb(1));
        assert!(b.drain().next().is_none());
        b.finish_row();
        assert_eq!(b.drain().next(), Some(BgRect { x: 0, y: 0, w: 8, h: 16, bg: rgb(1) }));
    }

    #[test]
    fn rects_never_span_rows() {
        let mut b = RectBatcher::new();
        b.add_cell(0, 0, 8, 16, rgb(1));
        b.finish_row();
        b.add_cell(0, 16, 8, 16, rgb(1));
        b.finish_row();
        let rects: Vec<_> = b.drain().collect();
        assert_eq!(rects.len(), 2);
        for r in &rects {
            assert_eq!(r.h, 16);
        }
    }

    proptest::proptest! {
        /// Property #4: no rectangle emitted spans more than one row.
        #[test]
        fn batcher_row_locality(
            rows in proptest::collection::vec(
                proptest::collection::vec(0u8..4, 1..20),
                1..10,
            )
        ) {
            let mut b = RectBatcher::new();
            let mut y = 0;
            for row in &rows {
                let mut x = 0;
                for &color in row {
                    b.add_cell(x, y, 8, 16, rgb(color));
                    x += 8;
                }
                b.finish_row();
                y += 16;
            }
            for rect in b.drain() {
                prop_assert_eq!(rect.h, 16);
            }
        }
    }
}
