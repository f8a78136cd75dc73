//! Phase 2 (cell iteration + background batching) performance benchmark.
//!
//! The design's performance contract requires a 24x80 dirty region to batch
//! in under 50ms on commodity hardware; this benchmark exercises the same
//! path `paint` drives in Phase 2 so a regression shows up in `criterion`'s
//! report rather than only at the property-test boundary.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ttk_grid::{CellFlags, ColorPair, Grid, Rgb};
use ttk_render::{paint, BgRect, PaintSurface};

struct NullSurface;

impl PaintSurface for NullSurface {
    fn cell_size(&self) -> (u16, u16) {
        (8, 16)
    }
    fn draw_bg_rect(&mut self, rect: BgRect) {
        black_box(rect);
    }
    fn draw_glyph(&mut self, row: u16, col: u16, ch: char, fg: Rgb) {
        black_box((row, col, ch, fg));
    }
    fn place_caret(&mut self, position: Option<(u16, u16)>) {
        black_box(position);
    }
}

fn checkerboard_grid() -> Grid {
    let mut grid = Grid::new(24, 80, ColorPair { fg_rgb: Rgb(255, 255, 255), bg_rgb: Rgb(0, 0, 0) });
    grid.pairs_mut().define(1, ColorPair { fg_rgb: Rgb(0, 255, 0), bg_rgb: Rgb(20, 20, 20) });
    for row in 0..24 {
        for col in 0..80 {
            let pair = if (row + col) % 2 == 0 { 0 } else { 1 };
            grid.put_char(row, col, 'x', pair, CellFlags::empty());
        }
    }
    grid
}

fn bench_full_frame_batching(c: &mut Criterion) {
    c.bench_function("paint_24x80_checkerboard", |b| {
        b.iter_batched(
            checkerboard_grid,
            |mut grid| {
                let mut surface = NullSurface;
                paint(&mut grid, &mut surface, Some((0, 0)));
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_uniform_frame_batching(c: &mut Criterion) {
    c.bench_function("paint_24x80_uniform", |b| {
        b.iter_batched(
            || {
                let mut grid = Grid::new(24, 80, ColorPair { fg_rgb: Rgb(255, 255, 255), bg_rgb: Rgb(0, 0, 0) });
                grid.fill_rect(0, 0, 24, 80, 0);
                grid
            },
            |mut grid| {
                let mut surface = NullSurface;
                paint(&mut grid, &mut surface, None);
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_full_frame_batching, bench_uniform_frame_batching);
criterion_main!(benches);
