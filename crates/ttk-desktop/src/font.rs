//! Font discovery, shaping, and rasterization for the desktop backend.
//!
//! Discovery is `fontdb` (scans system font directories, picks a monospace
//! family), shaping is `rustybuzz` (turns a `char` into a glyph id plus
//! advance), and rasterization is `swash` (turns a glyph id into an 8-bit
//! coverage bitmap the GPU pipeline uploads into its glyph atlas texture).

use std::sync::Arc;

use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Vector;
use swash::FontRef;

/// One rasterized glyph: an 8-bit coverage bitmap plus the offsets needed to
/// place it relative to the cell's top-left pixel.
pub(crate) struct GlyphBitmap {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) left: i32,
    pub(crate) top: i32,
    pub(crate) data: Vec<u8>,
}

/// Owns the selected monospace font's raw bytes and face index; `rustybuzz`
/// and `swash` both borrow from the bytes on demand rather than this struct
/// holding a self-referential `Face`/`FontRef`, so the bytes are kept behind
/// an `Arc` and re-parsed per call. Parsing a font's table directory is
/// cheap relative to shaping/rasterizing, so this trades a small constant
/// cost for a simple, non-`unsafe` ownership story.
pub(crate) struct FontContext {
    bytes: Arc<Vec<u8>>,
    face_index: u32,
    point_size: f32,
    cell_w: u16,
    cell_h: u16,
    scale_ctx: ScaleContext,
}

const DEFAULT_POINT_SIZE: f32 = 16.0;
/// Used when no monospace font could be discovered at all (headless CI,
/// sandboxed test containers with no font directories) so the backend still
/// reports a usable, if synthetic, cell geometry instead of dividing by
/// zero downstream in `pixel_to_cell`/the paint pipeline.
const FALLBACK_CELL: (u16, u16) = (8, 16);

impl FontContext {
    pub(crate) fn discover() -> FontContext {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let query = fontdb::Query {
            families: &[fontdb::Family::Monospace],
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let Some(id) = db.query(&query) else {
            tracing::warn!(target: "ttk::desktop", "no monospace font found; using synthetic cell metrics");
            return FontContext {
                bytes: Arc::new(Vec::new()),
                face_index: 0,
                point_size: DEFAULT_POINT_SIZE,
                cell_w: FALLBACK_CELL.0,
                cell_h: FALLBACK_CELL.1,
                scale_ctx: ScaleContext::new(),
            };
        };
        let face_index = db.face(id).map(|face| face.index).unwrap_or(0);
        let bytes = match db.with_face_data(id, |data, _| data.to_vec()) {
            Some(bytes) => bytes,
            None => Vec::new(),
        };
        let mut ctx = FontContext {
            bytes: Arc::new(bytes),
            face_index,
            point_size: DEFAULT_POINT_SIZE,
            cell_w: FALLBACK_CELL.0,
            cell_h: FALLBACK_CELL.1,
            scale_ctx: ScaleContext::new(),
        };
        ctx.recompute_cell_size();
        ctx
    }

    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.bytes, self.face_index as usize)
    }

    fn recompute_cell_size(&mut self) {
        let Some(font) = self.font_ref() else { return };
        let metrics = font.metrics(&[]);
        let scale = self.point_size / metrics.units_per_em as f32;

        let glyph_id: swash::GlyphId = font.charmap().map('M');
        let advance = if glyph_id != 0 {
            font.glyph_metrics(&[]).advance_width(glyph_id) * scale
        } else {
            0.0
        };
        let advance = if advance > 0.0 { advance } else { self.point_size * 0.6 };

        self.cell_w = advance.round().max(1.0) as u16;
        self.cell_h = ((metrics.ascent + metrics.descent + metrics.leading) * scale).round().max(1.0) as u16;
    }

    pub(crate) fn cell_size(&self) -> (u16, u16) {
        (self.cell_w, self.cell_h)
    }

    /// Shapes a single scalar via `rustybuzz` and rasterizes the resulting
    /// glyph via `swash`. Returns `None` for a font-less fallback context or
    /// a glyph the font has no outline for (e.g. most control characters,
    /// already filtered out by `Grid`/`PaintSurface` before this is called).
    pub(crate) fn glyph_bitmap(&mut self, ch: char) -> Option<GlyphBitmap> {
        if self.bytes.is_empty() {
            return None;
        }
        let face = rustybuzz::Face::from_slice(&self.bytes, self.face_index)?;
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(&ch.to_string());
        buffer.guess_segment_properties();
        let shaped = rustybuzz::shape(&face, &[], buffer);
        let glyph_id: swash::GlyphId = shaped.glyph_infos().first()?.glyph_id as swash::GlyphId;

        let font = self.font_ref()?;
        let mut scaler = self.scale_ctx.builder(font).size(self.point_size).hint(true).build();
        let image = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
        ])
        .format(swash::zeno::Format::Alpha)
        .offset(Vector::new(0.0, 0.0))
        .render(&mut scaler, glyph_id)?;

        if image.placement.width == 0 || image.placement.height == 0 {
            return None;
        }
        Some(GlyphBitmap {
            width: image.placement.width,
            height: image.placement.height,
            left: image.placement.left,
            top: image.placement.top,
            data: image.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fontless_context_reports_fallback_cell_size_and_no_glyphs() {
        let mut ctx = FontContext {
            bytes: Arc::new(Vec::new()),
            face_index: 0,
            point_size: DEFAULT_POINT_SIZE,
            cell_w: FALLBACK_CELL.0,
            cell_h: FALLBACK_CELL.1,
            scale_ctx: ScaleContext::new(),
        };
        assert_eq!(ctx.cell_size(), FALLBACK_CELL);
        assert!(ctx.glyph_bitmap('a').is_none());
    }

    /// This environment may have no system fonts installed; discovery must
    /// never panic either way, and the reported cell size is always
    /// non-zero so downstream pixel-space math never divides by zero.
    #[test]
    fn discover_never_panics_and_reports_nonzero_cell_size() {
        let ctx = FontContext::discover();
        let (w, h) = ctx.cell_size();
        assert!(w > 0);
        assert!(h > 0);
    }
}
