//! UI-layer stack: an ordered set of layers where only the top layer receives
//! input, each owning a rectangle and responsible for its own redraw
//! discipline.
//!
//! Replaces the class-hierarchy-plus-isinstance pattern named in the design
//! notes with a plain trait object stack: `handle_event`/`draw` are the only
//! two required operations, and the stack itself enforces top-of-stack-only
//! dispatch rather than leaving propagation order to caller discipline.

pub mod stack;
pub mod text_widget;

pub use stack::{Layer, LayerId, LayerStack};
pub use text_widget::TextWidget;

use ttk_events::{Consumed, Event};
use ttk_grid::Rect;

/// Offers `event` to `stack.top()` only, per the dispatch rule in §4.4/§4.5:
/// "the dispatcher offers the event to `layers.last()` only and does NOT
/// propagate if the layer returns not-consumed."
pub fn dispatch_top_only(stack: &mut LayerStack, event: &Event) -> Consumed {
    match stack.top_mut() {
        Some(layer) => layer.handle_event(event),
        None => false,
    }
}

/// Hit-tests `(col, row)` against every layer's bounds, returning the id of
/// the topmost layer containing the point (top of stack wins ties).
pub fn topmost_layer_at(stack: &LayerStack, col: u16, row: u16) -> Option<LayerId> {
    stack.contains_point(col, row)
}

/// Whether `bounds` contains the given grid cell. Shared by the stack's
/// hit-testing and by individual layers translating a mouse event into a
/// layer-local coordinate.
pub fn is_point_inside(bounds: Rect, col: u16, row: u16) -> bool {
    bounds.contains(row, col)
}
