use ttk_events::{Consumed, Event};
use ttk_grid::Rect;
use ttk_render::Renderer;

/// Opaque identifier for a layer on the stack, stable for the lifetime of
/// that layer (it does not change as other layers are pushed/popped above
/// or below it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

/// A UI component occupying a rectangle in the grid. Layers are owned by the
/// [`LayerStack`]; only the top-of-stack layer is offered input (§4.5).
///
/// `draw` is called bottom-up on refresh when *any* layer's content is dirty
/// — redraw discipline (tracking one's own dirty bit) is the layer's
/// responsibility, not the stack's.
pub trait Layer {
    /// The rectangle this layer owns, in grid cell coordinates.
    fn bounds(&self) -> Rect;

    /// Handles one event, returning whether it was consumed. Only ever
    /// called when this layer is the top of the stack.
    fn handle_event(&mut self, event: &Event) -> Consumed;

    /// Draws this layer's content via `renderer`. Called bottom-up across
    /// the whole stack whenever any layer is dirty.
    fn draw(&mut self, renderer: &mut dyn Renderer);

    /// Whether this layer's content differs from what was last drawn. The
    /// stack consults this to decide whether a refresh needs to walk the
    /// stack at all; a layer that never reports dirty is never redrawn.
    fn is_dirty(&self) -> bool {
        true
    }
}

struct Entry {
    id: LayerId,
    layer: Box<dyn Layer>,
}

/// Ordered stack of layers. Push/pop never emit events themselves — per
/// §4.5, the application issues its own synthetic redraw after a focus
/// change if one is needed.
#[derive(Default)]
pub struct LayerStack {
    entries: Vec<Entry>,
    next_id: u64,
}

impl LayerStack {
    pub fn new() -> Self {
        LayerStack { entries: Vec::new(), next_id: 0 }
    }

    pub fn push(&mut self, layer: Box<dyn Layer>) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, layer });
        id
    }

    /// Removes and returns the top layer, if any.
    pub fn pop(&mut self) -> Option<Box<dyn Layer>> {
        self.entries.pop().map(|e| e.layer)
    }

    pub fn top(&self) -> Option<&dyn Layer> {
        self.entries.last().map(|e| e.layer.as_ref())
    }

    pub fn top_mut(&mut self) -> Option<&mut dyn Layer> {
        self.entries.last_mut().map(|e| e.layer.as_mut())
    }

    pub fn top_id(&self) -> Option<LayerId> {
        self.entries.last().map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the id of the topmost layer whose bounds contain the point,
    /// searching from the top of the stack down.
    pub fn contains_point(&self, col: u16, row: u16) -> Option<LayerId> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.layer.bounds().contains(row, col))
            .map(|e| e.id)
    }

    /// Draws every layer bottom-up, skipping layers that report clean.
    pub fn draw_all(&mut self, renderer: &mut dyn Renderer) {
        for entry in &mut self.entries {
            if entry.layer.is_dirty() {
                entry.layer.draw(renderer);
            }
        }
    }

    /// Offers `event` to the top layer only, per the top-of-stack dispatch
    /// rule (§4.4, testable property #8). Returns `false` with an empty
    /// stack.
    pub fn dispatch(&mut self, event: &Event) -> Consumed {
        self.top_mut().map(|l| l.handle_event(event)).unwrap_or(false)
    }
}
