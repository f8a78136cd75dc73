//! Backend-agnostic render pipeline: Phase 1-2 damage/batching logic shared
//! by every backend, plus the [`Renderer`]/[`PaintSurface`] trait seams each
//! backend implements (`ttk-terminal`'s escape sequences, `ttk-desktop`'s
//! wgpu draw calls).

pub mod batcher;
pub mod capabilities;
pub mod caret;
pub mod paint;
pub mod renderer;

pub use batcher::{BgRect, RectBatcher};
pub use capabilities::{Capabilities, MouseKinds};
pub use caret::CaretState;
pub use paint::{paint, PaintSurface};
pub use renderer::Renderer;
