//! TTK: the complete public surface an application needs to reproduce the
//! file-manager use case (§6) — a character-grid renderer, a unified event
//! pipeline, a UI-layer stack, a task framework, and the ambient
//! configuration/logging/error layers every nontrivial library carries
//! regardless of which application features sit on top.
//!
//! A backend is chosen at construction via [`Backend`], a capability-checked
//! factory, rather than at call sites (§9 design note) — application code
//! written against the [`Renderer`] trait is backend-agnostic.

use thiserror::Error;

pub use ttk_config::{Config, ConfigError, InputConfig, LoggingConfig, RenderConfig};
pub use ttk_events::{
    CharEvent, Consumed, Event, EventCallback, KeyCode, KeyEvent, KeyboardLayout, Menu, MenuEvent, MenuNode,
    Modifiers, MouseButton, MouseEvent, MouseEventKind, PhysicalKey, SpecialKey, SystemEvent, SystemEventKind,
};
pub use ttk_grid::{CellFlags, ColorPair, Grid, Rect, Rgb};
pub use ttk_layers::{dispatch_top_only, is_point_inside, topmost_layer_at, Layer, LayerId, LayerStack, TextWidget};
pub use ttk_logging::{LogRecord, LogRecordKind, RingSink, TtkLogger, WireRecord};
pub use ttk_render::{paint, BgRect, Capabilities, CaretState, MouseKinds, PaintSurface, Renderer};
pub use ttk_task::file_op::{Conflict, ConflictResolution, FileOpContext, FileOpKind, FileOpState, FileOpTask};
pub use ttk_task::{Task, TaskError, TaskSlot, TaskState};

pub use ttk_desktop::DesktopBackend;
pub use ttk_terminal::CrosstermBackend;

/// The ambient-layer error type (§4.10). Everything at the `Renderer`-trait
/// boundary stays infallible by construction (§7); this exists strictly for
/// failures below that boundary that must be reported rather than silently
/// neutralised.
#[derive(Debug, Error)]
pub enum TtkError {
    #[error("failed to load configuration: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("failed to initialize a logging sink: {0}")]
    LoggingSinkInit(String),
    #[error(transparent)]
    TaskAlreadyActive(#[from] TaskError),
}

/// Which concrete `Renderer` to construct. Chosen once at startup; there is
/// no support for switching backends on a live application (§5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Terminal,
    Desktop,
}

impl Backend {
    /// Builds the requested backend as a boxed [`Renderer`] trait object.
    /// Desktop construction is the one fallible path (`winit` needs a
    /// display); terminal construction always succeeds.
    pub fn build(self) -> anyhow::Result<Box<dyn Renderer>> {
        match self {
            Backend::Terminal => Ok(Box::new(CrosstermBackend::new())),
            Backend::Desktop => Ok(Box::new(DesktopBackend::new()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_backend_always_builds() {
        assert!(Backend::Terminal.build().is_ok());
    }
}
