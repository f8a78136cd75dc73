//! Terminal backend: a [`ttk_render::Renderer`] implementation over
//! `crossterm`, generalised from the teacher's `core-terminal` raw-mode
//! RAII handling and `core-input::key_token` translation tables.

mod backend;
mod key;
mod mouse;
mod translate;

#[cfg(feature = "async-input")]
mod async_input;

pub use backend::CrosstermBackend;

#[cfg(feature = "async-input")]
pub use async_input::{spawn_async_event_task, AsyncInputShutdown};
