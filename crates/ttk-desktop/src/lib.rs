//! Desktop backend: a [`ttk_render::Renderer`] implementation over
//! `winit`/`wgpu`, generalised from the teacher's `core-terminal`/`core-input`
//! raw-mode and key-translation tables onto a GPU-drawn window: `fontdb` +
//! `swash` + `rustybuzz` for glyph rasterization, `muda` for the native menu
//! bar, and `arboard` for the clipboard.

mod app;
mod backend;
mod clipboard;
mod font;
mod gpu;
mod ime;
mod key;
mod menu;
mod mouse;

pub use backend::DesktopBackend;
pub use mouse::pixel_to_cell;
