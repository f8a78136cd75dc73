use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use winit::event_loop::EventLoop;
use winit::keyboard::ModifiersState;
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::window::Window;

use ttk_events::{Event, EventCallback, Menu};
use ttk_grid::{CellFlags, ColorPair, Grid};
use ttk_render::{paint, Capabilities, CaretState, MouseKinds, PaintSurface, Renderer};

use crate::clipboard::ClipboardBackend;
use crate::font::FontContext;
use crate::gpu::GpuSurface;
use crate::ime::ImeState;
use crate::menu::MenuBar;

const DEFAULT_ROWS: u16 = 24;
const DEFAULT_COLS: u16 = 80;

/// `Renderer` implementation over `winit`/`wgpu`. Mirrors
/// `ttk_terminal::CrosstermBackend`'s shape: the grid, caret, and registered
/// callback live here; the `winit::application::ApplicationHandler` impl in
/// `app.rs` drives the same key/mouse/menu dispatch rules against this
/// struct's fields instead of a raw crossterm event stream.
///
/// The window and GPU surface are created lazily, on the platform's
/// `resumed` callback (§4 "both backends" note: a desktop window cannot be
/// opened before the OS hands control to the application), so `init` only
/// allocates the grid and reports capabilities.
pub struct DesktopBackend {
    pub(crate) grid: Option<Grid>,
    pub(crate) caret: CaretState,
    pub(crate) callback: Option<Box<dyn EventCallback>>,
    pub(crate) poll_queue: VecDeque<Event>,
    pub(crate) capabilities: Capabilities,
    pub(crate) font: FontContext,
    pub(crate) gpu: Option<GpuSurface>,
    pub(crate) window: Option<Arc<Window>>,
    pub(crate) event_loop: Option<EventLoop<()>>,
    pub(crate) ime: ImeState,
    pub(crate) clipboard: RefCell<ClipboardBackend>,
    pub(crate) menu_bar: Option<MenuBar>,
    pub(crate) pending_menu: Option<Menu>,
    pub(crate) modifiers: ModifiersState,
    pub(crate) mouse_pos: (f64, f64),
    pub(crate) next_timestamp: u64,
    pub(crate) quit: Arc<AtomicBool>,
    pub(crate) title: String,
}

impl DesktopBackend {
    /// Fails only if `winit` itself cannot open an event loop (no display
    /// server available), which is the one part of this backend's setup
    /// that a sandboxed/headless environment cannot paper over.
    pub fn new() -> anyhow::Result<DesktopBackend> {
        let event_loop = EventLoop::new()?;
        Ok(DesktopBackend {
            grid: None,
            caret: CaretState::default(),
            callback: None,
            poll_queue: VecDeque::new(),
            capabilities: Capabilities::none(),
            font: FontContext::discover(),
            gpu: None,
            window: None,
            event_loop: Some(event_loop),
            ime: ImeState::default(),
            clipboard: RefCell::new(ClipboardBackend::new()),
            menu_bar: None,
            pending_menu: None,
            modifiers: ModifiersState::empty(),
            mouse_pos: (0.0, 0.0),
            next_timestamp: 0,
            quit: Arc::new(AtomicBool::new(false)),
            title: "ttk".to_string(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> DesktopBackend {
        self.title = title.into();
        self
    }

    /// A clone of the backend's quit flag, mirroring
    /// `CrosstermBackend::quit_handle` (§5 cancellation model).
    pub fn quit_handle(&self) -> Arc<AtomicBool> {
        self.quit.clone()
    }

    pub(crate) fn next_timestamp(&mut self) -> u64 {
        let t = self.next_timestamp;
        self.next_timestamp += 1;
        t
    }

    pub(crate) fn deliver(&mut self, event: Event) {
        match self.callback.as_mut() {
            Some(cb) => {
                event.deliver(cb.as_mut());
            }
            None => self.poll_queue.push_back(event),
        }
    }

    /// Installs `self.menu_bar` against `window` if one is pending, run once
    /// a window exists (§4.4 scenario S6 wiring).
    pub(crate) fn install_pending_menu(&mut self) {
        let Some(window) = self.window.clone() else { return };
        if let Some(tree) = self.pending_menu.take() {
            self.menu_bar = MenuBar::build(&tree);
        }
        if let Some(bar) = &self.menu_bar {
            bar.install(&window);
        }
    }

    fn resize_grid_to_window(&mut self, width_px: u32, height_px: u32) {
        let (cell_w, cell_h) = self.font.cell_size();
        let rows = (height_px / u32::from(cell_h)).max(1) as u16;
        let cols = (width_px / u32::from(cell_w)).max(1) as u16;
        if let Some(grid) = &mut self.grid {
            grid.resize(rows, cols);
        }
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width_px, height_px);
        }
    }

    pub(crate) fn handle_resize(&mut self, width_px: u32, height_px: u32) {
        self.resize_grid_to_window(width_px, height_px);
        let dims = self.dimensions();
        self.deliver(Event::System(ttk_events::SystemEvent { kind: ttk_events::SystemEventKind::Resize(dims.0, dims.1) }));
    }
}

impl PaintSurface for DesktopBackend {
    fn cell_size(&self) -> (u16, u16) {
        self.font.cell_size()
    }

    fn draw_bg_rect(&mut self, rect: ttk_render::BgRect) {
        if let Some(gpu) = &mut self.gpu {
            gpu.push_bg_rect(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32, rect.bg);
        }
    }

    fn draw_glyph(&mut self, row: u16, col: u16, ch: char, fg: ttk_grid::Rgb) {
        let (cell_w, cell_h) = self.font.cell_size();
        let x = f32::from(col) * f32::from(cell_w);
        let y = f32::from(row) * f32::from(cell_h) + f32::from(cell_h);
        if let Some(gpu) = &mut self.gpu {
            gpu.push_glyph(&mut self.font, x, y, ch, fg);
        }
    }

    fn place_caret(&mut self, position: Option<(u16, u16)>) {
        let (cell_w, cell_h) = self.font.cell_size();
        if let Some((row, col)) = position {
            self.ime.set_caret_cell(row, col);
            if let Some(gpu) = &mut self.gpu {
                let x = f32::from(col) * f32::from(cell_w);
                let y = f32::from(row) * f32::from(cell_h);
                gpu.push_bg_rect(x, y, f32::from(cell_w).max(1.0) * 0.15, f32::from(cell_h), ttk_grid::Rgb(229, 229, 229));
            }
            if let Some(window) = &self.window {
                let rect = self.ime.first_rect_for_character_range(f64::from(cell_w), f64::from(cell_h));
                window.set_ime_cursor_area(
                    winit::dpi::PhysicalPosition::new(rect.0, rect.1),
                    winit::dpi::PhysicalSize::new(rect.2, rect.3),
                );
            }
        }
    }
}

impl Renderer for DesktopBackend {
    fn init(&mut self, rows: u16, cols: u16, pairs: &[ColorPair]) -> Capabilities {
        let (rows, cols) = if rows == 0 || cols == 0 { (DEFAULT_ROWS, DEFAULT_COLS) } else { (rows, cols) };
        let default_pair =
            pairs.first().copied().unwrap_or(ColorPair { fg_rgb: ttk_grid::Rgb(229, 229, 229), bg_rgb: ttk_grid::Rgb(0, 0, 0) });
        let mut grid = Grid::new(rows, cols, default_pair);
        for (id, pair) in pairs.iter().enumerate().skip(1) {
            grid.pairs_mut().define(id as u16, *pair);
        }
        self.grid = Some(grid);
        self.capabilities = Capabilities {
            mouse_kinds: MouseKinds::BUTTON_DOWN | MouseKinds::BUTTON_UP | MouseKinds::MOVE | MouseKinds::WHEEL | MouseKinds::DRAG,
            clipboard: self.clipboard.borrow().is_supported(),
            menu_bar: MenuBar::supported(),
            image: false,
        };
        self.capabilities
    }

    fn dimensions(&self) -> (u16, u16) {
        self.grid.as_ref().map(Grid::dimensions).unwrap_or((0, 0))
    }

    fn put_char(&mut self, row: u16, col: u16, ch: char, pair: u16, attrs: CellFlags) {
        if let Some(grid) = &mut self.grid {
            grid.put_char(row, col, ch, pair, attrs);
        }
    }

    fn fill_rect(&mut self, row: u16, col: u16, height: u16, width: u16, pair: u16) {
        if let Some(grid) = &mut self.grid {
            grid.fill_rect(row, col, height, width, pair);
        }
    }

    fn clear(&mut self) {
        if let Some(grid) = &mut self.grid {
            grid.clear();
        }
    }

    fn refresh(&mut self) {
        let caret = self.caret.position();
        if let Some(mut grid) = self.grid.take() {
            paint(&mut grid, self, caret);
            self.grid = Some(grid);
        }
        if let Some(gpu) = &mut self.gpu {
            gpu.present();
        }
    }

    fn set_caret_position(&mut self, row: u16, col: u16) {
        self.caret.set(row, col);
    }

    fn set_event_callback(&mut self, callback: Option<Box<dyn EventCallback>>) {
        self.callback = callback;
    }

    fn poll_event(&mut self, timeout: Option<Duration>) -> Option<Event> {
        if let Some(event) = self.poll_queue.pop_front() {
            return Some(event);
        }
        if let Some(mut event_loop) = self.event_loop.take() {
            event_loop.pump_app_events(timeout, self);
            self.event_loop = Some(event_loop);
        }
        self.poll_queue.pop_front()
    }

    fn run_event_loop(&mut self) {
        let Some(event_loop) = self.event_loop.take() else { return };
        if let Err(err) = event_loop.run_app(self) {
            tracing::error!(target: "ttk::desktop", %err, "event loop exited with an error");
        }
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn get_clipboard_text(&self) -> String {
        self.clipboard.borrow_mut().get_text()
    }

    fn set_clipboard_text(&mut self, text: &str) -> bool {
        self.clipboard.borrow_mut().set_text(text)
    }

    fn set_menu_bar(&mut self, menu: &Menu) {
        if menu.validate().is_err() {
            tracing::warn!(target: "ttk::desktop", "menu tree failed id-uniqueness validation, ignoring");
            return;
        }
        self.pending_menu = Some(menu.clone());
        self.install_pending_menu();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(fg: ttk_grid::Rgb, bg: ttk_grid::Rgb) -> ColorPair {
        ColorPair { fg_rgb: fg, bg_rgb: bg }
    }

    /// Builds a backend without going through `new()` (which opens a real
    /// `winit::event_loop::EventLoop` and so needs a display) — unit tests
    /// exercise the `Renderer`/`PaintSurface` glue directly on a bare struct,
    /// the same way `CrosstermBackend`'s tests avoid entering raw mode.
    fn bare() -> DesktopBackend {
        DesktopBackend {
            grid: None,
            caret: CaretState::default(),
            callback: None,
            poll_queue: VecDeque::new(),
            capabilities: Capabilities::none(),
            font: FontContext::discover(),
            gpu: None,
            window: None,
            event_loop: None,
            ime: ImeState::default(),
            clipboard: RefCell::new(ClipboardBackend::new()),
            menu_bar: None,
            pending_menu: None,
            modifiers: ModifiersState::empty(),
            mouse_pos: (0.0, 0.0),
            next_timestamp: 0,
            quit: Arc::new(AtomicBool::new(false)),
            title: "ttk".to_string(),
        }
    }

    #[test]
    fn init_allocates_grid_at_requested_dimensions() {
        let mut backend = bare();
        backend.init(24, 80, &[pair(ttk_grid::Rgb(255, 255, 255), ttk_grid::Rgb(0, 0, 0))]);
        assert_eq!(backend.dimensions(), (24, 80));
    }

    #[test]
    fn init_with_zero_dimensions_falls_back_to_defaults() {
        let mut backend = bare();
        backend.init(0, 0, &[]);
        assert_eq!(backend.dimensions(), (DEFAULT_ROWS, DEFAULT_COLS));
    }

    #[test]
    fn put_char_before_init_is_a_silent_no_op() {
        let mut backend = bare();
        backend.put_char(0, 0, 'x', 0, CellFlags::empty());
        assert_eq!(backend.dimensions(), (0, 0));
    }

    #[test]
    fn set_caret_position_is_observable_through_caret_state() {
        let mut backend = bare();
        backend.set_caret_position(2, 3);
        assert_eq!(backend.caret.position(), Some((2, 3)));
    }

    #[test]
    fn clipboard_round_trip_never_panics_regardless_of_environment_support() {
        let mut backend = bare();
        let _ = backend.set_clipboard_text("hello");
        let _ = backend.get_clipboard_text();
    }

    #[test]
    fn menu_with_duplicate_ids_does_not_panic_and_leaves_no_pending_menu() {
        let mut backend = bare();
        let menu = Menu::new()
            .push(ttk_events::MenuNode::Item { id: "a".into(), label: "A".into(), shortcut: None, enabled: true })
            .push(ttk_events::MenuNode::Item { id: "a".into(), label: "A2".into(), shortcut: None, enabled: true });
        backend.set_menu_bar(&menu);
        assert!(backend.pending_menu.is_none());
        assert!(backend.menu_bar.is_none());
    }

    #[test]
    fn refresh_without_a_gpu_surface_does_not_panic() {
        let mut backend = bare();
        backend.init(4, 4, &[pair(ttk_grid::Rgb(255, 255, 255), ttk_grid::Rgb(0, 0, 0))]);
        backend.put_char(0, 0, 'x', 0, CellFlags::empty());
        backend.refresh();
    }
}
