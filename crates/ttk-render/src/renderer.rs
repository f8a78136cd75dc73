use std::time::Duration;

use ttk_events::{Event, EventCallback, Menu};
use ttk_grid::{CellFlags, ColorPair};

use crate::Capabilities;

/// The complete public surface an application needs to reproduce the
/// file-manager use case; no other entry point is needed. Implemented by
/// `ttk-terminal::CrosstermBackend` and `ttk-desktop::DesktopBackend`.
///
/// Every operation here is total: invalid arguments are mapped to the
/// clipping / default-pair / neutral-value rule and never surface as an
/// error (§4.1 Error policy). Call-site failures that genuinely need to be
/// reported (a malformed config, a sink that cannot bind its port) live
/// below this trait, in `ttk-config`/`ttk-logging`.
pub trait Renderer {
    /// Allocates the grid, defines pair 0 from `pairs`, and returns the
    /// backend's capability set.
    fn init(&mut self, rows: u16, cols: u16, pairs: &[ColorPair]) -> Capabilities;

    /// Current `(rows, cols)`; updated by `SystemEvent::Resize` before that
    /// event is delivered.
    fn dimensions(&self) -> (u16, u16);

    fn put_char(&mut self, row: u16, col: u16, ch: char, pair: u16, attrs: CellFlags);

    fn fill_rect(&mut self, row: u16, col: u16, height: u16, width: u16, pair: u16);

    fn clear(&mut self);

    /// Flushes the dirty region to the backing surface, then restores the
    /// caret to the last `set_caret_position` request. Idempotent when
    /// nothing is dirty.
    fn refresh(&mut self);

    fn set_caret_position(&mut self, row: u16, col: u16);

    /// Switches between callback-driven and polling mode. Passing `None`
    /// switches to polling mode.
    fn set_event_callback(&mut self, callback: Option<Box<dyn EventCallback>>);

    /// Polling mode only: returns the next event, or `None` if `timeout`
    /// elapses first. In callback mode this drives one iteration of the
    /// pipeline and always returns `None`.
    fn poll_event(&mut self, timeout: Option<Duration>) -> Option<Event>;

    /// Drives the backend event loop, delivering events via the registered
    /// callback until the application sets its quit flag.
    fn run_event_loop(&mut self);

    fn capabilities(&self) -> Capabilities;

    /// Returns an empty string when the backend has no clipboard support.
    fn get_clipboard_text(&self) -> String;

    /// Returns `false` when the backend has no clipboard support.
    fn set_clipboard_text(&mut self, text: &str) -> bool;

    /// Installs an OS-native menu bar if supported; otherwise a no-op.
    fn set_menu_bar(&mut self, menu: &Menu);
}
