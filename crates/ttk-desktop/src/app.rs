//! `winit::application::ApplicationHandler` implementation: translates OS
//! window/keyboard/mouse/IME events into `ttk_events::Event`s and feeds them
//! through `DesktopBackend::deliver`, the same sink `Renderer::poll_event`
//! and `Renderer::run_event_loop` both drain from (§4.4, §4.5).
//!
//! Window and GPU-surface creation happen in `resumed`, not in
//! `DesktopBackend::init`: `winit` only hands out a live `ActiveEventLoop`
//! once the platform has started the application, so a window cannot exist
//! before that point.

use winit::application::ApplicationHandler;
use winit::event::{ElementState, Ime, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{WindowAttributes, WindowId};

use ttk_events::{Event, MouseEventKind, SystemEvent, SystemEventKind};

use crate::backend::DesktopBackend;
use crate::gpu::GpuSurface;
use crate::key::{map_key_event, map_modifiers};
use crate::mouse::{map_button, map_mouse_event};

impl ApplicationHandler for DesktopBackend {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let (rows, cols) = self.dimensions();
        let (rows, cols) = if rows == 0 || cols == 0 { (24, 80) } else { (rows, cols) };
        let (cell_w, cell_h) = self.font.cell_size();
        let width = u32::from(cols) * u32::from(cell_w);
        let height = u32::from(rows) * u32::from(cell_h);
        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(width.max(1), height.max(1)));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => std::sync::Arc::new(window),
            Err(err) => {
                tracing::error!(target: "ttk::desktop", %err, "failed to create window");
                return;
            }
        };
        match GpuSurface::new(window.clone()) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(err) => tracing::error!(target: "ttk::desktop", %err, "failed to initialize gpu surface"),
        }
        self.window = Some(window);
        self.install_pending_menu();
        event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.deliver(Event::System(SystemEvent { kind: SystemEventKind::Close }));
            }
            WindowEvent::Resized(size) => {
                self.handle_resize(size.width, size.height);
            }
            WindowEvent::Focused(false) => {
                self.deliver(Event::System(SystemEvent { kind: SystemEventKind::FocusLost }));
            }
            WindowEvent::ModifiersChanged(new_mods) => {
                self.modifiers = new_mods.state();
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                self.handle_keyboard_input(key_event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_pos = (position.x, position.y);
                self.emit_mouse(MouseEventKind::Move, ttk_events::MouseButton::None, 0.0, 0.0);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let kind = match state {
                    ElementState::Pressed => MouseEventKind::ButtonDown,
                    ElementState::Released => MouseEventKind::ButtonUp,
                };
                self.emit_mouse(kind, map_button(button), 0.0, 0.0);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x, y),
                    MouseScrollDelta::PixelDelta(pos) => {
                        let (_, cell_h) = self.font.cell_size();
                        (0.0, (pos.y / f64::from(cell_h.max(1))) as f32)
                    }
                };
                self.emit_mouse(MouseEventKind::Wheel, ttk_events::MouseButton::None, dx, dy);
            }
            WindowEvent::Ime(ime_event) => self.handle_ime(ime_event),
            WindowEvent::RedrawRequested => {
                self.refresh();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        for menu_event in crate::menu::MenuBar::poll_events() {
            self.deliver(Event::Menu(menu_event));
        }
        if self.quit.load(std::sync::atomic::Ordering::Relaxed) {
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl DesktopBackend {
    /// Runs the key path (§4.4 steps 2-4) against the installed callback (or
    /// the poll queue, in polling mode): a `KeyEvent` first, then — unless
    /// consumed or an IME composition is in progress — a `CharEvent`.
    fn handle_keyboard_input(&mut self, key_event: winit::event::KeyEvent) {
        let Some(event) = map_key_event(&key_event.logical_key, key_event.state, self.modifiers) else { return };
        let composing = self.ime.has_marked_text();
        let consumed = match self.callback.as_mut() {
            Some(cb) => cb.on_key_event(&event),
            None => {
                self.poll_queue.push_back(Event::Key(event));
                false
            }
        };
        if consumed || composing {
            return;
        }
        if let Some(char) = event.char {
            self.deliver_char(ttk_events::CharEvent { char });
        }
    }

    fn deliver_char(&mut self, char_event: ttk_events::CharEvent) {
        match self.callback.as_mut() {
            Some(cb) => {
                cb.on_char_event(&char_event);
            }
            None => self.poll_queue.push_back(Event::Char(char_event)),
        }
    }

    fn handle_ime(&mut self, ime_event: Ime) {
        match ime_event {
            Ime::Preedit(text, cursor_range) => {
                self.ime.set_marked_text(text, cursor_range);
            }
            Ime::Commit(text) => {
                for char_event in self.ime.insert_text(&text) {
                    self.deliver_char(char_event);
                }
            }
            Ime::Enabled | Ime::Disabled => {}
        }
    }

    fn emit_mouse(&mut self, kind: MouseEventKind, button: ttk_events::MouseButton, scroll_dx: f32, scroll_dy: f32) {
        let (x, y) = self.mouse_pos;
        let (cell_w, cell_h) = self.font.cell_size();
        let modifiers = map_modifiers(self.modifiers);
        let timestamp = self.next_timestamp();
        let event = map_mouse_event(kind, x, y, f64::from(cell_w), f64::from(cell_h), button, scroll_dx, scroll_dy, timestamp, modifiers);
        self.deliver(Event::Mouse(event));
    }
}
