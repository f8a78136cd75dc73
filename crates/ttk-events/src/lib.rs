//! Unified event model shared by every TTK backend.
//!
//! A single tagged [`Event`] enum replaces the class-hierarchy-plus-isinstance
//! pattern of the source this toolkit descends from: dispatch is an exhaustive
//! match rather than a chain of `isinstance` checks, and the five-hook
//! [`EventCallback`] trait replaces an abstract callback base class with
//! default "unhandled" implementations (see [`EventCallback`]).

pub mod callback;
pub mod keycode;
pub mod menu;
pub mod modifiers;
pub mod utf8;

pub use callback::{Consumed, EventCallback};
pub use keycode::{KeyCode, KeyboardLayout, PhysicalKey, SpecialKey};
pub use menu::{Menu, MenuNode};
pub use modifiers::Modifiers;
pub use utf8::Utf8Accumulator;

/// A key press or release, before any character translation has happened.
///
/// `char` is populated by the backend's key-to-char translator (see
/// `ttk-terminal`/`ttk-desktop`) when the key carries a printable character and
/// no command modifier is present; it is `None` for special keys and for
/// command-modified keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    pub char: Option<char>,
}

/// A single, complete Unicode scalar produced by the UTF-8 accumulator or the
/// desktop IME commit path. Never carries a control character or a command
/// modifier — both are enforced at construction time by the producers in
/// `ttk-terminal`/`ttk-desktop`, not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharEvent {
    pub char: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    ButtonDown,
    ButtonUp,
    DoubleClick,
    Move,
    Wheel,
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    None,
}

/// Mouse coordinates translated into grid space (see §4.4 of the TTK design:
/// `col = floor(x_px / cell_w)`, `sub_cell_x = (x_px mod cell_w) / cell_w`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub col: u16,
    pub row: u16,
    /// In `[0, 1)`.
    pub sub_cell_x: f32,
    /// In `[0, 1)`.
    pub sub_cell_y: f32,
    pub button: MouseButton,
    pub scroll_dx: f32,
    pub scroll_dy: f32,
    /// Monotonic, non-decreasing across the lifetime of a backend instance.
    pub timestamp: u64,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEventKind {
    Resize(u16, u16),
    Close,
    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemEvent {
    pub kind: SystemEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEvent {
    pub item_id: String,
}

/// Tagged union of everything the dispatcher can deliver to a UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    Char(CharEvent),
    Mouse(MouseEvent),
    System(SystemEvent),
    Menu(MenuEvent),
}

impl Event {
    /// Dispatches to the matching [`EventCallback`] hook, returning whether the
    /// handler consumed the event. This is the one place the exhaustive match
    /// over `Event` lives; callers should not duplicate it.
    pub fn deliver(&self, handler: &mut dyn EventCallback) -> Consumed {
        match self {
            Event::Key(ev) => handler.on_key_event(ev),
            Event::Char(ev) => handler.on_char_event(ev),
            Event::Mouse(ev) => handler.on_mouse_event(ev),
            Event::System(ev) => handler.on_system_event(ev),
            Event::Menu(ev) => handler.on_menu_event(ev),
        }
    }
}
