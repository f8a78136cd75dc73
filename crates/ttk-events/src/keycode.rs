//! Key identity types: [`SpecialKey`] (non-printable / navigation keys),
//! [`PhysicalKey`] (layout-independent letter/digit/symbol identities), and
//! [`KeyCode`], the sum of the two plus an arbitrary Unicode code point.
//!
//! The integer values assigned to `SpecialKey` variants are part of the public
//! contract (testable property #10 in the design) and must never change across
//! releases.

/// Non-printable keys: arrows, function keys, navigation cluster, and the
/// four classic control keys (Enter/Escape/Backspace/Tab).
///
/// Discriminants are pinned explicitly and must stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SpecialKey {
    Up = 1000,
    Down = 1001,
    Left = 1002,
    Right = 1003,

    F1 = 1100,
    F2 = 1101,
    F3 = 1102,
    F4 = 1103,
    F5 = 1104,
    F6 = 1105,
    F7 = 1106,
    F8 = 1107,
    F9 = 1108,
    F10 = 1109,
    F11 = 1110,
    F12 = 1111,

    Insert = 1200,
    Delete = 1201,
    Home = 1202,
    End = 1203,
    PageUp = 1204,
    PageDown = 1205,

    Enter = 10,
    Escape = 27,
    Backspace = 127,
    Tab = 9,
}

impl SpecialKey {
    pub const fn value(self) -> u32 {
        self as u32
    }

    /// Function key ordinal (1..=12), for backends that enumerate `F(n)`.
    pub fn function_ordinal(n: u8) -> Option<SpecialKey> {
        match n {
            1 => Some(SpecialKey::F1),
            2 => Some(SpecialKey::F2),
            3 => Some(SpecialKey::F3),
            4 => Some(SpecialKey::F4),
            5 => Some(SpecialKey::F5),
            6 => Some(SpecialKey::F6),
            7 => Some(SpecialKey::F7),
            8 => Some(SpecialKey::F8),
            9 => Some(SpecialKey::F9),
            10 => Some(SpecialKey::F10),
            11 => Some(SpecialKey::F11),
            12 => Some(SpecialKey::F12),
            _ => None,
        }
    }
}

/// Layout-independent physical key identity for letters, digits, and the
/// eleven named symbol keys. Values are disjoint from both ASCII and
/// [`SpecialKey`] so a `KeyCode::CodePoint` and a `PhysicalKey` can never
/// collide numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PhysicalKey {
    A = 2000,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,

    Minus,
    Equal,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    Grave,
}

impl PhysicalKey {
    pub const fn value(self) -> u32 {
        self as u32
    }
}

/// Keyboard layout tag. ANSI is the only implemented layout; others are
/// reserved so configuration files written today stay forward-compatible.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardLayout {
    #[default]
    Ansi,
}

/// A key code is either a non-printable [`SpecialKey`] or an arbitrary Unicode
/// scalar value delivered as its code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Special(SpecialKey),
    CodePoint(u32),
}

impl KeyCode {
    pub fn from_char(c: char) -> KeyCode {
        KeyCode::CodePoint(c as u32)
    }
}
