//! Crossterm key/modifier translation, generalised from the teacher's
//! `core-input::key_token` module: a terminal key event becomes a
//! [`ttk_events::KeyCode`] plus [`ttk_events::Modifiers`] instead of the
//! teacher's NGI `KeyToken`/`ModMask`.

use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};
use ttk_events::{KeyCode, KeyEvent, Modifiers, SpecialKey};

/// Translates one crossterm key event into a `ttk_events::KeyEvent`, or
/// `None` for codes this toolkit has no identity for (media keys, caps
/// lock, and other keys outside the documented `SpecialKey`/`PhysicalKey`
/// set). Key-release and repeat events are folded into the same `KeyEvent`
/// shape as a press; only `KeyEventKind::Release` on platforms that report
/// it is filtered out by the caller (crossterm only reports releases when
/// the backend opts into `PushKeyboardEnhancementFlags`, which this backend
/// does not enable).
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if event.kind == CKeyEventKind::Release {
        return None;
    }
    let key = map_key_code(event.code)?;
    let modifiers = map_modifiers(event.modifiers);
    let char = char_for(event.code, modifiers);
    Some(KeyEvent { key, modifiers, char })
}

fn map_key_code(code: CKeyCode) -> Option<KeyCode> {
    let special = match code {
        CKeyCode::Char(c) => return Some(KeyCode::from_char(c)),
        CKeyCode::Enter => SpecialKey::Enter,
        CKeyCode::Esc => SpecialKey::Escape,
        CKeyCode::Backspace => SpecialKey::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => SpecialKey::Tab,
        CKeyCode::Up => SpecialKey::Up,
        CKeyCode::Down => SpecialKey::Down,
        CKeyCode::Left => SpecialKey::Left,
        CKeyCode::Right => SpecialKey::Right,
        CKeyCode::Home => SpecialKey::Home,
        CKeyCode::End => SpecialKey::End,
        CKeyCode::PageUp => SpecialKey::PageUp,
        CKeyCode::PageDown => SpecialKey::PageDown,
        CKeyCode::Insert => SpecialKey::Insert,
        CKeyCode::Delete => SpecialKey::Delete,
        CKeyCode::F(n) => SpecialKey::function_ordinal(n)?,
        _ => return None,
    };
    Some(KeyCode::Special(special))
}

/// Public wrapper used by [`crate::backend`] to translate a mouse event's
/// modifiers with the same mapping as keyboard modifiers.
pub fn modifiers_from_crossterm(mods: CKeyModifiers) -> Modifiers {
    map_modifiers(mods)
}

fn map_modifiers(mods: CKeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= Modifiers::CONTROL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SUPER) || mods.contains(CKeyModifiers::META) {
        out |= Modifiers::COMMAND;
    }
    out
}

/// Key-to-char translation (§4.4, both backends): never translates under a
/// command modifier, otherwise passes through a printable character
/// crossterm already resolved for us (it has already applied Shift for
/// ASCII letters/symbols).
fn char_for(code: CKeyCode, modifiers: Modifiers) -> Option<char> {
    if modifiers.is_command() {
        return None;
    }
    match code {
        CKeyCode::Char(c) if is_printable(c) => Some(c),
        _ => None,
    }
}

fn is_printable(c: char) -> bool {
    use unicode_segmentation::UnicodeSegmentation;
    !c.is_control() && c.graphemes(true).count() <= 1
}
