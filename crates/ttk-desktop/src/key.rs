//! `winit` key/modifier translation, mirroring `ttk-terminal::key`'s shape
//! so both backends produce identical `ttk_events::KeyEvent`s for the same
//! logical key (§4.4 "both backends" rule).

use winit::event::ElementState;
use winit::keyboard::{Key, ModifiersState, NamedKey};

use ttk_events::{KeyCode, KeyEvent, Modifiers, SpecialKey};

/// Translates one `winit` key event into a `ttk_events::KeyEvent`, or `None`
/// for a release (this toolkit only reports key-down, matching the terminal
/// backend) or a key this toolkit has no identity for (media keys, Caps
/// Lock, and other keys outside the documented `SpecialKey` set).
///
/// Takes the logical key and press state directly, rather than the whole
/// `winit::event::KeyEvent` (whose `platform_specific` field is private and
/// so cannot be constructed outside `winit`, including in this module's own
/// unit tests).
pub(crate) fn map_key_event(logical_key: &Key, state: ElementState, modifiers: ModifiersState) -> Option<KeyEvent> {
    if state != ElementState::Pressed {
        return None;
    }
    let ttk_modifiers = map_modifiers(modifiers);
    let key = map_logical_key(logical_key)?;
    let char = char_for(logical_key, ttk_modifiers);
    Some(KeyEvent { key, modifiers: ttk_modifiers, char })
}

fn map_logical_key(key: &Key) -> Option<KeyCode> {
    match key {
        Key::Character(s) => s.chars().next().map(KeyCode::from_char),
        Key::Named(named) => map_named_key(*named).map(KeyCode::Special),
        _ => None,
    }
}

fn map_named_key(named: NamedKey) -> Option<SpecialKey> {
    Some(match named {
        NamedKey::Enter => SpecialKey::Enter,
        NamedKey::Escape => SpecialKey::Escape,
        NamedKey::Backspace => SpecialKey::Backspace,
        NamedKey::Tab => SpecialKey::Tab,
        NamedKey::ArrowUp => SpecialKey::Up,
        NamedKey::ArrowDown => SpecialKey::Down,
        NamedKey::ArrowLeft => SpecialKey::Left,
        NamedKey::ArrowRight => SpecialKey::Right,
        NamedKey::Insert => SpecialKey::Insert,
        NamedKey::Delete => SpecialKey::Delete,
        NamedKey::Home => SpecialKey::Home,
        NamedKey::End => SpecialKey::End,
        NamedKey::PageUp => SpecialKey::PageUp,
        NamedKey::PageDown => SpecialKey::PageDown,
        NamedKey::F1 => SpecialKey::F1,
        NamedKey::F2 => SpecialKey::F2,
        NamedKey::F3 => SpecialKey::F3,
        NamedKey::F4 => SpecialKey::F4,
        NamedKey::F5 => SpecialKey::F5,
        NamedKey::F6 => SpecialKey::F6,
        NamedKey::F7 => SpecialKey::F7,
        NamedKey::F8 => SpecialKey::F8,
        NamedKey::F9 => SpecialKey::F9,
        NamedKey::F10 => SpecialKey::F10,
        NamedKey::F11 => SpecialKey::F11,
        NamedKey::F12 => SpecialKey::F12,
        _ => return None,
    })
}

pub(crate) fn map_modifiers(mods: ModifiersState) -> Modifiers {
    let mut out = Modifiers::empty();
    if mods.shift_key() {
        out |= Modifiers::SHIFT;
    }
    if mods.control_key() {
        out |= Modifiers::CONTROL;
    }
    if mods.alt_key() {
        out |= Modifiers::ALT;
    }
    if mods.super_key() {
        out |= Modifiers::COMMAND;
    }
    out
}

/// Key-to-char translation (§4.4, both backends): never translates under a
/// command modifier; otherwise a `Key::Character` is already the printable,
/// shift-cased text `winit` resolved for this key.
fn char_for(key: &Key, modifiers: Modifiers) -> Option<char> {
    if modifiers.is_command() {
        return None;
    }
    match key {
        Key::Character(s) => s.chars().next().filter(|c| is_printable(*c)),
        _ => None,
    }
}

fn is_printable(c: char) -> bool {
    !c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_char_translates_to_code_point_and_char() {
        let event =
            map_key_event(&Key::Character("a".into()), ElementState::Pressed, ModifiersState::empty()).unwrap();
        assert_eq!(event.key, KeyCode::from_char('a'));
        assert_eq!(event.char, Some('a'));
        assert_eq!(event.modifiers, Modifiers::empty());
    }

    #[test]
    fn command_modifier_suppresses_char() {
        let mut mods = ModifiersState::empty();
        mods.insert(ModifiersState::CONTROL);
        let event = map_key_event(&Key::Character("c".into()), ElementState::Pressed, mods).unwrap();
        assert_eq!(event.modifiers, Modifiers::CONTROL);
        assert_eq!(event.char, None, "command modifier must suppress char translation");
    }

    #[test]
    fn named_arrow_maps_to_pinned_discriminant() {
        let event =
            map_key_event(&Key::Named(NamedKey::ArrowUp), ElementState::Pressed, ModifiersState::empty()).unwrap();
        assert_eq!(event.key, KeyCode::Special(SpecialKey::Up));
        assert_eq!(event.char, None);
    }

    #[test]
    fn release_events_are_ignored() {
        assert!(
            map_key_event(&Key::Character("a".into()), ElementState::Released, ModifiersState::empty()).is_none()
        );
    }

    #[test]
    fn unsupported_named_key_is_none() {
        assert!(
            map_key_event(&Key::Named(NamedKey::CapsLock), ElementState::Pressed, ModifiersState::empty()).is_none()
        );
    }
}
