//! Shared key -> char translation step (§4.4, steps 3-4), used by both the
//! callback-mode and polling-mode code paths in [`crate::CrosstermBackend`].

use ttk_events::{CharEvent, KeyEvent, Utf8Accumulator};

/// Feeds `key.char`'s UTF-8 bytes through `accumulator` and returns the
/// resulting `CharEvent`, or `None` if the key carries no char, carries a
/// command modifier, or the accumulator has not yet completed a code point
/// (never happens for a single already-decoded `char`, but the accumulator
/// is still the single source of truth per the design).
pub fn char_event_for(key: &KeyEvent, accumulator: &mut Utf8Accumulator) -> Option<CharEvent> {
    if key.modifiers.is_command() {
        return None;
    }
    let ch = key.char?;
    let mut produced = None;
    for byte in ch.to_string().as_bytes() {
        if let Some(c) = accumulator.add_byte(*byte) {
            produced = Some(c);
        }
    }
    produced.map(|char| CharEvent { char })
}
