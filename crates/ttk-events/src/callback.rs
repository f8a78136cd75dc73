use crate::{CharEvent, KeyEvent, MenuEvent, MouseEvent, SystemEvent};

/// Whether a handler consumed an event. `true` stops further propagation;
/// `false` lets the terminal backend fall through to character translation
/// (see the event pipeline's key path).
pub type Consumed = bool;

/// The five required hooks a callback-mode application implements. Every hook
/// defaults to "unhandled" (`false`), so implementors only override the
/// events they care about — this replaces an abstract callback base class
/// with default method bodies rather than requiring every concrete callback
/// to stub out every variant.
pub trait EventCallback {
    fn on_key_event(&mut self, _event: &KeyEvent) -> Consumed {
        false
    }

    fn on_char_event(&mut self, _event: &CharEvent) -> Consumed {
        false
    }

    fn on_mouse_event(&mut self, _event: &MouseEvent) -> Consumed {
        false
    }

    fn on_system_event(&mut self, _event: &SystemEvent) -> Consumed {
        false
    }

    fn on_menu_event(&mut self, _event: &MenuEvent) -> Consumed {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Modifiers, SpecialKey};

    struct NoOp;
    impl EventCallback for NoOp {}

    #[test]
    fn default_hooks_report_unhandled() {
        let mut cb = NoOp;
        let key = KeyEvent {
            key: crate::KeyCode::Special(SpecialKey::Enter),
            modifiers: Modifiers::empty(),
            char: None,
        };
        assert!(!cb.on_key_event(&key));
    }
}
