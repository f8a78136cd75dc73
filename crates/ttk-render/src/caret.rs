/// Tracks the application's last `set_caret_position` request so Phase 5 of
/// the paint pipeline can re-apply it on every refresh, even when nothing
/// else is dirty (invariant: the caret restores to the same cell until the
/// application changes it — see testable property #9).
///
/// One caret is tracked globally per renderer, per the design note resolving
/// the "single global caret vs per-top-layer caret" open question: if an
/// application pushes a new top layer, it must call `set_caret_position`
/// again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaretState {
    position: Option<(u16, u16)>,
}

impl CaretState {
    pub fn set(&mut self, row: u16, col: u16) {
        self.position = Some((row, col));
    }

    pub fn position(&self) -> Option<(u16, u16)> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_caret_has_no_position() {
        assert_eq!(CaretState::default().position(), None);
    }

    #[test]
    fn set_then_set_again_keeps_latest() {
        let mut caret = CaretState::default();
        caret.set(1, 1);
        caret.set(5, 9);
        assert_eq!(caret.position(), Some((5, 9)));
    }
}
