use bitflags::bitflags;

bitflags! {
    /// Modifier keys held down during a key or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT   = 0b0001;
        const CONTROL = 0b0010;
        const ALT     = 0b0100;
        const COMMAND = 0b1000;
    }
}

impl Modifiers {
    /// Any of CONTROL, ALT, or COMMAND. Shift alone is not a command modifier.
    pub fn is_command(self) -> bool {
        self.intersects(Modifiers::CONTROL | Modifiers::ALT | Modifiers::COMMAND)
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Modifiers::empty()
    }
}
