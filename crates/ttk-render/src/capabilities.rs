use bitflags::bitflags;

bitflags! {
    /// Mouse event kinds a backend can actually synthesize. Events of an
    /// unsupported kind are never synthesized (§4.4 Mouse events).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MouseKinds: u8 {
        const BUTTON_DOWN   = 0b00001;
        const BUTTON_UP     = 0b00010;
        const DOUBLE_CLICK  = 0b00100;
        const MOVE          = 0b01000;
        const WHEEL         = 0b10000;
        const DRAG          = 0b100000;
    }
}

/// What a backend instance supports, returned from `Renderer::init` and
/// queryable at any time via `Renderer::capabilities`. Image support is
/// always `false` — the API shape is reserved but unimplemented (non-goal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub mouse_kinds: MouseKinds,
    pub clipboard: bool,
    pub menu_bar: bool,
    pub image: bool,
}

impl Capabilities {
    pub const fn none() -> Self {
        Capabilities { mouse_kinds: MouseKinds::empty(), clipboard: false, menu_bar: false, image: false }
    }
}
