//! Native OS menu bar via `muda`, translating the shared `ttk_events::Menu`
//! tree (§4.4/§6) into `muda`'s item tree and draining `muda`'s global
//! `MenuEvent` channel into `ttk_events::MenuEvent`s delivered through the
//! normal dispatch path (§8 scenario S6).

use std::str::FromStr;

use muda::accelerator::Accelerator;
use muda::{Menu as MudaMenu, MenuId, MenuItem, PredefinedMenuItem, Submenu};

use ttk_events::{Menu, MenuNode};

pub(crate) struct MenuBar {
    menu: MudaMenu,
}

impl MenuBar {
    /// Builds (but does not install) a native menu from `tree`. Returns
    /// `None` if `tree` fails id-uniqueness validation, matching
    /// `CrosstermBackend::set_menu_bar`'s no-op-on-invalid-tree behaviour.
    pub(crate) fn build(tree: &Menu) -> Option<MenuBar> {
        if tree.validate().is_err() {
            tracing::warn!(target: "ttk::desktop", "menu tree failed id-uniqueness validation, ignoring");
            return None;
        }
        // All of this toolkit's platforms except macOS require a menu bar's
        // top-level entries to themselves be submenus; one top-level
        // submenu holding every item keeps the flat `Menu` tree's shape
        // intact while satisfying that constraint uniformly.
        let submenu = Submenu::new("Menu", true);
        for node in &tree.items {
            match node {
                MenuNode::Item { id, label, shortcut, enabled } => {
                    let accelerator = shortcut.as_deref().and_then(|s| Accelerator::from_str(s).ok());
                    let item = MenuItem::with_id(MenuId::new(id.clone()), label, *enabled, accelerator);
                    if let Err(err) = submenu.append(&item) {
                        tracing::warn!(target: "ttk::desktop", %err, item_id = %id, "failed to append menu item");
                    }
                }
                MenuNode::Separator => {
                    if let Err(err) = submenu.append(&PredefinedMenuItem::separator()) {
                        tracing::warn!(target: "ttk::desktop", %err, "failed to append menu separator");
                    }
                }
            }
        }
        let menu = MudaMenu::new();
        if let Err(err) = menu.append(&submenu) {
            tracing::warn!(target: "ttk::desktop", %err, "failed to append menu submenu");
        }
        Some(MenuBar { menu })
    }

    #[cfg(target_os = "macos")]
    pub(crate) fn install(&self, _window: &winit::window::Window) {
        self.menu.init_for_nsapp();
    }

    #[cfg(target_os = "windows")]
    pub(crate) fn install(&self, window: &winit::window::Window) {
        use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};
        let Ok(handle) = window.window_handle() else { return };
        if let RawWindowHandle::Win32(handle) = handle.as_raw() {
            if let Err(err) = unsafe { self.menu.init_for_hwnd(handle.hwnd.get()) } {
                tracing::warn!(target: "ttk::desktop", %err, "failed to install menu bar for hwnd");
            }
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    pub(crate) fn install(&self, _window: &winit::window::Window) {
        // `muda`'s remaining platform path needs a `gtk::ApplicationWindow`,
        // which this toolkit's plain-`winit` window model does not
        // construct; `capabilities().menu_bar` is `false` here.
        tracing::debug!(target: "ttk::desktop", "native menu bar unsupported on this platform combination");
    }

    #[cfg(any(target_os = "macos", target_os = "windows"))]
    pub(crate) fn supported() -> bool {
        true
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    pub(crate) fn supported() -> bool {
        false
    }

    /// Drains `muda`'s global event channel, translating each into a
    /// `ttk_events::MenuEvent`.
    pub(crate) fn poll_events() -> Vec<ttk_events::MenuEvent> {
        let mut out = Vec::new();
        while let Ok(event) = muda::MenuEvent::receiver().try_recv() {
            out.push(ttk_events::MenuEvent { item_id: event.id.0.clone() });
        }
        out
    }
}
