//! Menu tree shared by `Renderer::set_menu_bar` and the `MenuEvent` delivered
//! on selection.

/// A node in the menu tree: either a selectable item or a separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Item {
        id: String,
        label: String,
        shortcut: Option<String>,
        enabled: bool,
    },
    Separator,
}

/// Tree of menus installed via `Renderer::set_menu_bar`. All item ids must be
/// unique across the whole tree; [`Menu::validate`] checks this before a
/// backend installs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub items: Vec<MenuNode>,
}

impl Menu {
    pub fn new() -> Self {
        Menu::default()
    }

    pub fn push(mut self, node: MenuNode) -> Self {
        self.items.push(node);
        self
    }

    /// Returns the duplicated id on failure.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for node in &self.items {
            if let MenuNode::Item { id, .. } = node {
                if !seen.insert(id.clone()) {
                    return Err(id.clone());
                }
            }
        }
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<&MenuNode> {
        self.items.iter().find(|node| match node {
            MenuNode::Item { id: node_id, .. } => node_id == id,
            MenuNode::Separator => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> MenuNode {
        MenuNode::Item {
            id: id.to_string(),
            label: id.to_string(),
            shortcut: None,
            enabled: true,
        }
    }

    #[test]
    fn unique_ids_validate() {
        let menu = Menu::new().push(item("file.quit")).push(item("file.open"));
        assert!(menu.validate().is_ok());
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let menu = Menu::new().push(item("file.quit")).push(item("file.quit"));
        assert_eq!(menu.validate(), Err("file.quit".to_string()));
    }

    #[test]
    fn separators_do_not_affect_id_uniqueness() {
        let menu = Menu::new().push(item("a")).push(MenuNode::Separator).push(item("b"));
        assert!(menu.validate().is_ok());
    }

    #[test]
    fn find_returns_matching_item() {
        let menu = Menu::new().push(item("file.quit"));
        assert!(menu.find("file.quit").is_some());
        assert!(menu.find("file.open").is_none());
    }
}
