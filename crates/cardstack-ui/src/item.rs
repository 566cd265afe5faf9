use std::fmt;

/// Stable identity of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Which area of the switcher an item lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Workspace {
    /// The scrolling card stack.
    #[default]
    Main,
    /// The secondary workspace region above the stack.
    Secondary,
}

/// A task or window shown as a card.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub label: String,
    pub workspace: Workspace,
}

impl Item {
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Self {
            id: ItemId(id),
            label: label.into(),
            workspace: Workspace::Main,
        }
    }

    pub fn secondary(id: u64, label: impl Into<String>) -> Self {
        Self {
            workspace: Workspace::Secondary,
            ..Self::new(id, label)
        }
    }

    pub fn is_stack_item(&self) -> bool {
        self.workspace == Workspace::Main
    }
}
