use crate::item::ItemId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// The item is not part of the stack.
    UnknownItem(ItemId),
    /// The item is in the stack but has no bound view.
    Unbound(ItemId),
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::UnknownItem(id) => write!(f, "{id} is not in the stack"),
            StackError::Unbound(id) => write!(f, "{id} has no bound view"),
        }
    }
}

impl std::error::Error for StackError {}
