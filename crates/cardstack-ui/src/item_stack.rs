//! Ordered card collection and the set of cards excluded from layout.

use crate::item::{Item, ItemId};
use rustc_hash::FxHashSet;

/// Items temporarily left out of layout while they are being dismissed.
#[derive(Clone, Debug, Default)]
pub struct IgnoreSet {
    ids: FxHashSet<ItemId>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when `id` was already ignored.
    pub fn insert(&mut self, id: ItemId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Items in back-to-front order: index 0 is the back of the stack and the
/// last item is the front-most.
#[derive(Clone, Debug, Default)]
pub struct ItemStack {
    items: Vec<Item>,
    ignored: IgnoreSet,
}

impl ItemStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut stack = Self::new();
        for item in items {
            stack.push(item);
        }
        stack
    }

    /// Adds `item` at the front. An item with the same id is replaced in place.
    pub fn push(&mut self, item: Item) {
        match self.index_of(item.id) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
    }

    /// Removes `id` from the stack and from the ignore set.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.index_of(id)?;
        self.ignored.remove(id);
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.ignored.clear();
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items, back to front.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items of the scrolling stack, back to front, ignored ones included.
    pub fn stack_items(&self) -> impl DoubleEndedIterator<Item = &Item> + '_ {
        self.items.iter().filter(|item| item.is_stack_item())
    }

    /// Position of `id` among the scrolling stack items.
    pub fn index_of_stack_item(&self, id: ItemId) -> Option<usize> {
        self.stack_items().position(|item| item.id == id)
    }

    /// Items of the secondary workspace, back to front.
    pub fn secondary_items(&self) -> impl DoubleEndedIterator<Item = &Item> + '_ {
        self.items.iter().filter(|item| !item.is_stack_item())
    }

    /// Items that take part in layout, back to front.
    pub fn laid_out_items(&self) -> impl DoubleEndedIterator<Item = &Item> + '_ {
        self.items
            .iter()
            .filter(move |item| !self.ignored.contains(item.id))
    }

    pub fn laid_out_ids(&self) -> Vec<ItemId> {
        self.laid_out_items().map(|item| item.id).collect()
    }

    /// The front-most stack item, ignored or not.
    pub fn front_most(&self) -> Option<&Item> {
        self.stack_items().next_back()
    }

    pub fn ignored(&self) -> &IgnoreSet {
        &self.ignored
    }

    /// Leaves `id` out of layout. Unknown ids are not recorded.
    pub fn ignore(&mut self, id: ItemId) -> bool {
        self.contains(id) && self.ignored.insert(id)
    }

    pub fn unignore(&mut self, id: ItemId) -> bool {
        self.ignored.remove(id)
    }

    pub fn is_ignored(&self, id: ItemId) -> bool {
        self.ignored.contains(id)
    }
}
