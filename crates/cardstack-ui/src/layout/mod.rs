//! Stack layout: where every card sits for a given scroll position.
//!
//! Scroll is measured in progress units `p`, not pixels. The engine owns the
//! scroll bounds and the mapping between pointer pixels and progress.

mod linear;

pub use linear::LinearStackLayout;

use crate::item::ItemId;
use crate::item_stack::ItemStack;
use crate::transform::Transform;
use cardstack_graphics::Rect;
use indexmap::IndexMap;

/// Whether the layout is spread out around a focused card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Unfocused,
    Focused,
}

pub trait LayoutEngine {
    /// Container rectangle the stack is laid out in.
    fn set_bounds(&mut self, bounds: Rect);

    /// Recomputes item positions and scroll bounds from the items that are
    /// not ignored. Never moves the scroll itself.
    fn update(&mut self, stack: &ItemStack);

    fn min_scroll_p(&self) -> f32;

    fn max_scroll_p(&self) -> f32;

    /// Scroll change produced by moving a pointer from `from_y` to `to_y`.
    fn scroll_delta_for_pixel_delta(&self, from_y: f32, to_y: f32) -> f32;

    /// Pointer travel that scrolls from `from_p` to `to_p`.
    fn pixel_delta_for_scroll_delta(&self, from_p: f32, to_p: f32) -> f32;

    /// Scroll at which `item` is the front card, for laid-out items.
    fn scroll_for_item(&self, item: ItemId) -> Option<f32>;

    /// Transform of `item` at `scroll_p`; hidden for items not laid out.
    fn transform_for(&self, item: ItemId, scroll_p: f32) -> Transform;

    fn transforms_at(&self, items: &[ItemId], scroll_p: f32) -> IndexMap<ItemId, Transform> {
        items
            .iter()
            .map(|&item| (item, self.transform_for(item, scroll_p)))
            .collect()
    }

    fn focus_state(&self) -> FocusState;

    fn set_focus_state(&mut self, state: FocusState);

    /// Area reserved for the secondary workspace, when there is one.
    fn secondary_region(&self) -> Option<Rect>;
}
