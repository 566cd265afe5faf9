use crate::item::ItemId;
use crate::item_stack::ItemStack;
use crate::item_view::ItemView;
use indexmap::IndexMap;

/// Finds the card under a point.
pub struct HitTester<'a> {
    stack: &'a ItemStack,
    views: &'a IndexMap<ItemId, ItemView>,
}

impl<'a> HitTester<'a> {
    pub fn new(stack: &'a ItemStack, views: &'a IndexMap<ItemId, ItemView>) -> Self {
        Self { stack, views }
    }

    /// Front-most stack item whose bound, visible view contains `(x, y)`,
    /// swipe offset included.
    pub fn find_item_at(&self, x: f32, y: f32) -> Option<ItemId> {
        self.stack
            .stack_items()
            .rev()
            .filter_map(|item| self.views.get(&item.id))
            .find(|view| view.is_visible() && view.screen_rect().contains(x, y))
            .map(ItemView::item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::transform::Transform;
    use cardstack_graphics::Rect;

    fn bound(stack: &ItemStack, rects: &[(u64, Rect)]) -> IndexMap<ItemId, ItemView> {
        rects
            .iter()
            .filter(|(id, _)| stack.contains(ItemId(*id)))
            .map(|(id, rect)| {
                (
                    ItemId(*id),
                    ItemView::new(ItemId(*id), Transform::new(*rect, 0.0, 0.0)),
                )
            })
            .collect()
    }

    #[test]
    fn front_most_overlapping_card_wins() {
        let stack = ItemStack::from_items([Item::new(1, "back"), Item::new(2, "front")]);
        let views = bound(
            &stack,
            &[
                (1, Rect::new(0.0, 0.0, 100.0, 100.0)),
                (2, Rect::new(0.0, 50.0, 100.0, 100.0)),
            ],
        );
        let hit = HitTester::new(&stack, &views);
        assert_eq!(hit.find_item_at(10.0, 75.0), Some(ItemId(2)));
        assert_eq!(hit.find_item_at(10.0, 25.0), Some(ItemId(1)));
        assert_eq!(hit.find_item_at(10.0, 400.0), None);
    }

    #[test]
    fn hidden_and_unbound_cards_are_skipped() {
        let stack = ItemStack::from_items([Item::new(1, "back"), Item::new(2, "front")]);
        let mut views = bound(&stack, &[(1, Rect::new(0.0, 0.0, 100.0, 100.0))]);
        assert_eq!(
            HitTester::new(&stack, &views).find_item_at(5.0, 5.0),
            Some(ItemId(1))
        );
        if let Some(view) = views.get_mut(&ItemId(1)) {
            view.apply_transform(Transform::hidden());
        }
        assert_eq!(HitTester::new(&stack, &views).find_item_at(0.0, 0.0), None);
    }

    #[test]
    fn swipe_offset_moves_the_hit_area() {
        let stack = ItemStack::from_items([Item::new(1, "only")]);
        let mut views = bound(&stack, &[(1, Rect::new(0.0, 0.0, 100.0, 100.0))]);
        if let Some(view) = views.get_mut(&ItemId(1)) {
            view.set_translation_x(200.0);
        }
        let hit = HitTester::new(&stack, &views);
        assert_eq!(hit.find_item_at(50.0, 50.0), None);
        assert_eq!(hit.find_item_at(250.0, 50.0), Some(ItemId(1)));
    }
}
