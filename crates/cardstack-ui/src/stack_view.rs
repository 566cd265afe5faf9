//! The card stack container.
//!
//! Owns the items, the views bound to the visible ones, the layout engine
//! and the scroller. Views are keyed by item id and kept in stack order.

use crate::config::StackConfig;
use crate::error::StackError;
use crate::events::{StackEvent, StackEventSink};
use crate::hit_test::HitTester;
use crate::item::{Item, ItemId};
use crate::item_stack::ItemStack;
use crate::item_view::ItemView;
use crate::layout::{FocusState, LayoutEngine};
use crate::scroll_mapper::ScrollMapper;
use crate::scroller::Scroller;
use crate::transform::Transform;
use cardstack_animation::{AnimationSpec, Easing};
use cardstack_graphics::Rect;
use indexmap::IndexMap;

/// How a relayout moves views to their new transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationProps {
    Immediate,
    Animated(AnimationSpec),
}

pub struct StackView {
    config: StackConfig,
    stack: ItemStack,
    views: IndexMap<ItemId, ItemView>,
    layout: Box<dyn LayoutEngine>,
    scroller: Scroller,
    bounds: Rect,
    focused: Option<ItemId>,
    parent_intercept_disallowed: bool,
}

impl StackView {
    pub fn new(layout: impl LayoutEngine + 'static, bounds: Rect, config: StackConfig) -> Self {
        let mut layout: Box<dyn LayoutEngine> = Box::new(layout);
        layout.set_bounds(bounds);
        Self {
            scroller: Scroller::new(&config),
            config,
            stack: ItemStack::new(),
            views: IndexMap::new(),
            layout,
            bounds,
            focused: None,
            parent_intercept_disallowed: false,
        }
    }

    /// Replaces the items and scrolls to the front card.
    pub fn set_items(&mut self, items: impl IntoIterator<Item = Item>) {
        self.stack = ItemStack::from_items(items);
        self.views.clear();
        self.focused = None;
        self.stop_scroll_animations();
        self.update_layout();
        let front = self.layout.max_scroll_p();
        self.scroller.set_scroll_p(front);
        self.relayout_views(AnimationProps::Immediate);
        log::debug!("stack reset with {} items", self.stack.len());
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.layout.set_bounds(bounds);
        self.update_layout();
        self.relayout_views(AnimationProps::Immediate);
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn stack(&self) -> &ItemStack {
        &self.stack
    }

    pub fn views(&self) -> &IndexMap<ItemId, ItemView> {
        &self.views
    }

    pub fn view(&self, id: ItemId) -> Option<&ItemView> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ItemId) -> Option<&mut ItemView> {
        self.views.get_mut(&id)
    }

    pub fn layout(&self) -> &dyn LayoutEngine {
        self.layout.as_ref()
    }

    pub fn mapper(&self) -> ScrollMapper<'_> {
        ScrollMapper::new(self.layout.as_ref())
    }

    pub fn scroller(&self) -> &Scroller {
        &self.scroller
    }

    pub fn scroll_p(&self) -> f32 {
        self.scroller.scroll_p()
    }

    pub fn focused_item(&self) -> Option<ItemId> {
        self.focused
    }

    pub fn parent_intercept_disallowed(&self) -> bool {
        self.parent_intercept_disallowed
    }

    /// Asks the host not to steal the current gesture.
    pub fn request_disallow_parent_intercept(&mut self, disallow: bool) {
        self.parent_intercept_disallowed = disallow;
    }

    pub fn find_item_at(&self, x: f32, y: f32) -> Option<ItemId> {
        HitTester::new(&self.stack, &self.views).find_item_at(x, y)
    }

    pub fn ignore_item(&mut self, id: ItemId) -> bool {
        self.stack.ignore(id)
    }

    pub fn unignore_item(&mut self, id: ItemId) -> bool {
        self.stack.unignore(id)
    }

    pub fn is_ignored(&self, id: ItemId) -> bool {
        self.stack.is_ignored(id)
    }

    /// Non-ignored stack items, back to front.
    pub fn laid_out_stack_ids(&self) -> Vec<ItemId> {
        self.stack
            .stack_items()
            .filter(|item| !self.stack.is_ignored(item.id))
            .map(|item| item.id)
            .collect()
    }

    /// Feeds the non-ignored items to the layout. Leaves the scroll alone.
    pub fn update_layout(&mut self) {
        self.layout.update(&self.stack);
    }

    pub fn set_focus_state(&mut self, state: FocusState) {
        self.layout.set_focus_state(state);
        self.relayout_views(AnimationProps::Immediate);
    }

    /// Sets the scroll as given and moves the views there.
    pub fn set_scroll_p(&mut self, scroll_p: f32) {
        self.scroller.set_scroll_p(scroll_p);
        self.relayout_views(AnimationProps::Immediate);
    }

    /// Scrolls to `down_scroll_p + delta_p`, clamped into bounds.
    pub fn set_delta_scroll(&mut self, down_scroll_p: f32, delta_p: f32) {
        let mapper = ScrollMapper::new(self.layout.as_ref());
        self.scroller.set_delta_scroll(&mapper, down_scroll_p, delta_p);
        self.relayout_views(AnimationProps::Immediate);
    }

    pub fn is_scroll_out_of_bounds(&self) -> bool {
        self.scroller.is_out_of_bounds(&self.mapper())
    }

    pub fn stop_scroll_animations(&mut self) {
        self.scroller.stop_fling();
        self.scroller.stop_bound_animation();
    }

    pub fn animate_bound_correction(&mut self) -> bool {
        let mapper = ScrollMapper::new(self.layout.as_ref());
        self.scroller.animate_bound_correction(&mapper)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fling(
        &mut self,
        down_scroll_p: f32,
        down_y: f32,
        up_y: f32,
        velocity: f32,
        min_y: f32,
        max_y: f32,
        overscroll: f32,
    ) {
        self.scroller
            .fling(down_scroll_p, down_y, up_y, velocity, min_y, max_y, overscroll);
    }

    /// The front-most non-ignored stack item, and whether the front-most
    /// stack item is itself ignored.
    pub fn find_anchor_item(&self) -> (Option<ItemId>, bool) {
        let is_front_most = self
            .stack
            .front_most()
            .is_some_and(|item| self.stack.is_ignored(item.id));
        let anchor = self
            .stack
            .stack_items()
            .rev()
            .find(|item| !self.stack.is_ignored(item.id))
            .map(|item| item.id);
        (anchor, is_front_most)
    }

    /// Live transforms: a bound view reports its own, anything else is laid
    /// out at the current scroll.
    pub fn current_transforms(&self, items: &[ItemId]) -> IndexMap<ItemId, Transform> {
        let scroll_p = self.scroller.scroll_p();
        items
            .iter()
            .map(|&id| {
                let transform = match self.views.get(&id) {
                    Some(view) => *view.transform(),
                    None => self.layout.transform_for(id, scroll_p),
                };
                (id, transform)
            })
            .collect()
    }

    pub fn layout_transforms(&self, items: &[ItemId], scroll_p: f32) -> IndexMap<ItemId, Transform> {
        self.layout.transforms_at(items, scroll_p)
    }

    /// Binds views for the non-ignored items visible at the current scroll
    /// or at any of `extra_scrolls`, and unbinds the rest. Returns the newly
    /// bound items.
    pub fn bind_visible_views(&mut self, extra_scrolls: &[f32]) -> Vec<ItemId> {
        self.bind_views(extra_scrolls, &[])
    }

    /// Like [`StackView::bind_visible_views`], but never unbinds `keep`.
    pub fn bind_views(&mut self, extra_scrolls: &[f32], keep: &[ItemId]) -> Vec<ItemId> {
        let scroll_p = self.scroller.scroll_p();
        let mut newly_bound = Vec::new();
        for id in self.stack.laid_out_ids() {
            let transform = self.layout.transform_for(id, scroll_p);
            let visible = transform.visible
                || keep.contains(&id)
                || extra_scrolls
                    .iter()
                    .any(|&extra| self.layout.transform_for(id, extra).visible);
            if visible {
                if !self.views.contains_key(&id) {
                    self.views.insert(id, ItemView::new(id, transform));
                    newly_bound.push(id);
                }
            } else if self.views.shift_remove(&id).is_some() {
                log::trace!("unbound {id}");
            }
        }

        let stack = &self.stack;
        self.views.retain(|id, _| stack.contains(*id));
        self.views
            .sort_by(|a, _, b, _| stack.index_of(*a).cmp(&stack.index_of(*b)));
        if !newly_bound.is_empty() {
            log::trace!("bound {newly_bound:?}");
        }
        newly_bound
    }

    /// Rebinds views and moves every non-ignored view to its layout
    /// transform at the current scroll.
    pub fn relayout_views(&mut self, props: AnimationProps) {
        self.bind_visible_views(&[]);
        let scroll_p = self.scroller.scroll_p();
        for (id, view) in self.views.iter_mut() {
            if self.stack.is_ignored(*id) {
                continue;
            }
            let transform = self.layout.transform_for(*id, scroll_p);
            match props {
                AnimationProps::Immediate => view.apply_transform(transform),
                AnimationProps::Animated(spec) => view.animate_to(transform, spec),
            }
        }
    }

    /// Animated relayout with the configured duration.
    pub fn relayout_views_animated(&mut self) {
        let spec = AnimationSpec::tween(
            self.config.relayout_duration_ms,
            Easing::FastOutSlowInEasing,
        );
        self.relayout_views(AnimationProps::Animated(spec));
    }

    pub fn apply_transform(&mut self, id: ItemId, transform: Transform) -> Result<(), StackError> {
        self.bound_view_mut(id)?.apply_transform(transform);
        Ok(())
    }

    /// Applies `transform_for(id)` to every bound, non-ignored view it
    /// returns a transform for.
    pub fn apply_transforms(&mut self, mut transform_for: impl FnMut(ItemId) -> Option<Transform>) {
        for (id, view) in self.views.iter_mut() {
            if self.stack.is_ignored(*id) {
                continue;
            }
            if let Some(transform) = transform_for(*id) {
                view.apply_transform(transform);
            }
        }
    }

    /// Horizontal swipe offset of `id`, 0.0 when unbound.
    pub fn translation_x(&self, id: ItemId) -> f32 {
        self.views.get(&id).map_or(0.0, ItemView::translation_x)
    }

    pub fn set_translation_x(&mut self, id: ItemId, translation_x: f32) -> Result<(), StackError> {
        self.bound_view_mut(id)?.set_translation_x(translation_x);
        Ok(())
    }

    /// Jumps every running view animation to its end.
    pub fn cancel_all_view_animations(&mut self) {
        for view in self.views.values_mut() {
            view.finish_animation();
        }
    }

    /// Removes `id` from the stack, unbinds its view and relayouts the rest.
    pub fn remove_item(&mut self, id: ItemId) -> Result<(Item, Option<ItemView>), StackError> {
        let item = self.stack.remove(id).ok_or(StackError::UnknownItem(id))?;
        let view = self.views.shift_remove(&id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.update_layout();
        let bounded = self.scroller.bounded(&ScrollMapper::new(self.layout.as_ref()));
        self.scroller.set_scroll_p(bounded);
        self.relayout_views(AnimationProps::Immediate);
        log::debug!("removed {id}, {} items left", self.stack.len());
        Ok((item, view))
    }

    /// Focuses `id` and scrolls it to the front.
    pub fn set_focused_item(
        &mut self,
        id: ItemId,
        sink: &mut dyn StackEventSink,
    ) -> Result<(), StackError> {
        if !self.stack.contains(id) {
            return Err(StackError::UnknownItem(id));
        }
        self.focused = Some(id);
        if let Some(scroll_p) = self.layout.scroll_for_item(id) {
            self.stop_scroll_animations();
            let bounded = self.mapper().bounded(scroll_p);
            self.set_scroll_p(bounded);
        }
        sink.send(StackEvent::FocusChanged { item: id });
        Ok(())
    }

    /// Moves focus one stack item back (`forward`) or towards the front.
    ///
    /// Without a focused item, focus lands on the front-most item at or
    /// behind the scroll going forward, or the back-most item at or in front
    /// of it going backward.
    pub fn set_relative_focused_item(
        &mut self,
        forward: bool,
        sink: &mut dyn StackEventSink,
    ) -> Option<ItemId> {
        let ids = self.laid_out_stack_ids();
        let count = ids.len();
        if count == 0 {
            return None;
        }

        let current = self
            .focused
            .and_then(|focused| ids.iter().position(|&id| id == focused));
        let index = match current {
            Some(index) if forward => (index + count - 1) % count,
            Some(index) => (index + 1) % count,
            None => {
                let scroll_p = self.scroller.scroll_p();
                let item_scroll = |id: &ItemId| self.layout.scroll_for_item(*id);
                if forward {
                    ids.iter()
                        .rposition(|id| item_scroll(id).is_some_and(|p| p <= scroll_p))?
                } else {
                    ids.iter()
                        .position(|id| item_scroll(id).is_some_and(|p| p >= scroll_p))?
                }
            }
        };

        let id = ids[index];
        match self.set_focused_item(id, sink) {
            Ok(()) => Some(id),
            Err(err) => {
                log::warn!("focus change failed: {err}");
                None
            }
        }
    }

    /// Asks the host to launch the secondary workspace items. Returns false
    /// when there is nothing to launch.
    pub fn launch_secondary_items(&mut self, sink: &mut dyn StackEventSink) -> bool {
        let items: Vec<ItemId> = self
            .stack
            .secondary_items()
            .filter(|item| !self.stack.is_ignored(item.id))
            .map(|item| item.id)
            .collect();
        if items.is_empty() {
            return false;
        }
        log::debug!("launching secondary items {items:?}");
        sink.send(StackEvent::LaunchSecondary { items });
        true
    }

    /// Advances scroll and view animations. Returns true while any runs.
    pub fn tick(&mut self, frame_time_nanos: u64) -> bool {
        let before = self.scroller.scroll_p();
        let scrolling = {
            let mapper = ScrollMapper::new(self.layout.as_ref());
            self.scroller.tick(frame_time_nanos, &mapper)
        };
        if self.scroller.scroll_p() != before {
            self.relayout_views(AnimationProps::Immediate);
        }

        let mut animating = false;
        for view in self.views.values_mut() {
            animating |= view.tick(frame_time_nanos);
        }
        scrolling || animating
    }

    fn bound_view_mut(&mut self, id: ItemId) -> Result<&mut ItemView, StackError> {
        if !self.stack.contains(id) {
            return Err(StackError::UnknownItem(id));
        }
        self.views.get_mut(&id).ok_or(StackError::Unbound(id))
    }
}

#[cfg(test)]
#[path = "tests/stack_view_tests.rs"]
mod tests;
