//! Swipe-to-dismiss coordination.
//!
//! When a drag on a card starts, the coordinator snapshots where every other
//! card is now and where it will be once the dragged card is gone. As the
//! card moves sideways the rest of the stack is interpolated between the two
//! snapshots, so it reflows in step with the swipe. Releasing either commits
//! the removal at the precomputed scroll or snaps everything back.

use crate::events::{StackEvent, StackEventSink, StackMetric};
use crate::item::ItemId;
use crate::item_stack::ItemStack;
use crate::item_view::ItemView;
use crate::layout::FocusState;
use crate::stack_view::{AnimationProps, StackView};
use crate::transform::Transform;
use cardstack_animation::{Easing, Lerp};
use cardstack_foundation::{SwipeAnimation, SwipeAnimationKind};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Before and after snapshots for one dragged card.
///
/// Both maps are keyed by the same items: the stack items that were not
/// ignored when the drag began.
#[derive(Clone, Debug)]
pub struct DismissSession {
    dragged: ItemId,
    current_transforms: IndexMap<ItemId, Transform>,
    final_transforms: IndexMap<ItemId, Transform>,
    target_scroll: f32,
}

impl DismissSession {
    pub fn dragged(&self) -> ItemId {
        self.dragged
    }

    pub fn current_transforms(&self) -> &IndexMap<ItemId, Transform> {
        &self.current_transforms
    }

    pub fn final_transforms(&self) -> &IndexMap<ItemId, Transform> {
        &self.final_transforms
    }

    /// Scroll the stack settles at once the dragged card is removed.
    pub fn target_scroll(&self) -> f32 {
        self.target_scroll
    }
}

#[derive(Debug)]
pub struct SwipeDismissCoordinator {
    sessions: FxHashMap<ItemId, DismissSession>,
    animations: IndexMap<ItemId, SwipeAnimation<ItemId>>,
    reflow_easing: Easing,
}

impl SwipeDismissCoordinator {
    pub fn new(reflow_easing: Easing) -> Self {
        Self {
            sessions: FxHashMap::default(),
            animations: IndexMap::new(),
            reflow_easing,
        }
    }

    pub fn session(&self, item: ItemId) -> Option<&DismissSession> {
        self.sessions.get(&item)
    }

    pub fn animation(&self, item: ItemId) -> Option<&SwipeAnimation<ItemId>> {
        self.animations.get(&item)
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// A card can be swiped unless it is already animating out or back, and
    /// only while it is part of the stack.
    pub fn is_dismissable(&self, stack: &ItemStack, item: ItemId) -> bool {
        !self.animations.contains_key(&item) && stack.index_of_stack_item(item).is_some()
    }

    /// Eased `|translation| / width` of the dragged card.
    pub fn dismiss_fraction(&self, stack: &StackView, item: ItemId) -> f32 {
        let width = stack.bounds().width;
        if width <= 0.0 {
            return 0.0;
        }
        let fraction = (stack.translation_x(item) / width).abs().min(1.0);
        self.reflow_easing.transform(fraction)
    }

    pub fn on_drag_begin(&mut self, stack: &mut StackView, item: ItemId) {
        if let Some(view) = stack.view_mut(item) {
            view.set_clip_with_stack(false);
            view.set_touch_enabled(false);
        }
        stack.request_disallow_parent_intercept(true);
        stack.ignore_item(item);

        let items = stack.laid_out_stack_ids();
        let current_transforms = stack.current_transforms(&items);
        let (anchor, is_front_most) = stack.find_anchor_item();
        let current_scroll = stack.scroll_p();
        let prev_anchor_scroll = anchor.and_then(|anchor| stack.layout().scroll_for_item(anchor));

        stack.update_layout();

        let target_scroll = match anchor {
            None => current_scroll,
            Some(_) if is_front_most => stack.mapper().bounded(current_scroll),
            Some(anchor) => match (prev_anchor_scroll, stack.layout().scroll_for_item(anchor)) {
                (Some(prev), Some(next)) => {
                    let mut offset = next - prev;
                    // Halve only when unfocused: the back moves up and the
                    // front moves back by half each. A focused stack takes
                    // the full offset so the front card stays still.
                    if stack.layout().focus_state() != FocusState::Focused {
                        offset /= 2.0;
                    }
                    stack.mapper().bounded(current_scroll + offset)
                }
                _ => current_scroll,
            },
        };

        let visible_now: SmallVec<[ItemId; 8]> = current_transforms
            .iter()
            .filter(|(_, transform)| transform.visible)
            .map(|(&id, _)| id)
            .collect();
        let newly_bound = stack.bind_views(&[target_scroll], &visible_now);
        for id in newly_bound {
            if let Some(transform) = current_transforms.get(&id) {
                if let Err(err) = stack.apply_transform(id, *transform) {
                    log::warn!("placing {id} for dismissal: {err}");
                }
            }
        }

        let final_transforms = stack.layout_transforms(&items, target_scroll);
        log::debug!(
            "drag began on {item}: anchor {anchor:?}, front-most {is_front_most}, scroll {current_scroll} -> {target_scroll}"
        );
        self.sessions.insert(
            item,
            DismissSession {
                dragged: item,
                current_transforms,
                final_transforms,
                target_scroll,
            },
        );
    }

    /// Reflows the other cards for the dragged card's current offset.
    pub fn on_progress(&mut self, stack: &mut StackView, item: ItemId) -> bool {
        let fraction = self.dismiss_fraction(stack, item);
        self.apply_dismiss_fraction(stack, item, fraction);
        true
    }

    /// Moves every bound, non-ignored card `fraction` of the way from its
    /// current snapshot to its final one.
    pub fn apply_dismiss_fraction(&self, stack: &mut StackView, item: ItemId, fraction: f32) {
        let Some(session) = self.sessions.get(&item) else {
            return;
        };
        stack.apply_transforms(|id| {
            let from = session.current_transforms.get(&id)?;
            let to = session.final_transforms.get(&id)?;
            Some(from.lerp(to, fraction))
        });
    }

    /// The dismiss animation finished: settle the scroll and drop the card.
    pub fn on_commit(&mut self, stack: &mut StackView, sink: &mut dyn StackEventSink, item: ItemId) {
        if let Some(view) = stack.view_mut(item) {
            view.set_clip_with_stack(true);
            view.set_touch_enabled(true);
        }
        let target_scroll = match self.sessions.remove(&item) {
            Some(session) => session.target_scroll,
            None => stack.scroll_p(),
        };
        stack.set_scroll_p(target_scroll);

        let view = stack
            .view(item)
            .cloned()
            .unwrap_or_else(|| ItemView::new(item, Transform::hidden()));
        sink.send(StackEvent::ItemDismissed { item, view });
        self.animations.shift_remove(&item);
        sink.count(StackMetric::ItemDismissedViaSwipe);

        if let Err(err) = stack.remove_item(item) {
            log::warn!("dismiss commit: {err}");
        }
    }

    /// The snap-back animation finished: put the card back into layout.
    pub fn on_cancel(&mut self, stack: &mut StackView, item: ItemId) {
        if let Some(view) = stack.view_mut(item) {
            view.set_clip_with_stack(true);
            view.set_touch_enabled(true);
        }
        stack.unignore_item(item);
        stack.update_layout();
        stack.relayout_views(AnimationProps::Immediate);
        self.animations.shift_remove(&item);
        self.sessions.remove(&item);
        log::debug!("{item} snapped back");
    }

    /// Release without dismissal; the snap-back animation that follows does
    /// the cleanup.
    pub fn on_drag_aborted(&mut self, item: ItemId) {
        log::trace!("drag on {item} aborted");
    }

    pub fn track_dismiss_animation(&mut self, animation: SwipeAnimation<ItemId>) {
        self.animations.insert(animation.target(), animation);
    }

    pub fn track_snap_back_animation(&mut self, mut animation: SwipeAnimation<ItemId>) {
        animation.set_easing(Easing::FastOutSlowInEasing);
        self.animations.insert(animation.target(), animation);
    }

    /// Jumps every swipe animation to its end and runs its completion.
    pub fn end_all_animations(&mut self, stack: &mut StackView, sink: &mut dyn StackEventSink) {
        let animations: Vec<_> = self.animations.drain(..).collect();
        for (item, mut animation) in animations {
            animation.end();
            self.finish(stack, sink, item, &animation);
        }
    }

    /// Advances the swipe animations. Returns true while any runs.
    pub fn tick(
        &mut self,
        stack: &mut StackView,
        sink: &mut dyn StackEventSink,
        frame_time_nanos: u64,
    ) -> bool {
        if self.animations.is_empty() {
            return false;
        }

        let mut finished: SmallVec<[ItemId; 2]> = SmallVec::new();
        for (&item, animation) in self.animations.iter_mut() {
            if !animation.tick(frame_time_nanos) {
                finished.push(item);
            }
            if let Err(err) = stack.set_translation_x(item, animation.translation()) {
                log::warn!("swipe animation: {err}");
            }
        }
        let running: SmallVec<[ItemId; 2]> = self
            .animations
            .keys()
            .copied()
            .filter(|item| !finished.contains(item))
            .collect();
        for item in running {
            self.on_progress(stack, item);
        }

        for item in finished {
            if let Some(animation) = self.animations.shift_remove(&item) {
                self.finish(stack, sink, item, &animation);
            }
        }
        !self.animations.is_empty()
    }

    fn finish(
        &mut self,
        stack: &mut StackView,
        sink: &mut dyn StackEventSink,
        item: ItemId,
        animation: &SwipeAnimation<ItemId>,
    ) {
        if let Err(err) = stack.set_translation_x(item, animation.translation()) {
            log::warn!("swipe animation: {err}");
        }
        self.on_progress(stack, item);
        match animation.kind() {
            SwipeAnimationKind::Dismiss => self.on_commit(stack, sink, item),
            SwipeAnimationKind::SnapBack => self.on_cancel(stack, item),
        }
    }
}

impl Default for SwipeDismissCoordinator {
    fn default() -> Self {
        Self::new(crate::config::STACK_REFLOW_EASING)
    }
}

#[cfg(test)]
#[path = "tests/dismiss_tests.rs"]
mod tests;
