//! Touch handling for the card stack.
//!
//! [`GestureController`] follows the host's two-phase dispatch: every event
//! of a gesture goes through [`GestureController::on_intercept_touch`] until
//! it returns true, after which the rest of the gesture goes to
//! [`GestureController::on_touch`]. A gesture that starts away from any card
//! is sent to `on_touch` from the down event on.
//!
//! Vertical drags scroll the stack and fling on release. Horizontal drags on
//! a card are claimed by the swipe recognizer, which hands the card to the
//! [`SwipeDismissCoordinator`]. A tap on the empty background closes the
//! switcher.

use crate::config::StackConfig;
use crate::dismiss::SwipeDismissCoordinator;
use crate::events::{StackEvent, StackEventSink, StackMetric};
use crate::item::ItemId;
use crate::stack_view::StackView;
use cardstack_foundation::{
    MotionAction, MotionEvent, PointerId, SwipeAnimation, SwipeCallback, SwipeRecognizer,
    VelocityTracker,
};
use cardstack_graphics::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    TrackingDown,
    Scrolling,
}

#[derive(Clone, Copy, Debug, Default)]
struct PointerSession {
    active_pointer: Option<PointerId>,
    down_x: f32,
    down_y: f32,
    down_scroll_p: f32,
    last_y: f32,
    is_scrolling: bool,
}

impl PointerSession {
    fn rebase(&mut self, position: Point, scroll_p: f32) {
        self.down_x = position.x;
        self.down_y = position.y;
        self.last_y = position.y;
        self.down_scroll_p = scroll_p;
    }
}

pub struct GestureController {
    config: StackConfig,
    swipe: SwipeRecognizer<ItemId>,
    dismiss: SwipeDismissCoordinator,
    velocity: VelocityTracker,
    session: PointerSession,
    active_item: Option<ItemId>,
    intercepted_by_swipe: bool,
}

impl GestureController {
    pub fn new(config: StackConfig) -> Self {
        Self {
            swipe: SwipeRecognizer::new(config.swipe_config()),
            dismiss: SwipeDismissCoordinator::new(config.reflow_easing),
            velocity: VelocityTracker::new(),
            session: PointerSession::default(),
            active_item: None,
            intercepted_by_swipe: false,
            config,
        }
    }

    pub fn state(&self) -> GestureState {
        if self.session.active_pointer.is_none() {
            GestureState::Idle
        } else if self.session.is_scrolling {
            GestureState::Scrolling
        } else {
            GestureState::TrackingDown
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.session.is_scrolling
    }

    pub fn is_swiping(&self) -> bool {
        self.swipe.is_dragging()
    }

    /// Card under the last down event, if any.
    pub fn active_item(&self) -> Option<ItemId> {
        self.active_item
    }

    pub fn active_pointer(&self) -> Option<PointerId> {
        self.session.active_pointer
    }

    pub fn coordinator(&self) -> &SwipeDismissCoordinator {
        &self.dismiss
    }

    /// Returns true once the gesture belongs to the stack: a swipe on a card
    /// or a recognized scroll.
    pub fn on_intercept_touch(
        &mut self,
        stack: &mut StackView,
        sink: &mut dyn StackEventSink,
        event: &MotionEvent,
    ) -> bool {
        let mut callbacks = DismissCallbacks {
            coordinator: &mut self.dismiss,
            stack: &mut *stack,
        };
        self.intercepted_by_swipe = self.swipe.on_intercept_touch(&mut callbacks, event);
        if self.intercepted_by_swipe {
            return true;
        }
        self.handle_touch(stack, sink, event)
    }

    /// Handles an event of a gesture the stack owns. Always consumes it.
    pub fn on_touch(
        &mut self,
        stack: &mut StackView,
        sink: &mut dyn StackEventSink,
        event: &MotionEvent,
    ) -> bool {
        if self.intercepted_by_swipe {
            let mut callbacks = DismissCallbacks {
                coordinator: &mut self.dismiss,
                stack: &mut *stack,
            };
            if self.swipe.on_touch(&mut callbacks, event) {
                if matches!(event.action(), MotionAction::Up | MotionAction::Cancel) {
                    self.intercepted_by_swipe = false;
                    self.reset_session();
                    restore_scroll_bounds(stack);
                }
                return true;
            }
        }
        self.handle_touch(stack, sink, event);
        true
    }

    /// Wheel input from pointer-class devices moves focus through the stack.
    pub fn on_generic_motion(
        &mut self,
        stack: &mut StackView,
        sink: &mut dyn StackEventSink,
        event: &MotionEvent,
    ) -> bool {
        if !event.source().is_pointer_class() || event.action() != MotionAction::Scroll {
            return false;
        }
        let forward = event.axis_vscroll() > 0.0;
        let focused = stack.set_relative_focused_item(forward, sink);
        log::debug!("wheel {} focused {focused:?}", event.axis_vscroll());
        true
    }

    /// Advances swipe, scroll and view animations. Returns true while any runs.
    pub fn tick(
        &mut self,
        stack: &mut StackView,
        sink: &mut dyn StackEventSink,
        frame_time_nanos: u64,
    ) -> bool {
        let swiping = self.dismiss.tick(stack, sink, frame_time_nanos);
        let animating = stack.tick(frame_time_nanos);
        swiping || animating
    }

    fn handle_touch(
        &mut self,
        stack: &mut StackView,
        sink: &mut dyn StackEventSink,
        event: &MotionEvent,
    ) -> bool {
        if stack.views().is_empty() {
            return false;
        }

        match event.action() {
            MotionAction::Down => self.on_down(stack, sink, event),
            MotionAction::PointerDown => self.on_pointer_down(stack, event),
            MotionAction::Move => self.on_move(stack, sink, event),
            MotionAction::PointerUp => self.on_pointer_up(stack, event),
            MotionAction::Up => self.on_up(stack, sink, event),
            MotionAction::Cancel => {
                self.reset_session();
                restore_scroll_bounds(stack);
            }
            MotionAction::Scroll => {}
        }
        self.session.is_scrolling
    }

    fn on_down(&mut self, stack: &mut StackView, sink: &mut dyn StackEventSink, event: &MotionEvent) {
        let position = event.primary_position();
        self.session = PointerSession {
            active_pointer: event.pointer_id(0).ok(),
            ..PointerSession::default()
        };
        self.session.rebase(position, stack.scroll_p());
        self.active_item = stack.find_item_at(position.x, position.y);
        stack.request_disallow_parent_intercept(false);

        stack.stop_scroll_animations();
        stack.cancel_all_view_animations();
        self.dismiss.end_all_animations(stack, sink);

        self.velocity.clear();
        self.velocity.add_movement(event);
        log::trace!(
            "down at ({}, {}) on {:?}, scroll {}",
            position.x,
            position.y,
            self.active_item,
            self.session.down_scroll_p
        );
    }

    fn on_pointer_down(&mut self, stack: &StackView, event: &MotionEvent) {
        let index = event.action_index();
        match (event.pointer_id(index), event.position(index)) {
            (Ok(id), Ok(position)) => {
                self.session.active_pointer = Some(id);
                self.session.rebase(position, stack.scroll_p());
            }
            (Err(err), _) | (_, Err(err)) => log::warn!("ignoring pointer down: {err}"),
        }
        self.velocity.add_movement(event);
    }

    fn on_move(&mut self, stack: &mut StackView, sink: &mut dyn StackEventSink, event: &MotionEvent) {
        let Some(active) = self.session.active_pointer else {
            log::warn!("ignoring move without an active pointer");
            return;
        };
        let position = match event.position_of(active) {
            Ok(position) => position,
            Err(err) => {
                log::warn!("ignoring move: {err}");
                return;
            }
        };

        let session = &mut self.session;
        if !session.is_scrolling {
            let dy = (position.y - session.down_y).abs();
            let dx = (position.x - session.down_x).abs();
            if dy > self.config.view.touch_slop && dy > dx {
                session.is_scrolling = true;
                stack.request_disallow_parent_intercept(true);
                sink.count(StackMetric::UserScrolled);
                log::debug!("scroll started from {}", session.down_scroll_p);
            }
        }
        if session.is_scrolling {
            let delta_p = stack.mapper().delta_p_for_y(session.down_y, position.y);
            stack.set_delta_scroll(session.down_scroll_p, delta_p);
            sink.send(StackEvent::ScrollChanged {
                delta_y: position.y - session.last_y,
            });
            log::trace!("scroll {}", stack.scroll_p());
        }
        session.last_y = position.y;
        self.velocity.add_movement(event);
    }

    fn on_pointer_up(&mut self, stack: &StackView, event: &MotionEvent) {
        let index = event.action_index();
        let lifted = event.pointer_id(index).ok();
        if lifted.is_some() && lifted == self.session.active_pointer {
            let next_index = if index == 0 { 1 } else { 0 };
            match (event.pointer_id(next_index), event.position(next_index)) {
                (Ok(id), Ok(position)) => {
                    self.session.active_pointer = Some(id);
                    self.session.rebase(position, stack.scroll_p());
                }
                _ => self.session.active_pointer = None,
            }
        }
        self.velocity.add_movement(event);
    }

    fn on_up(&mut self, stack: &mut StackView, sink: &mut dyn StackEventSink, event: &MotionEvent) {
        self.velocity.add_movement(event);
        self.velocity
            .compute_current_velocity(1000, self.config.view.maximum_fling_velocity);
        let tracked = self
            .session
            .active_pointer
            .and_then(|id| event.position_of(id).ok().map(|position| (id, position)));
        let (position, velocity) = match tracked {
            Some((id, position)) => (position, self.velocity.y_velocity(id)),
            None => {
                log::warn!("up without the active pointer, not flinging");
                (event.primary_position(), 0.0)
            }
        };

        let session = self.session;
        if session.is_scrolling {
            if stack.is_scroll_out_of_bounds() {
                stack.animate_bound_correction();
            } else if velocity.abs() > self.config.view.minimum_fling_velocity {
                let mapper = stack.mapper();
                let min_y = session.down_y
                    + mapper.y_for_delta_p(session.down_scroll_p, mapper.max_scroll_p());
                let max_y = session.down_y
                    + mapper.y_for_delta_p(session.down_scroll_p, mapper.min_scroll_p());
                stack.fling(
                    session.down_scroll_p,
                    session.down_y,
                    position.y,
                    velocity,
                    min_y,
                    max_y,
                    self.config.overscroll_px,
                );
            }
        } else {
            // The down event stopped any fling or correction in flight.
            restore_scroll_bounds(stack);
            if self.active_item.is_none() {
                self.maybe_hide_from_background_tap(stack, sink, position);
            }
        }
        self.reset_session();
    }

    fn maybe_hide_from_background_tap(
        &self,
        stack: &mut StackView,
        sink: &mut dyn StackEventSink,
        position: Point,
    ) {
        let view = &self.config.view;
        let dx = (self.session.down_x - position.x).abs();
        let dy = (self.session.down_y - position.y).abs();
        if dx > view.touch_slop || dy > view.touch_slop {
            return;
        }

        // Forgive taps that just missed a card.
        let shifted_x = if position.x > stack.bounds().center().x {
            position.x - view.window_touch_slop
        } else {
            position.x + view.window_touch_slop
        };
        if stack.find_item_at(shifted_x, position.y).is_some() {
            return;
        }

        if let Some(region) = stack.layout().secondary_region() {
            if region.contains_y(position.y) && stack.launch_secondary_items(sink) {
                return;
            }
        }

        log::debug!("background tap at ({}, {})", position.x, position.y);
        sink.send(StackEvent::HideUi {
            user_triggered: true,
            return_to_home: true,
        });
    }

    fn reset_session(&mut self) {
        self.session.active_pointer = None;
        self.session.is_scrolling = false;
        self.velocity.clear();
    }
}

/// Brings a scroll left past the bounds back into range.
fn restore_scroll_bounds(stack: &mut StackView) {
    if stack.is_scroll_out_of_bounds() && !stack.scroller().is_animating() {
        stack.animate_bound_correction();
    }
}

/// Swipe recognizer hooks backed by the coordinator and the stack.
struct DismissCallbacks<'a> {
    coordinator: &'a mut SwipeDismissCoordinator,
    stack: &'a mut StackView,
}

impl SwipeCallback<ItemId> for DismissCallbacks<'_> {
    fn child_at_position(&self, position: Point) -> Option<ItemId> {
        self.stack
            .find_item_at(position.x, position.y)
            .filter(|&item| self.coordinator.is_dismissable(self.stack.stack(), item))
    }

    fn can_child_be_dismissed(&self, child: ItemId) -> bool {
        self.coordinator.is_dismissable(self.stack.stack(), child)
    }

    fn size(&self, _child: ItemId) -> f32 {
        self.stack.bounds().width
    }

    fn translation(&self, child: ItemId) -> f32 {
        self.stack.translation_x(child)
    }

    fn set_translation(&mut self, child: ItemId, translation: f32) {
        if let Err(err) = self.stack.set_translation_x(child, translation) {
            log::warn!("swipe translation: {err}");
        }
    }

    fn on_begin_drag(&mut self, child: ItemId) {
        self.coordinator.on_drag_begin(self.stack, child);
    }

    fn update_swipe_progress(&mut self, child: ItemId, _dismissable: bool, _progress: f32) -> bool {
        self.coordinator.on_progress(self.stack, child)
    }

    fn on_drag_cancelled(&mut self, child: ItemId) {
        self.coordinator.on_drag_aborted(child);
    }

    fn prepare_dismiss_animation(&mut self, animation: SwipeAnimation<ItemId>) {
        self.coordinator.track_dismiss_animation(animation);
    }

    fn prepare_snap_back_animation(&mut self, animation: SwipeAnimation<ItemId>) {
        self.coordinator.track_snap_back_animation(animation);
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
