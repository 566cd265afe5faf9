//! Robot-style driver for the card stack
//!
//! [`StackRobot`] plays the part of the host window: it owns a
//! [`StackView`] and its [`GestureController`], routes synthesized touch
//! events through the intercept phase the way a view hierarchy would, and
//! pumps animation frames on a virtual clock.
//!
//! # Example
//!
//! ```
//! use cardstack_testing::StackRobot;
//!
//! let mut robot = StackRobot::with_cards(400.0, 800.0, 3);
//!
//! // Tap the empty area above the cards.
//! robot.tap(200.0, 40.0);
//! assert_eq!(robot.hide_count(), 1);
//! ```

use cardstack_foundation::{MotionAction, MotionEvent, PointerId};
use cardstack_graphics::{Point, Rect};
use cardstack_ui::{
    EventQueue, GestureController, Item, ItemId, LinearStackLayout, StackConfig, StackEvent,
    StackView,
};

/// Frame interval used by [`StackRobot::advance_frame`].
pub const FRAME_MILLIS: i64 = 16;

/// Upper bound on frames pumped by [`StackRobot::wait_for_idle`].
pub const MAX_IDLE_FRAMES: usize = 10_000;

/// Drives a stack with synthetic input and a virtual clock.
pub struct StackRobot {
    stack: StackView,
    controller: GestureController,
    events: EventQueue,
    /// The stack claimed the current gesture; later events skip the
    /// intercept phase.
    captured: bool,
    pointer: PointerId,
    time_ms: i64,
    step_ms: i64,
}

impl StackRobot {
    /// Wraps an existing stack.
    pub fn new(stack: StackView, config: StackConfig) -> Self {
        Self {
            stack,
            controller: GestureController::new(config),
            events: EventQueue::new(),
            captured: false,
            pointer: 0,
            time_ms: 0,
            step_ms: FRAME_MILLIS,
        }
    }

    /// A linear stack of `count` cards filling a `width` x `height` window.
    pub fn with_cards(width: f32, height: f32, count: u64) -> Self {
        let items = (1..=count).map(|i| Item::new(i, format!("card {i}")));
        Self::with_items(width, height, LinearStackLayout::default(), items)
    }

    pub fn with_items(
        width: f32,
        height: f32,
        layout: LinearStackLayout,
        items: impl IntoIterator<Item = Item>,
    ) -> Self {
        let bounds = Rect::new(0.0, 0.0, width, height);
        let config = StackConfig::default();
        let mut stack = StackView::new(layout, bounds, config);
        stack.set_items(items);
        Self::new(stack, config)
    }

    pub fn stack(&self) -> &StackView {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut StackView {
        &mut self.stack
    }

    pub fn controller(&self) -> &GestureController {
        &self.controller
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Takes every event reported so far.
    pub fn drain_events(&mut self) -> Vec<StackEvent> {
        self.events.drain()
    }

    /// Current virtual time in milliseconds.
    pub fn time_ms(&self) -> i64 {
        self.time_ms
    }

    /// Time between the events of a synthesized gesture.
    ///
    /// Steps longer than the velocity tracker's stop threshold make every
    /// release read as stationary.
    pub fn set_step_ms(&mut self, step_ms: i64) {
        self.step_ms = step_ms.max(0);
    }

    pub fn step_ms(&self) -> i64 {
        self.step_ms
    }

    /// Moves the clock without pumping frames.
    pub fn advance_time(&mut self, millis: i64) {
        self.time_ms += millis.max(0);
    }

    /// Sends one event through the intercept and touch phases.
    ///
    /// Returns true when the stack consumed the event.
    pub fn dispatch(&mut self, event: MotionEvent) -> bool {
        let action = event.action();
        if action == MotionAction::Down {
            self.captured = false;
        }
        if self.captured {
            return self
                .controller
                .on_touch(&mut self.stack, &mut self.events, &event);
        }

        if self
            .controller
            .on_intercept_touch(&mut self.stack, &mut self.events, &event)
        {
            log::trace!("robot: gesture intercepted at {action:?}");
            self.captured = true;
            return true;
        }

        // Nothing under a down event to take it, so the stack gets the
        // whole gesture directly.
        if action == MotionAction::Down && self.stack.find_item_at(event.x(), event.y()).is_none() {
            self.captured = true;
            return self
                .controller
                .on_touch(&mut self.stack, &mut self.events, &event);
        }
        false
    }

    /// Routes a wheel or other generic motion event.
    pub fn dispatch_generic(&mut self, event: MotionEvent) -> bool {
        self.controller
            .on_generic_motion(&mut self.stack, &mut self.events, &event)
    }

    pub fn touch_down(&mut self, x: f32, y: f32) -> bool {
        let event = MotionEvent::down(self.time_ms, self.pointer, x, y);
        self.dispatch(event)
    }

    /// Moves the pointer after one step of time.
    pub fn touch_move(&mut self, x: f32, y: f32) -> bool {
        self.advance_time(self.step_ms);
        let event = MotionEvent::move_to(self.time_ms, self.pointer, x, y);
        self.dispatch(event)
    }

    /// Lifts the pointer after one step of time.
    pub fn touch_up(&mut self, x: f32, y: f32) -> bool {
        self.advance_time(self.step_ms);
        let event = MotionEvent::up(self.time_ms, self.pointer, x, y);
        self.dispatch(event)
    }

    pub fn touch_cancel(&mut self, x: f32, y: f32) -> bool {
        let event = MotionEvent::cancel(self.time_ms, self.pointer, x, y);
        self.dispatch(event)
    }

    /// Down and up at the same spot.
    pub fn tap(&mut self, x: f32, y: f32) {
        self.touch_down(x, y);
        self.touch_up(x, y);
    }

    /// Presses at `from`, moves to `to` in `steps` equal moves and releases
    /// there.
    pub fn drag(&mut self, from: Point, to: Point, steps: usize) {
        self.touch_down(from.x, from.y);
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.touch_move(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        }
        self.touch_up(to.x, to.y);
    }

    /// Horizontal drag of `dx` pixels starting on the centre of `item`.
    ///
    /// Returns false when `item` has no bound view.
    pub fn swipe_item(&mut self, item: ItemId, dx: f32, steps: usize) -> bool {
        let Some(view) = self.stack.view(item) else {
            log::warn!("robot: cannot swipe unbound {item}");
            return false;
        };
        let from = view.screen_rect().center();
        self.drag(from, Point::new(from.x + dx, from.y), steps);
        true
    }

    /// One wheel notch; positive values move focus towards the back.
    pub fn wheel(&mut self, x: f32, y: f32, vscroll: f32) -> bool {
        let event = MotionEvent::scroll(self.time_ms, x, y, vscroll);
        self.dispatch_generic(event)
    }

    /// Advances the clock one frame and ticks the animations. Returns true
    /// while any animation is still running.
    pub fn advance_frame(&mut self) -> bool {
        self.advance_time(FRAME_MILLIS);
        let frame_time_nanos = u64::try_from(self.time_ms).unwrap_or(0) * 1_000_000;
        self.controller
            .tick(&mut self.stack, &mut self.events, frame_time_nanos)
    }

    /// Pumps frames until nothing animates. Returns false if animations were
    /// still running after [`MAX_IDLE_FRAMES`] frames.
    pub fn wait_for_idle(&mut self) -> bool {
        for _ in 0..MAX_IDLE_FRAMES {
            if !self.advance_frame() {
                return true;
            }
        }
        log::warn!("robot: animations still running after {MAX_IDLE_FRAMES} frames");
        false
    }

    /// Number of reported events matching `predicate`.
    pub fn count_events(&self, predicate: impl Fn(&StackEvent) -> bool) -> usize {
        self.events
            .events()
            .iter()
            .filter(|event| predicate(event))
            .count()
    }

    pub fn hide_count(&self) -> usize {
        self.count_events(|event| matches!(event, StackEvent::HideUi { .. }))
    }

    /// Items reported dismissed, in order.
    pub fn dismissed_items(&self) -> Vec<ItemId> {
        self.events
            .events()
            .iter()
            .filter_map(|event| match event {
                StackEvent::ItemDismissed { item, .. } => Some(*item),
                _ => None,
            })
            .collect()
    }
}
