use super::*;
use crate::events::EventQueue;
use crate::item::Item;
use crate::layout::LinearStackLayout;
use cardstack_foundation::{InputSource, PointerCoords};
use cardstack_graphics::Rect;

const BOUNDS: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);
const FRAME: u64 = 16_000_000;

/// Stand-in for the host view hierarchy: routes each event through the
/// intercept phase until the stack claims the gesture.
struct Harness {
    stack: StackView,
    controller: GestureController,
    events: EventQueue,
    captured: bool,
}

impl Harness {
    fn new(count: u64) -> Self {
        Self::with_layout(
            LinearStackLayout::new(BOUNDS),
            (1..=count).map(|i| Item::new(i, format!("card {i}"))),
        )
    }

    fn with_layout(layout: LinearStackLayout, items: impl IntoIterator<Item = Item>) -> Self {
        let config = StackConfig::default();
        let mut stack = StackView::new(layout, BOUNDS, config);
        stack.set_items(items);
        Self {
            stack,
            controller: GestureController::new(config),
            events: EventQueue::new(),
            captured: false,
        }
    }

    fn send(&mut self, event: MotionEvent) -> bool {
        if event.action() == MotionAction::Down {
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
            self.captured = true;
            return true;
        }
        if event.action() == MotionAction::Down
            && self.stack.find_item_at(event.x(), event.y()).is_none()
        {
            self.captured = true;
            return self
                .controller
                .on_touch(&mut self.stack, &mut self.events, &event);
        }
        false
    }

    fn settle(&mut self) {
        let mut frame = 0;
        while self
            .controller
            .tick(&mut self.stack, &mut self.events, frame)
        {
            frame += FRAME;
            assert!(frame < 2_000 * FRAME, "animations never settled");
        }
    }

    fn hide_events(&self) -> usize {
        self.events
            .events()
            .iter()
            .filter(|event| matches!(event, StackEvent::HideUi { .. }))
            .count()
    }
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn vertical_drag_on_the_background_scrolls() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    h.send(MotionEvent::move_to(50, 0, 200.0, 104.0));
    assert_eq!(h.controller.state(), GestureState::TrackingDown);
    assert_eq!(h.stack.scroll_p(), 2.0);

    h.send(MotionEvent::move_to(100, 0, 200.0, 150.0));
    assert_eq!(h.controller.state(), GestureState::Scrolling);
    assert_close(h.stack.scroll_p(), 2.0 - 50.0 / 96.0);
    assert!(h.stack.parent_intercept_disallowed());
    assert_eq!(h.events.metric(StackMetric::UserScrolled), 1);
    match h.events.events() {
        [StackEvent::ScrollChanged { delta_y }] => assert_eq!(*delta_y, 46.0),
        other => panic!("unexpected events {other:?}"),
    }

    h.send(MotionEvent::up(150, 0, 200.0, 150.0));
    assert_eq!(h.controller.state(), GestureState::Idle);
    assert!(!h.stack.scroller().is_animating());
    assert_eq!(h.hide_events(), 0);
}

#[test]
fn drag_scroll_stops_at_the_front() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    h.send(MotionEvent::move_to(50, 0, 200.0, 20.0));
    assert!(h.controller.is_scrolling());
    assert_eq!(h.stack.scroll_p(), 2.0);
}

#[test]
fn horizontal_travel_does_not_scroll() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    h.send(MotionEvent::move_to(50, 0, 260.0, 120.0));
    assert!(!h.controller.is_scrolling());
    assert_eq!(h.stack.scroll_p(), 2.0);
}

#[test]
fn fast_release_flings_and_settles_in_bounds() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    for step in 1..=5 {
        h.send(MotionEvent::move_to(step * 10, 0, 200.0, 100.0 + step as f32 * 20.0));
    }
    h.send(MotionEvent::up(60, 0, 200.0, 220.0));
    let released = h.stack.scroll_p();
    assert_close(released, 2.0 - 100.0 / 96.0);
    assert!(h.stack.scroller().is_flinging());

    h.settle();
    assert!(h.stack.scroll_p() < released);
    assert!(!h.stack.is_scroll_out_of_bounds());
}

#[test]
fn slow_release_does_not_fling() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    h.send(MotionEvent::move_to(500, 0, 200.0, 150.0));
    h.send(MotionEvent::move_to(1_000, 0, 200.0, 200.0));
    h.send(MotionEvent::up(1_500, 0, 200.0, 200.0));
    let released = h.stack.scroll_p();
    assert_close(released, 2.0 - 100.0 / 96.0);
    assert!(!h.stack.scroller().is_flinging());

    h.settle();
    assert_eq!(h.stack.scroll_p(), released);
}

/// Flicks the stack up past its front bound and ticks until the fling has
/// carried the scroll out of bounds.
fn fling_past_the_front(h: &mut Harness) {
    h.send(MotionEvent::down(0, 0, 200.0, 120.0));
    for step in 1..=5 {
        h.send(MotionEvent::move_to(step * 10, 0, 200.0, 120.0 - step as f32 * 20.0));
    }
    h.send(MotionEvent::up(60, 0, 200.0, 20.0));
    assert!(h.stack.scroller().is_flinging());

    let mut frame = 0;
    while !h.stack.is_scroll_out_of_bounds() {
        assert!(
            h.controller.tick(&mut h.stack, &mut h.events, frame),
            "fling ended without overscrolling"
        );
        frame += FRAME;
    }
}

#[test]
fn tap_during_overscroll_fling_restores_bounds() {
    let mut h = Harness::new(3);
    fling_past_the_front(&mut h);

    h.send(MotionEvent::down(1_000, 0, 200.0, 60.0));
    assert!(!h.stack.scroller().is_animating());
    h.send(MotionEvent::up(1_040, 0, 200.0, 60.0));
    assert!(h.stack.scroller().is_bound_animating());

    h.settle();
    assert!(!h.stack.is_scroll_out_of_bounds());
    assert_eq!(h.stack.scroll_p(), 2.0);
}

#[test]
fn cancel_during_overscroll_fling_restores_bounds() {
    let mut h = Harness::new(3);
    fling_past_the_front(&mut h);

    h.send(MotionEvent::down(1_000, 0, 200.0, 60.0));
    h.send(MotionEvent::cancel(1_040, 0, 200.0, 60.0));
    assert!(h.stack.scroller().is_bound_animating());

    h.settle();
    assert!(!h.stack.is_scroll_out_of_bounds());
    assert_eq!(h.hide_events(), 0);
}

#[test]
fn background_tap_hides_once() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 50.0));
    h.send(MotionEvent::up(40, 0, 202.0, 52.0));
    match h.events.events() {
        [StackEvent::HideUi {
            user_triggered,
            return_to_home,
        }] => assert!(*user_triggered && *return_to_home),
        other => panic!("unexpected events {other:?}"),
    }
}

#[test]
fn tap_that_just_misses_a_card_is_forgiven() {
    let mut h = Harness::new(3);
    assert!(h.stack.find_item_at(8.0, 500.0).is_none());
    h.send(MotionEvent::down(0, 0, 8.0, 500.0));
    h.send(MotionEvent::up(40, 0, 8.0, 500.0));
    assert_eq!(h.hide_events(), 0);
}

#[test]
fn tap_that_travelled_does_not_hide() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 50.0));
    h.send(MotionEvent::up(40, 0, 230.0, 50.0));
    assert_eq!(h.hide_events(), 0);
}

#[test]
fn tap_on_a_card_does_not_hide() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 700.0));
    assert_eq!(h.controller.active_item(), Some(ItemId(3)));
    h.send(MotionEvent::up(40, 0, 200.0, 700.0));
    assert!(h.events.is_empty());
}

#[test]
fn tap_in_the_secondary_region_launches_it() {
    let layout = LinearStackLayout::new(BOUNDS).with_secondary_height(120.0);
    let items = [
        Item::secondary(10, "notes"),
        Item::new(1, "mail"),
        Item::new(2, "maps"),
        Item::new(3, "music"),
    ];
    let mut h = Harness::with_layout(layout, items);
    h.send(MotionEvent::down(0, 0, 200.0, 60.0));
    h.send(MotionEvent::up(40, 0, 200.0, 60.0));
    match h.events.events() {
        [StackEvent::LaunchSecondary { items }] => assert_eq!(items, &vec![ItemId(10)]),
        other => panic!("unexpected events {other:?}"),
    }
}

#[test]
fn lifting_the_active_pointer_does_not_jump() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    h.send(MotionEvent::pointer_down(
        10,
        1,
        &[PointerCoords::new(0, 200.0, 100.0), PointerCoords::new(1, 300.0, 400.0)],
    ));
    assert_eq!(h.controller.active_pointer(), Some(1));

    h.send(MotionEvent::moved(
        20,
        &[PointerCoords::new(0, 200.0, 100.0), PointerCoords::new(1, 300.0, 500.0)],
    ));
    let scrolled = 2.0 - 100.0 / 96.0;
    assert_close(h.stack.scroll_p(), scrolled);

    h.send(MotionEvent::pointer_up(
        30,
        1,
        &[PointerCoords::new(0, 200.0, 100.0), PointerCoords::new(1, 300.0, 500.0)],
    ));
    assert_eq!(h.controller.active_pointer(), Some(0));

    h.send(MotionEvent::move_to(40, 0, 200.0, 100.0));
    assert_close(h.stack.scroll_p(), scrolled);
    h.send(MotionEvent::move_to(50, 0, 200.0, 148.0));
    assert_close(h.stack.scroll_p(), scrolled - 0.5);
}

#[test]
fn move_without_the_active_pointer_is_ignored() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    h.send(MotionEvent::move_to(20, 7, 200.0, 300.0));
    assert_eq!(h.controller.state(), GestureState::TrackingDown);
    assert_eq!(h.stack.scroll_p(), 2.0);
    assert!(h.events.is_empty());
}

#[test]
fn up_without_the_active_pointer_does_not_fling() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    for step in 1..=3 {
        h.send(MotionEvent::move_to(step * 10, 0, 200.0, 100.0 + step as f32 * 20.0));
    }
    assert!(h.controller.is_scrolling());
    h.send(MotionEvent::up(40, 5, 200.0, 180.0));
    assert_eq!(h.controller.state(), GestureState::Idle);
    assert!(!h.stack.scroller().is_animating());
    assert_eq!(h.hide_events(), 0);
}

#[test]
fn cancel_ends_the_gesture_without_side_effects() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    for step in 1..=3 {
        h.send(MotionEvent::move_to(step * 10, 0, 200.0, 100.0 + step as f32 * 20.0));
    }
    h.send(MotionEvent::cancel(40, 0, 200.0, 160.0));
    assert_eq!(h.controller.state(), GestureState::Idle);
    assert!(!h.stack.scroller().is_animating());
    assert_eq!(h.hide_events(), 0);
}

#[test]
fn down_clears_the_parent_intercept_request() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 200.0, 100.0));
    h.send(MotionEvent::move_to(50, 0, 200.0, 150.0));
    h.send(MotionEvent::up(100, 0, 200.0, 150.0));
    assert!(h.stack.parent_intercept_disallowed());

    h.send(MotionEvent::down(200, 0, 200.0, 100.0));
    assert!(!h.stack.parent_intercept_disallowed());
}

#[test]
fn empty_stack_ignores_touches() {
    let mut h = Harness::new(0);
    assert!(h.send(MotionEvent::down(0, 0, 200.0, 100.0)));
    h.send(MotionEvent::move_to(50, 0, 200.0, 300.0));
    h.send(MotionEvent::up(100, 0, 200.0, 300.0));
    assert_eq!(h.controller.state(), GestureState::Idle);
    assert!(h.events.is_empty());
}

#[test]
fn wheel_moves_focus() {
    let mut h = Harness::new(3);
    let wheel = |vscroll| MotionEvent::scroll(0, 200.0, 400.0, vscroll);

    assert!(h
        .controller
        .on_generic_motion(&mut h.stack, &mut h.events, &wheel(1.0)));
    assert_eq!(h.stack.focused_item(), Some(ItemId(3)));
    h.controller
        .on_generic_motion(&mut h.stack, &mut h.events, &wheel(1.0));
    assert_eq!(h.stack.focused_item(), Some(ItemId(2)));
    h.controller
        .on_generic_motion(&mut h.stack, &mut h.events, &wheel(-1.0));
    assert_eq!(h.stack.focused_item(), Some(ItemId(3)));

    let touchpad = wheel(1.0).with_source(InputSource::Touchpad);
    assert!(!h
        .controller
        .on_generic_motion(&mut h.stack, &mut h.events, &touchpad));
    let touch = MotionEvent::down(0, 0, 200.0, 400.0);
    assert!(!h
        .controller
        .on_generic_motion(&mut h.stack, &mut h.events, &touch));
    assert_eq!(h.stack.focused_item(), Some(ItemId(3)));
}

/// Drags the front card right to `x` in 50 ms steps and lifts, so the
/// release carries no velocity.
fn swipe_front_card(h: &mut Harness, x: f32) {
    h.send(MotionEvent::down(0, 0, 100.0, 700.0));
    assert!(h.send(MotionEvent::move_to(50, 0, 140.0, 700.0)));
    assert!(h.controller.is_swiping());
    h.send(MotionEvent::move_to(100, 0, x, 700.0));
    h.send(MotionEvent::up(150, 0, x, 700.0));
}

#[test]
fn horizontal_drag_on_a_card_is_a_swipe() {
    let mut h = Harness::new(3);
    h.send(MotionEvent::down(0, 0, 100.0, 700.0));
    assert!(h.send(MotionEvent::move_to(50, 0, 140.0, 700.0)));
    assert!(h.stack.is_ignored(ItemId(3)));
    assert_eq!(h.stack.translation_x(ItemId(3)), 0.0);

    h.send(MotionEvent::move_to(100, 0, 300.0, 700.0));
    assert_eq!(h.stack.translation_x(ItemId(3)), 160.0);
    assert!(!h.controller.is_scrolling());
    assert_eq!(h.stack.scroll_p(), 2.0);
}

#[test]
fn swipe_past_far_enough_dismisses() {
    let mut h = Harness::new(3);
    swipe_front_card(&mut h, 400.0);
    assert_eq!(h.controller.state(), GestureState::Idle);
    assert!(h.controller.coordinator().has_animations());

    h.settle();
    assert_eq!(h.stack.stack().len(), 2);
    assert!(!h.stack.stack().contains(ItemId(3)));
    assert_eq!(h.stack.scroll_p(), 1.0);
    assert_eq!(h.events.metric(StackMetric::ItemDismissedViaSwipe), 1);
    let dismissed: Vec<ItemId> = h
        .events
        .events()
        .iter()
        .filter_map(|event| match event {
            StackEvent::ItemDismissed { item, .. } => Some(*item),
            _ => None,
        })
        .collect();
    assert_eq!(dismissed, vec![ItemId(3)]);
}

#[test]
fn short_swipe_snaps_back() {
    let mut h = Harness::new(3);
    swipe_front_card(&mut h, 180.0);
    let animation = h
        .controller
        .coordinator()
        .animation(ItemId(3))
        .expect("snap back running");
    assert_eq!(animation.final_translation(), 0.0);

    h.settle();
    assert_eq!(h.stack.stack().len(), 3);
    assert_eq!(h.stack.translation_x(ItemId(3)), 0.0);
    assert!(!h.stack.is_ignored(ItemId(3)));
    assert_eq!(h.stack.scroll_p(), 2.0);
    assert!(h.events.is_empty());
}

#[test]
fn down_finishes_a_running_dismiss() {
    let mut h = Harness::new(3);
    swipe_front_card(&mut h, 400.0);
    h.send(MotionEvent::down(400, 0, 200.0, 50.0));
    assert!(!h.controller.coordinator().has_animations());
    assert_eq!(h.stack.stack().len(), 2);
    assert_eq!(h.events.metric(StackMetric::ItemDismissedViaSwipe), 1);
}
