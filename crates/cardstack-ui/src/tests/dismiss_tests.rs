use super::*;
use crate::config::{StackConfig, STACK_REFLOW_EASING};
use crate::events::EventQueue;
use crate::item::Item;
use crate::layout::LinearStackLayout;
use cardstack_animation::AnimationSpec;
use cardstack_graphics::Rect;

const BOUNDS: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);
const FRAME: u64 = 16_000_000;

fn stack_of(count: u64) -> StackView {
    let mut stack = StackView::new(
        LinearStackLayout::new(BOUNDS),
        BOUNDS,
        StackConfig::default(),
    );
    stack.set_items((1..=count).map(|i| Item::new(i, format!("card {i}"))));
    stack
}

/// Five cards scrolled so the middle one is in front.
fn scrolled_stack() -> StackView {
    let mut stack = stack_of(5);
    stack.set_scroll_p(2.0);
    stack
}

fn bound_transforms(stack: &StackView) -> IndexMap<ItemId, Transform> {
    stack
        .views()
        .iter()
        .map(|(id, view)| (*id, *view.transform()))
        .collect()
}

#[test]
fn dragging_the_middle_card_moves_the_front_card_back() {
    let mut stack = stack_of(3);
    let mut coordinator = SwipeDismissCoordinator::default();
    coordinator.on_drag_begin(&mut stack, ItemId(2));

    let session = coordinator.session(ItemId(2)).expect("session started");
    assert_eq!(session.dragged(), ItemId(2));
    assert_eq!(session.target_scroll(), 1.0);
    let keys: Vec<ItemId> = session.final_transforms().keys().copied().collect();
    assert_eq!(keys, vec![ItemId(1), ItemId(3)]);
    assert_eq!(
        session.final_transforms()[&ItemId(3)],
        stack.layout().transform_for(ItemId(3), 1.0)
    );

    assert!(stack.is_ignored(ItemId(2)));
    assert!(stack.parent_intercept_disallowed());
    let dragged = stack.view(ItemId(2)).expect("dragged view stays bound");
    assert!(!dragged.touch_enabled());
    assert!(!dragged.clip_with_stack());
}

#[test]
fn dragging_the_front_card_keeps_the_scroll_in_bounds() {
    let mut stack = stack_of(3);
    let mut coordinator = SwipeDismissCoordinator::default();
    coordinator.on_drag_begin(&mut stack, ItemId(3));
    let session = coordinator.session(ItemId(3)).expect("session started");
    assert_eq!(session.target_scroll(), 1.0);
}

#[test]
fn unfocused_stack_splits_the_gap() {
    let mut stack = scrolled_stack();
    let mut coordinator = SwipeDismissCoordinator::default();
    coordinator.on_drag_begin(&mut stack, ItemId(1));
    let session = coordinator.session(ItemId(1)).expect("session started");
    assert_eq!(session.target_scroll(), 1.5);
}

#[test]
fn focused_stack_keeps_the_front_card_still() {
    let mut stack = scrolled_stack();
    stack.set_focus_state(FocusState::Focused);
    let mut coordinator = SwipeDismissCoordinator::default();
    coordinator.on_drag_begin(&mut stack, ItemId(1));
    let session = coordinator.session(ItemId(1)).expect("session started");
    assert_eq!(session.target_scroll(), 1.0);
}

#[test]
fn last_card_keeps_the_current_scroll() {
    let mut stack = stack_of(1);
    let mut coordinator = SwipeDismissCoordinator::default();
    let mut events = EventQueue::new();
    coordinator.on_drag_begin(&mut stack, ItemId(1));
    let session = coordinator.session(ItemId(1)).expect("session started");
    assert_eq!(session.target_scroll(), 0.0);
    assert!(session.final_transforms().is_empty());

    coordinator.on_commit(&mut stack, &mut events, ItemId(1));
    assert!(stack.stack().is_empty());
    assert!(stack.views().is_empty());
    assert_eq!(stack.scroll_p(), 0.0);
}

#[test]
fn cards_needed_at_the_target_are_bound_where_they_are_now() {
    let mut stack = scrolled_stack();
    assert!(stack.view(ItemId(4)).is_none());

    let mut coordinator = SwipeDismissCoordinator::default();
    coordinator.on_drag_begin(&mut stack, ItemId(1));
    let session = coordinator.session(ItemId(1)).expect("session started");

    let view = stack.view(ItemId(4)).expect("bound for the target scroll");
    assert_eq!(view.transform(), &session.current_transforms()[&ItemId(4)]);
    assert!(!view.is_visible());
    assert!(session.final_transforms()[&ItemId(4)].visible);
}

#[test]
fn dismiss_fraction_endpoints_match_the_snapshots() {
    let mut stack = scrolled_stack();
    let mut coordinator = SwipeDismissCoordinator::default();
    coordinator.on_drag_begin(&mut stack, ItemId(1));
    let session = coordinator
        .session(ItemId(1))
        .cloned()
        .expect("session started");

    coordinator.apply_dismiss_fraction(&mut stack, ItemId(1), 0.0);
    for (id, view) in stack.views() {
        if *id != ItemId(1) {
            assert_eq!(view.transform(), &session.current_transforms()[id], "{id}");
        }
    }

    coordinator.apply_dismiss_fraction(&mut stack, ItemId(1), 1.0);
    for (id, view) in stack.views() {
        if *id != ItemId(1) {
            assert_eq!(view.transform(), &session.final_transforms()[id], "{id}");
        }
    }
}

#[test]
fn dismiss_fraction_follows_the_reflow_curve() {
    let mut stack = stack_of(3);
    let coordinator = SwipeDismissCoordinator::default();

    assert_eq!(coordinator.dismiss_fraction(&stack, ItemId(3)), 0.0);

    stack.set_translation_x(ItemId(3), 200.0).expect("bound");
    assert_eq!(
        coordinator.dismiss_fraction(&stack, ItemId(3)),
        STACK_REFLOW_EASING.transform(0.5)
    );

    stack.set_translation_x(ItemId(3), -900.0).expect("bound");
    assert_eq!(coordinator.dismiss_fraction(&stack, ItemId(3)), 1.0);
}

#[test]
fn progress_moves_cards_part_way() {
    let mut stack = stack_of(3);
    let mut coordinator = SwipeDismissCoordinator::default();
    coordinator.on_drag_begin(&mut stack, ItemId(2));
    stack.set_translation_x(ItemId(2), 200.0).expect("bound");
    assert!(coordinator.on_progress(&mut stack, ItemId(2)));

    let session = coordinator.session(ItemId(2)).expect("session started");
    let from = session.current_transforms()[&ItemId(1)].rect.top();
    let to = session.final_transforms()[&ItemId(1)].rect.top();
    let now = stack.view(ItemId(1)).expect("bound").transform().rect.top();
    assert!(from < to);
    assert!(now > from && now < to, "{from} < {now} < {to}");
}

#[test]
fn cancel_restores_the_stack() {
    let mut stack = scrolled_stack();
    let before = bound_transforms(&stack);
    let mut coordinator = SwipeDismissCoordinator::default();

    coordinator.on_drag_begin(&mut stack, ItemId(1));
    stack.set_translation_x(ItemId(1), 120.0).expect("bound");
    coordinator.on_progress(&mut stack, ItemId(1));
    coordinator.on_cancel(&mut stack, ItemId(1));

    assert_eq!(stack.scroll_p(), 2.0);
    assert!(!stack.is_ignored(ItemId(1)));
    assert!(coordinator.session(ItemId(1)).is_none());
    assert_eq!(bound_transforms(&stack), before);
    let view = stack.view(ItemId(1)).expect("bound");
    assert!(view.touch_enabled());
    assert!(view.clip_with_stack());
}

#[test]
fn commit_settles_at_the_target_and_removes_the_card() {
    let mut stack = scrolled_stack();
    let mut events = EventQueue::new();
    let mut coordinator = SwipeDismissCoordinator::default();

    coordinator.on_drag_begin(&mut stack, ItemId(1));
    coordinator.on_commit(&mut stack, &mut events, ItemId(1));

    assert_eq!(stack.scroll_p(), 1.5);
    assert_eq!(stack.stack().len(), 4);
    assert!(!stack.stack().contains(ItemId(1)));
    assert!(stack.view(ItemId(1)).is_none());
    assert!(coordinator.session(ItemId(1)).is_none());
    assert_eq!(events.metric(StackMetric::ItemDismissedViaSwipe), 1);
    match events.events() {
        [StackEvent::ItemDismissed { item, view }] => {
            assert_eq!(*item, ItemId(1));
            assert_eq!(view.item(), ItemId(1));
        }
        other => panic!("unexpected events {other:?}"),
    }
}

#[test]
fn animating_cards_cannot_be_dismissed_again() {
    let mut stack = stack_of(3);
    stack.set_items([
        Item::new(1, "mail"),
        Item::new(2, "maps"),
        Item::secondary(3, "notes"),
    ]);
    let mut coordinator = SwipeDismissCoordinator::default();

    assert!(coordinator.is_dismissable(stack.stack(), ItemId(2)));
    assert!(!coordinator.is_dismissable(stack.stack(), ItemId(3)));
    assert!(!coordinator.is_dismissable(stack.stack(), ItemId(9)));

    coordinator.track_dismiss_animation(SwipeAnimation::new(
        ItemId(2),
        SwipeAnimationKind::Dismiss,
        0.0,
        400.0,
        AnimationSpec::linear(200),
    ));
    assert!(!coordinator.is_dismissable(stack.stack(), ItemId(2)));
    assert!(coordinator.is_dismissable(stack.stack(), ItemId(1)));
}

#[test]
fn snap_back_uses_fast_out_slow_in() {
    let mut coordinator = SwipeDismissCoordinator::default();
    coordinator.track_snap_back_animation(SwipeAnimation::new(
        ItemId(1),
        SwipeAnimationKind::SnapBack,
        80.0,
        0.0,
        AnimationSpec::linear(150),
    ));
    let animation = coordinator.animation(ItemId(1)).expect("tracked");
    assert_eq!(animation.spec().easing, Easing::FastOutSlowInEasing);
    assert_eq!(animation.spec().duration_millis, 150);
}

#[test]
fn tick_runs_the_dismiss_animation_to_commit() {
    let mut stack = stack_of(3);
    let mut events = EventQueue::new();
    let mut coordinator = SwipeDismissCoordinator::default();

    coordinator.on_drag_begin(&mut stack, ItemId(3));
    stack.set_translation_x(ItemId(3), 300.0).expect("bound");
    coordinator.track_dismiss_animation(SwipeAnimation::new(
        ItemId(3),
        SwipeAnimationKind::Dismiss,
        300.0,
        400.0,
        AnimationSpec::linear(200),
    ));

    assert!(coordinator.tick(&mut stack, &mut events, 0));
    assert!(coordinator.tick(&mut stack, &mut events, 100 * 1_000_000));
    assert_eq!(stack.translation_x(ItemId(3)), 350.0);
    assert!(events.is_empty());

    assert!(!coordinator.tick(&mut stack, &mut events, 250 * 1_000_000));
    assert!(!coordinator.has_animations());
    assert_eq!(stack.stack().len(), 2);
    assert_eq!(stack.scroll_p(), 1.0);
    assert_eq!(events.metric(StackMetric::ItemDismissedViaSwipe), 1);
}

#[test]
fn ending_a_snap_back_puts_the_card_back() {
    let mut stack = stack_of(3);
    let mut events = EventQueue::new();
    let mut coordinator = SwipeDismissCoordinator::default();

    coordinator.on_drag_begin(&mut stack, ItemId(2));
    stack.set_translation_x(ItemId(2), 60.0).expect("bound");
    coordinator.track_snap_back_animation(SwipeAnimation::new(
        ItemId(2),
        SwipeAnimationKind::SnapBack,
        60.0,
        0.0,
        AnimationSpec::linear(150),
    ));
    coordinator.tick(&mut stack, &mut events, FRAME);
    coordinator.end_all_animations(&mut stack, &mut events);

    assert!(!coordinator.has_animations());
    assert_eq!(stack.translation_x(ItemId(2)), 0.0);
    assert!(!stack.is_ignored(ItemId(2)));
    assert_eq!(stack.stack().len(), 3);
    assert_eq!(stack.scroll_p(), 2.0);
    assert!(events.is_empty());
}

#[test]
fn aborted_drag_leaves_cleanup_to_the_snap_back() {
    let mut stack = stack_of(3);
    let mut coordinator = SwipeDismissCoordinator::default();
    coordinator.on_drag_begin(&mut stack, ItemId(2));
    coordinator.on_drag_aborted(ItemId(2));
    assert!(stack.is_ignored(ItemId(2)));
    assert!(coordinator.session(ItemId(2)).is_some());
}
