//! Assertion utilities for robot testing
//!
//! Helpers for checking stack geometry and scroll state with a tolerance.

use cardstack_graphics::Rect;
use cardstack_ui::{ItemId, StackView, Transform};

/// Assert that a value is within `tolerance` of the expected one.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that a rectangle is approximately equal to another.
pub fn assert_rect_approx_eq(actual: Rect, expected: Rect, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
    assert_approx_eq(
        actual.width,
        expected.width,
        tolerance,
        &format!("{} - width", msg),
    );
    assert_approx_eq(
        actual.height,
        expected.height,
        tolerance,
        &format!("{} - height", msg),
    );
}

/// Assert that two transforms match in geometry, progress and visibility.
pub fn assert_transform_approx_eq(actual: &Transform, expected: &Transform, tolerance: f32, msg: &str) {
    assert_rect_approx_eq(actual.rect, expected.rect, tolerance, msg);
    assert_approx_eq(
        actual.progress,
        expected.progress,
        tolerance,
        &format!("{} - progress", msg),
    );
    assert_eq!(actual.visible, expected.visible, "{}: visibility", msg);
}

/// Assert that the scroll lies between the layout's bounds.
pub fn assert_scroll_in_bounds(stack: &StackView, msg: &str) {
    let mapper = stack.mapper();
    let scroll_p = stack.scroll_p();
    assert!(
        scroll_p >= mapper.min_scroll_p() && scroll_p <= mapper.max_scroll_p(),
        "{}: scroll {} outside {}..={}",
        msg,
        scroll_p,
        mapper.min_scroll_p(),
        mapper.max_scroll_p()
    );
}

/// Assert that every bound, non-ignored view sits at its layout transform
/// for the current scroll.
pub fn assert_views_at_layout(stack: &StackView, tolerance: f32, msg: &str) {
    let scroll_p = stack.scroll_p();
    for (id, view) in stack.views() {
        if stack.is_ignored(*id) {
            continue;
        }
        let expected = stack.layout().transform_for(*id, scroll_p);
        assert_transform_approx_eq(view.transform(), &expected, tolerance, &format!("{} - {}", msg, id));
    }
}

/// Assert the stack items, back to front.
pub fn assert_stack_ids(stack: &StackView, expected: &[u64], msg: &str) {
    let actual: Vec<ItemId> = stack.stack().stack_items().map(|item| item.id).collect();
    let expected: Vec<ItemId> = expected.iter().copied().map(ItemId).collect();
    assert_eq!(actual, expected, "{}: stack items", msg);
}
