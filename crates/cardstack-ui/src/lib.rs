//! Scrollable, swipe-dismissable card stack for a task switcher.
//!
//! [`StackView`] holds the cards and their views, [`GestureController`] turns
//! motion events into scrolling, flings, background taps and swipes, and
//! [`SwipeDismissCoordinator`] reflows the rest of the stack while a card is
//! swiped away. Everything is single-threaded and driven by the host through
//! event dispatch and `tick(frame_time_nanos)`.

mod config;
mod dismiss;
mod error;
mod events;
mod gesture;
mod hit_test;
mod item;
mod item_stack;
mod item_view;
pub mod layout;
mod scroll_mapper;
mod scroller;
mod stack_view;
mod transform;

pub use config::{StackConfig, STACK_OVERSCROLL_DP, STACK_REFLOW_EASING};
pub use dismiss::{DismissSession, SwipeDismissCoordinator};
pub use error::StackError;
pub use events::{EventQueue, StackEvent, StackEventSink, StackMetric};
pub use gesture::{GestureController, GestureState};
pub use hit_test::HitTester;
pub use item::{Item, ItemId, Workspace};
pub use item_stack::{IgnoreSet, ItemStack};
pub use item_view::ItemView;
pub use layout::{FocusState, LayoutEngine, LinearStackLayout};
pub use scroll_mapper::ScrollMapper;
pub use scroller::Scroller;
pub use stack_view::{AnimationProps, StackView};
pub use transform::Transform;

pub use cardstack_foundation::{MotionAction, MotionEvent, PointerCoords};
pub use cardstack_graphics::{Point, Rect, Size};

pub mod prelude {
    pub use crate::events::{EventQueue, StackEvent, StackEventSink};
    pub use crate::gesture::GestureController;
    pub use crate::item::{Item, ItemId};
    pub use crate::layout::LinearStackLayout;
    pub use crate::stack_view::StackView;
    pub use crate::StackConfig;
}
