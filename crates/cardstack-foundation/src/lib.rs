//! Input primitives for the card stack switcher
//!
//! Motion events, per-pointer velocity tracking, display-scaled gesture
//! thresholds and the generic horizontal swipe recognizer.

pub mod gesture_constants;
pub mod gestures;
pub mod motion_event;
pub mod velocity_tracker;

pub use gesture_constants::ViewConfiguration;
pub use gestures::{SwipeAnimation, SwipeAnimationKind, SwipeCallback, SwipeConfig, SwipeRecognizer};
pub use motion_event::{
    InputSource, MotionAction, MotionEvent, MotionEventError, PointerCoords, PointerId,
};
pub use velocity_tracker::{VelocityTracker, VelocityTracker1D};

pub mod prelude {
    pub use crate::gesture_constants::ViewConfiguration;
    pub use crate::gestures::{SwipeCallback, SwipeRecognizer};
    pub use crate::motion_event::{MotionAction, MotionEvent, PointerCoords};
}
