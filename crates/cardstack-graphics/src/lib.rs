//! Pure geometry for the card stack switcher
//!
//! Points, sizes and rectangles shared by the input, animation and stack
//! crates. Nothing here knows about items or gestures.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
}
