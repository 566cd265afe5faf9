//! Animation primitives for the card stack switcher
//!
//! Animations here are driven by the host: every running animation is
//! advanced with `tick(frame_time_nanos)` from the frame loop and starts
//! counting on the first tick it sees.

mod animation;
mod decay_spec;

pub use animation::*;
pub use decay_spec::*;
