//! Shared gesture thresholds.
//!
//! Values are in density-independent pixels (and dp per second for
//! velocities). [`ViewConfiguration::new`] scales them to physical pixels for
//! a display density.

/// Distance a pointer must travel before a press becomes a scroll.
pub const TOUCH_SLOP: f32 = 8.0;

/// Distance a pointer must travel horizontally before a swipe starts.
pub const PAGING_TOUCH_SLOP: f32 = TOUCH_SLOP * 2.0;

/// Margin used when deciding whether a tap landed outside a card.
pub const WINDOW_TOUCH_SLOP: f32 = 16.0;

/// Release velocity below which a scroll does not fling.
pub const MIN_FLING_VELOCITY: f32 = 50.0;

/// Velocity cap for tracked flings.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Horizontal velocity that dismisses a card regardless of distance.
pub const SWIPE_ESCAPE_VELOCITY: f32 = 100.0;

/// Velocity cap for swipe dismissal.
pub const MAX_DISMISS_VELOCITY: f32 = 4_000.0;

/// Base distance for the optional anti-falsing threshold.
pub const FALSING_THRESHOLD: f32 = 128.0;

/// Gesture thresholds in physical pixels for one display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfiguration {
    pub density: f32,
    pub touch_slop: f32,
    pub paging_touch_slop: f32,
    pub window_touch_slop: f32,
    pub minimum_fling_velocity: f32,
    pub maximum_fling_velocity: f32,
    pub swipe_escape_velocity: f32,
    pub max_dismiss_velocity: f32,
    pub falsing_threshold: f32,
}

impl ViewConfiguration {
    pub fn new(density: f32) -> Self {
        let density = if density.is_finite() && density > 0.0 {
            density
        } else {
            1.0
        };
        Self {
            density,
            touch_slop: TOUCH_SLOP * density,
            paging_touch_slop: PAGING_TOUCH_SLOP * density,
            window_touch_slop: WINDOW_TOUCH_SLOP * density,
            minimum_fling_velocity: MIN_FLING_VELOCITY * density,
            maximum_fling_velocity: MAX_FLING_VELOCITY * density,
            swipe_escape_velocity: SWIPE_ESCAPE_VELOCITY * density,
            max_dismiss_velocity: MAX_DISMISS_VELOCITY * density,
            falsing_threshold: FALSING_THRESHOLD * density,
        }
    }
}

impl Default for ViewConfiguration {
    fn default() -> Self {
        Self::new(1.0)
    }
}
