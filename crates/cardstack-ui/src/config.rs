//! Tunables for the stack view and its gestures.

use cardstack_animation::{CubicBezierEasing, Easing, FlingCalculator};
use cardstack_foundation::{SwipeConfig, ViewConfiguration};

/// Overscroll allowed at either end of a fling, in dp.
pub const STACK_OVERSCROLL_DP: f32 = 24.0;

/// Curve the remaining cards follow while one card is swiped away.
pub const STACK_REFLOW_EASING: Easing =
    Easing::CubicBezier(CubicBezierEasing::new(0.73, 0.33, 0.42, 0.85));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackConfig {
    pub view: ViewConfiguration,
    /// Fling overscroll allowance in pixels.
    pub overscroll_px: f32,
    pub bound_scroll_duration_ms: u64,
    /// Duration of animated relayouts.
    pub relayout_duration_ms: u64,
    pub fling_friction: f32,
    /// Fraction of the container width past which a released swipe dismisses.
    pub swipe_far_enough_fraction: f32,
    pub reflow_easing: Easing,
}

impl StackConfig {
    pub fn new(density: f32) -> Self {
        let view = ViewConfiguration::new(density);
        Self {
            view,
            overscroll_px: STACK_OVERSCROLL_DP * view.density,
            bound_scroll_duration_ms: 250,
            relayout_duration_ms: 250,
            fling_friction: FlingCalculator::DEFAULT_FRICTION,
            swipe_far_enough_fraction: 0.6,
            reflow_easing: STACK_REFLOW_EASING,
        }
    }

    pub fn with_overscroll(mut self, overscroll_px: f32) -> Self {
        self.overscroll_px = overscroll_px.max(0.0);
        self
    }

    pub fn with_bound_scroll_duration(mut self, duration_ms: u64) -> Self {
        self.bound_scroll_duration_ms = duration_ms;
        self
    }

    pub fn with_relayout_duration(mut self, duration_ms: u64) -> Self {
        self.relayout_duration_ms = duration_ms;
        self
    }

    pub fn with_fling_friction(mut self, friction: f32) -> Self {
        self.fling_friction = friction;
        self
    }

    pub fn with_swipe_far_enough_fraction(mut self, fraction: f32) -> Self {
        self.swipe_far_enough_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn with_view_configuration(mut self, view: ViewConfiguration) -> Self {
        self.view = view;
        self
    }

    pub fn fling_calculator(&self) -> FlingCalculator {
        FlingCalculator::new(self.fling_friction, self.view.density)
    }

    pub fn swipe_config(&self) -> SwipeConfig {
        SwipeConfig {
            swiped_far_enough_fraction: self.swipe_far_enough_fraction,
            ..SwipeConfig::from_view_configuration(&self.view)
        }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::new(1.0)
    }
}
