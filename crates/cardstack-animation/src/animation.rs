//! Time-based animations with easing curves.
//!
//! Easing constants mirror the material motion curves. `Easing::CubicBezier`
//! covers custom path interpolators such as the stack reflow curve.

use cardstack_graphics::{Point, Rect, Size};

/// Trait for types that can be linearly interpolated.
///
/// Implementations must return `self` exactly at fraction 0 and `target`
/// exactly at fraction 1.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        // Weighted form keeps both endpoints bit-exact.
        self * (1.0 - fraction) + target * fraction
    }
}

impl Lerp for Point {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        Point::new(
            self.x.lerp(&target.x, fraction),
            self.y.lerp(&target.y, fraction),
        )
    }
}

impl Lerp for Size {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        Size::new(
            self.width.lerp(&target.width, fraction),
            self.height.lerp(&target.height, fraction),
        )
    }
}

impl Lerp for Rect {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        Rect::new(
            self.x.lerp(&target.x, fraction),
            self.y.lerp(&target.y, fraction),
            self.width.lerp(&target.width, fraction),
            self.height.lerp(&target.height, fraction),
        )
    }
}

/// Cubic bezier easing through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezierEasing {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezierEasing {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn transform(&self, fraction: f32) -> f32 {
        cubic_bezier(self.x1, self.y1, self.x2, self.y2, fraction)
    }
}

/// Easing functions for animations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    LinearEasing,
    /// Fast out, slow in (material design standard).
    FastOutSlowInEasing,
    /// Fast out, linear in (material design).
    FastOutLinearEasing,
    /// Arbitrary cubic bezier path.
    CubicBezier(CubicBezierEasing),
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction.clamp(0.0, 1.0),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearEasing => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
            Easing::CubicBezier(curve) => curve.transform(fraction),
        }
    }
}

/// Evaluates the bezier curve's y for the given x fraction.
///
/// Returns exactly 0 at or below 0 and exactly 1 at or above 1.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric t, bisection when it stalls.
    let mut t = fraction;
    let mut newton_success = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            newton_success = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !newton_success {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..24 {
            let delta = sample_curve(ax, bx, cx, t) - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Animation specification combining duration and easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
    /// Delay before starting animation in milliseconds.
    pub delay_millis: u64,
}

impl AnimationSpec {
    /// Create a tween animation with duration and easing.
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    /// Create a linear tween animation.
    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }

    /// Add a delay before the animation starts.
    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }

    /// Same timing with a different curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowInEasing)
    }
}

/// A value tweened towards a target by explicit frame ticks.
///
/// The first `tick` after `animate_to` pins the start time, so an animation
/// created between frames does not skip ahead.
#[derive(Debug, Clone)]
pub struct Animatable<T: Lerp + Clone> {
    current: T,
    start: T,
    target: T,
    spec: AnimationSpec,
    start_time_nanos: Option<u64>,
    running: bool,
}

impl<T: Lerp + Clone> Animatable<T> {
    /// Create a new animatable resting at `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            current: initial.clone(),
            start: initial.clone(),
            target: initial,
            spec: AnimationSpec::default(),
            start_time_nanos: None,
            running: false,
        }
    }

    /// Start (or restart) an animation from the current value to `target`.
    pub fn animate_to(&mut self, target: T, spec: AnimationSpec) {
        self.start = self.current.clone();
        self.target = target;
        self.spec = spec;
        self.start_time_nanos = None;
        self.running = true;
    }

    /// Jump to `value` and stop.
    pub fn snap_to(&mut self, value: T) {
        self.current = value.clone();
        self.start = value.clone();
        self.target = value;
        self.start_time_nanos = None;
        self.running = false;
    }

    /// Finish immediately at the target value.
    pub fn end(&mut self) {
        let target = self.target.clone();
        self.snap_to(target);
    }

    /// Stop where the animation currently is.
    pub fn cancel(&mut self) {
        self.target = self.current.clone();
        self.start_time_nanos = None;
        self.running = false;
    }

    pub fn value(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance to `frame_time_nanos`. Returns true while still running.
    pub fn tick(&mut self, frame_time_nanos: u64) -> bool {
        if !self.running {
            return false;
        }

        let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
        let delay_nanos = self.spec.delay_millis * 1_000_000;
        if elapsed_nanos < delay_nanos {
            return true;
        }

        let duration_nanos = self.spec.duration_millis * 1_000_000;
        let linear_progress = if duration_nanos == 0 {
            1.0
        } else {
            ((elapsed_nanos - delay_nanos) as f32 / duration_nanos as f32).clamp(0.0, 1.0)
        };
        if linear_progress >= 1.0 {
            self.end();
            return false;
        }

        let progress = self.spec.easing.transform(linear_progress);
        self.current = self.start.lerp(&self.target, progress);
        true
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
