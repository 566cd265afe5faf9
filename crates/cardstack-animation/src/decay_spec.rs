//! Fling decay physics.
//!
//! Spline-based deceleration in the style of the platform over-scroller:
//! a fling of a given velocity travels a fixed distance over a fixed
//! duration, following a precomputed tension spline.

use std::sync::LazyLock;

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const NB_SAMPLES: usize = 100;

/// Earth's gravity in SI units (m/s²)
const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// (ln(0.78) / ln(0.9)).abs()
const DECELERATION_RATE: f32 = 2.358_201_6;

/// Distance samples of the fling spline, indexed by normalized time.
static SPLINE_POSITIONS: LazyLock<[f32; NB_SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0f32; NB_SAMPLES + 1];
    let mut x_min = 0.0f32;
    for (i, slot) in positions.iter_mut().take(NB_SAMPLES).enumerate() {
        let alpha = i as f32 / NB_SAMPLES as f32;
        let (x, coef) = solve_spline(&mut x_min, alpha, P1, P2);
        *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
    }
    positions[NB_SAMPLES] = 1.0;
    positions
});

/// Bisects for the spline parameter whose tension curve equals `alpha`.
///
/// `lower` carries over between calls since `alpha` only grows.
fn solve_spline(lower: &mut f32, alpha: f32, a: f32, b: f32) -> (f32, f32) {
    let mut upper = 1.0f32;
    loop {
        let mid = *lower + (upper - *lower) / 2.0;
        let coef = 3.0 * mid * (1.0 - mid);
        let tx = coef * ((1.0 - mid) * a + mid * b) + mid * mid * mid;
        if (tx - alpha).abs() < 1e-5 || upper - *lower < f32::EPSILON {
            return (mid, coef);
        }
        if tx > alpha {
            upper = mid;
        } else {
            *lower = mid;
        }
    }
}

/// Distance and velocity coefficients at a point of the fling spline.
#[derive(Debug, Clone, Copy)]
pub struct SplineSample {
    /// Fraction (0.0 to 1.0) of the total distance traveled.
    pub distance: f32,
    /// Instantaneous slope of the distance curve.
    pub velocity: f32,
}

/// Samples the fling spline at normalized time `time` (clamped to [0, 1]).
pub fn sample_fling_spline(time: f32) -> SplineSample {
    let time = time.clamp(0.0, 1.0);
    let index = (NB_SAMPLES as f32 * time) as usize;
    if index >= NB_SAMPLES {
        return SplineSample {
            distance: 1.0,
            velocity: 0.0,
        };
    }

    let t_inf = index as f32 / NB_SAMPLES as f32;
    let t_sup = (index + 1) as f32 / NB_SAMPLES as f32;
    let d_inf = SPLINE_POSITIONS[index];
    let d_sup = SPLINE_POSITIONS[index + 1];
    let velocity = (d_sup - d_inf) / (t_sup - t_inf);
    SplineSample {
        distance: d_inf + (time - t_inf) * velocity,
        velocity,
    }
}

/// Total travel of a single fling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingInfo {
    /// Initial velocity in px/sec.
    pub initial_velocity: f32,
    /// Unsigned distance that will be traveled.
    pub distance: f32,
    /// Total duration in milliseconds.
    pub duration_ms: i64,
}

impl FlingInfo {
    /// Signed offset from the start position at `time_ms`.
    pub fn position(&self, time_ms: i64) -> f32 {
        let t = if self.duration_ms > 0 {
            time_ms as f32 / self.duration_ms as f32
        } else {
            1.0
        };
        self.distance * self.initial_velocity.signum() * sample_fling_spline(t).distance
    }

    /// Signed velocity in px/sec at `time_ms`.
    pub fn velocity(&self, time_ms: i64) -> f32 {
        if self.duration_ms <= 0 {
            return 0.0;
        }
        let t = time_ms as f32 / self.duration_ms as f32;
        sample_fling_spline(t).velocity * self.initial_velocity.signum() * self.distance
            / self.duration_ms as f32
            * 1000.0
    }

    pub fn is_finished(&self, time_ms: i64) -> bool {
        time_ms >= self.duration_ms
    }
}

/// Computes fling distance and duration from a release velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingCalculator {
    friction: f32,
    physical_coefficient: f32,
}

impl FlingCalculator {
    /// Scroll friction used by the platform scroller.
    pub const DEFAULT_FRICTION: f32 = 0.015;

    /// `density` is the display scale (1.0 for mdpi, 2.0 for xhdpi).
    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84,
        }
    }

    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        (INFLECTION as f64 * velocity.abs() as f64
            / (self.friction * self.physical_coefficient) as f64)
            .ln()
    }

    /// Duration of a fling in milliseconds.
    pub fn fling_duration(&self, velocity: f32) -> i64 {
        if velocity == 0.0 {
            return 0;
        }
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (DECELERATION_RATE as f64 - 1.0)).exp()) as i64
    }

    /// Unsigned distance a fling travels.
    pub fn fling_distance(&self, velocity: f32) -> f32 {
        if velocity == 0.0 {
            return 0.0;
        }
        let l = self.spline_deceleration(velocity);
        let decel_minus_one = DECELERATION_RATE as f64 - 1.0;
        self.friction
            * self.physical_coefficient
            * (DECELERATION_RATE as f64 / decel_minus_one * l).exp() as f32
    }

    pub fn fling_info(&self, velocity: f32) -> FlingInfo {
        FlingInfo {
            initial_velocity: velocity,
            distance: self.fling_distance(velocity),
            duration_ms: self.fling_duration(velocity),
        }
    }
}

/// A running fling, ticked from the frame loop like [`crate::Animatable`].
#[derive(Debug, Clone)]
pub struct DecayAnimation {
    initial_value: f32,
    info: FlingInfo,
    start_time_nanos: Option<u64>,
    value: f32,
    running: bool,
}

impl DecayAnimation {
    pub fn new(calculator: &FlingCalculator, initial_value: f32, velocity: f32) -> Self {
        let info = calculator.fling_info(velocity);
        Self {
            initial_value,
            info,
            start_time_nanos: None,
            value: initial_value,
            running: info.duration_ms > 0,
        }
    }

    pub fn info(&self) -> FlingInfo {
        self.info
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Where the fling comes to rest.
    pub fn target_value(&self) -> f32 {
        self.initial_value + self.info.distance * self.info.initial_velocity.signum()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop at the current value.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    /// Advance to `frame_time_nanos`. Returns true while still running.
    pub fn tick(&mut self, frame_time_nanos: u64) -> bool {
        if !self.running {
            return false;
        }
        let start = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed_ms = (frame_time_nanos.saturating_sub(start) / 1_000_000) as i64;
        if self.info.is_finished(elapsed_ms) {
            self.value = self.target_value();
            self.running = false;
        } else {
            self.value = self.initial_value + self.info.position(elapsed_ms);
        }
        self.running
    }
}
