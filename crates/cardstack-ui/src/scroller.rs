//! Stack scroll position, fling and bound-correction animations.
//!
//! A fling runs in pointer space: it decays the pointer y from where the
//! finger lifted and maps every frame back to scroll through the layout, the
//! same way a drag does. It stops at the overscroll edges, and a fling that
//! comes to rest out of bounds hands over to a bound-correction tween.

use crate::config::StackConfig;
use crate::scroll_mapper::ScrollMapper;
use cardstack_animation::{Animatable, AnimationSpec, DecayAnimation, Easing, FlingCalculator};

#[derive(Clone, Debug)]
struct Fling {
    decay: DecayAnimation,
    down_scroll_p: f32,
    down_y: f32,
    min_y: f32,
    max_y: f32,
}

#[derive(Clone, Debug, Default)]
enum ScrollAnimation {
    #[default]
    Idle,
    Fling(Fling),
    Bound(Animatable<f32>),
}

#[derive(Clone, Debug)]
pub struct Scroller {
    scroll_p: f32,
    animation: ScrollAnimation,
    fling_calculator: FlingCalculator,
    bound_scroll_duration_ms: u64,
}

impl Scroller {
    pub fn new(config: &StackConfig) -> Self {
        Self {
            scroll_p: 0.0,
            animation: ScrollAnimation::Idle,
            fling_calculator: config.fling_calculator(),
            bound_scroll_duration_ms: config.bound_scroll_duration_ms,
        }
    }

    pub fn scroll_p(&self) -> f32 {
        self.scroll_p
    }

    /// Sets the scroll without bounding it.
    pub fn set_scroll_p(&mut self, scroll_p: f32) {
        self.scroll_p = scroll_p;
    }

    /// Sets the scroll to `down_scroll_p + delta_p`, clamped into bounds.
    pub fn set_delta_scroll(&mut self, mapper: &ScrollMapper<'_>, down_scroll_p: f32, delta_p: f32) {
        self.scroll_p = mapper.bounded(down_scroll_p + delta_p);
    }

    pub fn bounded(&self, mapper: &ScrollMapper<'_>) -> f32 {
        mapper.bounded(self.scroll_p)
    }

    pub fn is_out_of_bounds(&self, mapper: &ScrollMapper<'_>) -> bool {
        mapper.is_out_of_bounds(self.scroll_p)
    }

    pub fn is_flinging(&self) -> bool {
        matches!(self.animation, ScrollAnimation::Fling(_))
    }

    pub fn is_bound_animating(&self) -> bool {
        matches!(self.animation, ScrollAnimation::Bound(_))
    }

    pub fn is_animating(&self) -> bool {
        !matches!(self.animation, ScrollAnimation::Idle)
    }

    /// Stops a running fling where it is.
    pub fn stop_fling(&mut self) {
        if self.is_flinging() {
            log::debug!("fling stopped at {}", self.scroll_p);
            self.animation = ScrollAnimation::Idle;
        }
    }

    /// Stops a running bound correction where it is.
    pub fn stop_bound_animation(&mut self) {
        if self.is_bound_animating() {
            self.animation = ScrollAnimation::Idle;
        }
    }

    /// Tweens an out-of-bounds scroll back to the nearest bound. Returns false
    /// when the scroll is already in bounds.
    pub fn animate_bound_correction(&mut self, mapper: &ScrollMapper<'_>) -> bool {
        let target = mapper.bounded(self.scroll_p);
        if target == self.scroll_p {
            return false;
        }
        log::debug!("bound correction {} -> {target}", self.scroll_p);
        let mut animation = Animatable::new(self.scroll_p);
        animation.animate_to(
            target,
            AnimationSpec::tween(self.bound_scroll_duration_ms, Easing::FastOutSlowInEasing),
        );
        self.animation = ScrollAnimation::Bound(animation);
        true
    }

    /// Starts a fling of the pointer y from `up_y` at `velocity` px/s.
    ///
    /// `min_y..=max_y` is the pointer range that maps onto the scroll bounds
    /// for a drag that started at `down_y` with scroll `down_scroll_p`; the
    /// fling may pass it by `overscroll` pixels at either end.
    #[allow(clippy::too_many_arguments)]
    pub fn fling(
        &mut self,
        down_scroll_p: f32,
        down_y: f32,
        up_y: f32,
        velocity: f32,
        min_y: f32,
        max_y: f32,
        overscroll: f32,
    ) {
        let decay = DecayAnimation::new(&self.fling_calculator, up_y, velocity);
        log::debug!(
            "fling from y {up_y} at {velocity} px/s, y range {min_y}..{max_y}, rest at {}",
            decay.target_value()
        );
        self.animation = ScrollAnimation::Fling(Fling {
            decay,
            down_scroll_p,
            down_y,
            min_y: min_y - overscroll,
            max_y: max_y + overscroll,
        });
    }

    /// Advance the running animation. Returns true while still animating.
    pub fn tick(&mut self, frame_time_nanos: u64, mapper: &ScrollMapper<'_>) -> bool {
        match &mut self.animation {
            ScrollAnimation::Idle => false,
            ScrollAnimation::Bound(animation) => {
                let running = animation.tick(frame_time_nanos);
                self.scroll_p = *animation.value();
                if !running {
                    self.animation = ScrollAnimation::Idle;
                }
                running
            }
            ScrollAnimation::Fling(fling) => {
                let running = fling.decay.tick(frame_time_nanos);
                let raw_y = fling.decay.value();
                let y = raw_y.clamp(fling.min_y, fling.max_y.max(fling.min_y));
                self.scroll_p = fling.down_scroll_p + mapper.delta_p_for_y(fling.down_y, y);
                if running && y == raw_y {
                    return true;
                }
                self.animation = ScrollAnimation::Idle;
                self.animate_bound_correction(mapper)
            }
        }
    }
}
