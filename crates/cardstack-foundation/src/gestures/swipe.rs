//! Horizontal swipe-to-dismiss recognizer.
//!
//! The recognizer is generic over the child handle `T` and talks to its
//! owner through [`SwipeCallback`]. It decides when a press turns into a
//! horizontal drag, moves the child while dragging, and on release either
//! hands a dismiss animation or a snap-back animation to the callback. The
//! callback owns those animations and reports completion itself.

use crate::gesture_constants::ViewConfiguration;
use crate::motion_event::{MotionAction, MotionEvent, PointerId};
use crate::velocity_tracker::VelocityTracker;
use cardstack_animation::{Animatable, AnimationSpec, Easing};
use cardstack_graphics::Point;
use std::f32::consts::FRAC_PI_2;
use std::fmt;

/// Thresholds and timings for [`SwipeRecognizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    pub paging_touch_slop: f32,
    pub escape_velocity: f32,
    pub max_velocity: f32,
    pub falsing_threshold: f32,
    /// Fraction of the child size past which a release dismisses.
    pub swiped_far_enough_fraction: f32,
    /// Fraction of the size a non-dismissable child may be dragged.
    pub rubber_band_fraction: f32,
    pub snap_duration_ms: u64,
    pub default_escape_duration_ms: u64,
    pub max_escape_duration_ms: u64,
}

impl SwipeConfig {
    pub fn from_view_configuration(config: &ViewConfiguration) -> Self {
        Self {
            paging_touch_slop: config.paging_touch_slop,
            escape_velocity: config.swipe_escape_velocity,
            max_velocity: config.max_dismiss_velocity,
            falsing_threshold: config.falsing_threshold,
            ..Self::default()
        }
    }
}

impl Default for SwipeConfig {
    fn default() -> Self {
        let view = ViewConfiguration::default();
        Self {
            paging_touch_slop: view.paging_touch_slop,
            escape_velocity: view.swipe_escape_velocity,
            max_velocity: view.max_dismiss_velocity,
            falsing_threshold: view.falsing_threshold,
            swiped_far_enough_fraction: 0.6,
            rubber_band_fraction: 0.25,
            snap_duration_ms: 150,
            default_escape_duration_ms: 200,
            max_escape_duration_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAnimationKind {
    /// Translates the child off screen; completion means the child is gone.
    Dismiss,
    /// Translates the child back to rest.
    SnapBack,
}

/// A translation animation for one swiped child.
#[derive(Debug, Clone)]
pub struct SwipeAnimation<T> {
    target: T,
    kind: SwipeAnimationKind,
    translation: Animatable<f32>,
}

impl<T: Copy> SwipeAnimation<T> {
    pub fn new(target: T, kind: SwipeAnimationKind, from: f32, to: f32, spec: AnimationSpec) -> Self {
        let mut translation = Animatable::new(from);
        translation.animate_to(to, spec);
        Self {
            target,
            kind,
            translation,
        }
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn kind(&self) -> SwipeAnimationKind {
        self.kind
    }

    pub fn translation(&self) -> f32 {
        *self.translation.value()
    }

    pub fn final_translation(&self) -> f32 {
        *self.translation.target()
    }

    pub fn spec(&self) -> AnimationSpec {
        self.translation.spec()
    }

    /// Swaps the curve. Timing restarts from the current translation.
    pub fn set_easing(&mut self, easing: Easing) {
        let spec = self.translation.spec().with_easing(easing);
        let target = *self.translation.target();
        let current = *self.translation.value();
        self.translation.snap_to(current);
        self.translation.animate_to(target, spec);
    }

    /// Advance to `frame_time_nanos`. Returns true while still running.
    pub fn tick(&mut self, frame_time_nanos: u64) -> bool {
        self.translation.tick(frame_time_nanos)
    }

    /// Jump to the final translation.
    pub fn end(&mut self) {
        self.translation.end();
    }

    pub fn is_running(&self) -> bool {
        self.translation.is_running()
    }
}

/// What the recognizer needs from the owner of the swipeable children.
pub trait SwipeCallback<T> {
    /// The dismissable child under `position`, if any.
    fn child_at_position(&self, position: Point) -> Option<T>;

    fn can_child_be_dismissed(&self, child: T) -> bool;

    /// Distance that counts as a full swipe of `child`.
    fn size(&self, child: T) -> f32;

    fn translation(&self, child: T) -> f32;

    fn set_translation(&mut self, child: T, translation: f32);

    fn on_begin_drag(&mut self, child: T);

    /// Reports the swipe progress; returning false asks the recognizer's
    /// owner to fade the child itself.
    fn update_swipe_progress(&mut self, child: T, dismissable: bool, progress: f32) -> bool;

    /// The drag ended without a dismissal; a snap-back animation follows.
    fn on_drag_cancelled(&mut self, child: T);

    /// Takes ownership of a dismiss animation.
    fn prepare_dismiss_animation(&mut self, animation: SwipeAnimation<T>);

    /// Takes ownership of a snap-back animation.
    fn prepare_snap_back_animation(&mut self, animation: SwipeAnimation<T>);

    fn is_anti_falsing_needed(&self) -> bool {
        false
    }

    fn falsing_threshold_factor(&self) -> f32 {
        0.0
    }
}

/// Recognizes horizontal swipes on children of a scrolling container.
pub struct SwipeRecognizer<T> {
    config: SwipeConfig,
    velocity: VelocityTracker,
    current: Option<T>,
    can_current_be_dismissed: bool,
    dragging: bool,
    touch_above_falsing_threshold: bool,
    initial_touch_pos: f32,
    initial_perpendicular_pos: f32,
    tracking_pointer: PointerId,
}

impl<T> fmt::Debug for SwipeRecognizer<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeRecognizer")
            .field("current", &self.current)
            .field("dragging", &self.dragging)
            .finish()
    }
}

impl<T> SwipeRecognizer<T>
where
    T: Copy + PartialEq + fmt::Debug,
{
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            velocity: VelocityTracker::new(),
            current: None,
            can_current_be_dismissed: false,
            dragging: false,
            touch_above_falsing_threshold: false,
            initial_touch_pos: 0.0,
            initial_perpendicular_pos: 0.0,
            tracking_pointer: 0,
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn current(&self) -> Option<T> {
        self.current
    }

    /// Watches the stream until a horizontal drag on a child starts.
    ///
    /// Returns true from the event that starts the drag; the owner should
    /// route the rest of the gesture to [`SwipeRecognizer::on_touch`].
    pub fn on_intercept_touch<C>(&mut self, callback: &mut C, event: &MotionEvent) -> bool
    where
        C: SwipeCallback<T> + ?Sized,
    {
        match event.action() {
            MotionAction::Down => {
                self.dragging = false;
                self.touch_above_falsing_threshold = false;
                self.velocity.clear();
                self.tracking_pointer = event.pointer_id(0).unwrap_or_default();
                self.current = callback.child_at_position(event.primary_position());
                if let Some(child) = self.current {
                    self.can_current_be_dismissed = callback.can_child_be_dismissed(child);
                    self.velocity.add_movement(event);
                    self.initial_touch_pos = event.x();
                    self.initial_perpendicular_pos = event.y();
                }
            }
            MotionAction::Move => {
                if let (Some(child), false) = (self.current, self.dragging) {
                    self.velocity.add_movement(event);
                    let delta = event.x() - self.initial_touch_pos;
                    let perpendicular = event.y() - self.initial_perpendicular_pos;
                    if delta.abs() > self.config.paging_touch_slop
                        && delta.abs() > perpendicular.abs()
                    {
                        log::debug!("swipe drag started on {child:?}");
                        callback.on_begin_drag(child);
                        self.dragging = true;
                        self.initial_touch_pos = event.x() - callback.translation(child);
                    }
                }
            }
            MotionAction::Up | MotionAction::Cancel => {
                let captured = self.dragging;
                self.dragging = false;
                self.current = None;
                return captured;
            }
            MotionAction::PointerDown | MotionAction::PointerUp | MotionAction::Scroll => {}
        }
        self.dragging
    }

    /// Drives an intercepted drag. Returns false only when nothing is being
    /// dragged and no child is under the event.
    pub fn on_touch<C>(&mut self, callback: &mut C, event: &MotionEvent) -> bool
    where
        C: SwipeCallback<T> + ?Sized,
    {
        if !self.dragging {
            if callback.child_at_position(event.primary_position()).is_some() {
                self.on_intercept_touch(callback, event);
                return true;
            }
            return false;
        }

        self.velocity.add_movement(event);
        match event.action() {
            MotionAction::Move => {
                if let Some(child) = self.current {
                    self.drag_to(callback, child, event.x());
                }
            }
            MotionAction::Up | MotionAction::Cancel => {
                if let Some(child) = self.current.take() {
                    self.release(callback, child, event.action() == MotionAction::Up);
                }
                self.dragging = false;
            }
            MotionAction::Down
            | MotionAction::PointerDown
            | MotionAction::PointerUp
            | MotionAction::Scroll => {}
        }
        true
    }

    fn drag_to<C>(&mut self, callback: &mut C, child: T, position: f32)
    where
        C: SwipeCallback<T> + ?Sized,
    {
        let mut delta = position - self.initial_touch_pos;
        let falsing_threshold = self.config.falsing_threshold * callback.falsing_threshold_factor();
        if delta.abs() >= falsing_threshold {
            self.touch_above_falsing_threshold = true;
        }

        if !callback.can_child_be_dismissed(child) {
            let size = callback.size(child);
            let max_distance = self.config.rubber_band_fraction * size;
            delta = if size <= 0.0 {
                0.0
            } else if delta.abs() >= size {
                max_distance.copysign(delta)
            } else {
                max_distance * ((delta / size) * FRAC_PI_2).sin()
            };
        }

        log::trace!("swipe {child:?} translation {delta}");
        callback.set_translation(child, delta);
        self.update_progress(callback, child);
    }

    fn release<C>(&mut self, callback: &mut C, child: T, is_up: bool)
    where
        C: SwipeCallback<T> + ?Sized,
    {
        self.velocity
            .compute_current_velocity(1000, self.config.max_velocity);
        let velocity = self.velocity.x_velocity(self.tracking_pointer);
        let perpendicular_velocity = self.velocity.y_velocity(self.tracking_pointer);
        let translation = callback.translation(child);
        let size = callback.size(child);

        let swiped_far_enough =
            translation.abs() > self.config.swiped_far_enough_fraction * size;
        let swiped_fast_enough = velocity.abs() > self.config.escape_velocity
            && velocity.abs() > perpendicular_velocity.abs()
            && (velocity > 0.0) == (translation > 0.0);
        let falsing_detected =
            callback.is_anti_falsing_needed() && !self.touch_above_falsing_threshold;

        let dismiss = is_up
            && !falsing_detected
            && (swiped_fast_enough || swiped_far_enough)
            && callback.can_child_be_dismissed(child);

        log::debug!(
            "swipe release {child:?}: translation {translation}, velocity {velocity}, dismiss {dismiss}"
        );
        if dismiss {
            self.dismiss_child(callback, child, velocity, !swiped_fast_enough);
        } else {
            callback.on_drag_cancelled(child);
            self.snap_child(callback, child);
        }
    }

    /// Animates `child` off screen in the direction of travel.
    pub fn dismiss_child<C>(
        &mut self,
        callback: &mut C,
        child: T,
        velocity: f32,
        use_accelerate_easing: bool,
    ) where
        C: SwipeCallback<T> + ?Sized,
    {
        let translation = callback.translation(child);
        let size = callback.size(child);
        let new_position = if velocity < 0.0 || (velocity == 0.0 && translation < 0.0) {
            -size
        } else {
            size
        };

        let duration_ms = if velocity != 0.0 {
            let travel_ms = ((new_position - translation).abs() * 1000.0 / velocity.abs()) as u64;
            travel_ms.min(self.config.max_escape_duration_ms)
        } else {
            self.config.default_escape_duration_ms
        };
        let easing = if use_accelerate_easing {
            Easing::FastOutLinearEasing
        } else {
            Easing::LinearEasing
        };

        callback.prepare_dismiss_animation(SwipeAnimation::new(
            child,
            SwipeAnimationKind::Dismiss,
            translation,
            new_position,
            AnimationSpec::tween(duration_ms, easing),
        ));
    }

    /// Animates `child` back to rest.
    pub fn snap_child<C>(&mut self, callback: &mut C, child: T)
    where
        C: SwipeCallback<T> + ?Sized,
    {
        let translation = callback.translation(child);
        callback.prepare_snap_back_animation(SwipeAnimation::new(
            child,
            SwipeAnimationKind::SnapBack,
            translation,
            0.0,
            AnimationSpec::linear(self.config.snap_duration_ms),
        ));
    }

    fn update_progress<C>(&self, callback: &mut C, child: T)
    where
        C: SwipeCallback<T> + ?Sized,
    {
        let progress = swipe_progress_for_offset(callback.translation(child), callback.size(child));
        callback.update_swipe_progress(child, self.can_current_be_dismissed, progress);
    }
}

/// `|offset| / size` clamped to [0, 1].
pub fn swipe_progress_for_offset(offset: f32, size: f32) -> f32 {
    if size <= 0.0 {
        return 0.0;
    }
    (offset.abs() / size).clamp(0.0, 1.0)
}
