//! Velocity tracking for fling and swipe release.
//!
//! [`VelocityTracker1D`] estimates velocity along one axis with the impulse
//! strategy (kinetic energy accumulated across samples).
//! [`VelocityTracker`] keeps one x/y pair per pointer of a multi-pointer
//! event stream.

use crate::motion_event::{MotionAction, MotionEvent, PointerId};
use smallvec::SmallVec;

/// Ring buffer size for velocity tracking samples.
const HISTORY_SIZE: usize = 20;

/// Only use samples within the last 100ms for velocity calculation.
const HORIZON_MS: i64 = 100;

/// If no movement for this duration, assume the pointer has stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Default, Debug)]
struct DataPointAtTime {
    time_ms: i64,
    data_point: f32,
}

/// 1D velocity tracker over absolute positions.
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    samples: [Option<DataPointAtTime>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Records `position` at `time_ms`.
    pub fn add_data_point(&mut self, time_ms: i64, position: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(DataPointAtTime {
            time_ms,
            data_point: position,
        });
    }

    /// Velocity in units/second, 0.0 with fewer than two recent samples.
    pub fn calculate_velocity(&self) -> f32 {
        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut sample_count = 0;

        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        let mut current_index = self.index;
        let mut previous_time = newest.time_ms;
        while let Some(sample) = self.samples[current_index] {
            let age = newest.time_ms - sample.time_ms;
            let gap = (previous_time - sample.time_ms).abs();
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            previous_time = sample.time_ms;

            positions[sample_count] = sample.data_point;
            times[sample_count] = -(age as f32);
            sample_count += 1;
            if sample_count >= HISTORY_SIZE {
                break;
            }

            current_index = if current_index == 0 {
                HISTORY_SIZE - 1
            } else {
                current_index - 1
            };
        }

        if sample_count < 2 {
            return 0.0;
        }

        impulse_velocity(&positions[..sample_count], &times[..sample_count]) * 1000.0
    }

    /// Velocity in units/second, clamped to `±max_velocity`.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.calculate_velocity();
        if velocity == 0.0 || velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Samples are ordered newest first; times are negative ages in ms.
fn impulse_velocity(positions: &[f32], times: &[f32]) -> f32 {
    let start = positions.len() - 1;
    let mut work = 0.0f32;
    let mut next_time = times[start];

    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let v_curr = (positions[i - 1] - positions[i]) / (next_time - current_time);
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == start {
            work *= 0.5;
        }
    }

    kinetic_energy_to_velocity(work)
}

/// E = 0.5 * m * v^2 with m = 1.
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

#[derive(Clone, Debug)]
struct PointerTrack {
    id: PointerId,
    x: VelocityTracker1D,
    y: VelocityTracker1D,
    velocity_x: f32,
    velocity_y: f32,
}

/// Per-pointer velocity tracking for a motion event stream.
///
/// Feed every event with [`VelocityTracker::add_movement`], then call
/// [`VelocityTracker::compute_current_velocity`] before reading velocities.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    tracks: SmallVec<[PointerTrack; 4]>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Records the pointer positions of `event`.
    ///
    /// A `Down` starts a fresh gesture. Up, cancel and scroll events carry no
    /// new movement and are ignored.
    pub fn add_movement(&mut self, event: &MotionEvent) {
        match event.action() {
            MotionAction::Down => self.clear(),
            MotionAction::PointerDown | MotionAction::Move => {}
            MotionAction::PointerUp
            | MotionAction::Up
            | MotionAction::Cancel
            | MotionAction::Scroll => return,
        }

        let time_ms = event.event_time_ms();
        for pointer in event.pointers() {
            let track = self.track_mut(pointer.id);
            track.x.add_data_point(time_ms, pointer.position.x);
            track.y.add_data_point(time_ms, pointer.position.y);
        }
    }

    /// Computes velocities in pixels per `units` milliseconds (1000 = px/sec),
    /// each axis clamped to `±max_velocity`.
    pub fn compute_current_velocity(&mut self, units: i32, max_velocity: f32) {
        let scale = units as f32 / 1000.0;
        let cap = |velocity: f32| {
            if !max_velocity.is_finite() || max_velocity <= 0.0 || velocity.is_nan() {
                0.0
            } else {
                velocity.clamp(-max_velocity, max_velocity)
            }
        };
        for track in &mut self.tracks {
            track.velocity_x = cap(track.x.calculate_velocity() * scale);
            track.velocity_y = cap(track.y.calculate_velocity() * scale);
        }
    }

    /// Last computed x velocity for `id`, 0.0 when the pointer is unknown.
    pub fn x_velocity(&self, id: PointerId) -> f32 {
        self.track(id).map_or(0.0, |track| track.velocity_x)
    }

    /// Last computed y velocity for `id`, 0.0 when the pointer is unknown.
    pub fn y_velocity(&self, id: PointerId) -> f32 {
        self.track(id).map_or(0.0, |track| track.velocity_y)
    }

    fn track(&self, id: PointerId) -> Option<&PointerTrack> {
        self.tracks.iter().find(|track| track.id == id)
    }

    fn track_mut(&mut self, id: PointerId) -> &mut PointerTrack {
        let index = match self.tracks.iter().position(|track| track.id == id) {
            Some(index) => index,
            None => {
                self.tracks.push(PointerTrack {
                    id,
                    x: VelocityTracker1D::new(),
                    y: VelocityTracker1D::new(),
                    velocity_x: 0.0,
                    velocity_y: 0.0,
                });
                self.tracks.len() - 1
            }
        };
        &mut self.tracks[index]
    }
}
