use crate::item::ItemId;
use crate::transform::Transform;
use cardstack_animation::{Animatable, AnimationSpec};
use cardstack_graphics::Rect;

/// Visual proxy of an item while it is bound to the screen.
#[derive(Clone, Debug)]
pub struct ItemView {
    item: ItemId,
    transform: Transform,
    translation_x: f32,
    touch_enabled: bool,
    clip_with_stack: bool,
    animation: Option<Animatable<Transform>>,
}

impl ItemView {
    pub fn new(item: ItemId, transform: Transform) -> Self {
        Self {
            item,
            transform,
            translation_x: 0.0,
            touch_enabled: true,
            clip_with_stack: true,
            animation: None,
        }
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn is_visible(&self) -> bool {
        self.transform.visible
    }

    /// The on-screen rect, including the swipe offset.
    pub fn screen_rect(&self) -> Rect {
        self.transform.rect.translate(self.translation_x, 0.0)
    }

    /// Moves the view to `transform` immediately, dropping any running animation.
    pub fn apply_transform(&mut self, transform: Transform) {
        self.animation = None;
        self.transform = transform;
    }

    /// Tweens from the current transform to `transform`.
    pub fn animate_to(&mut self, transform: Transform, spec: AnimationSpec) {
        if self.transform == transform {
            self.apply_transform(transform);
            return;
        }
        let mut animation = Animatable::new(self.transform);
        animation.animate_to(transform, spec);
        self.animation = Some(animation);
    }

    pub fn is_animating(&self) -> bool {
        self.animation
            .as_ref()
            .is_some_and(|animation| animation.is_running())
    }

    /// Jumps a running animation to its end.
    pub fn finish_animation(&mut self) {
        if let Some(mut animation) = self.animation.take() {
            animation.end();
            self.transform = *animation.value();
        }
    }

    /// Advance the transform animation. Returns true while still running.
    pub fn tick(&mut self, frame_time_nanos: u64) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        let running = animation.tick(frame_time_nanos);
        self.transform = *animation.value();
        if !running {
            self.animation = None;
        }
        running
    }

    pub fn translation_x(&self) -> f32 {
        self.translation_x
    }

    pub fn set_translation_x(&mut self, translation_x: f32) {
        self.translation_x = translation_x;
    }

    pub fn touch_enabled(&self) -> bool {
        self.touch_enabled
    }

    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.touch_enabled = enabled;
    }

    pub fn clip_with_stack(&self) -> bool {
        self.clip_with_stack
    }

    pub fn set_clip_with_stack(&mut self, clip: bool) {
        self.clip_with_stack = clip;
    }
}
