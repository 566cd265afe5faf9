use cardstack_animation::Lerp;
use cardstack_graphics::Rect;

/// Where and how a card is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Transform {
    /// Screen rectangle before the horizontal swipe offset.
    pub rect: Rect,
    /// Position of the card relative to the scroll, in scroll units.
    pub progress: f32,
    /// Elevation of the card above the stack plane.
    pub depth_translation: f32,
    pub visible: bool,
}

impl Transform {
    pub fn new(rect: Rect, progress: f32, depth_translation: f32) -> Self {
        Self {
            rect,
            progress,
            depth_translation,
            visible: true,
        }
    }

    /// A transform for cards that are not on screen.
    pub fn hidden() -> Self {
        Self::default()
    }
}

impl Lerp for Transform {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        let visible = if fraction <= 0.0 {
            self.visible
        } else if fraction >= 1.0 {
            target.visible
        } else {
            self.visible || target.visible
        };
        Self {
            rect: self.rect.lerp(&target.rect, fraction),
            progress: self.progress.lerp(&target.progress, fraction),
            depth_translation: self
                .depth_translation
                .lerp(&target.depth_translation, fraction),
            visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_is_exact_at_both_ends() {
        let from = Transform::new(Rect::new(12.3, 45.6, 300.1, 120.7), 0.3, 4.0);
        let to = Transform::new(Rect::new(-7.9, 401.2, 280.0, 110.0), 1.7, 9.5);
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, 1.0), to);
    }

    #[test]
    fn lerp_interpolates_every_component() {
        let from = Transform::new(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0, 0.0);
        let to = Transform::new(Rect::new(0.0, 200.0, 100.0, 100.0), 2.0, 10.0);
        let mid = from.lerp(&to, 0.5);
        assert_eq!(mid.rect.y, 100.0);
        assert_eq!(mid.progress, 1.0);
        assert_eq!(mid.depth_translation, 5.0);
    }

    #[test]
    fn card_stays_visible_while_entering_or_leaving() {
        let shown = Transform::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, 0.0);
        let gone = Transform::hidden();
        assert!(gone.lerp(&shown, 0.2).visible);
        assert!(shown.lerp(&gone, 0.8).visible);
        assert!(!shown.lerp(&gone, 1.0).visible);
    }
}
