use crate::layout::LayoutEngine;

/// Pointer-pixel to scroll-progress conversion over a layout.
#[derive(Clone, Copy)]
pub struct ScrollMapper<'a> {
    layout: &'a dyn LayoutEngine,
}

impl<'a> ScrollMapper<'a> {
    pub fn new(layout: &'a dyn LayoutEngine) -> Self {
        Self { layout }
    }

    /// Scroll change for a pointer moving from `down_y` to `y`.
    pub fn delta_p_for_y(&self, down_y: f32, y: f32) -> f32 {
        self.layout.scroll_delta_for_pixel_delta(down_y, y)
    }

    /// Pointer travel that moves the scroll from `down_scroll_p` to `scroll_p`.
    pub fn y_for_delta_p(&self, down_scroll_p: f32, scroll_p: f32) -> f32 {
        self.layout.pixel_delta_for_scroll_delta(down_scroll_p, scroll_p)
    }

    pub fn min_scroll_p(&self) -> f32 {
        self.layout.min_scroll_p()
    }

    pub fn max_scroll_p(&self) -> f32 {
        self.layout.max_scroll_p()
    }

    /// `scroll_p` clamped into the layout's bounds.
    pub fn bounded(&self, scroll_p: f32) -> f32 {
        let min = self.min_scroll_p();
        let max = self.max_scroll_p().max(min);
        scroll_p.clamp(min, max)
    }

    /// Distance past the nearest bound, 0.0 when inside.
    pub fn overscroll(&self, scroll_p: f32) -> f32 {
        scroll_p - self.bounded(scroll_p)
    }

    pub fn is_out_of_bounds(&self, scroll_p: f32) -> bool {
        self.overscroll(scroll_p) != 0.0
    }
}
