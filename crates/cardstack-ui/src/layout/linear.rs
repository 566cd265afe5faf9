use super::{FocusState, LayoutEngine};
use crate::item::ItemId;
use crate::item_stack::ItemStack;
use crate::transform::Transform;
use cardstack_graphics::Rect;

/// Evenly spaced stack: item `i` is the front card at scroll `i`.
///
/// Cards behind the scroll position step up by `item_spacing` pixels per
/// unit and fade out past `visible_behind` units. Cards in front of it slide
/// down below the container. A band at the top holds secondary workspace
/// tiles when there are secondary items and `secondary_height > 0`.
#[derive(Clone, Debug)]
pub struct LinearStackLayout {
    bounds: Rect,
    item_spacing: f32,
    inset: f32,
    card_height_fraction: f32,
    depth_step: f32,
    visible_behind: f32,
    secondary_height: f32,
    focus: FocusState,
    stack_ids: Vec<ItemId>,
    secondary_ids: Vec<ItemId>,
}

impl Default for LinearStackLayout {
    fn default() -> Self {
        Self {
            bounds: Rect::default(),
            item_spacing: 96.0,
            inset: 16.0,
            card_height_fraction: 0.55,
            depth_step: 4.0,
            visible_behind: 3.0,
            secondary_height: 0.0,
            focus: FocusState::Unfocused,
            stack_ids: Vec::new(),
            secondary_ids: Vec::new(),
        }
    }
}

impl LinearStackLayout {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// Pixels of pointer travel per scroll unit. Values below 1 are raised to 1.
    pub fn with_item_spacing(mut self, spacing: f32) -> Self {
        self.item_spacing = spacing.max(1.0);
        self
    }

    pub fn with_inset(mut self, inset: f32) -> Self {
        self.inset = inset.max(0.0);
        self
    }

    pub fn with_secondary_height(mut self, height: f32) -> Self {
        self.secondary_height = height.max(0.0);
        self
    }

    pub fn with_visible_behind(mut self, units: f32) -> Self {
        self.visible_behind = units.max(0.0);
        self
    }

    pub fn item_spacing(&self) -> f32 {
        self.item_spacing
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    fn stack_top(&self) -> f32 {
        match self.secondary_region() {
            Some(region) => region.bottom(),
            None => self.bounds.top(),
        }
    }

    fn card_height(&self) -> f32 {
        (self.bounds.bottom() - self.stack_top()).max(0.0) * self.card_height_fraction
    }

    fn stack_transform(&self, index: usize, scroll_p: f32) -> Transform {
        let card_height = self.card_height();
        let front_top = self.bounds.bottom() - card_height - self.inset;
        let relative = index as f32 - scroll_p;
        let top = if relative <= 0.0 {
            front_top + relative * self.item_spacing
        } else {
            front_top + relative * (card_height + self.inset)
        };
        let rect = Rect::new(
            self.bounds.left() + self.inset,
            top,
            (self.bounds.width - 2.0 * self.inset).max(0.0),
            card_height,
        );
        let visible = relative > -self.visible_behind
            && rect.bottom() > self.stack_top()
            && rect.top() < self.bounds.bottom();
        Transform {
            rect,
            progress: relative,
            depth_translation: (relative + self.visible_behind).max(0.0) * self.depth_step,
            visible,
        }
    }

    fn secondary_transform(&self, index: usize) -> Transform {
        let Some(region) = self.secondary_region() else {
            return Transform::hidden();
        };
        let count = self.secondary_ids.len() as f32;
        let width = ((region.width - self.inset * (count + 1.0)) / count).max(0.0);
        let rect = Rect::new(
            region.left() + self.inset + index as f32 * (width + self.inset),
            region.top() + self.inset,
            width,
            (region.height - 2.0 * self.inset).max(0.0),
        );
        Transform::new(rect, 0.0, 0.0)
    }
}

impl LayoutEngine for LinearStackLayout {
    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn update(&mut self, stack: &ItemStack) {
        self.stack_ids.clear();
        self.secondary_ids.clear();
        for item in stack.laid_out_items() {
            if item.is_stack_item() {
                self.stack_ids.push(item.id);
            } else {
                self.secondary_ids.push(item.id);
            }
        }
        log::trace!(
            "layout updated: {} stack items, {} secondary items",
            self.stack_ids.len(),
            self.secondary_ids.len()
        );
    }

    fn min_scroll_p(&self) -> f32 {
        0.0
    }

    fn max_scroll_p(&self) -> f32 {
        self.stack_ids.len().saturating_sub(1) as f32
    }

    fn scroll_delta_for_pixel_delta(&self, from_y: f32, to_y: f32) -> f32 {
        -(to_y - from_y) / self.item_spacing
    }

    fn pixel_delta_for_scroll_delta(&self, from_p: f32, to_p: f32) -> f32 {
        -(to_p - from_p) * self.item_spacing
    }

    fn scroll_for_item(&self, item: ItemId) -> Option<f32> {
        self.stack_ids
            .iter()
            .position(|&id| id == item)
            .map(|index| index as f32)
    }

    fn transform_for(&self, item: ItemId, scroll_p: f32) -> Transform {
        if let Some(index) = self.stack_ids.iter().position(|&id| id == item) {
            return self.stack_transform(index, scroll_p);
        }
        match self.secondary_ids.iter().position(|&id| id == item) {
            Some(index) => self.secondary_transform(index),
            None => Transform::hidden(),
        }
    }

    fn focus_state(&self) -> FocusState {
        self.focus
    }

    fn set_focus_state(&mut self, state: FocusState) {
        self.focus = state;
    }

    fn secondary_region(&self) -> Option<Rect> {
        if self.secondary_ids.is_empty() || self.secondary_height <= 0.0 {
            return None;
        }
        Some(Rect::new(
            self.bounds.left(),
            self.bounds.top(),
            self.bounds.width,
            self.secondary_height.min(self.bounds.height),
        ))
    }
}
