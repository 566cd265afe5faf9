//! Outbound notifications and metric counters.

use crate::item::ItemId;
use crate::item_view::ItemView;
use rustc_hash::FxHashMap;

#[derive(Clone, Debug)]
pub enum StackEvent {
    /// The stack was scrolled by a drag; `delta_y` is the pointer travel
    /// since the previous move.
    ScrollChanged { delta_y: f32 },
    /// The switcher should close.
    HideUi {
        user_triggered: bool,
        return_to_home: bool,
    },
    /// A swipe removed `item`; `view` is its view at the moment of removal.
    ItemDismissed { item: ItemId, view: ItemView },
    FocusChanged { item: ItemId },
    /// The secondary workspace items should be launched.
    LaunchSecondary { items: Vec<ItemId> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StackMetric {
    UserScrolled,
    ItemDismissedViaSwipe,
}

/// Receiver for everything the stack reports to its host.
pub trait StackEventSink {
    fn send(&mut self, event: StackEvent);

    fn count(&mut self, metric: StackMetric);
}

/// Sink that buffers events until the host drains them.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<StackEvent>,
    metrics: FxHashMap<StackMetric, u32>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[StackEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<StackEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn metric(&self, metric: StackMetric) -> u32 {
        self.metrics.get(&metric).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl StackEventSink for EventQueue {
    fn send(&mut self, event: StackEvent) {
        log::debug!("stack event: {event:?}");
        self.events.push(event);
    }

    fn count(&mut self, metric: StackMetric) {
        *self.metrics.entry(metric).or_insert(0) += 1;
    }
}
