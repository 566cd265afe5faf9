use cardstack_graphics::Point;
use smallvec::SmallVec;
use std::fmt;

pub type PointerId = u32;

/// What a [`MotionEvent`] reports.
///
/// `PointerDown` and `PointerUp` describe a secondary pointer going down or
/// up while another pointer stays pressed; the pointer in question is the one
/// at [`MotionEvent::action_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionAction {
    Down,
    PointerDown,
    Move,
    PointerUp,
    Up,
    Cancel,
    /// Wheel or touchpad scroll; see [`MotionEvent::axis_vscroll`].
    Scroll,
}

/// Device class that produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    Touchscreen,
    Mouse,
    Stylus,
    Touchpad,
}

impl InputSource {
    /// Sources that report on-screen coordinates.
    pub fn is_pointer_class(self) -> bool {
        matches!(
            self,
            InputSource::Touchscreen | InputSource::Mouse | InputSource::Stylus
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerCoords {
    pub id: PointerId,
    pub position: Point,
}

impl PointerCoords {
    pub const fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MotionEventError {
    /// The event does not carry the requested pointer.
    PointerNotFound { id: PointerId },
    /// The pointer index is past the end of the pointer list.
    IndexOutOfRange { index: usize, count: usize },
}

impl fmt::Display for MotionEventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionEventError::PointerNotFound { id } => {
                write!(f, "pointer {id} is not part of this event")
            }
            MotionEventError::IndexOutOfRange { index, count } => {
                write!(f, "pointer index {index} out of range for {count} pointers")
            }
        }
    }
}

impl std::error::Error for MotionEventError {}

/// A multi-pointer input event.
///
/// Every event carries at least one pointer; index 0 is the primary pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionEvent {
    action: MotionAction,
    action_index: usize,
    event_time_ms: i64,
    source: InputSource,
    pointers: SmallVec<[PointerCoords; 4]>,
    vscroll: f32,
}

impl MotionEvent {
    /// Builds an event. An empty pointer list gets a single pointer 0 at the origin.
    pub fn new(
        action: MotionAction,
        action_index: usize,
        event_time_ms: i64,
        pointers: &[PointerCoords],
    ) -> Self {
        let mut pointers: SmallVec<[PointerCoords; 4]> = pointers.iter().copied().collect();
        if pointers.is_empty() {
            pointers.push(PointerCoords::new(0, 0.0, 0.0));
        }
        let action_index = action_index.min(pointers.len() - 1);
        Self {
            action,
            action_index,
            event_time_ms,
            source: InputSource::Touchscreen,
            pointers,
            vscroll: 0.0,
        }
    }

    pub fn down(event_time_ms: i64, id: PointerId, x: f32, y: f32) -> Self {
        Self::new(
            MotionAction::Down,
            0,
            event_time_ms,
            &[PointerCoords::new(id, x, y)],
        )
    }

    pub fn moved(event_time_ms: i64, pointers: &[PointerCoords]) -> Self {
        Self::new(MotionAction::Move, 0, event_time_ms, pointers)
    }

    /// Single pointer convenience for [`MotionEvent::moved`].
    pub fn move_to(event_time_ms: i64, id: PointerId, x: f32, y: f32) -> Self {
        Self::moved(event_time_ms, &[PointerCoords::new(id, x, y)])
    }

    pub fn pointer_down(event_time_ms: i64, action_index: usize, pointers: &[PointerCoords]) -> Self {
        Self::new(MotionAction::PointerDown, action_index, event_time_ms, pointers)
    }

    pub fn pointer_up(event_time_ms: i64, action_index: usize, pointers: &[PointerCoords]) -> Self {
        Self::new(MotionAction::PointerUp, action_index, event_time_ms, pointers)
    }

    pub fn up(event_time_ms: i64, id: PointerId, x: f32, y: f32) -> Self {
        Self::new(
            MotionAction::Up,
            0,
            event_time_ms,
            &[PointerCoords::new(id, x, y)],
        )
    }

    pub fn cancel(event_time_ms: i64, id: PointerId, x: f32, y: f32) -> Self {
        Self::new(
            MotionAction::Cancel,
            0,
            event_time_ms,
            &[PointerCoords::new(id, x, y)],
        )
    }

    /// Wheel event at `(x, y)`; positive `vscroll` scrolls up/away from the user.
    pub fn scroll(event_time_ms: i64, x: f32, y: f32, vscroll: f32) -> Self {
        let mut event = Self::new(
            MotionAction::Scroll,
            0,
            event_time_ms,
            &[PointerCoords::new(0, x, y)],
        );
        event.source = InputSource::Mouse;
        event.vscroll = vscroll;
        event
    }

    pub fn with_source(mut self, source: InputSource) -> Self {
        self.source = source;
        self
    }

    pub fn action(&self) -> MotionAction {
        self.action
    }

    pub fn action_index(&self) -> usize {
        self.action_index
    }

    pub fn event_time_ms(&self) -> i64 {
        self.event_time_ms
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    pub fn axis_vscroll(&self) -> f32 {
        self.vscroll
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn pointers(&self) -> &[PointerCoords] {
        &self.pointers
    }

    pub fn pointer_id(&self, index: usize) -> Result<PointerId, MotionEventError> {
        self.pointer(index).map(|pointer| pointer.id)
    }

    pub fn position(&self, index: usize) -> Result<Point, MotionEventError> {
        self.pointer(index).map(|pointer| pointer.position)
    }

    pub fn find_pointer_index(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|pointer| pointer.id == id)
    }

    pub fn position_of(&self, id: PointerId) -> Result<Point, MotionEventError> {
        self.pointers
            .iter()
            .find(|pointer| pointer.id == id)
            .map(|pointer| pointer.position)
            .ok_or(MotionEventError::PointerNotFound { id })
    }

    /// Position of the primary pointer.
    pub fn primary_position(&self) -> Point {
        self.pointers
            .first()
            .map(|pointer| pointer.position)
            .unwrap_or(Point::ZERO)
    }

    pub fn x(&self) -> f32 {
        self.primary_position().x
    }

    pub fn y(&self) -> f32 {
        self.primary_position().y
    }

    fn pointer(&self, index: usize) -> Result<&PointerCoords, MotionEventError> {
        self.pointers
            .get(index)
            .ok_or(MotionEventError::IndexOutOfRange {
                index,
                count: self.pointers.len(),
            })
    }
}
