use cardstack_foundation::{MotionAction, MotionEvent};
use cardstack_ui::{
    EventQueue, GestureController, Item, LinearStackLayout, Point, Rect, StackConfig, StackEvent,
    StackView,
};

const WIDTH: f32 = 1080.0;
const HEIGHT: f32 = 1920.0;
const DENSITY: f32 = 2.625;
const FRAME_MS: i64 = 16;

/// Headless stand-in for the switcher window: owns the stack and plays the
/// view hierarchy's intercept/touch dispatch.
struct Window {
    stack: StackView,
    controller: GestureController,
    events: EventQueue,
    captured: bool,
    clock_ms: i64,
}

impl Window {
    fn new() -> Self {
        let config = StackConfig::new(DENSITY);
        let layout = LinearStackLayout::default()
            .with_item_spacing(96.0 * DENSITY)
            .with_inset(16.0 * DENSITY)
            .with_secondary_height(160.0 * DENSITY);
        let mut stack = StackView::new(layout, Rect::new(0.0, 0.0, WIDTH, HEIGHT), config);
        stack.set_items([
            Item::secondary(100, "Notes (docked)"),
            Item::new(1, "Mail"),
            Item::new(2, "Maps"),
            Item::new(3, "Music"),
            Item::new(4, "Camera"),
            Item::new(5, "Browser"),
            Item::new(6, "Settings"),
        ]);
        Self {
            stack,
            controller: GestureController::new(config),
            events: EventQueue::new(),
            captured: false,
            clock_ms: 0,
        }
    }

    fn dispatch(&mut self, event: MotionEvent) {
        if event.action() == MotionAction::Down {
            self.captured = false;
        }
        if self.captured {
            self.controller
                .on_touch(&mut self.stack, &mut self.events, &event);
            return;
        }
        if self
            .controller
            .on_intercept_touch(&mut self.stack, &mut self.events, &event)
        {
            self.captured = true;
        } else if event.action() == MotionAction::Down
            && self.stack.find_item_at(event.x(), event.y()).is_none()
        {
            self.captured = true;
            self.controller
                .on_touch(&mut self.stack, &mut self.events, &event);
        }
    }

    /// Presses at `from`, moves to `to` in `steps` moves `step_ms` apart and
    /// lifts.
    fn gesture(&mut self, from: Point, to: Point, steps: usize, step_ms: i64) {
        self.dispatch(MotionEvent::down(self.clock_ms, 0, from.x, from.y));
        for i in 1..=steps {
            self.clock_ms += step_ms;
            let t = i as f32 / steps as f32;
            let x = from.x + (to.x - from.x) * t;
            let y = from.y + (to.y - from.y) * t;
            self.dispatch(MotionEvent::move_to(self.clock_ms, 0, x, y));
        }
        self.clock_ms += step_ms;
        self.dispatch(MotionEvent::up(self.clock_ms, 0, to.x, to.y));
    }

    fn tap(&mut self, at: Point) {
        self.gesture(at, at, 0, FRAME_MS);
    }

    fn wheel(&mut self, vscroll: f32) {
        let event = MotionEvent::scroll(self.clock_ms, WIDTH / 2.0, HEIGHT / 2.0, vscroll);
        self.controller
            .on_generic_motion(&mut self.stack, &mut self.events, &event);
    }

    /// Pumps frames until nothing animates and returns how many it took.
    fn settle(&mut self) -> usize {
        let mut frames = 0;
        loop {
            self.clock_ms += FRAME_MS;
            frames += 1;
            let frame_time_nanos = self.clock_ms as u64 * 1_000_000;
            if !self
                .controller
                .tick(&mut self.stack, &mut self.events, frame_time_nanos)
                || frames >= 1_000
            {
                return frames;
            }
        }
    }

    fn report(&mut self, scene: &str) {
        let frames = self.settle();
        let labels: Vec<&str> = self
            .stack
            .stack()
            .stack_items()
            .map(|item| item.label.as_str())
            .collect();
        println!("--- {scene} ---");
        println!(
            "  settled after {frames} frames, scroll {:.3}, cards {labels:?}",
            self.stack.scroll_p()
        );
        for event in self.events.drain() {
            match event {
                StackEvent::ItemDismissed { item, .. } => println!("  dismissed {item}"),
                StackEvent::ScrollChanged { .. } => {}
                other => println!("  {other:?}"),
            }
        }
    }

    fn front_card_center(&self) -> Option<Point> {
        let front = self.stack.stack().stack_items().next_back()?;
        self.stack
            .view(front.id)
            .map(|view| view.screen_rect().center())
    }
}

fn main() {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Card Stack Gesture Replay ===");
    println!("Window {WIDTH}x{HEIGHT} at density {DENSITY}");
    println!();

    let mut window = Window::new();
    window.report("initial layout");

    if let Some(center) = window.front_card_center() {
        window.gesture(center, Point::new(center.x + 500.0, center.y), 8, FRAME_MS);
        window.report("flick the front card away");
    }

    window.gesture(Point::new(540.0, 480.0), Point::new(540.0, 1180.0), 10, FRAME_MS);
    window.report("fling the stack towards the back");

    if let Some(center) = window.front_card_center() {
        window.gesture(center, Point::new(center.x + 200.0, center.y), 4, 50);
        window.report("short slow swipe snaps back");
    }

    window.wheel(1.0);
    window.wheel(1.0);
    window.report("two wheel notches");

    window.tap(Point::new(540.0, 200.0));
    window.report("tap the docked band");

    window.tap(Point::new(20.0, 460.0));
    window.report("tap the background");

    log::info!(
        "replay finished with {} cards left",
        window.stack.stack().stack_items().count()
    );
}
