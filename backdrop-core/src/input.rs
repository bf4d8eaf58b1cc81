/// Platform-neutral input events and handler registration
///
/// Front-ends translate native events (DOM, terminal) into `InputEvent`s and
/// dispatch them through an `InputSource`, so the same handlers run in the
/// browser, in the terminal preview and in tests.
use std::collections::HashMap;

use crate::viewport::{Rect, Viewport};

/// Clickable page controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MenuToggle,
    CloseMenu,
    NavLink,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove { client_x: f32, client_y: f32 },
    /// The page scrolled; carries the skills section's current bounding box
    Scroll { section: Rect },
    Resize { viewport: Viewport, device_pixel_ratio: f32 },
    Click(Control),
}

/// Event names handlers are registered against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    Scroll,
    Resize,
    Click,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::PointerMove { .. } => EventKind::PointerMove,
            InputEvent::Scroll { .. } => EventKind::Scroll,
            InputEvent::Resize { .. } => EventKind::Resize,
            InputEvent::Click(_) => EventKind::Click,
        }
    }
}

/// Handler invoked with the target state, the event and the current time
pub type Handler<S> = fn(&mut S, &InputEvent, f64);

/// Routes events to the handlers registered for their kind
pub struct InputSource<S> {
    handlers: HashMap<EventKind, Vec<Handler<S>>>,
}

impl<S> InputSource<S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn on(&mut self, kind: EventKind, handler: Handler<S>) -> &mut Self {
        self.handlers.entry(kind).or_default().push(handler);
        self
    }

    pub fn listens_to(&self, kind: EventKind) -> bool {
        self.handlers.get(&kind).is_some_and(|handlers| !handlers.is_empty())
    }

    /// Run every handler for the event's kind, in registration order.
    ///
    /// Returns the number of handlers run; events nobody listens to are
    /// dropped.
    pub fn dispatch(&self, state: &mut S, event: &InputEvent, now: f64) -> usize {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            return 0;
        };
        for handler in handlers {
            handler(state, event, now);
        }
        handlers.len()
    }
}

impl<S> Default for InputSource<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        clicks: Vec<Control>,
        moves: usize,
    }

    fn count_click(counter: &mut Counter, event: &InputEvent, _now: f64) {
        if let InputEvent::Click(control) = event {
            counter.clicks.push(*control);
        }
    }

    fn count_move(counter: &mut Counter, _event: &InputEvent, _now: f64) {
        counter.moves += 1;
    }

    #[test]
    fn test_dispatch_by_kind() {
        let mut source = InputSource::<Counter>::new();
        source
            .on(EventKind::Click, count_click)
            .on(EventKind::PointerMove, count_move);

        let mut counter = Counter::default();
        assert_eq!(source.dispatch(&mut counter, &InputEvent::Click(Control::NavLink), 0.0), 1);
        source.dispatch(
            &mut counter,
            &InputEvent::PointerMove {
                client_x: 1.0,
                client_y: 2.0,
            },
            0.0,
        );
        assert_eq!(
            source.dispatch(&mut counter, &InputEvent::Scroll { section: Rect::default() }, 0.0),
            0
        );

        assert_eq!(counter.clicks, vec![Control::NavLink]);
        assert_eq!(counter.moves, 1);
        assert!(!source.listens_to(EventKind::Resize));
    }
}
