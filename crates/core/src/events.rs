//! Pointer event fan-out for room parts and furniture

use crate::types::{PointerEvent, PointerKind, DOUBLE_CLICK_MS};

/// Boxed pointer callback.
pub type Handler<E> = Box<dyn FnMut(&E)>;

const KINDS: usize = 6;

fn slot(kind: PointerKind) -> usize {
    match kind {
        PointerKind::Down => 0,
        PointerKind::Up => 1,
        PointerKind::Move => 2,
        PointerKind::Out => 3,
        PointerKind::Over => 4,
        PointerKind::DoubleClick => 5,
    }
}

/// One optional handler per pointer kind.
///
/// Setting a handler replaces the previous one for that kind.
pub struct EventManager<E = PointerEvent> {
    handlers: [Option<Handler<E>>; KINDS],
    last_down_ms: Option<u64>,
}

impl<E> Default for EventManager<E> {
    fn default() -> Self {
        Self {
            handlers: [None, None, None, None, None, None],
            last_down_ms: None,
        }
    }
}

impl<E> std::fmt::Debug for EventManager<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set: Vec<usize> = (0..KINDS).filter(|&i| self.handlers[i].is_some()).collect();
        f.debug_struct("EventManager")
            .field("handlers", &set)
            .field("last_down_ms", &self.last_down_ms)
            .finish()
    }
}

impl<E> EventManager<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_handler(&mut self, kind: PointerKind, handler: impl FnMut(&E) + 'static) {
        self.handlers[slot(kind)] = Some(Box::new(handler));
    }

    pub fn clear_handler(&mut self, kind: PointerKind) {
        self.handlers[slot(kind)] = None;
    }

    pub fn has_handler(&self, kind: PointerKind) -> bool {
        self.handlers[slot(kind)].is_some()
    }

    /// Call the handler for `kind`, if any. Returns whether one ran.
    pub fn emit(&mut self, kind: PointerKind, event: &E) -> bool {
        match self.handlers[slot(kind)].as_mut() {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    /// Emit `Down`, plus `DoubleClick` when the previous down was recent.
    pub fn handle_pointer_down(&mut self, event: &E, now_ms: u64) {
        self.emit(PointerKind::Down, event);
        match self.last_down_ms {
            Some(last) if now_ms.saturating_sub(last) <= DOUBLE_CLICK_MS => {
                self.emit(PointerKind::DoubleClick, event);
                self.last_down_ms = None;
            }
            _ => self.last_down_ms = Some(now_ms),
        }
    }
}

/// Room-level handler sets, one per part category.
#[derive(Debug, Default)]
pub struct RoomEvents {
    /// Tiles, stairs and the door tile.
    pub tiles: EventManager<PointerEvent>,
    /// Walls have no handlers by default.
    pub walls: EventManager<PointerEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TilePosition;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event() -> PointerEvent {
        PointerEvent {
            position: TilePosition::new(1, 2, 0),
            dragging: false,
        }
    }

    #[test]
    fn emit_reaches_registered_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut events = EventManager::new();
        let sink = seen.clone();
        events.set_handler(PointerKind::Over, move |e: &PointerEvent| {
            sink.borrow_mut().push(e.position)
        });
        assert!(events.emit(PointerKind::Over, &event()));
        assert!(!events.emit(PointerKind::Out, &event()));
        assert_eq!(*seen.borrow(), vec![TilePosition::new(1, 2, 0)]);
    }

    #[test]
    fn two_quick_downs_make_a_double_click() {
        let count = Rc::new(RefCell::new(0));
        let mut events = EventManager::new();
        let c = count.clone();
        events.set_handler(PointerKind::DoubleClick, move |_: &PointerEvent| {
            *c.borrow_mut() += 1
        });
        events.handle_pointer_down(&event(), 1000);
        events.handle_pointer_down(&event(), 1200);
        assert_eq!(*count.borrow(), 1);
        // A third press starts a new pair.
        events.handle_pointer_down(&event(), 1300);
        assert_eq!(*count.borrow(), 1);
        events.handle_pointer_down(&event(), 2000);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn replacing_and_clearing_handlers() {
        let mut events: EventManager = EventManager::new();
        events.set_handler(PointerKind::Down, |_| {});
        assert!(events.has_handler(PointerKind::Down));
        events.clear_handler(PointerKind::Down);
        assert!(!events.has_handler(PointerKind::Down));
    }
}
