//! Event bus
//!
//! Name-keyed synchronous publish/subscribe between systems. The collision
//! detector publishes, the responder subscribes, and neither knows the
//! other exists. The bus is an explicit value owned by the game loop and
//! passed by reference; there is no global registry of listeners.
//!
//! Handlers run in registration order and may mutate entity state in
//! place. A handler cannot call back into the bus; instead it publishes
//! follow-up events through the [`EventWriter`] it receives, and the bus
//! drains them FIFO once the current handler chain returns.

use std::collections::{HashMap, VecDeque};
use crate::entity::Registry;

/// Event name for world-edge violations.
pub const BORDER_EVENT: &str = "border";
/// Event name for entity-entity overlaps.
pub const COLLISION_EVENT: &str = "collision";

/// Which world edge a border event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// A bus message. Events carry entity ids, not references; handlers must
/// re-check liveness through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// An entity's collision area crossed a world edge.
    Border { entity: u32, side: BorderSide },
    /// Two entities' collision areas overlap. `entity` is the one the
    /// detector was scanning; `with` is the one it hit.
    Collision { entity: u32, with: u32 },
}

impl Event {
    /// The name handlers subscribe under.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Border { .. } => BORDER_EVENT,
            Event::Collision { .. } => COLLISION_EVENT,
        }
    }
}

/// Collects events published from inside a handler. Drained by the bus
/// after the current handler chain completes.
#[derive(Default)]
pub struct EventWriter {
    queued: Vec<Event>,
}

impl EventWriter {
    /// Queue a follow-up event for FIFO dispatch.
    pub fn publish(&mut self, event: Event) {
        self.queued.push(event);
    }
}

/// A handler invoked for every event published under its name.
pub type EventHandler = Box<dyn FnMut(&mut Registry, &Event, &mut EventWriter)>;

/// Name-keyed synchronous dispatcher.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<&'static str, Vec<EventHandler>>,
    queue: VecDeque<Event>,
    draining: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the ordered list for `name`.
    pub fn add_handler(&mut self, name: &'static str, handler: EventHandler) {
        self.listeners.entry(name).or_default().push(handler);
    }

    /// Dispatch `event` to every handler registered under its name, in
    /// registration order. Unknown names are a no-op. Events published by
    /// handlers are drained FIFO before this call returns.
    pub fn notify(&mut self, world: &mut Registry, event: Event) {
        self.queue.push_back(event);
        if self.draining {
            // already inside a drain further up the stack; it will pick
            // this event up in order
            return;
        }
        self.draining = true;
        while let Some(current) = self.queue.pop_front() {
            let mut writer = EventWriter::default();
            if let Some(handlers) = self.listeners.get_mut(current.name()) {
                for handler in handlers.iter_mut() {
                    handler(world, &current, &mut writer);
                }
            }
            self.queue.extend(writer.queued);
        }
        self.draining = false;
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_handler(log: &Rc<RefCell<Vec<String>>>, label: &'static str) -> EventHandler {
        let log = Rc::clone(log);
        Box::new(move |_, event, _| {
            log.borrow_mut().push(format!("{}:{}", label, event.name()));
        })
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let mut world = Registry::new();
        bus.add_handler(BORDER_EVENT, recording_handler(&log, "first"));
        bus.add_handler(BORDER_EVENT, recording_handler(&log, "second"));

        bus.notify(
            &mut world,
            Event::Border {
                entity: 0,
                side: BorderSide::Left,
            },
        );

        assert_eq!(*log.borrow(), vec!["first:border", "second:border"]);
    }

    #[test]
    fn test_unknown_name_is_noop() {
        let mut bus = EventBus::new();
        let mut world = Registry::new();
        // no handlers registered at all
        bus.notify(&mut world, Event::Collision { entity: 0, with: 1 });
    }

    #[test]
    fn test_clear_drops_registrations() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let mut world = Registry::new();
        bus.add_handler(COLLISION_EVENT, recording_handler(&log, "h"));
        bus.clear();

        bus.notify(&mut world, Event::Collision { entity: 0, with: 1 });
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_handler_published_events_drain_fifo() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let mut world = Registry::new();

        // the first collision handler publishes a border event; it must
        // not run until the rest of the collision chain has finished
        let relay_log = Rc::clone(&log);
        bus.add_handler(
            COLLISION_EVENT,
            Box::new(move |_, _, writer| {
                relay_log.borrow_mut().push("collision-a".to_string());
                writer.publish(Event::Border {
                    entity: 7,
                    side: BorderSide::Top,
                });
            }),
        );
        bus.add_handler(COLLISION_EVENT, recording_handler(&log, "collision-b"));
        bus.add_handler(BORDER_EVENT, recording_handler(&log, "border"));

        bus.notify(&mut world, Event::Collision { entity: 0, with: 1 });

        assert_eq!(
            *log.borrow(),
            vec!["collision-a", "collision-b:collision", "border:border"]
        );
    }

    #[test]
    fn test_handler_mutates_registry() {
        let mut bus = EventBus::new();
        let mut world = Registry::new();
        let id = world.create("target").id();

        bus.add_handler(
            BORDER_EVENT,
            Box::new(|world, event, _| {
                if let Event::Border { entity, .. } = event {
                    world.delete(*entity);
                }
            }),
        );

        bus.notify(
            &mut world,
            Event::Border {
                entity: id,
                side: BorderSide::Right,
            },
        );
        assert!(world.get(id).is_none());
    }
}
