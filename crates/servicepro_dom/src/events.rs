//! Event dispatch system
//!
//! Document-level listeners, the way the site scripts attach handlers to
//! `document`: every handler registered for an event type sees every event of
//! that type and decides from `event.target` whether it cares.

use rustc_hash::FxHashMap;

use crate::document::ElementId;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const CLICK: EventType = 1;
}

/// A page event
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: ElementId,
    pub propagation_stopped: bool,
}

impl Event {
    pub fn new(event_type: EventType, target: ElementId) -> Self {
        Self {
            event_type,
            target,
            propagation_stopped: false,
        }
    }

    pub fn click(target: ElementId) -> Self {
        Self::new(event_types::CLICK, target)
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Event handler function type
///
/// `C` is whatever mutable page state the handlers operate on.
pub type EventHandler<C> = Box<dyn Fn(&mut C, &mut Event)>;

/// Dispatches events to registered handlers
pub struct EventDispatcher<C> {
    handlers: FxHashMap<EventType, Vec<EventHandler<C>>>,
}

impl<C> EventDispatcher<C> {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register a document-level handler for an event type
    pub fn register<F>(&mut self, event_type: EventType, handler: F)
    where
        F: Fn(&mut C, &mut Event) + 'static,
    {
        self.handlers
            .entry(event_type)
            .or_default()
            .push(Box::new(handler));
    }

    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers.get(&event_type).map_or(0, Vec::len)
    }

    /// Dispatch an event to all registered handlers, in registration order
    pub fn dispatch(&self, ctx: &mut C, event: &mut Event) {
        if let Some(handlers) = self.handlers.get(&event.event_type) {
            for handler in handlers {
                if event.propagation_stopped {
                    break;
                }
                handler(ctx, event);
            }
        }
    }
}

impl<C> Default for EventDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}
