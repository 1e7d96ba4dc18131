//! Typed, synchronous pub/sub channels.
//!
//! `trigger` calls every handler registered at the time of the call, in
//! registration order. There is no buffering: a trigger with no subscribers
//! is dropped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Identifies a registered handler for [`Channel::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<T> = Rc<dyn Fn(&T)>;

/// A single named event channel carrying payloads of type `T`.
pub struct Channel<T> {
    name: &'static str,
    handlers: RefCell<Vec<(HandlerId, Handler<T>)>>,
    next_id: Cell<u64>,
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("handlers", &self.handlers.borrow().len())
            .finish()
    }
}

impl<T> Channel<T> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Subscribe a handler.
    pub fn on(&self, handler: impl Fn(&T) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Unsubscribe. Returns `false` if the handler was not registered.
    pub fn off(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(h, _)| *h != id);
        handlers.len() != before
    }

    /// Fire synchronously to all current subscribers.
    ///
    /// Handlers may subscribe or unsubscribe while running; changes apply
    /// from the next trigger.
    pub fn trigger(&self, payload: &T) {
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        tracing::trace!(channel = self.name, subscribers = snapshot.len(), "trigger");
        for handler in snapshot {
            handler(payload);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub(crate) fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_reaches_all_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let channel: Channel<u32> = Channel::new("numbers");
        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            channel.on(move |n| seen.borrow_mut().push(format!("{tag}{n}")));
        }
        channel.trigger(&7);
        assert_eq!(*seen.borrow(), vec!["a7", "b7"]);
    }

    #[test]
    fn test_off_stops_delivery() {
        let count = Rc::new(Cell::new(0));
        let channel: Channel<()> = Channel::new("unit");
        let c = Rc::clone(&count);
        let id = channel.on(move |()| c.set(c.get() + 1));
        channel.trigger(&());
        assert!(channel.off(id));
        assert!(!channel.off(id));
        channel.trigger(&());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_handler_may_unsubscribe_itself() {
        let channel: Rc<Channel<()>> = Rc::new(Channel::new("self"));
        let slot: Rc<Cell<Option<HandlerId>>> = Rc::new(Cell::new(None));
        let (ch, sl) = (Rc::clone(&channel), Rc::clone(&slot));
        let id = channel.on(move |()| {
            if let Some(id) = sl.get() {
                ch.off(id);
            }
        });
        slot.set(Some(id));
        channel.trigger(&());
        assert_eq!(channel.subscriber_count(), 0);
    }
}
