//! In-process message bus.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use huepick_core::service::{ListenerHandle, MessageBus, PickerEvent};

#[derive(Debug, Default)]
struct BusState {
    next_id: u64,
    listeners: BTreeSet<ListenerHandle>,
    published: Vec<PickerEvent>,
}

/// A [`MessageBus`] that keeps every published event for inspection.
///
/// Clones share state, so a host can keep one clone while the session owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct LocalBus {
    state: Rc<RefCell<BusState>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live registrations.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn is_registered(&self, handle: ListenerHandle) -> bool {
        self.state.borrow().listeners.contains(&handle)
    }

    /// Every event published so far, oldest first.
    pub fn published(&self) -> Vec<PickerEvent> {
        self.state.borrow().published.clone()
    }
}

impl MessageBus for LocalBus {
    fn subscribe(&mut self) -> ListenerHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = ListenerHandle::new(state.next_id);
        state.listeners.insert(handle);
        handle
    }

    fn unsubscribe(&mut self, handle: ListenerHandle) {
        if !self.state.borrow_mut().listeners.remove(&handle) {
            tracing::debug!(listener = handle.id(), "unsubscribe for unknown listener ignored");
        }
    }

    fn publish(&mut self, event: &PickerEvent) {
        self.state.borrow_mut().published.push(event.clone());
    }
}
