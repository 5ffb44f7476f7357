use std::sync::Arc;

use crate::core::Config;
use crate::events::{EventDispatcher, EventId, EventQueue};
use crate::listeners::ListenerRef;

use super::runtime::Runtime;

/// Builder for constructing a [`Runtime`] with its initial listeners.
pub struct RuntimeBuilder {
    cfg: Config,
    listeners: Vec<(EventId, ListenerRef)>,
}

impl RuntimeBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            listeners: Vec::new(),
        }
    }

    /// Registers `listener` under `id` at build time.
    ///
    /// Registration order is invocation order, across repeated calls too.
    pub fn with_listener(mut self, id: EventId, listener: ListenerRef) -> Self {
        self.listeners.push((id, listener));
        self
    }

    /// Registers the same listener under several ids.
    pub fn with_listener_for(mut self, ids: &[EventId], listener: ListenerRef) -> Self {
        for id in ids {
            self.listeners.push((*id, Arc::clone(&listener)));
        }
        self
    }

    /// Builds the runtime.
    ///
    /// Creates the queue and the dispatcher and registers every listener.
    /// Nothing runs until [`Runtime::run`] or [`Runtime::run_until`].
    pub fn build(self) -> Runtime {
        let queue = Arc::new(EventQueue::new());
        let dispatcher = Arc::new(EventDispatcher::new(Arc::clone(&queue)));
        for (id, listener) in self.listeners {
            dispatcher.listen(id, listener);
        }
        Runtime::new_internal(self.cfg, queue, dispatcher)
    }
}
