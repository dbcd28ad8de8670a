#![forbid(unsafe_code)]

use crate::Uuid;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartEvent {
    ClassAdded(Uuid),
    ClassUpdated(Uuid),
    DifferentialAdded(Uuid),
    StructlineAdded(Uuid),
    ExtensionAdded(Uuid),
    EdgeAdded(Uuid),
    EdgeUpdated(Uuid),
    NodeAdded(usize),
    Update,
}

impl ChartEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::ClassAdded(_) => "class-added",
            Self::ClassUpdated(_) => "class-updated",
            Self::DifferentialAdded(_) => "differential-added",
            Self::StructlineAdded(_) => "structline-added",
            Self::ExtensionAdded(_) => "extension-added",
            Self::EdgeAdded(_) => "edge-added",
            Self::EdgeUpdated(_) => "edge-updated",
            Self::NodeAdded(_) => "node-added",
            Self::Update => "update",
        }
    }
}

pub type Listener = Box<dyn FnMut(&ChartEvent)>;

/// Synchronous observer registry. Listeners run in registration order.
#[derive(Default)]
pub struct EventBus {
    by_name: HashMap<String, Vec<Listener>>,
    all: Vec<Listener>,
}

impl EventBus {
    pub fn on(&mut self, name: &str, listener: impl FnMut(&ChartEvent) + 'static) {
        self.by_name
            .entry(name.to_string())
            .or_default()
            .push(Box::new(listener));
    }

    pub fn subscribe_all(&mut self, listener: impl FnMut(&ChartEvent) + 'static) {
        self.all.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.all.len() + self.by_name.values().map(Vec::len).sum::<usize>()
    }

    pub(crate) fn emit(&mut self, event: ChartEvent) {
        if let Some(listeners) = self.by_name.get_mut(event.name()) {
            for listener in listeners.iter_mut() {
                listener(&event);
            }
        }
        for listener in self.all.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
