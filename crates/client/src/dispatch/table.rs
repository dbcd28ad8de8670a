#![forbid(unsafe_code)]

use super::Dispatcher;
use crate::DispatchError;
use crate::protocol::Inbound;
use std::collections::HashMap;

pub type Handler = fn(&mut Dispatcher, &Inbound) -> Result<(), DispatchError>;

/// Exact-name command table. Later registrations replace earlier ones.
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<&'static str, Handler>,
}

impl HandlerTable {
    pub fn insert(&mut self, name: &'static str, handler: Handler) -> Option<Handler> {
        self.handlers.insert(name, handler)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// First candidate with a registered handler, in candidate order.
    pub fn resolve<'c>(&self, candidates: &'c [String]) -> Option<(&'c str, Handler)> {
        candidates.iter().find_map(|name| {
            self.handlers
                .get(name.as_str())
                .map(|handler| (name.as_str(), *handler))
        })
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerTable").field("commands", &names).finish()
    }
}
