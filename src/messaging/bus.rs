use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Receives raw payloads addressed to one participant. Must not block.
pub trait MessageHandler: Send + Sync {
    fn deliver(&self, message: String);
}

pub type DynHandler = Arc<dyn MessageHandler>;

/// Name-addressed, best-effort delivery.
///
/// `send` hands the payload to the registered handler synchronously and reports whether
/// anyone was listening. Unknown names are dropped silently; there is no retry and no
/// ordering guarantee between different senders.
#[derive(Default)]
pub struct MessageBus {
    handlers: RwLock<HashMap<String, DynHandler>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous handler.
    pub fn register(&self, name: impl Into<String>, handler: DynHandler) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), handler);
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn participants(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Returns false when nobody is registered under `name`.
    pub fn send(&self, name: &str, message: String) -> bool {
        // clone the handler out so delivery runs without the registry lock
        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        match handler {
            Some(handler) => {
                handler.deliver(message);
                true
            }
            None => false,
        }
    }
}
