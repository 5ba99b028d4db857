use std::sync::Arc;

use crate::db::EventStore;

/// Shared across handlers. Cloning only bumps the store's reference count.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new<S>(store: S) -> Self
    where
        S: EventStore + 'static,
    {
        Self {
            store: Arc::new(store),
        }
    }
}
