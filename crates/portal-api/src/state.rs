//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use notifier::NotifyClient;
use storage::ObjectStore;

use crate::events::ChatHub;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Document store (failover-composed at startup).
    pub store: Arc<dyn ObjectStore>,
    /// Messaging-bot relay client.
    pub notifier: NotifyClient,
    /// Live chat push hub.
    pub chat: ChatHub,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        store: Arc<dyn ObjectStore>,
        notifier: NotifyClient,
        chat: ChatHub,
    ) -> Self {
        Self {
            db,
            store,
            notifier,
            chat,
        }
    }
}
