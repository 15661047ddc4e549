use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tidings_core::types::DbId;
use tidings_events::Dispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Flushes each request's deferred notifications.
    pub dispatcher: Arc<Dispatcher>,
    listing_ids: Arc<AtomicI64>,
}

impl AppState {
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            listing_ids: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Allocate the next listing id. Ids start at 1.
    pub fn next_listing_id(&self) -> DbId {
        self.listing_ids.fetch_add(1, Ordering::Relaxed) + 1
    }
}
