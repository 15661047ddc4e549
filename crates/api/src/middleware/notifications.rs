//! Per-request notification cycle.
//!
//! Each request gets its own [`NotificationQueue`], reachable from handlers
//! through `Extension<NotificationQueue>`. When the inner service has
//! produced a response (success, error, timeout or caught panic) the queue is
//! drained and dispatched on a blocking task before the response is returned.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tidings_events::NotificationQueue;

use crate::state::AppState;

/// Axum middleware that runs one notification cycle per request.
///
/// Install with `axum::middleware::from_fn_with_state`, outside the timeout
/// and panic-catching layers.
pub async fn notification_cycle(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let queue = NotificationQueue::new();
    request.extensions_mut().insert(queue.clone());

    let response = next.run(request).await;

    let pending = queue.drain();
    if pending.is_empty() {
        return response;
    }

    let count = pending.len();
    let dispatcher = Arc::clone(&state.dispatcher);
    if let Err(e) = tokio::task::spawn_blocking(move || dispatcher.dispatch_all(pending)).await {
        tracing::error!(error = %e, count, "Notification flush task failed");
    }

    response
}
