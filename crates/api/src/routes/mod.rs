pub mod health;
pub mod listing;
pub mod notification;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /listings                   create (POST)
/// /notifications              list registry entries (GET, ?enabled_only=bool)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/listings", listing::router())
        .nest("/notifications", notification::router())
}
