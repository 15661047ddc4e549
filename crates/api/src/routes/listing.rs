//! Route definitions for the `/listings` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::listing;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// POST   /                          -> create_listing
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(listing::create_listing))
}
