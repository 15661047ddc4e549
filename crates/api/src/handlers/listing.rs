//! Handlers for the `/listings` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{Map, Value};
use tidings_core::keys::{ADMIN_NOTICE_NEW_LISTING, ARG_JOB};
use tidings_core::listing::{validate_title, Listing};
use tidings_events::NotificationQueue;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /listings
///
/// Accepts a submitted listing, assigns it an id and schedules the admin
/// notice for the end of the request.
pub async fn create_listing(
    State(state): State<AppState>,
    Extension(queue): Extension<NotificationQueue>,
    Json(mut listing): Json<Listing>,
) -> AppResult<(StatusCode, Json<DataResponse<Listing>>)> {
    validate_title(&listing.title)?;

    listing.title = listing.title.trim().to_string();
    listing.id = Some(state.next_listing_id());
    listing.submitted_at.get_or_insert_with(chrono::Utc::now);

    let job = serde_json::to_value(&listing).map_err(|e| AppError::InternalError(e.to_string()))?;
    let mut args = Map::new();
    args.insert(ARG_JOB.to_string(), job);
    queue.schedule(ADMIN_NOTICE_NEW_LISTING, Value::Object(args));

    tracing::info!(listing_id = ?listing.id, title = %listing.title, "Listing submitted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}
