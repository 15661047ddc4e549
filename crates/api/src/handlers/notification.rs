//! Handlers for the `/notifications` resource.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing registered notifications.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotificationsParams {
    /// Only return entries whose enablement resolves to `true`.
    #[serde(default)]
    pub enabled_only: bool,
}

/// A registry entry as exposed over HTTP.
#[derive(Debug, Serialize)]
pub struct NotificationEntry {
    pub key: String,
    pub name: String,
    pub handler: String,
    pub default_enabled: bool,
}

/// GET /notifications
///
/// Lists the registry entries that survive registration hooks and
/// validation, in registration order.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<ListNotificationsParams>,
) -> Json<DataResponse<Vec<NotificationEntry>>> {
    let data = state
        .dispatcher
        .list_entries(params.enabled_only)
        .into_values()
        .map(|entry| NotificationEntry {
            key: entry.key,
            name: entry.name,
            handler: entry.handler,
            default_enabled: entry.default_enabled,
        })
        .collect();

    Json(DataResponse { data })
}
