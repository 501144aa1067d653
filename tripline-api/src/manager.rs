use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use tripline_core::booking::BookingStatus;
use tripline_order::{build_view, BookingError, BookingView};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ListFilter {
    status: Option<BookingStatus>,
}

#[derive(Debug, Deserialize)]
struct SetStatusRequest {
    status: BookingStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/manager/bookings", get(list_all_bookings))
        .route("/manager/bookings/{id}/status", post(set_status))
}

/// GET /manager/bookings, cross-user listing with an optional
/// ?status= filter.
async fn list_all_bookings(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let records = state
        .bookings
        .list_all(filter.status)
        .await
        .map_err(BookingError::from)?;

    let views: Vec<BookingView> = records.iter().map(build_view).collect();
    Ok(Json(json!({ "success": true, "bookings": views })))
}

/// POST /manager/bookings/:id/status, sets Отменено or Завершено.
async fn set_status(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.status.manager_transition(booking_id, req.status).await?;
    Ok(Json(json!({ "success": true })))
}
