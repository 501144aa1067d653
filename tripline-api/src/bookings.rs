use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use tripline_core::booking::{BookingHistoryEntry, CreateBookingRequest};
use tripline_order::{build_view, BookingError, BookingView};

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingResponse {
    success: bool,
    booking_id: Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/booking/create", post(create_booking))
        .route("/bookings", get(list_bookings))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/cancel", post(cancel_booking))
}

/// POST /booking/create
async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, ApiError> {
    let user_id = claims.user_id()?;
    let booking_id = state.writer.create(user_id, &req).await?;

    info!(%booking_id, %user_id, "booking accepted");
    Ok(Json(CreateBookingResponse {
        success: true,
        booking_id,
    }))
}

/// GET /bookings returns the authenticated user's bookings, newest first.
async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = claims.user_id()?;
    let records = state
        .bookings
        .list_for_user(user_id)
        .await
        .map_err(BookingError::from)?;

    let views: Vec<BookingView> = records.iter().map(build_view).collect();
    Ok(Json(json!({ "success": true, "bookings": views })))
}

/// GET /bookings/:id, detail with the full status trail. Owner or manager.
async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = claims.user_id()?;
    let record = state
        .bookings
        .get(booking_id)
        .await
        .map_err(BookingError::from)?
        .ok_or(BookingError::BookingNotFound)?;

    if record.booking.user_id != user_id && !claims.is_manager() {
        return Err(BookingError::Forbidden.into());
    }

    let history: Vec<BookingHistoryEntry> = state
        .bookings
        .history(booking_id)
        .await
        .map_err(BookingError::from)?;

    Ok(Json(json!({
        "success": true,
        "booking": build_view(&record),
        "history": history,
    })))
}

/// POST /bookings/:id/cancel, owner-initiated cancellation.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = claims.user_id()?;
    state.status.cancel_own(user_id, booking_id).await?;
    Ok(Json(json!({ "success": true })))
}
