use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use tripline_offer::ItemRef;
use tripline_order::BookingError;

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights/{id}/seats", get(flight_seats))
        .route("/flights/{id}/price", get(flight_price))
        .route("/tours/{id}/price", get(tour_price))
}

/// GET /flights/:id/seats returns the cabin layout plus currently occupied
/// labels, for the seat picker.
async fn flight_seats(
    State(state): State<AppState>,
    Path(flight_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let flight = state
        .catalog
        .get_flight(flight_id)
        .await
        .map_err(BookingError::from)?
        .ok_or(BookingError::ItemNotFound)?;

    let map = flight.seat_map();
    let occupied = state
        .catalog
        .occupied_seats(flight_id)
        .await
        .map_err(BookingError::from)?;

    Ok(Json(json!({
        "success": true,
        "totalSeats": map.total_seats,
        "rows": map.rows,
        "seats": map.labels(),
        "occupied": occupied,
    })))
}

/// GET /flights/:id/price, the effective price for the authenticated user.
/// The same computation backs the booking total, so the displayed price
/// never drifts from the charged one.
async fn flight_price(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(flight_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = claims.user_id()?;
    let flight = state
        .catalog
        .get_flight(flight_id)
        .await
        .map_err(BookingError::from)?
        .ok_or(BookingError::ItemNotFound)?;

    let item = ItemRef::Flight {
        id: flight_id,
        airline: flight.airline.clone(),
    };
    let quote = state.writer.quote(user_id, flight.price_cents, &item).await?;
    Ok(Json(json!({ "success": true, "quote": quote })))
}

/// GET /tours/:id/price
async fn tour_price(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(tour_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = claims.user_id()?;
    let tour = state
        .catalog
        .get_tour(tour_id)
        .await
        .map_err(BookingError::from)?
        .ok_or(BookingError::ItemNotFound)?;

    let quote = state
        .writer
        .quote(user_id, tour.price_cents, &ItemRef::Tour(tour_id))
        .await?;
    Ok(Json(json!({ "success": true, "quote": quote })))
}
