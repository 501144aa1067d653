use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tripline_order::BookingError;

#[derive(Debug)]
pub enum ApiError {
    Booking(BookingError),
    AuthenticationError(String),
    AuthorizationError(String),
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}

fn booking_status(err: &BookingError) -> StatusCode {
    match err {
        BookingError::TargetRequired
        | BookingError::TargetAmbiguous
        | BookingError::TravelersOutOfRange { .. }
        | BookingError::SeatCountMismatch { .. }
        | BookingError::InvalidSeatLabel(_)
        | BookingError::DuplicateSeat(_)
        | BookingError::SeatOutsideMap(_)
        | BookingError::DepartureCityRequired
        | BookingError::DepartureCityNotServed(_)
        | BookingError::ItemUnavailable => StatusCode::BAD_REQUEST,
        BookingError::ItemNotFound | BookingError::BookingNotFound => StatusCode::NOT_FOUND,
        BookingError::SeatConflict { .. } | BookingError::InvalidTransition { .. } => {
            StatusCode::CONFLICT
        }
        BookingError::Forbidden => StatusCode::FORBIDDEN,
        BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Booking(err) => {
                let status = booking_status(&err);
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Internal Server Error: {:?}", err);
                    // Detail stays in the log.
                    (status, "INTERNAL", "Внутренняя ошибка сервера".to_string())
                } else {
                    (status, err.code(), err.to_string())
                }
            }
            ApiError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, "AUTH_REQUIRED", msg),
            ApiError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
        };

        let body = Json(json!({
            "success": false,
            "code": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}
