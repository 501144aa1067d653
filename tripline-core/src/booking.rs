use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Booking lifecycle states. The Russian strings are the wire and storage
/// values the clients already speak; the enum keeps them typed in-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "Активно")]
    Active,
    #[serde(rename = "Отменено")]
    Cancelled,
    #[serde(rename = "Завершено")]
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Active => "Активно",
            BookingStatus::Cancelled => "Отменено",
            BookingStatus::Completed => "Завершено",
        };
        f.write_str(s)
    }
}

impl FromStr for BookingStatus {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Активно" => Ok(BookingStatus::Active),
            "Отменено" => Ok(BookingStatus::Cancelled),
            "Завершено" => Ok(BookingStatus::Completed),
            other => Err(crate::CoreError::InternalError(format!(
                "unknown booking status: {}",
                other
            ))),
        }
    }
}

/// How a tour traveler gets to the departure point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transportation {
    /// Traveler arranges their own transport.
    #[serde(rename = "self")]
    SelfArranged,
    /// Company transfer from a supported departure city.
    Company,
}

/// What a booking is for. Exactly one of the two, by construction; the
/// persistence layer maps this to a pair of nullable columns at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum BookingTarget {
    Tour(Uuid),
    Flight(Uuid),
}

impl BookingTarget {
    pub fn tour_id(&self) -> Option<Uuid> {
        match self {
            BookingTarget::Tour(id) => Some(*id),
            BookingTarget::Flight(_) => None,
        }
    }

    pub fn flight_id(&self) -> Option<Uuid> {
        match self {
            BookingTarget::Tour(_) => None,
            BookingTarget::Flight(id) => Some(*id),
        }
    }

    pub fn is_flight(&self) -> bool {
        matches!(self, BookingTarget::Flight(_))
    }

    /// Rebuild the tagged form from the two nullable columns.
    pub fn from_columns(
        tour_id: Option<Uuid>,
        flight_id: Option<Uuid>,
    ) -> Result<Self, crate::CoreError> {
        match (tour_id, flight_id) {
            (Some(t), None) => Ok(BookingTarget::Tour(t)),
            (None, Some(f)) => Ok(BookingTarget::Flight(f)),
            _ => Err(crate::CoreError::InternalError(
                "booking row must reference exactly one of tour/flight".to_string(),
            )),
        }
    }
}

/// Raw client payload for POST /booking/create.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub tour_id: Option<Uuid>,
    pub flight_id: Option<Uuid>,
    pub travelers_count: i32,
    pub transportation_type: Option<Transportation>,
    pub departure_city: Option<String>,
    #[serde(default)]
    pub selected_seats: Vec<String>,
    #[serde(default)]
    pub has_baggage: bool,
    #[serde(default)]
    pub baggage_count: i32,
    /// Client-side price estimate. Display hint only; the server recomputes
    /// the authoritative total.
    pub total_price: Option<i64>,
}

/// A fully validated booking ready to persist.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub target: BookingTarget,
    pub travelers_count: i32,
    pub transportation: Option<Transportation>,
    pub departure_city: Option<String>,
    pub seats: Vec<String>,
    pub has_baggage: bool,
    pub baggage_count: i32,
    pub total_price_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target: BookingTarget,
    pub travelers_count: i32,
    pub transportation: Option<Transportation>,
    pub departure_city: Option<String>,
    /// Canonical seat labels. Empty for tours.
    pub seats: Vec<String>,
    pub has_baggage: bool,
    pub baggage_count: i32,
    pub total_price_cents: i64,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
}

/// Item fields joined onto a booking for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum BookingItemInfo {
    Tour {
        title: String,
        country: String,
        city: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Flight {
        airline: String,
        flight_number: String,
        departure_city: String,
        arrival_city: String,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
    },
}

/// A booking as the read side sees it: the row, its joined item fields,
/// the raw stored seat string (legacy shim input) and the latest history
/// timestamp.
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub booking: Booking,
    pub item: BookingItemInfo,
    /// Stored seat field exactly as persisted. Canonically a JSON array
    /// string, but historical rows carry other dialects.
    pub seats_raw: Option<String>,
    pub last_status_change: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingHistoryEntry {
    pub booking_id: Uuid,
    pub status: BookingStatus,
    pub changed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in [
            BookingStatus::Active,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert_eq!(s.to_string().parse::<BookingStatus>().unwrap(), s);
        }
        assert!("PENDING".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_status_serde_wire_strings() {
        let json = serde_json::to_string(&BookingStatus::Active).unwrap();
        assert_eq!(json, "\"Активно\"");
        let parsed: BookingStatus = serde_json::from_str("\"Отменено\"").unwrap();
        assert_eq!(parsed, BookingStatus::Cancelled);
    }

    #[test]
    fn test_target_from_columns() {
        let t = Uuid::new_v4();
        let f = Uuid::new_v4();
        assert_eq!(
            BookingTarget::from_columns(Some(t), None).unwrap(),
            BookingTarget::Tour(t)
        );
        assert_eq!(
            BookingTarget::from_columns(None, Some(f)).unwrap(),
            BookingTarget::Flight(f)
        );
        assert!(BookingTarget::from_columns(Some(t), Some(f)).is_err());
        assert!(BookingTarget::from_columns(None, None).is_err());
    }

    #[test]
    fn test_request_camel_case() {
        let body = r#"{
            "flightId": "6f8e4b1c-0000-0000-0000-000000000007",
            "travelersCount": 2,
            "selectedSeats": ["1A", "1B"],
            "hasBaggage": true,
            "baggageCount": 1,
            "totalPrice": 500000
        }"#;
        let req: CreateBookingRequest = serde_json::from_str(body).unwrap();
        assert!(req.tour_id.is_none());
        assert_eq!(req.travelers_count, 2);
        assert_eq!(req.selected_seats, vec!["1A", "1B"]);
        assert!(req.has_baggage);
    }
}
