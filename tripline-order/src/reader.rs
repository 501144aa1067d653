//! Read-side shaping of bookings: seat strings, plural forms, price and
//! date display fields.

use serde::Serialize;
use uuid::Uuid;

use tripline_core::booking::{BookingItemInfo, BookingRecord, BookingStatus, Transportation};
use tripline_core::seats::SeatLabel;
use tripline_core::text;

/// A seat label decomposed for the seat-map UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedSeat {
    pub row: String,
    pub letter: Option<String>,
}

/// Client- and manager-facing booking view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: BookingStatus,
    pub travelers_count: i32,
    /// "2 пассажира"
    pub travelers_info: String,
    pub transportation_type: Option<Transportation>,
    pub departure_city: Option<String>,
    pub has_baggage: bool,
    pub baggage_count: i32,
    /// "2 места: 1A, 1B". None for tours.
    pub seat_info: Option<String>,
    pub detailed_seats: Vec<DetailedSeat>,
    pub total_price_cents: i64,
    /// "41 500,00 ₽"
    pub total_price_display: String,
    pub booking_date: chrono::DateTime<chrono::Utc>,
    pub booking_date_display: String,
    /// Timestamp of the latest history entry.
    pub last_updated: chrono::DateTime<chrono::Utc>,
    pub last_updated_display: String,
    pub item: BookingItemInfo,
}

pub fn build_view(record: &BookingRecord) -> BookingView {
    let booking = &record.booking;
    let seats = stored_seats(record);
    let seat_info = if booking.target.is_flight() {
        seat_info_line(&seats)
    } else {
        None
    };

    BookingView {
        id: booking.id,
        user_id: booking.user_id,
        status: booking.status,
        travelers_count: booking.travelers_count,
        travelers_info: format!(
            "{} {}",
            booking.travelers_count,
            text::passenger_word(booking.travelers_count as i64)
        ),
        transportation_type: booking.transportation,
        departure_city: booking.departure_city.clone(),
        has_baggage: booking.has_baggage,
        baggage_count: booking.baggage_count,
        seat_info,
        detailed_seats: detailed_seats(&seats),
        total_price_cents: booking.total_price_cents,
        total_price_display: text::format_price(booking.total_price_cents),
        booking_date: booking.booking_date,
        booking_date_display: text::format_datetime(booking.booking_date),
        last_updated: record.last_status_change,
        last_updated_display: text::format_datetime(record.last_status_change),
        item: record.item.clone(),
    }
}

/// Seats of a stored booking. Prefers the in-memory canonical list; falls
/// back to parsing the raw stored string through the migration shim.
fn stored_seats(record: &BookingRecord) -> Vec<String> {
    if !record.booking.seats.is_empty() {
        return record.booking.seats.clone();
    }
    record
        .seats_raw
        .as_deref()
        .map(parse_seat_list)
        .unwrap_or_default()
}

/// Migration shim for the historical seat field dialects. New rows are
/// always a JSON array of strings; old rows may be a single-quoted
/// pseudo-array or a bare label. Chain: JSON parse, quoted-token scan,
/// whole-string label.
pub fn parse_seat_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    if let Ok(seats) = serde_json::from_str::<Vec<String>>(raw) {
        return seats;
    }

    let quoted = extract_quoted(raw);
    if !quoted.is_empty() {
        return quoted;
    }

    vec![raw.to_string()]
}

fn extract_quoted(raw: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\'' && c != '"' {
            continue;
        }
        let mut token = String::new();
        for inner in chars.by_ref() {
            if inner == c {
                break;
            }
            token.push(inner);
        }
        if !token.is_empty() {
            out.push(token);
        }
    }
    out
}

fn seat_info_line(seats: &[String]) -> Option<String> {
    if seats.is_empty() {
        return None;
    }
    let count = seats.len() as i64;
    Some(format!(
        "{} {}: {}",
        count,
        text::seat_word(count),
        seats.join(", ")
    ))
}

pub fn detailed_seats(seats: &[String]) -> Vec<DetailedSeat> {
    seats
        .iter()
        .filter_map(|s| SeatLabel::parse(s))
        .map(|label| DetailedSeat {
            row: label.row.to_string(),
            letter: label.letter.map(|c| c.to_string()),
        })
        .collect()
}
