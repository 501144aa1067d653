use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::seatmap::SeatMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub airline: String,
    pub flight_number: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// Minor units, per passenger.
    pub price_cents: i64,
    pub aircraft_type: Option<String>,
    pub total_seats: i32,
    /// Minor units, per checked bag.
    pub baggage_price_cents: i64,
    pub available: bool,
}

impl Flight {
    /// Cabin layout derived from total_seats: 6 seats per row.
    pub fn seat_map(&self) -> SeatMap {
        SeatMap::new(self.total_seats)
    }
}
