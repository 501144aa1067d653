use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A packaged tour. Managers own the lifecycle; the booking core only reads
/// price and availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub country: String,
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Minor units.
    pub price_cents: i64,
    pub transportation_included: bool,
    /// Cities the company transfer departs from.
    pub available_cities: Vec<String>,
    pub available: bool,
}

impl Tour {
    pub fn serves_departure_city(&self, city: &str) -> bool {
        self.available_cities.iter().any(|c| c == city)
    }
}
