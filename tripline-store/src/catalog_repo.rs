use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tripline_catalog::{CatalogRepository, Flight, Tour};
use tripline_core::repository::StoreError;

use crate::db_err;

pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct TourRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    country: String,
    city: String,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    price_cents: i64,
    transportation_included: bool,
    available_cities: serde_json::Value,
    available: bool,
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    airline: String,
    flight_number: String,
    departure_city: String,
    arrival_city: String,
    departure_time: chrono::DateTime<chrono::Utc>,
    arrival_time: chrono::DateTime<chrono::Utc>,
    price_cents: i64,
    aircraft_type: Option<String>,
    total_seats: i32,
    baggage_price_cents: i64,
    available: bool,
}

impl TryFrom<TourRow> for Tour {
    type Error = StoreError;

    fn try_from(row: TourRow) -> Result<Self, StoreError> {
        let available_cities: Vec<String> = serde_json::from_value(row.available_cities)
            .map_err(|e| StoreError::Database(format!("bad available_cities payload: {}", e)))?;
        Ok(Tour {
            id: row.id,
            title: row.title,
            description: row.description,
            country: row.country,
            city: row.city,
            start_date: row.start_date,
            end_date: row.end_date,
            price_cents: row.price_cents,
            transportation_included: row.transportation_included,
            available_cities,
            available: row.available,
        })
    }
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            id: row.id,
            airline: row.airline,
            flight_number: row.flight_number,
            departure_city: row.departure_city,
            arrival_city: row.arrival_city,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            price_cents: row.price_cents,
            aircraft_type: row.aircraft_type,
            total_seats: row.total_seats,
            baggage_price_cents: row.baggage_price_cents,
            available: row.available,
        }
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn get_tour(&self, id: Uuid) -> Result<Option<Tour>, StoreError> {
        let row = sqlx::query_as::<_, TourRow>(
            r#"
            SELECT id, title, description, country, city, start_date, end_date,
                   price_cents, transportation_included, available_cities, available
            FROM tours
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Tour::try_from).transpose()
    }

    async fn get_flight(&self, id: Uuid) -> Result<Option<Flight>, StoreError> {
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            SELECT id, airline, flight_number, departure_city, arrival_city,
                   departure_time, arrival_time, price_cents, aircraft_type,
                   total_seats, baggage_price_cents, available
            FROM flights
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Flight::from))
    }

    async fn occupied_seats(&self, flight_id: Uuid) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar::<_, String>(
            "SELECT seat_number FROM flight_seats WHERE flight_id = $1 ORDER BY seat_number",
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)
    }
}
