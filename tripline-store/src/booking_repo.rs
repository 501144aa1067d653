use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use tripline_core::booking::{
    Booking, BookingHistoryEntry, BookingItemInfo, BookingRecord, BookingStatus, BookingTarget,
    NewBooking, Transportation,
};
use tripline_core::repository::{BookingRepository, StoreError};

use crate::db_err;

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_RECORD: &str = r#"
    SELECT b.id, b.user_id, b.tour_id, b.flight_id, b.travelers_count,
           b.transportation_type, b.departure_city, b.selected_seats,
           b.has_baggage, b.baggage_count, b.total_price_cents, b.status,
           b.booking_date,
           t.title AS tour_title, t.country AS tour_country, t.city AS tour_city,
           t.start_date AS tour_start_date, t.end_date AS tour_end_date,
           f.airline AS flight_airline, f.flight_number AS flight_number,
           f.departure_city AS flight_departure_city,
           f.arrival_city AS flight_arrival_city,
           f.departure_time AS flight_departure_time,
           f.arrival_time AS flight_arrival_time,
           (SELECT MAX(h.changed_at) FROM booking_history h WHERE h.booking_id = b.id)
               AS last_status_change
    FROM bookings b
    LEFT JOIN tours t ON t.id = b.tour_id
    LEFT JOIN flights f ON f.id = b.flight_id
"#;

// Internal struct for type-safe querying of the joined view
#[derive(sqlx::FromRow)]
struct BookingJoinRow {
    id: Uuid,
    user_id: Uuid,
    tour_id: Option<Uuid>,
    flight_id: Option<Uuid>,
    travelers_count: i32,
    transportation_type: Option<String>,
    departure_city: Option<String>,
    selected_seats: Option<String>,
    has_baggage: bool,
    baggage_count: i32,
    total_price_cents: i64,
    status: String,
    booking_date: chrono::DateTime<chrono::Utc>,
    tour_title: Option<String>,
    tour_country: Option<String>,
    tour_city: Option<String>,
    tour_start_date: Option<chrono::NaiveDate>,
    tour_end_date: Option<chrono::NaiveDate>,
    flight_airline: Option<String>,
    flight_number: Option<String>,
    flight_departure_city: Option<String>,
    flight_arrival_city: Option<String>,
    flight_departure_time: Option<chrono::DateTime<chrono::Utc>>,
    flight_arrival_time: Option<chrono::DateTime<chrono::Utc>>,
    last_status_change: Option<chrono::DateTime<chrono::Utc>>,
}

fn transportation_to_db(t: Transportation) -> &'static str {
    match t {
        Transportation::SelfArranged => "self",
        Transportation::Company => "company",
    }
}

fn transportation_from_db(s: &str) -> Result<Transportation, StoreError> {
    match s {
        "self" => Ok(Transportation::SelfArranged),
        "company" => Ok(Transportation::Company),
        other => Err(StoreError::Database(format!(
            "unknown transportation type: {}",
            other
        ))),
    }
}

impl TryFrom<BookingJoinRow> for BookingRecord {
    type Error = StoreError;

    fn try_from(row: BookingJoinRow) -> Result<Self, StoreError> {
        let target = BookingTarget::from_columns(row.tour_id, row.flight_id)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let status: BookingStatus = row
            .status
            .parse()
            .map_err(|e: tripline_core::CoreError| StoreError::Database(e.to_string()))?;

        let transportation = row
            .transportation_type
            .as_deref()
            .map(transportation_from_db)
            .transpose()?;

        let item = match target {
            BookingTarget::Tour(_) => BookingItemInfo::Tour {
                title: row.tour_title.unwrap_or_default(),
                country: row.tour_country.unwrap_or_default(),
                city: row.tour_city.unwrap_or_default(),
                start_date: row.tour_start_date.unwrap_or_default(),
                end_date: row.tour_end_date.unwrap_or_default(),
            },
            BookingTarget::Flight(_) => BookingItemInfo::Flight {
                airline: row.flight_airline.unwrap_or_default(),
                flight_number: row.flight_number.unwrap_or_default(),
                departure_city: row.flight_departure_city.unwrap_or_default(),
                arrival_city: row.flight_arrival_city.unwrap_or_default(),
                departure_time: row.flight_departure_time.unwrap_or_default(),
                arrival_time: row.flight_arrival_time.unwrap_or_default(),
            },
        };

        let booking = Booking {
            id: row.id,
            user_id: row.user_id,
            target,
            travelers_count: row.travelers_count,
            transportation,
            departure_city: row.departure_city,
            // The raw stored string goes through the reader's migration shim.
            seats: Vec::new(),
            has_baggage: row.has_baggage,
            baggage_count: row.baggage_count,
            total_price_cents: row.total_price_cents,
            status,
            booking_date: row.booking_date,
        };

        Ok(BookingRecord {
            last_status_change: row.last_status_change.unwrap_or(booking.booking_date),
            seats_raw: row.selected_seats,
            booking,
            item,
        })
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn create(&self, new: &NewBooking) -> Result<Uuid, StoreError> {
        let booking_id = Uuid::new_v4();
        let now = Utc::now();
        let status = BookingStatus::Active;
        let seats_json = serde_json::to_string(&new.seats)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, user_id, tour_id, flight_id, travelers_count,
                 transportation_type, departure_city, selected_seats,
                 has_baggage, baggage_count, total_price_cents, status,
                 booking_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(booking_id)
        .bind(new.user_id)
        .bind(new.target.tour_id())
        .bind(new.target.flight_id())
        .bind(new.travelers_count)
        .bind(new.transportation.map(transportation_to_db))
        .bind(new.departure_city.as_deref())
        .bind(&seats_json)
        .bind(new.has_baggage)
        .bind(new.baggage_count)
        .bind(new.total_price_cents)
        .bind(status.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        // Claim seats under the unique constraint. A missed insert means a
        // concurrent booking holds the seat; the whole transaction rolls
        // back and the client gets a conflict, not a double-booking.
        if let Some(flight_id) = new.target.flight_id() {
            for seat in &new.seats {
                let result = sqlx::query(
                    r#"
                    INSERT INTO flight_seats (flight_id, seat_number, booking_id)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (flight_id, seat_number) DO NOTHING
                    "#,
                )
                .bind(flight_id)
                .bind(seat)
                .bind(booking_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;

                if result.rows_affected() == 0 {
                    tx.rollback().await.map_err(db_err)?;
                    return Err(StoreError::SeatConflict {
                        seats: vec![seat.clone()],
                    });
                }
            }
        }

        sqlx::query(
            "INSERT INTO booking_history (booking_id, status, changed_at) VALUES ($1, $2, $3)",
        )
        .bind(booking_id)
        .bind(status.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(booking_id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<BookingRecord>, StoreError> {
        let sql = format!("{} WHERE b.id = $1", SELECT_RECORD);
        let row = sqlx::query_as::<_, BookingJoinRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(BookingRecord::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<BookingRecord>, StoreError> {
        let sql = format!(
            "{} WHERE b.user_id = $1 ORDER BY b.booking_date DESC",
            SELECT_RECORD
        );
        let rows = sqlx::query_as::<_, BookingJoinRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(BookingRecord::try_from).collect()
    }

    async fn list_all(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingRecord>, StoreError> {
        let sql = format!(
            "{} WHERE ($1::text IS NULL OR b.status = $1) ORDER BY b.booking_date DESC",
            SELECT_RECORD
        );
        let rows = sqlx::query_as::<_, BookingJoinRow>(&sql)
            .bind(status.map(|s| s.to_string()))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(BookingRecord::try_from).collect()
    }

    async fn transition(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Row lock so concurrent transitions serialize on the booking.
        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;

        let current = current.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let current: BookingStatus = current
            .parse()
            .map_err(|e: tripline_core::CoreError| StoreError::Database(e.to_string()))?;
        if current != from {
            return Err(StoreError::InvalidTransition { from: current, to });
        }

        sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2")
            .bind(to.to_string())
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        sqlx::query(
            "INSERT INTO booking_history (booking_id, status, changed_at) VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(to.to_string())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        // Occupancy invariant: a seat is held iff an active booking claims it.
        if to == BookingStatus::Cancelled {
            sqlx::query("DELETE FROM flight_seats WHERE booking_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn history(&self, id: Uuid) -> Result<Vec<BookingHistoryEntry>, StoreError> {
        #[derive(sqlx::FromRow)]
        struct HistoryRow {
            booking_id: Uuid,
            status: String,
            changed_at: chrono::DateTime<chrono::Utc>,
        }

        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT booking_id, status, changed_at
            FROM booking_history
            WHERE booking_id = $1
            ORDER BY changed_at
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                let status: BookingStatus = row
                    .status
                    .parse()
                    .map_err(|e: tripline_core::CoreError| StoreError::Database(e.to_string()))?;
                Ok(BookingHistoryEntry {
                    booking_id: row.booking_id,
                    status,
                    changed_at: row.changed_at,
                })
            })
            .collect()
    }
}
