use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use tripline_core::repository::StoreError;
use tripline_offer::{Discount, DiscountRepository, PersonalizedOffer};

use crate::db_err;

pub struct PostgresDiscountRepository {
    pool: PgPool,
}

impl PostgresDiscountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DiscountRow {
    id: Uuid,
    tour_id: Option<Uuid>,
    flight_id: Option<Uuid>,
    airline: Option<String>,
    discount_percent: i32,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    is_active: bool,
}

#[derive(sqlx::FromRow)]
struct OfferRow {
    id: Uuid,
    user_id: Uuid,
    tour_id: Option<Uuid>,
    flight_id: Option<Uuid>,
    discount_percent: i32,
    valid_until: NaiveDate,
}

#[async_trait]
impl DiscountRepository for PostgresDiscountRepository {
    async fn active_discounts(&self, today: NaiveDate) -> Result<Vec<Discount>, StoreError> {
        let rows = sqlx::query_as::<_, DiscountRow>(
            r#"
            SELECT id, tour_id, flight_id, airline, discount_percent,
                   start_date, end_date, is_active
            FROM discounts
            WHERE is_active
              AND (start_date IS NULL OR start_date <= $1)
              AND (end_date IS NULL OR end_date >= $1)
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| Discount {
                id: row.id,
                tour_id: row.tour_id,
                flight_id: row.flight_id,
                airline: row.airline,
                discount_percent: row.discount_percent,
                start_date: row.start_date,
                end_date: row.end_date,
                is_active: row.is_active,
            })
            .collect())
    }

    async fn offers_for_user(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<PersonalizedOffer>, StoreError> {
        let rows = sqlx::query_as::<_, OfferRow>(
            r#"
            SELECT id, user_id, tour_id, flight_id, discount_percent, valid_until
            FROM personalized_offers
            WHERE user_id = $1 AND valid_until >= $2
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| PersonalizedOffer {
                id: row.id,
                user_id: row.user_id,
                tour_id: row.tour_id,
                flight_id: row.flight_id,
                discount_percent: row.discount_percent,
                valid_until: row.valid_until,
            })
            .collect())
    }
}
