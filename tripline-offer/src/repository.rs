use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Discount, PersonalizedOffer};
use tripline_core::repository::StoreError;

/// Access to discount state for the resolver. Callers pass `today` so the
/// date-window filtering stays testable and time-zone decisions live in one
/// place.
#[async_trait]
pub trait DiscountRepository: Send + Sync {
    /// General discounts active on the given date.
    async fn active_discounts(&self, today: NaiveDate) -> Result<Vec<Discount>, StoreError>;

    /// Personalized offers for a user that have not expired.
    async fn offers_for_user(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<PersonalizedOffer>, StoreError>;
}
