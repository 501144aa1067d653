use async_trait::async_trait;
use uuid::Uuid;

use crate::{Flight, Tour};
use tripline_core::repository::StoreError;

/// Read-only access to the item catalog. The booking core never manages
/// catalog lifecycle; it only looks items up.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get_tour(&self, id: Uuid) -> Result<Option<Tour>, StoreError>;

    async fn get_flight(&self, id: Uuid) -> Result<Option<Flight>, StoreError>;

    /// Seat labels currently claimed by active bookings on a flight.
    async fn occupied_seats(&self, flight_id: Uuid) -> Result<Vec<String>, StoreError>;
}
