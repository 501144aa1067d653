use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{BookingHistoryEntry, BookingRecord, BookingStatus, NewBooking};

/// Errors surfaced by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    /// One or more requested seats is already claimed by an active booking.
    #[error("seats already taken: {}", seats.join(", "))]
    SeatConflict { seats: Vec<String> },

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("database error: {0}")]
    Database(String),
}

/// Repository trait for booking data access. The booking writer is the only
/// component allowed to create bookings and claim seats; nothing else writes
/// these tables.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a booking atomically: the booking row, its seat claims and
    /// the initial history entry commit or roll back together. A seat
    /// already held by an active booking fails the whole call with
    /// [`StoreError::SeatConflict`].
    async fn create(&self, booking: &NewBooking) -> Result<Uuid, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<BookingRecord>, StoreError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<BookingRecord>, StoreError>;

    /// Cross-user listing for managers, optionally filtered by status.
    async fn list_all(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingRecord>, StoreError>;

    /// Compare-and-set status change. Verifies the current status equals
    /// `from` under a row lock, appends a history entry, and releases the
    /// booking's seat claims when transitioning to Cancelled.
    async fn transition(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<(), StoreError>;

    async fn history(&self, id: Uuid) -> Result<Vec<BookingHistoryEntry>, StoreError>;
}
