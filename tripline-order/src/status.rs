use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use tripline_core::booking::BookingStatus;
use tripline_core::repository::BookingRepository;

use crate::error::BookingError;

/// The only legal transitions. Cancelled and Completed are terminal.
pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    matches!(
        (from, to),
        (BookingStatus::Active, BookingStatus::Cancelled)
            | (BookingStatus::Active, BookingStatus::Completed)
    )
}

/// Status transition manager. Every applied transition appends a history
/// entry; transitioning to Cancelled releases the booking's seat claims
/// (both inside the repository transaction).
pub struct StatusManager {
    bookings: Arc<dyn BookingRepository>,
}

impl StatusManager {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// User-initiated cancel. Only the booking owner may cancel through
    /// this path.
    pub async fn cancel_own(&self, user_id: Uuid, booking_id: Uuid) -> Result<(), BookingError> {
        let record = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;
        if record.booking.user_id != user_id {
            return Err(BookingError::Forbidden);
        }
        self.apply(booking_id, record.booking.status, BookingStatus::Cancelled)
            .await
    }

    /// Manager-initiated transition. The route layer enforces the manager
    /// role; Completed is reachable only through here.
    pub async fn manager_transition(
        &self,
        booking_id: Uuid,
        to: BookingStatus,
    ) -> Result<(), BookingError> {
        let record = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;
        self.apply(booking_id, record.booking.status, to).await
    }

    async fn apply(
        &self,
        booking_id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<(), BookingError> {
        if !can_transition(from, to) {
            return Err(BookingError::InvalidTransition { from, to });
        }
        self.bookings.transition(booking_id, from, to).await?;
        info!(%booking_id, %from, %to, "booking status changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::writer::BookingWriter;
    use tripline_core::booking::CreateBookingRequest;

    async fn booked_flight(store: &Arc<InMemoryStore>) -> (Uuid, Uuid, Uuid) {
        let flight_id = store.add_flight(30, 10_000_00, 0);
        let writer = BookingWriter::new(store.clone(), store.clone(), store.clone());
        let user = Uuid::new_v4();
        let req = CreateBookingRequest {
            tour_id: None,
            flight_id: Some(flight_id),
            travelers_count: 2,
            transportation_type: None,
            departure_city: None,
            selected_seats: vec!["1A".to_string(), "1B".to_string()],
            has_baggage: false,
            baggage_count: 0,
            total_price: None,
        };
        let booking_id = writer.create(user, &req).await.unwrap();
        (user, flight_id, booking_id)
    }

    #[test]
    fn test_transition_table() {
        use BookingStatus::*;
        assert!(can_transition(Active, Cancelled));
        assert!(can_transition(Active, Completed));
        assert!(!can_transition(Cancelled, Active));
        assert!(!can_transition(Cancelled, Completed));
        assert!(!can_transition(Completed, Cancelled));
        assert!(!can_transition(Active, Active));
    }

    #[tokio::test]
    async fn test_cancel_appends_history_and_releases_seats() {
        let store = Arc::new(InMemoryStore::new());
        let (user, flight_id, booking_id) = booked_flight(&store).await;
        let manager = StatusManager::new(store.clone());

        manager.cancel_own(user, booking_id).await.unwrap();

        let record = store.get_record(booking_id);
        assert_eq!(record.booking.status, BookingStatus::Cancelled);
        // creation entry untouched, exactly one cancellation entry added
        assert_eq!(store.history_len(booking_id), 2);
        // occupancy invariant: cancelled bookings hold no seats
        assert!(store.occupied(flight_id).is_empty());
    }

    #[tokio::test]
    async fn test_cancel_completed_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let (user, _, booking_id) = booked_flight(&store).await;
        let manager = StatusManager::new(store.clone());

        manager
            .manager_transition(booking_id, BookingStatus::Completed)
            .await
            .unwrap();

        let err = manager.cancel_own(user, booking_id).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));
        assert_eq!(store.history_len(booking_id), 2);
    }

    #[tokio::test]
    async fn test_cancel_requires_ownership() {
        let store = Arc::new(InMemoryStore::new());
        let (_, _, booking_id) = booked_flight(&store).await;
        let manager = StatusManager::new(store.clone());

        let err = manager
            .cancel_own(Uuid::new_v4(), booking_id)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Forbidden));
    }

    #[tokio::test]
    async fn test_unknown_booking() {
        let store = Arc::new(InMemoryStore::new());
        let manager = StatusManager::new(store.clone());
        let err = manager
            .cancel_own(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::BookingNotFound));
    }
}
