use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use tripline_catalog::CatalogRepository;
use tripline_core::booking::{
    BookingTarget, CreateBookingRequest, NewBooking, Transportation,
};
use tripline_core::repository::BookingRepository;
use tripline_core::seats::SeatLabel;
use tripline_offer::{resolve_price, DiscountRepository, ItemRef, PriceQuote};

use crate::error::BookingError;

pub const MIN_TRAVELERS: i32 = 1;
pub const MAX_TRAVELERS: i32 = 10;

/// The single write path for bookings. Validates a request against the
/// catalog, recomputes the authoritative price through the discount
/// resolver, and persists booking + seat claims + history atomically.
pub struct BookingWriter {
    catalog: Arc<dyn CatalogRepository>,
    discounts: Arc<dyn DiscountRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingWriter {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        discounts: Arc<dyn DiscountRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            catalog,
            discounts,
            bookings,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        req: &CreateBookingRequest,
    ) -> Result<Uuid, BookingError> {
        let target = match (req.tour_id, req.flight_id) {
            (None, None) => return Err(BookingError::TargetRequired),
            (Some(_), Some(_)) => return Err(BookingError::TargetAmbiguous),
            (Some(tour), None) => BookingTarget::Tour(tour),
            (None, Some(flight)) => BookingTarget::Flight(flight),
        };

        if !(MIN_TRAVELERS..=MAX_TRAVELERS).contains(&req.travelers_count) {
            return Err(BookingError::TravelersOutOfRange {
                min: MIN_TRAVELERS,
                max: MAX_TRAVELERS,
            });
        }

        let new_booking = match target {
            BookingTarget::Flight(flight_id) => {
                self.prepare_flight_booking(user_id, flight_id, req).await?
            }
            BookingTarget::Tour(tour_id) => {
                self.prepare_tour_booking(user_id, tour_id, req).await?
            }
        };

        if let Some(client_total) = req.total_price {
            if client_total != new_booking.total_price_cents {
                // Fraud signal: the client-side estimate diverges from the
                // authoritative total. The server value wins either way.
                warn!(
                    %user_id,
                    client_total,
                    server_total = new_booking.total_price_cents,
                    "client price hint mismatch"
                );
            }
        }

        let booking_id = self.bookings.create(&new_booking).await?;
        info!(%booking_id, %user_id, "booking created");
        Ok(booking_id)
    }

    async fn prepare_flight_booking(
        &self,
        user_id: Uuid,
        flight_id: Uuid,
        req: &CreateBookingRequest,
    ) -> Result<NewBooking, BookingError> {
        if req.selected_seats.len() != req.travelers_count as usize {
            return Err(BookingError::SeatCountMismatch {
                expected: req.travelers_count,
                got: req.selected_seats.len(),
            });
        }

        let mut labels = Vec::with_capacity(req.selected_seats.len());
        let mut seen = HashSet::new();
        for raw in &req.selected_seats {
            let label = SeatLabel::parse(raw)
                .filter(|l| l.letter.is_some())
                .ok_or_else(|| BookingError::InvalidSeatLabel(raw.clone()))?;
            if !seen.insert(label.to_string()) {
                return Err(BookingError::DuplicateSeat(raw.clone()));
            }
            labels.push(label);
        }

        let flight = self
            .catalog
            .get_flight(flight_id)
            .await?
            .ok_or(BookingError::ItemNotFound)?;
        if !flight.available {
            return Err(BookingError::ItemUnavailable);
        }

        let map = flight.seat_map();
        for label in &labels {
            if !map.contains(label) {
                return Err(BookingError::SeatOutsideMap(label.to_string()));
            }
        }

        // Fail-fast courtesy check. The unique constraint inside the create
        // transaction remains the authority under concurrency.
        let occupied: HashSet<String> =
            self.catalog.occupied_seats(flight_id).await?.into_iter().collect();
        let taken: Vec<String> = labels
            .iter()
            .map(|l| l.to_string())
            .filter(|l| occupied.contains(l))
            .collect();
        if !taken.is_empty() {
            return Err(BookingError::SeatConflict { seats: taken });
        }

        let item = ItemRef::Flight {
            id: flight_id,
            airline: flight.airline.clone(),
        };
        let quote = self.quote(user_id, flight.price_cents, &item).await?;

        let baggage_count = if req.has_baggage {
            req.baggage_count.max(1)
        } else {
            0
        };
        let total = quote.final_price_cents * req.travelers_count as i64
            + flight.baggage_price_cents * baggage_count as i64;

        Ok(NewBooking {
            user_id,
            target: BookingTarget::Flight(flight_id),
            travelers_count: req.travelers_count,
            transportation: None,
            departure_city: None,
            seats: labels.iter().map(|l| l.to_string()).collect(),
            has_baggage: req.has_baggage,
            baggage_count,
            total_price_cents: total,
        })
    }

    async fn prepare_tour_booking(
        &self,
        user_id: Uuid,
        tour_id: Uuid,
        req: &CreateBookingRequest,
    ) -> Result<NewBooking, BookingError> {
        let transportation = req.transportation_type;
        let departure_city = match transportation {
            Some(Transportation::Company) => {
                let city = req
                    .departure_city
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .ok_or(BookingError::DepartureCityRequired)?;
                Some(city.to_string())
            }
            _ => None,
        };

        let tour = self
            .catalog
            .get_tour(tour_id)
            .await?
            .ok_or(BookingError::ItemNotFound)?;
        if !tour.available {
            return Err(BookingError::ItemUnavailable);
        }

        if let Some(city) = &departure_city {
            if !tour.serves_departure_city(city) {
                return Err(BookingError::DepartureCityNotServed(city.clone()));
            }
        }

        let item = ItemRef::Tour(tour_id);
        let quote = self.quote(user_id, tour.price_cents, &item).await?;
        let total = quote.final_price_cents * req.travelers_count as i64;

        Ok(NewBooking {
            user_id,
            target: BookingTarget::Tour(tour_id),
            travelers_count: req.travelers_count,
            transportation,
            departure_city,
            seats: Vec::new(),
            has_baggage: false,
            baggage_count: 0,
            total_price_cents: total,
        })
    }

    /// Effective per-unit price for an item as this user sees it. Also used
    /// by the catalog detail endpoints so the displayed price and the booked
    /// price come from one computation.
    pub async fn quote(
        &self,
        user_id: Uuid,
        list_price_cents: i64,
        item: &ItemRef,
    ) -> Result<PriceQuote, BookingError> {
        let today = Utc::now().date_naive();
        let offers = self.discounts.offers_for_user(user_id, today).await?;
        let discounts = self.discounts.active_discounts(today).await?;
        Ok(resolve_price(
            list_price_cents,
            item,
            &offers,
            &discounts,
            today,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use chrono::NaiveDate;
    use tripline_core::booking::BookingStatus;
    use tripline_offer::{Discount, PersonalizedOffer};

    fn request(flight_id: Uuid, seats: &[&str]) -> CreateBookingRequest {
        CreateBookingRequest {
            tour_id: None,
            flight_id: Some(flight_id),
            travelers_count: seats.len() as i32,
            transportation_type: None,
            departure_city: None,
            selected_seats: seats.iter().map(|s| s.to_string()).collect(),
            has_baggage: false,
            baggage_count: 0,
            total_price: None,
        }
    }

    #[tokio::test]
    async fn test_flight_booking_end_to_end() {
        let store = Arc::new(InMemoryStore::new());
        let flight_id = store.add_flight(30, 20_000_00, 1_500_00);
        let writer = BookingWriter::new(store.clone(), store.clone(), store.clone());
        let user = Uuid::new_v4();

        let mut req = request(flight_id, &["1A", "1B"]);
        req.has_baggage = true;
        req.baggage_count = 1;

        let booking_id = writer.create(user, &req).await.unwrap();

        let record = store.get_record(booking_id);
        assert_eq!(record.booking.status, BookingStatus::Active);
        assert_eq!(record.booking.seats, vec!["1A", "1B"]);
        // 2 * 20000.00 + 1 * 1500.00
        assert_eq!(record.booking.total_price_cents, 41_500_00);
        assert_eq!(store.occupied(flight_id), vec!["1A", "1B"]);
        assert_eq!(store.history_len(booking_id), 1);
    }

    #[tokio::test]
    async fn test_seat_count_must_match_travelers() {
        let store = Arc::new(InMemoryStore::new());
        let flight_id = store.add_flight(30, 10_000_00, 0);
        let writer = BookingWriter::new(store.clone(), store.clone(), store.clone());

        let mut req = request(flight_id, &["1A"]);
        req.travelers_count = 2;

        let err = writer.create(Uuid::new_v4(), &req).await.unwrap_err();
        assert!(matches!(err, BookingError::SeatCountMismatch { expected: 2, got: 1 }));
    }

    #[tokio::test]
    async fn test_travelers_bounds() {
        let store = Arc::new(InMemoryStore::new());
        let flight_id = store.add_flight(30, 10_000_00, 0);
        let writer = BookingWriter::new(store.clone(), store.clone(), store.clone());

        let mut req = request(flight_id, &[]);
        req.travelers_count = 0;
        let err = writer.create(Uuid::new_v4(), &req).await.unwrap_err();
        assert!(matches!(err, BookingError::TravelersOutOfRange { .. }));

        let mut req = request(flight_id, &[]);
        req.travelers_count = 11;
        let err = writer.create(Uuid::new_v4(), &req).await.unwrap_err();
        assert!(matches!(err, BookingError::TravelersOutOfRange { .. }));
    }

    #[tokio::test]
    async fn test_target_required_and_exclusive() {
        let store = Arc::new(InMemoryStore::new());
        let writer = BookingWriter::new(store.clone(), store.clone(), store.clone());

        let mut req = request(Uuid::new_v4(), &["1A"]);
        req.flight_id = None;
        let err = writer.create(Uuid::new_v4(), &req).await.unwrap_err();
        assert!(matches!(err, BookingError::TargetRequired));

        let mut req = request(Uuid::new_v4(), &["1A"]);
        req.tour_id = Some(Uuid::new_v4());
        let err = writer.create(Uuid::new_v4(), &req).await.unwrap_err();
        assert!(matches!(err, BookingError::TargetAmbiguous));
    }

    #[tokio::test]
    async fn test_rejects_bad_seat_labels() {
        let store = Arc::new(InMemoryStore::new());
        let flight_id = store.add_flight(30, 10_000_00, 0);
        let writer = BookingWriter::new(store.clone(), store.clone(), store.clone());

        let err = writer
            .create(Uuid::new_v4(), &request(flight_id, &["A1"]))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidSeatLabel(_)));

        let err = writer
            .create(Uuid::new_v4(), &request(flight_id, &["1A", "1A"]))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::DuplicateSeat(_)));

        // 30 seats = 5 rows; row 9 does not exist
        let err = writer
            .create(Uuid::new_v4(), &request(flight_id, &["9A"]))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::SeatOutsideMap(_)));
    }

    #[tokio::test]
    async fn test_company_transport_requires_served_city() {
        let store = Arc::new(InMemoryStore::new());
        let tour_id = store.add_tour(50_000_00, &["Москва", "Казань"]);
        let writer = BookingWriter::new(store.clone(), store.clone(), store.clone());

        let mut req = CreateBookingRequest {
            tour_id: Some(tour_id),
            flight_id: None,
            travelers_count: 2,
            transportation_type: Some(Transportation::Company),
            departure_city: None,
            selected_seats: vec![],
            has_baggage: false,
            baggage_count: 0,
            total_price: None,
        };
        let err = writer.create(Uuid::new_v4(), &req).await.unwrap_err();
        assert!(matches!(err, BookingError::DepartureCityRequired));

        req.departure_city = Some("Тверь".to_string());
        let err = writer.create(Uuid::new_v4(), &req).await.unwrap_err();
        assert!(matches!(err, BookingError::DepartureCityNotServed(_)));

        req.departure_city = Some("Москва".to_string());
        writer.create(Uuid::new_v4(), &req).await.unwrap();
    }

    #[tokio::test]
    async fn test_unavailable_item_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let flight_id = store.add_flight(30, 10_000_00, 0);
        store.set_flight_available(flight_id, false);
        let writer = BookingWriter::new(store.clone(), store.clone(), store.clone());

        let err = writer
            .create(Uuid::new_v4(), &request(flight_id, &["1A"]))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::ItemUnavailable));
    }

    #[tokio::test]
    async fn test_personal_discount_wins_in_total() {
        let store = Arc::new(InMemoryStore::new());
        let tour_id = store.add_tour(100_000_00, &[]);
        let user = Uuid::new_v4();
        store.add_discount(Discount {
            id: Uuid::new_v4(),
            tour_id: Some(tour_id),
            flight_id: None,
            airline: None,
            discount_percent: 20,
            start_date: None,
            end_date: None,
            is_active: true,
        });
        store.add_offer(PersonalizedOffer {
            id: Uuid::new_v4(),
            user_id: user,
            tour_id: Some(tour_id),
            flight_id: None,
            discount_percent: 30,
            valid_until: NaiveDate::from_ymd_opt(2999, 1, 1).unwrap(),
        });
        let writer = BookingWriter::new(store.clone(), store.clone(), store.clone());

        let req = CreateBookingRequest {
            tour_id: Some(tour_id),
            flight_id: None,
            travelers_count: 1,
            transportation_type: Some(Transportation::SelfArranged),
            departure_city: None,
            selected_seats: vec![],
            has_baggage: false,
            baggage_count: 0,
            total_price: None,
        };
        let booking_id = writer.create(user, &req).await.unwrap();
        // 30% off, never 50% off
        assert_eq!(
            store.get_record(booking_id).booking.total_price_cents,
            70_000_00
        );
    }

    #[tokio::test]
    async fn test_concurrent_claims_one_winner() {
        let store = Arc::new(InMemoryStore::new());
        let flight_id = store.add_flight(30, 10_000_00, 0);
        let writer = Arc::new(BookingWriter::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let writer = writer.clone();
            let req = request(flight_id, &["2C"]);
            handles.push(tokio::spawn(async move {
                writer.create(Uuid::new_v4(), &req).await
            }));
        }

        let mut ok = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(BookingError::SeatConflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 5);
        assert_eq!(store.occupied(flight_id), vec!["2C"]);
    }
}
