//! In-memory store used by the crate's tests. Enforces the same seat
//! uniqueness contract as the Postgres repository.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use tripline_catalog::{CatalogRepository, Flight, Tour};
use tripline_core::booking::{
    Booking, BookingHistoryEntry, BookingItemInfo, BookingRecord, BookingStatus, NewBooking,
};
use tripline_core::repository::{BookingRepository, StoreError};
use tripline_offer::{Discount, DiscountRepository, PersonalizedOffer};

#[derive(Default)]
struct Inner {
    tours: HashMap<Uuid, Tour>,
    flights: HashMap<Uuid, Flight>,
    discounts: Vec<Discount>,
    offers: Vec<PersonalizedOffer>,
    bookings: HashMap<Uuid, Booking>,
    // (flight_id, seat) -> booking
    occupancy: HashMap<(Uuid, String), Uuid>,
    history: Vec<BookingHistoryEntry>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_flight(&self, total_seats: i32, price_cents: i64, baggage_price_cents: i64) -> Uuid {
        let id = Uuid::new_v4();
        let flight = Flight {
            id,
            airline: "Тестовые авиалинии".to_string(),
            flight_number: "TL-101".to_string(),
            departure_city: "Москва".to_string(),
            arrival_city: "Сочи".to_string(),
            departure_time: Utc::now(),
            arrival_time: Utc::now(),
            price_cents,
            aircraft_type: None,
            total_seats,
            baggage_price_cents,
            available: true,
        };
        self.inner.lock().unwrap().flights.insert(id, flight);
        id
    }

    pub fn add_tour(&self, price_cents: i64, cities: &[&str]) -> Uuid {
        let id = Uuid::new_v4();
        let today = Utc::now().date_naive();
        let tour = Tour {
            id,
            title: "Тестовый тур".to_string(),
            description: None,
            country: "Россия".to_string(),
            city: "Сочи".to_string(),
            start_date: today,
            end_date: today,
            price_cents,
            transportation_included: true,
            available_cities: cities.iter().map(|c| c.to_string()).collect(),
            available: true,
        };
        self.inner.lock().unwrap().tours.insert(id, tour);
        id
    }

    pub fn set_flight_available(&self, id: Uuid, available: bool) {
        if let Some(f) = self.inner.lock().unwrap().flights.get_mut(&id) {
            f.available = available;
        }
    }

    pub fn add_discount(&self, discount: Discount) {
        self.inner.lock().unwrap().discounts.push(discount);
    }

    pub fn add_offer(&self, offer: PersonalizedOffer) {
        self.inner.lock().unwrap().offers.push(offer);
    }

    pub fn occupied(&self, flight_id: Uuid) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let mut seats: Vec<String> = inner
            .occupancy
            .keys()
            .filter(|(f, _)| *f == flight_id)
            .map(|(_, s)| s.clone())
            .collect();
        seats.sort();
        seats
    }

    pub fn history_len(&self, booking_id: Uuid) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .history
            .iter()
            .filter(|h| h.booking_id == booking_id)
            .count()
    }

    pub fn get_record(&self, booking_id: Uuid) -> BookingRecord {
        let inner = self.inner.lock().unwrap();
        record_of(&inner, inner.bookings.get(&booking_id).expect("booking"))
    }
}

fn record_of(inner: &Inner, booking: &Booking) -> BookingRecord {
    let item = match booking.target {
        tripline_core::booking::BookingTarget::Tour(id) => {
            let tour = inner.tours.get(&id).expect("tour");
            BookingItemInfo::Tour {
                title: tour.title.clone(),
                country: tour.country.clone(),
                city: tour.city.clone(),
                start_date: tour.start_date,
                end_date: tour.end_date,
            }
        }
        tripline_core::booking::BookingTarget::Flight(id) => {
            let flight = inner.flights.get(&id).expect("flight");
            BookingItemInfo::Flight {
                airline: flight.airline.clone(),
                flight_number: flight.flight_number.clone(),
                departure_city: flight.departure_city.clone(),
                arrival_city: flight.arrival_city.clone(),
                departure_time: flight.departure_time,
                arrival_time: flight.arrival_time,
            }
        }
    };
    let last_change = inner
        .history
        .iter()
        .filter(|h| h.booking_id == booking.id)
        .map(|h| h.changed_at)
        .max()
        .unwrap_or(booking.booking_date);
    BookingRecord {
        booking: booking.clone(),
        item,
        seats_raw: Some(serde_json::to_string(&booking.seats).unwrap()),
        last_status_change: last_change,
    }
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn get_tour(&self, id: Uuid) -> Result<Option<Tour>, StoreError> {
        Ok(self.inner.lock().unwrap().tours.get(&id).cloned())
    }

    async fn get_flight(&self, id: Uuid) -> Result<Option<Flight>, StoreError> {
        Ok(self.inner.lock().unwrap().flights.get(&id).cloned())
    }

    async fn occupied_seats(&self, flight_id: Uuid) -> Result<Vec<String>, StoreError> {
        Ok(self.occupied(flight_id))
    }
}

#[async_trait]
impl DiscountRepository for InMemoryStore {
    async fn active_discounts(&self, today: NaiveDate) -> Result<Vec<Discount>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .discounts
            .iter()
            .filter(|d| d.active_on(today))
            .cloned()
            .collect())
    }

    async fn offers_for_user(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<PersonalizedOffer>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .offers
            .iter()
            .filter(|o| o.user_id == user_id && o.valid_on(today))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create(&self, new: &NewBooking) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(flight_id) = new.target.flight_id() {
            let taken: Vec<String> = new
                .seats
                .iter()
                .filter(|s| inner.occupancy.contains_key(&(flight_id, s.to_string())))
                .cloned()
                .collect();
            if !taken.is_empty() {
                return Err(StoreError::SeatConflict { seats: taken });
            }
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let booking = Booking {
            id,
            user_id: new.user_id,
            target: new.target,
            travelers_count: new.travelers_count,
            transportation: new.transportation,
            departure_city: new.departure_city.clone(),
            seats: new.seats.clone(),
            has_baggage: new.has_baggage,
            baggage_count: new.baggage_count,
            total_price_cents: new.total_price_cents,
            status: BookingStatus::Active,
            booking_date: now,
        };
        if let Some(flight_id) = new.target.flight_id() {
            for seat in &new.seats {
                inner.occupancy.insert((flight_id, seat.clone()), id);
            }
        }
        inner.bookings.insert(id, booking);
        inner.history.push(BookingHistoryEntry {
            booking_id: id,
            status: BookingStatus::Active,
            changed_at: now,
        });
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<BookingRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.bookings.get(&id).map(|b| record_of(&inner, b)))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<BookingRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<BookingRecord> = inner
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .map(|b| record_of(&inner, b))
            .collect();
        records.sort_by(|a, b| b.booking.booking_date.cmp(&a.booking.booking_date));
        Ok(records)
    }

    async fn list_all(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<BookingRecord> = inner
            .bookings
            .values()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .map(|b| record_of(&inner, b))
            .collect();
        records.sort_by(|a, b| b.booking.booking_date.cmp(&a.booking.booking_date));
        Ok(records)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let current = inner
            .bookings
            .get(&id)
            .map(|b| b.status)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if current != from {
            return Err(StoreError::InvalidTransition { from: current, to });
        }
        inner.bookings.get_mut(&id).unwrap().status = to;
        inner.history.push(BookingHistoryEntry {
            booking_id: id,
            status: to,
            changed_at: Utc::now(),
        });
        if to == BookingStatus::Cancelled {
            inner.occupancy.retain(|_, b| *b != id);
        }
        Ok(())
    }

    async fn history(&self, id: Uuid) -> Result<Vec<BookingHistoryEntry>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .history
            .iter()
            .filter(|h| h.booking_id == id)
            .cloned()
            .collect())
    }
}
