use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The item a price is being resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Tour(Uuid),
    Flight { id: Uuid, airline: String },
}

/// A general (storewide) discount. Scope is one of: a specific tour, a
/// specific flight, a whole airline, or global when all three are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    pub id: Uuid,
    pub tour_id: Option<Uuid>,
    pub flight_id: Option<Uuid>,
    pub airline: Option<String>,
    pub discount_percent: i32,
    /// None = unbounded on that side.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl Discount {
    pub fn active_on(&self, today: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(start) = self.start_date {
            if today < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if today > end {
                return false;
            }
        }
        true
    }

    /// Exact item match.
    pub fn matches_item(&self, item: &ItemRef) -> bool {
        match item {
            ItemRef::Tour(id) => self.tour_id == Some(*id),
            ItemRef::Flight { id, .. } => self.flight_id == Some(*id),
        }
    }

    /// Airline-level match (flights only).
    pub fn matches_airline(&self, item: &ItemRef) -> bool {
        match item {
            ItemRef::Tour(_) => false,
            ItemRef::Flight { airline, .. } => self.airline.as_deref() == Some(airline.as_str()),
        }
    }

    pub fn is_global(&self) -> bool {
        self.tour_id.is_none() && self.flight_id.is_none() && self.airline.is_none()
    }
}

/// A per-user offer. A null item means the offer blankets every item for
/// that user. No start bound; only an expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizedOffer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tour_id: Option<Uuid>,
    pub flight_id: Option<Uuid>,
    pub discount_percent: i32,
    pub valid_until: NaiveDate,
}

impl PersonalizedOffer {
    pub fn valid_on(&self, today: NaiveDate) -> bool {
        self.valid_until >= today
    }

    pub fn applies_to(&self, item: &ItemRef) -> bool {
        if self.tour_id.is_none() && self.flight_id.is_none() {
            return true;
        }
        match item {
            ItemRef::Tour(id) => self.tour_id == Some(*id),
            ItemRef::Flight { id, .. } => self.flight_id == Some(*id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    Personal,
    General,
}

/// Resolver output: the effective per-unit price for an item and user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub final_price_cents: i64,
    /// Present only when a discount applied.
    pub original_price_cents: Option<i64>,
    pub discount_percent: Option<i32>,
    pub discount_kind: Option<DiscountKind>,
}

impl PriceQuote {
    pub fn list(price_cents: i64) -> Self {
        PriceQuote {
            final_price_cents: price_cents,
            original_price_cents: None,
            discount_percent: None,
            discount_kind: None,
        }
    }
}
