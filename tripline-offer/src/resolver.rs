use chrono::NaiveDate;

use crate::models::{Discount, DiscountKind, ItemRef, PersonalizedOffer, PriceQuote};

/// Resolve the effective per-unit price for an item.
///
/// Precedence: a valid personalized offer overrides an active general
/// discount, which overrides the list price. Discounts never stack. Within
/// a tier the highest percentage wins, which keeps the result independent
/// of lookup order. General discounts are narrowed by specificity first:
/// an item-level discount beats an airline-level one, which beats a global
/// one.
pub fn resolve_price(
    list_price_cents: i64,
    item: &ItemRef,
    offers: &[PersonalizedOffer],
    discounts: &[Discount],
    today: NaiveDate,
) -> PriceQuote {
    if let Some(pct) = best_personal(item, offers, today) {
        return discounted(list_price_cents, pct, DiscountKind::Personal);
    }
    if let Some(pct) = best_general(item, discounts, today) {
        return discounted(list_price_cents, pct, DiscountKind::General);
    }
    PriceQuote::list(list_price_cents)
}

fn best_personal(item: &ItemRef, offers: &[PersonalizedOffer], today: NaiveDate) -> Option<i32> {
    offers
        .iter()
        .filter(|o| o.valid_on(today) && o.applies_to(item))
        .map(|o| o.discount_percent)
        .filter(|pct| (1..=100).contains(pct))
        .max()
}

fn best_general(item: &ItemRef, discounts: &[Discount], today: NaiveDate) -> Option<i32> {
    let live: Vec<&Discount> = discounts
        .iter()
        .filter(|d| d.active_on(today) && (1..=100).contains(&d.discount_percent))
        .collect();

    let item_level = live
        .iter()
        .filter(|d| d.matches_item(item))
        .map(|d| d.discount_percent)
        .max();
    if item_level.is_some() {
        return item_level;
    }

    let airline_level = live
        .iter()
        .filter(|d| d.matches_airline(item))
        .map(|d| d.discount_percent)
        .max();
    if airline_level.is_some() {
        return airline_level;
    }

    live.iter()
        .filter(|d| d.is_global())
        .map(|d| d.discount_percent)
        .max()
}

fn discounted(list_price_cents: i64, pct: i32, kind: DiscountKind) -> PriceQuote {
    PriceQuote {
        final_price_cents: apply_percent(list_price_cents, pct),
        original_price_cents: Some(list_price_cents),
        discount_percent: Some(pct),
        discount_kind: Some(kind),
    }
}

/// price * (1 - pct/100), rounded half-up to the nearest minor unit.
pub fn apply_percent(price_cents: i64, pct: i32) -> i64 {
    let remaining = (100 - pct) as i128;
    let scaled = price_cents as i128 * remaining;
    ((scaled + 50) / 100) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn general(item: &ItemRef, pct: i32) -> Discount {
        Discount {
            id: Uuid::new_v4(),
            tour_id: match item {
                ItemRef::Tour(id) => Some(*id),
                _ => None,
            },
            flight_id: match item {
                ItemRef::Flight { id, .. } => Some(*id),
                _ => None,
            },
            airline: None,
            discount_percent: pct,
            start_date: None,
            end_date: None,
            is_active: true,
        }
    }

    fn personal(item: &ItemRef, pct: i32, valid_until: NaiveDate) -> PersonalizedOffer {
        PersonalizedOffer {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tour_id: match item {
                ItemRef::Tour(id) => Some(*id),
                _ => None,
            },
            flight_id: match item {
                ItemRef::Flight { id, .. } => Some(*id),
                _ => None,
            },
            discount_percent: pct,
            valid_until,
        }
    }

    #[test]
    fn test_personal_overrides_general_never_stacks() {
        let item = ItemRef::Tour(Uuid::new_v4());
        let today = day(2025, 6, 1);
        let quote = resolve_price(
            100_000,
            &item,
            &[personal(&item, 30, day(2025, 12, 31))],
            &[general(&item, 20)],
            today,
        );
        // 30% off, never 30% + 20%
        assert_eq!(quote.final_price_cents, 70_000);
        assert_eq!(quote.original_price_cents, Some(100_000));
        assert_eq!(quote.discount_percent, Some(30));
        assert_eq!(quote.discount_kind, Some(DiscountKind::Personal));
    }

    #[test]
    fn test_expired_offer_falls_back_to_general() {
        let item = ItemRef::Tour(Uuid::new_v4());
        let today = day(2025, 6, 1);
        let quote = resolve_price(
            100_000,
            &item,
            &[personal(&item, 30, day(2025, 5, 31))],
            &[general(&item, 20)],
            today,
        );
        assert_eq!(quote.final_price_cents, 80_000);
        assert_eq!(quote.discount_kind, Some(DiscountKind::General));
    }

    #[test]
    fn test_same_tier_tie_highest_percent_wins() {
        let item = ItemRef::Tour(Uuid::new_v4());
        let today = day(2025, 6, 1);
        let quote = resolve_price(
            100_000,
            &item,
            &[],
            &[general(&item, 10), general(&item, 25), general(&item, 15)],
            today,
        );
        assert_eq!(quote.discount_percent, Some(25));
    }

    #[test]
    fn test_item_discount_beats_airline_discount() {
        let flight = Uuid::new_v4();
        let item = ItemRef::Flight {
            id: flight,
            airline: "Аэрофлот".to_string(),
        };
        let today = day(2025, 6, 1);
        let airline_wide = Discount {
            id: Uuid::new_v4(),
            tour_id: None,
            flight_id: None,
            airline: Some("Аэрофлот".to_string()),
            discount_percent: 40,
            start_date: None,
            end_date: None,
            is_active: true,
        };
        let quote = resolve_price(
            100_000,
            &item,
            &[],
            &[airline_wide.clone(), general(&item, 10)],
            today,
        );
        // Item-level match wins the tier even though the airline one is larger.
        assert_eq!(quote.discount_percent, Some(10));

        let quote = resolve_price(100_000, &item, &[], &[airline_wide], today);
        assert_eq!(quote.discount_percent, Some(40));
    }

    #[test]
    fn test_date_window_bounds() {
        let item = ItemRef::Tour(Uuid::new_v4());
        let mut d = general(&item, 20);
        d.start_date = Some(day(2025, 6, 1));
        d.end_date = Some(day(2025, 6, 30));

        let on_start = resolve_price(100_000, &item, &[], &[d.clone()], day(2025, 6, 1));
        assert_eq!(on_start.discount_percent, Some(20));

        let after_end = resolve_price(100_000, &item, &[], &[d.clone()], day(2025, 7, 1));
        assert_eq!(after_end.discount_percent, None);

        d.is_active = false;
        let inactive = resolve_price(100_000, &item, &[], &[d], day(2025, 6, 15));
        assert_eq!(inactive.discount_percent, None);
    }

    #[test]
    fn test_blanket_offer_applies_to_any_item() {
        let item = ItemRef::Flight {
            id: Uuid::new_v4(),
            airline: "S7".to_string(),
        };
        let today = day(2025, 6, 1);
        let blanket = PersonalizedOffer {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tour_id: None,
            flight_id: None,
            discount_percent: 15,
            valid_until: day(2025, 12, 31),
        };
        let quote = resolve_price(100_000, &item, &[blanket], &[], today);
        assert_eq!(quote.final_price_cents, 85_000);
        assert_eq!(quote.discount_kind, Some(DiscountKind::Personal));
    }

    #[test]
    fn test_no_discount_is_list_price() {
        let item = ItemRef::Tour(Uuid::new_v4());
        let quote = resolve_price(123_456, &item, &[], &[], day(2025, 6, 1));
        assert_eq!(quote, PriceQuote::list(123_456));
    }

    #[test]
    fn test_rounding_half_up() {
        // 33% off 99.99 => 66.9933, rounds to 66.99
        assert_eq!(apply_percent(9_999, 33), 6_699);
        // 15% off 0.03 => 0.0255, rounds to 0.03
        assert_eq!(apply_percent(3, 15), 3);
        // 50% off 0.01 => 0.005, rounds up to 0.01
        assert_eq!(apply_percent(1, 50), 1);
    }
}
