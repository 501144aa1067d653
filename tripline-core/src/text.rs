//! Russian display helpers shared by the booking views.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

/// Noun form for passenger counts: 1 пассажир, 2 пассажира, 5 пассажиров.
pub fn passenger_word(count: i64) -> &'static str {
    plural_form(count, "пассажир", "пассажира", "пассажиров")
}

/// Noun form for seat counts: 1 место, 2 места, 5 мест.
pub fn seat_word(count: i64) -> &'static str {
    plural_form(count, "место", "места", "мест")
}

fn plural_form(
    count: i64,
    one: &'static str,
    few: &'static str,
    many: &'static str,
) -> &'static str {
    let n = count.abs();
    if n % 10 == 1 && n % 100 != 11 {
        one
    } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
        few
    } else {
        many
    }
}

/// Format a minor-unit price as "12 345,67 ₽".
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    format!("{}{},{:02} ₽", sign, grouped, frac)
}

/// DD.MM.YYYY
pub fn format_date(date: NaiveDate) -> String {
    format!("{:02}.{:02}.{}", date.day(), date.month(), date.year())
}

/// DD.MM.YYYY HH:MM
pub fn format_datetime(ts: DateTime<Utc>) -> String {
    format!(
        "{:02}.{:02}.{} {:02}:{:02}",
        ts.day(),
        ts.month(),
        ts.year(),
        ts.hour(),
        ts.minute()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passenger_word() {
        assert_eq!(passenger_word(1), "пассажир");
        assert_eq!(passenger_word(2), "пассажира");
        assert_eq!(passenger_word(5), "пассажиров");
        assert_eq!(passenger_word(11), "пассажиров");
        assert_eq!(passenger_word(21), "пассажир");
        assert_eq!(passenger_word(104), "пассажира");
        assert_eq!(passenger_word(112), "пассажиров");
    }

    #[test]
    fn test_seat_word() {
        assert_eq!(seat_word(1), "место");
        assert_eq!(seat_word(3), "места");
        assert_eq!(seat_word(12), "мест");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1234567), "12 345,67 ₽");
        assert_eq!(format_price(100), "1,00 ₽");
        assert_eq!(format_price(99), "0,99 ₽");
        assert_eq!(format_price(100000000), "1 000 000,00 ₽");
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(d), "07.03.2025");
    }
}
